//! # relocscope Prelude
//!
//! This module provides a convenient prelude for the most commonly used types from the
//! relocscope library.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all relocscope operations
pub use crate::Error;

/// The result type used throughout relocscope
pub use crate::Result;

// ================================================================================================
// Main Entry Points
// ================================================================================================

/// Loaded image and low-level parsing utilities
pub use crate::{File, Parser, PeImage};

/// Offset addressed reads
pub use crate::file::cursor::ByteCursor;

/// objdump `.reloc` dump reconstruction
pub use crate::file::hexdump::parse_reloc_dump;

// ================================================================================================
// Headers
// ================================================================================================

/// Header structures
pub use crate::pe::{
    coff::{CoffHeader, FileCharacteristics},
    directory::{DataDirectories, DataDirectory, DataDirectoryType},
    dos::DosHeader,
    optional::{OptionalHeader, OptionalHeader32, OptionalHeader64},
    section::{SectionCharacteristics, SectionHeader, SectionTable},
};

// ================================================================================================
// Relocations
// ================================================================================================

/// Relocation decoding
pub use crate::reloc::{
    decode_relocations, RelocationBlock, RelocationBlocks, RelocationEntry, RelocationFilter,
    RelocationKind,
};

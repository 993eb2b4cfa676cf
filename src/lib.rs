// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![allow(dead_code)]
//#![deny(unsafe_code)]
// - 'file/physical.rs' uses mmap to map a file into memory

//! # relocscope
//!
//! A small, dependency-light decoder for Windows Portable Executable headers and base
//! relocations. `relocscope` parses the DOS stub, COFF header, PE32/PE32+ optional header, data
//! directories and section table of an image, then walks its `.reloc` directory and decodes the
//! fixups of every page.
//!
//! ## Features
//!
//! - **Efficient memory access** - Memory-mapped file access and borrowed, zero-copy parsing
//! - **Strict decoding** - Every structure is bounds-checked, malformed input is a typed error
//! - **PE32 and PE32+** - Both optional header layouts, with the full set of fixed fields
//! - **Streaming relocations** - Blocks decoded one at a time, or collected in one go
//! - **objdump input** - `.reloc` bytes recovered from `objdump -s` text dumps
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use relocscope::prelude::*;
//! use std::path::Path;
//!
//! let file = File::from_file(Path::new("BOOTX64.EFI"))?;
//! let image = file.image();
//! println!("machine type: {:04x}", image.coff().machine);
//!
//! let filter = RelocationFilter::default();
//! for block in image.relocations()? {
//!     let targets: Vec<u32> = block.targets(&filter).collect();
//!     println!("Page RVA: 0x{:x}, {} relocations", block.page_rva, targets.len());
//! }
//! # Ok::<(), relocscope::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`file`] - Loading (memory-mapped or in-memory) and bounds-checked byte access
//! - [`pe`] - DOS, COFF and optional headers, data directories, section table
//! - [`reloc`] - Base relocation blocks, entries and kinds
//! - [`prelude`] - Convenient re-exports of commonly used types
//! - [`Error`] and [`Result`] - Error handling
//!
//! ## Development and Testing
//!
//! ### Fuzzing
//!
//! ```bash
//! cargo +nightly fuzz run image --release
//! ```
//!
//! ### Benchmarks
//!
//! ```bash
//! cargo bench --bench relocations
//! ```

#[macro_use]
pub(crate) mod error;

/// Shared functionality which is used in unit tests
#[cfg(test)]
pub(crate) mod test;

/// Loading of images and low-level byte access.
///
/// - [`File`] - Owns the image bytes and the parsed headers
/// - [`file::cursor::ByteCursor`] - Offset addressed little-endian reads
/// - [`Parser`] - Sequential little-endian reads
/// - [`file::hexdump::parse_reloc_dump`] - `.reloc` bytes from `objdump -s` output
pub mod file;

/// PE header structures and their decoding.
pub mod pe;

/// Base relocation decoding
pub mod reloc;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust,no_run
/// use relocscope::prelude::*;
///
/// let file = File::from_file("app.efi".as_ref())?;
/// let blocks: Vec<RelocationBlock> = file.relocations()?;
/// # Ok::<(), relocscope::Error>(())
/// ```
pub mod prelude;

/// `relocscope` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `relocscope` Error type
///
/// # Examples
///
/// ```rust
/// use relocscope::{Error, File};
///
/// match File::from_mem(b"MZ".to_vec()) {
///     Ok(_) => println!("Loaded successfully"),
///     Err(Error::OutOfBounds) => println!("Truncated DOS header"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
pub use error::Error;

/// Low-level parsing utilities and the loaded file.
///
/// # Example
///
/// ```rust
/// use relocscope::Parser;
///
/// let data = [0x00, 0x10, 0x00, 0x00, 0x0C, 0x00, 0x00, 0x00];
/// let mut parser = Parser::new(&data);
/// assert_eq!(parser.read_le::<u32>()?, 0x1000);
/// assert_eq!(parser.read_le::<u32>()?, 12);
/// # Ok::<(), relocscope::Error>(())
/// ```
pub use file::{parser::Parser, File};

/// The parsed image, see [`pe::PeImage`].
pub use pe::PeImage;

/// Relocation types, see [`reloc`].
pub use reloc::{
    decode_relocations, RelocationBlock, RelocationBlocks, RelocationEntry, RelocationFilter,
    RelocationKind,
};

//! COFF file header.
//!
//! The 20 byte header directly behind the `PE\0\0` signature. It tells how many sections follow
//! and how large the optional header is, which is all the decoder needs to locate the rest of
//! the image.

use bitflags::bitflags;

use crate::{file::cursor::ByteCursor, Result};

/// Unknown or unspecified machine
pub const IMAGE_FILE_MACHINE_UNKNOWN: u16 = 0x0000;
/// Intel 386 and compatible
pub const IMAGE_FILE_MACHINE_I386: u16 = 0x014C;
/// ARM little endian
pub const IMAGE_FILE_MACHINE_ARM: u16 = 0x01C0;
/// ARM Thumb-2 little endian
pub const IMAGE_FILE_MACHINE_ARMNT: u16 = 0x01C4;
/// Intel Itanium
pub const IMAGE_FILE_MACHINE_IA64: u16 = 0x0200;
/// EFI byte code
pub const IMAGE_FILE_MACHINE_EBC: u16 = 0x0EBC;
/// x64
pub const IMAGE_FILE_MACHINE_AMD64: u16 = 0x8664;
/// ARM64 little endian
pub const IMAGE_FILE_MACHINE_ARM64: u16 = 0xAA64;
/// RISC-V 64-bit
pub const IMAGE_FILE_MACHINE_RISCV64: u16 = 0x5064;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    /// COFF `Characteristics` flags
    pub struct FileCharacteristics: u16 {
        /// Image does not contain base relocations and must be loaded at its preferred base
        const RELOCS_STRIPPED = 0x0001;
        /// Image is valid and can be run
        const EXECUTABLE_IMAGE = 0x0002;
        /// COFF line numbers have been removed
        const LINE_NUMS_STRIPPED = 0x0004;
        /// COFF local symbols have been removed
        const LOCAL_SYMS_STRIPPED = 0x0008;
        /// Aggressively trim working set
        const AGGRESSIVE_WS_TRIM = 0x0010;
        /// Application can handle > 2 GB addresses
        const LARGE_ADDRESS_AWARE = 0x0020;
        /// Little endian, deprecated
        const BYTES_REVERSED_LO = 0x0080;
        /// Machine is based on a 32-bit-word architecture
        const MACHINE_32BIT = 0x0100;
        /// Debugging information is removed from the image file
        const DEBUG_STRIPPED = 0x0200;
        /// Copy to swap when run from removable media
        const REMOVABLE_RUN_FROM_SWAP = 0x0400;
        /// Copy to swap when run from network media
        const NET_RUN_FROM_SWAP = 0x0800;
        /// The image file is a system file
        const SYSTEM = 0x1000;
        /// The image file is a dynamic-link library
        const DLL = 0x2000;
        /// Only run on a uniprocessor machine
        const UP_SYSTEM_ONLY = 0x4000;
        /// Big endian, deprecated
        const BYTES_REVERSED_HI = 0x8000;
    }
}

/// The COFF file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoffHeader {
    /// Target machine, one of the `IMAGE_FILE_MACHINE_*` values
    pub machine: u16,
    /// Number of entries in the section table
    pub section_count: u16,
    /// Creation time in seconds since the Unix epoch
    pub timestamp: u32,
    /// File offset of the COFF symbol table, 0 for images
    pub symbol_table_offset: u32,
    /// Number of COFF symbols, 0 for images
    pub symbol_count: u32,
    /// Size of the optional header in bytes, 0 for object files
    pub optional_header_size: u16,
    /// Raw `Characteristics`, see [`FileCharacteristics`]
    pub characteristics: u16,
}

impl CoffHeader {
    /// Size of the COFF file header on disk.
    pub const SIZE: usize = 20;

    /// Decode the COFF header located at `offset`.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the buffer ends inside the header.
    pub fn read(data: &ByteCursor<'_>, offset: usize) -> Result<CoffHeader> {
        let header = data.slice(offset, Self::SIZE)?;

        Ok(CoffHeader {
            machine: header.read_u16_le(0)?,
            section_count: header.read_u16_le(2)?,
            timestamp: header.read_u32_le(4)?,
            symbol_table_offset: header.read_u32_le(8)?,
            symbol_count: header.read_u32_le(12)?,
            optional_header_size: header.read_u16_le(16)?,
            characteristics: header.read_u16_le(18)?,
        })
    }

    /// The known `Characteristics` flags, unknown bits are dropped.
    #[must_use]
    pub fn flags(&self) -> FileCharacteristics {
        FileCharacteristics::from_bits_truncate(self.characteristics)
    }

    /// A short name for the machine type, `None` for values this crate does not know.
    #[must_use]
    pub fn machine_name(&self) -> Option<&'static str> {
        match self.machine {
            IMAGE_FILE_MACHINE_UNKNOWN => Some("unknown"),
            IMAGE_FILE_MACHINE_I386 => Some("i386"),
            IMAGE_FILE_MACHINE_ARM => Some("arm"),
            IMAGE_FILE_MACHINE_ARMNT => Some("armnt"),
            IMAGE_FILE_MACHINE_IA64 => Some("ia64"),
            IMAGE_FILE_MACHINE_EBC => Some("ebc"),
            IMAGE_FILE_MACHINE_AMD64 => Some("amd64"),
            IMAGE_FILE_MACHINE_ARM64 => Some("arm64"),
            IMAGE_FILE_MACHINE_RISCV64 => Some("riscv64"),
            _ => None,
        }
    }
}

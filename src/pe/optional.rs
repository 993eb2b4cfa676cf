//! Optional header, in its PE32 and PE32+ flavours.
//!
//! Despite its name the optional header is mandatory for images. The magic in its first two
//! bytes selects the layout: PE32 carries a `base_of_data` field and 32-bit `image_base` and
//! stack/heap sizes, PE32+ widens those to 64 bits. Both end in the data directory table, see
//! [`crate::pe::directory`].

use crate::{file::cursor::ByteCursor, Error, Result};

/// Magic of a PE32 (32-bit) optional header
pub const PE32_MAGIC: u16 = 0x10B;
/// Magic of a PE32+ (64-bit) optional header
pub const PE32_PLUS_MAGIC: u16 = 0x20B;

/// Optional header of a 32-bit image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct OptionalHeader32 {
    pub linker_version: (u8, u8),
    pub code_size: u32,
    pub init_data_size: u32,
    pub uninit_data_size: u32,
    pub entry_point_rva: u32,
    pub code_base: u32,
    pub data_base: u32,
    pub image_base: u32,
    pub section_alignment: u32,
    pub file_alignment: u32,
    pub os_version: (u16, u16),
    pub image_version: (u16, u16),
    pub subsystem_version: (u16, u16),
    pub win32_version: u32,
    pub image_size: u32,
    pub headers_size: u32,
    pub checksum: u32,
    pub subsystem: u16,
    pub dll_characteristics: u16,
    pub stack_reserve_size: u32,
    pub stack_commit_size: u32,
    pub heap_reserve_size: u32,
    pub heap_commit_size: u32,
    pub loader_flags: u32,
    pub data_directory_count: u32,
}

impl OptionalHeader32 {
    /// Size of the fields in front of the data directory table, magic included.
    pub const FIXED_SIZE: usize = 96;

    fn read(header: &ByteCursor<'_>) -> Result<OptionalHeader32> {
        Ok(OptionalHeader32 {
            linker_version: (header.read_u8(2)?, header.read_u8(3)?),
            code_size: header.read_u32_le(4)?,
            init_data_size: header.read_u32_le(8)?,
            uninit_data_size: header.read_u32_le(12)?,
            entry_point_rva: header.read_u32_le(16)?,
            code_base: header.read_u32_le(20)?,
            data_base: header.read_u32_le(24)?,
            image_base: header.read_u32_le(28)?,
            section_alignment: header.read_u32_le(32)?,
            file_alignment: header.read_u32_le(36)?,
            os_version: (header.read_u16_le(40)?, header.read_u16_le(42)?),
            image_version: (header.read_u16_le(44)?, header.read_u16_le(46)?),
            subsystem_version: (header.read_u16_le(48)?, header.read_u16_le(50)?),
            win32_version: header.read_u32_le(52)?,
            image_size: header.read_u32_le(56)?,
            headers_size: header.read_u32_le(60)?,
            checksum: header.read_u32_le(64)?,
            subsystem: header.read_u16_le(68)?,
            dll_characteristics: header.read_u16_le(70)?,
            stack_reserve_size: header.read_u32_le(72)?,
            stack_commit_size: header.read_u32_le(76)?,
            heap_reserve_size: header.read_u32_le(80)?,
            heap_commit_size: header.read_u32_le(84)?,
            loader_flags: header.read_u32_le(88)?,
            data_directory_count: header.read_u32_le(92)?,
        })
    }
}

/// Optional header of a 64-bit image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct OptionalHeader64 {
    pub linker_version: (u8, u8),
    pub code_size: u32,
    pub init_data_size: u32,
    pub uninit_data_size: u32,
    pub entry_point_rva: u32,
    pub code_base: u32,
    pub image_base: u64,
    pub section_alignment: u32,
    pub file_alignment: u32,
    pub os_version: (u16, u16),
    pub image_version: (u16, u16),
    pub subsystem_version: (u16, u16),
    pub win32_version: u32,
    pub image_size: u32,
    pub headers_size: u32,
    pub checksum: u32,
    pub subsystem: u16,
    pub dll_characteristics: u16,
    pub stack_reserve_size: u64,
    pub stack_commit_size: u64,
    pub heap_reserve_size: u64,
    pub heap_commit_size: u64,
    pub loader_flags: u32,
    pub data_directory_count: u32,
}

impl OptionalHeader64 {
    /// Size of the fields in front of the data directory table, magic included.
    pub const FIXED_SIZE: usize = 112;

    fn read(header: &ByteCursor<'_>) -> Result<OptionalHeader64> {
        Ok(OptionalHeader64 {
            linker_version: (header.read_u8(2)?, header.read_u8(3)?),
            code_size: header.read_u32_le(4)?,
            init_data_size: header.read_u32_le(8)?,
            uninit_data_size: header.read_u32_le(12)?,
            entry_point_rva: header.read_u32_le(16)?,
            code_base: header.read_u32_le(20)?,
            image_base: header.read_u64_le(24)?,
            section_alignment: header.read_u32_le(32)?,
            file_alignment: header.read_u32_le(36)?,
            os_version: (header.read_u16_le(40)?, header.read_u16_le(42)?),
            image_version: (header.read_u16_le(44)?, header.read_u16_le(46)?),
            subsystem_version: (header.read_u16_le(48)?, header.read_u16_le(50)?),
            win32_version: header.read_u32_le(52)?,
            image_size: header.read_u32_le(56)?,
            headers_size: header.read_u32_le(60)?,
            checksum: header.read_u32_le(64)?,
            subsystem: header.read_u16_le(68)?,
            dll_characteristics: header.read_u16_le(70)?,
            stack_reserve_size: header.read_u64_le(72)?,
            stack_commit_size: header.read_u64_le(80)?,
            heap_reserve_size: header.read_u64_le(88)?,
            heap_commit_size: header.read_u64_le(96)?,
            loader_flags: header.read_u32_le(104)?,
            data_directory_count: header.read_u32_le(108)?,
        })
    }
}

/// The optional header, one variant per magic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionalHeader {
    /// `0x10B`
    Pe32(OptionalHeader32),
    /// `0x20B`
    Pe32Plus(OptionalHeader64),
}

impl OptionalHeader {
    /// Decode the fixed region of an optional header.
    ///
    /// `data` must span exactly the `optional_header_size` bytes declared by the COFF header.
    /// The data directory table is not decoded here, it starts at
    /// [`OptionalHeader::directory_table_offset`].
    ///
    /// # Errors
    /// - [`crate::Error::TruncatedOptionalHeader`] if `data` cannot hold the magic or the fixed
    ///   fields of its variant
    /// - [`crate::Error::UnknownOptionalHeaderMagic`] for anything but PE32 and PE32+
    pub fn read(data: &ByteCursor<'_>) -> Result<OptionalHeader> {
        let magic = data
            .read_u16_le(0)
            .map_err(|_| Error::TruncatedOptionalHeader)?;

        let fixed_size = match magic {
            PE32_MAGIC => OptionalHeader32::FIXED_SIZE,
            PE32_PLUS_MAGIC => OptionalHeader64::FIXED_SIZE,
            _ => return Err(Error::UnknownOptionalHeaderMagic(magic)),
        };

        if data.len() < fixed_size {
            return Err(Error::TruncatedOptionalHeader);
        }

        match magic {
            PE32_MAGIC => Ok(OptionalHeader::Pe32(OptionalHeader32::read(data)?)),
            _ => Ok(OptionalHeader::Pe32Plus(OptionalHeader64::read(data)?)),
        }
    }

    /// The magic this header was decoded from.
    #[must_use]
    pub fn magic(&self) -> u16 {
        match self {
            OptionalHeader::Pe32(_) => PE32_MAGIC,
            OptionalHeader::Pe32Plus(_) => PE32_PLUS_MAGIC,
        }
    }

    /// `true` for 64-bit images
    #[must_use]
    pub fn is_pe32_plus(&self) -> bool {
        matches!(self, OptionalHeader::Pe32Plus(_))
    }

    /// Offset of the data directory table from the start of the optional header.
    #[must_use]
    pub fn directory_table_offset(&self) -> usize {
        match self {
            OptionalHeader::Pe32(_) => OptionalHeader32::FIXED_SIZE,
            OptionalHeader::Pe32Plus(_) => OptionalHeader64::FIXED_SIZE,
        }
    }

    /// Number of data directory entries the header declares.
    #[must_use]
    pub fn data_directory_count(&self) -> u32 {
        match self {
            OptionalHeader::Pe32(header) => header.data_directory_count,
            OptionalHeader::Pe32Plus(header) => header.data_directory_count,
        }
    }

    /// Preferred load address, widened to 64 bits for PE32.
    #[must_use]
    pub fn image_base(&self) -> u64 {
        match self {
            OptionalHeader::Pe32(header) => u64::from(header.image_base),
            OptionalHeader::Pe32Plus(header) => header.image_base,
        }
    }

    /// RVA of the entry point
    #[must_use]
    pub fn entry_point_rva(&self) -> u32 {
        match self {
            OptionalHeader::Pe32(header) => header.entry_point_rva,
            OptionalHeader::Pe32Plus(header) => header.entry_point_rva,
        }
    }

    /// Raw `Subsystem` value
    #[must_use]
    pub fn subsystem(&self) -> u16 {
        match self {
            OptionalHeader::Pe32(header) => header.subsystem,
            OptionalHeader::Pe32Plus(header) => header.subsystem,
        }
    }

    /// Size of the image once mapped, in bytes.
    #[must_use]
    pub fn image_size(&self) -> u32 {
        match self {
            OptionalHeader::Pe32(header) => header.image_size,
            OptionalHeader::Pe32Plus(header) => header.image_size,
        }
    }
}

/// Human readable name for a `Subsystem` value.
#[must_use]
pub fn subsystem_name(subsystem: u16) -> Option<&'static str> {
    match subsystem {
        0 => Some("unknown"),
        1 => Some("native"),
        2 => Some("Windows GUI"),
        3 => Some("Windows console"),
        5 => Some("OS/2 console"),
        7 => Some("POSIX console"),
        8 => Some("native Win9x driver"),
        9 => Some("Windows CE GUI"),
        10 => Some("EFI application"),
        11 => Some("EFI boot service driver"),
        12 => Some("EFI runtime driver"),
        13 => Some("EFI ROM"),
        14 => Some("XBOX"),
        16 => Some("Windows boot application"),
        _ => None,
    }
}

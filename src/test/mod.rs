//! Synthetic images for unit tests.
//!
//! [`ImageBuilder`] lays out a minimal image:
//!
//! | offset | content                                              |
//! |--------|------------------------------------------------------|
//! | 0x00   | `MZ`, `e_lfanew` = 0x40                              |
//! | 0x40   | `PE\0\0`                                             |
//! | 0x44   | COFF header                                          |
//! | 0x58   | optional header, then the section table              |
//! | 0x400  | relocation directory, mapped by `.reloc` at RVA 0x2000 |

use crate::pe::optional::{OptionalHeader32, OptionalHeader64, PE32_MAGIC, PE32_PLUS_MAGIC};

pub const RELOC_RVA: u32 = 0x2000;
pub const RELOC_FILE_OFFSET: usize = 0x400;

const COFF_OFFSET: usize = 0x44;
const OPTIONAL_OFFSET: usize = COFF_OFFSET + 20;
const MIN_IMAGE_SIZE: usize = 0x600;

/// One block for page 0x1000: Dir64 @ 0x10, Dir64 @ 0x20, Absolute @ 0x30, Dir64 @ 0x40
#[rustfmt::skip]
pub const DEFAULT_RELOCATIONS: [u8; 16] = [
    0x00, 0x10, 0x00, 0x00,
    0x10, 0x00, 0x00, 0x00,
    0x10, 0xA0, 0x20, 0xA0, 0x30, 0x00, 0x40, 0xA0,
];

fn put(data: &mut [u8], offset: usize, bytes: &[u8]) {
    data[offset..offset + bytes.len()].copy_from_slice(bytes);
}

pub struct ImageBuilder {
    pe32: bool,
    magic: Option<u16>,
    optional_header_size: Option<u16>,
    data_directory_count: u32,
    section_count: u16,
    relocation_directory: Option<(u32, u32)>,
    relocation_data: Vec<u8>,
}

impl ImageBuilder {
    pub fn new() -> Self {
        ImageBuilder {
            pe32: false,
            magic: None,
            optional_header_size: None,
            data_directory_count: 6,
            section_count: 1,
            relocation_directory: None,
            relocation_data: DEFAULT_RELOCATIONS.to_vec(),
        }
    }

    pub fn pe32(mut self) -> Self {
        self.pe32 = true;
        self
    }

    pub fn magic(mut self, magic: u16) -> Self {
        self.magic = Some(magic);
        self
    }

    pub fn optional_header_size(mut self, size: u16) -> Self {
        self.optional_header_size = Some(size);
        self
    }

    pub fn without_optional_header(self) -> Self {
        self.optional_header_size(0)
    }

    pub fn data_directory_count(mut self, count: u32) -> Self {
        self.data_directory_count = count;
        self
    }

    pub fn section_count(mut self, count: u16) -> Self {
        self.section_count = count;
        self
    }

    pub fn relocation_directory(mut self, rva: u32, size: u32) -> Self {
        self.relocation_directory = Some((rva, size));
        self
    }

    pub fn relocation_data(mut self, data: &[u8]) -> Self {
        self.relocation_data = data.to_vec();
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let fixed_size = if self.pe32 {
            OptionalHeader32::FIXED_SIZE
        } else {
            OptionalHeader64::FIXED_SIZE
        };
        let directories_size = self.data_directory_count as usize * 8;
        let optional_header_size = self
            .optional_header_size
            .map_or(fixed_size + directories_size, usize::from);

        let mut data = vec![0u8; (RELOC_FILE_OFFSET + self.relocation_data.len()).max(MIN_IMAGE_SIZE)];

        put(&mut data, 0, b"MZ");
        put(&mut data, 0x3C, &0x40u32.to_le_bytes());
        put(&mut data, 0x40, b"PE\0\0");

        let machine: u16 = if self.pe32 { 0x014C } else { 0x8664 };
        put(&mut data, COFF_OFFSET, &machine.to_le_bytes());
        put(&mut data, COFF_OFFSET + 2, &self.section_count.to_le_bytes());
        put(&mut data, COFF_OFFSET + 4, &0x5F5E_1000u32.to_le_bytes());
        put(&mut data, COFF_OFFSET + 16, &(optional_header_size as u16).to_le_bytes());
        put(&mut data, COFF_OFFSET + 18, &0x0022u16.to_le_bytes());

        if optional_header_size == 0 {
            put(&mut data, RELOC_FILE_OFFSET, &self.relocation_data);
            return data;
        }

        let mut optional = vec![0u8; (fixed_size + directories_size).max(optional_header_size)];
        let magic = self
            .magic
            .unwrap_or(if self.pe32 { PE32_MAGIC } else { PE32_PLUS_MAGIC });
        put(&mut optional, 0, &magic.to_le_bytes());
        put(&mut optional, 16, &0x1000u32.to_le_bytes());
        put(&mut optional, 32, &0x1000u32.to_le_bytes());
        put(&mut optional, 36, &0x200u32.to_le_bytes());
        put(&mut optional, 56, &0x3000u32.to_le_bytes());
        put(&mut optional, 60, &0x400u32.to_le_bytes());
        put(&mut optional, 68, &10u16.to_le_bytes());
        if self.pe32 {
            put(&mut optional, 28, &0x0040_0000u32.to_le_bytes());
        } else {
            put(&mut optional, 24, &0x1_4000_0000u64.to_le_bytes());
        }
        put(&mut optional, fixed_size - 4, &self.data_directory_count.to_le_bytes());

        let (reloc_rva, reloc_size) = self
            .relocation_directory
            .unwrap_or((RELOC_RVA, self.relocation_data.len() as u32));
        if self.data_directory_count > 5 {
            put(&mut optional, fixed_size + 40, &reloc_rva.to_le_bytes());
            put(&mut optional, fixed_size + 44, &reloc_size.to_le_bytes());
        }
        put(&mut data, OPTIONAL_OFFSET, &optional[..optional_header_size]);

        if self.section_count > 0 {
            let section = OPTIONAL_OFFSET + optional_header_size;
            let virtual_size = (self.relocation_data.len() as u32).max(0x1000);
            put(&mut data, section, b".reloc\0\0");
            put(&mut data, section + 8, &virtual_size.to_le_bytes());
            put(&mut data, section + 12, &RELOC_RVA.to_le_bytes());
            put(&mut data, section + 16, &0x200u32.to_le_bytes());
            put(&mut data, section + 20, &(RELOC_FILE_OFFSET as u32).to_le_bytes());
            put(&mut data, section + 36, &0x4200_0040u32.to_le_bytes());
        }

        put(&mut data, RELOC_FILE_OFFSET, &self.relocation_data);
        data
    }
}

//! Section table and RVA translation.

use bitflags::bitflags;

use crate::{file::cursor::ByteCursor, Result};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    /// Section `Characteristics` flags
    pub struct SectionCharacteristics: u32 {
        /// Section should not be padded to the next boundary
        const TYPE_NO_PAD = 0x0000_0008;
        /// Section contains executable code
        const CNT_CODE = 0x0000_0020;
        /// Section contains initialized data
        const CNT_INITIALIZED_DATA = 0x0000_0040;
        /// Section contains uninitialized data
        const CNT_UNINITIALIZED_DATA = 0x0000_0080;
        /// Section contains comments or other information, object files only
        const LNK_INFO = 0x0000_0200;
        /// Section will not become part of the image, object files only
        const LNK_REMOVE = 0x0000_0800;
        /// Section contains COMDAT data, object files only
        const LNK_COMDAT = 0x0000_1000;
        /// Section contains data referenced through the global pointer
        const GPREL = 0x0000_8000;
        /// Section contains extended relocations
        const LNK_NRELOC_OVFL = 0x0100_0000;
        /// Section can be discarded as needed
        const MEM_DISCARDABLE = 0x0200_0000;
        /// Section cannot be cached
        const MEM_NOT_CACHED = 0x0400_0000;
        /// Section is not pageable
        const MEM_NOT_PAGED = 0x0800_0000;
        /// Section can be shared in memory
        const MEM_SHARED = 0x1000_0000;
        /// Section can be executed as code
        const MEM_EXECUTE = 0x2000_0000;
        /// Section can be read
        const MEM_READ = 0x4000_0000;
        /// Section can be written to
        const MEM_WRITE = 0x8000_0000;
    }
}

/// One 40 byte section table record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionHeader {
    /// NUL padded name, not necessarily terminated
    pub name: [u8; 8],
    /// Size of the section once mapped
    pub virtual_size: u32,
    /// RVA of the first byte once mapped
    pub virtual_address: u32,
    /// Size of the initialized data on disk
    pub file_size: u32,
    /// File offset of the initialized data
    pub file_offset: u32,
    /// File offset of the COFF relocations, 0 for images
    pub relocations_offset: u32,
    /// File offset of the COFF line numbers, deprecated
    pub line_numbers_offset: u32,
    /// Number of COFF relocations, 0 for images
    pub relocation_count: u16,
    /// Number of COFF line numbers, deprecated
    pub line_number_count: u16,
    /// Raw `Characteristics`, see [`SectionCharacteristics`]
    pub characteristics: u32,
}

impl SectionHeader {
    /// Size of one section table record on disk.
    pub const SIZE: usize = 40;

    /// Decode the section record at `offset`.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the buffer ends inside the record.
    pub fn read(data: &ByteCursor<'_>, offset: usize) -> Result<SectionHeader> {
        let record = data.slice(offset, Self::SIZE)?;

        let mut name = [0u8; 8];
        name.copy_from_slice(record.read_bytes(0, 8)?);

        Ok(SectionHeader {
            name,
            virtual_size: record.read_u32_le(8)?,
            virtual_address: record.read_u32_le(12)?,
            file_size: record.read_u32_le(16)?,
            file_offset: record.read_u32_le(20)?,
            relocations_offset: record.read_u32_le(24)?,
            line_numbers_offset: record.read_u32_le(28)?,
            relocation_count: record.read_u16_le(32)?,
            line_number_count: record.read_u16_le(34)?,
            characteristics: record.read_u32_le(36)?,
        })
    }

    /// The name up to the first NUL, lossily converted to UTF-8.
    #[must_use]
    pub fn name(&self) -> String {
        let end = self
            .name
            .iter()
            .position(|&byte| byte == 0)
            .unwrap_or(self.name.len());
        String::from_utf8_lossy(&self.name[..end]).into_owned()
    }

    /// The known `Characteristics` flags, unknown bits are dropped.
    #[must_use]
    pub fn flags(&self) -> SectionCharacteristics {
        SectionCharacteristics::from_bits_truncate(self.characteristics)
    }

    /// `true` if `rva` falls inside `[virtual_address, virtual_address + virtual_size)`.
    #[must_use]
    pub fn contains_rva(&self, rva: u32) -> bool {
        let start = u64::from(self.virtual_address);
        let end = start + u64::from(self.virtual_size);
        (start..end).contains(&u64::from(rva))
    }
}

/// All section records of an image, in on-disk order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SectionTable {
    sections: Vec<SectionHeader>,
}

impl SectionTable {
    /// Decode `count` consecutive records starting at `offset`.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the table runs past the end of the buffer.
    pub fn read(data: &ByteCursor<'_>, offset: usize, count: u16) -> Result<SectionTable> {
        let table = data.slice(offset, usize::from(count) * SectionHeader::SIZE)?;

        let mut sections = Vec::with_capacity(usize::from(count));
        for index in 0..usize::from(count) {
            sections.push(SectionHeader::read(&table, index * SectionHeader::SIZE)?);
        }

        Ok(SectionTable { sections })
    }

    /// Sections in on-disk order
    pub fn iter(&self) -> std::slice::Iter<'_, SectionHeader> {
        self.sections.iter()
    }

    /// Number of sections
    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// `true` if the image has no sections
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Section at a table index
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&SectionHeader> {
        self.sections.get(index)
    }

    /// The first section with the given name. Names are not unique, later duplicates are
    /// only reachable through [`SectionTable::iter`].
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&SectionHeader> {
        self.sections.iter().find(|section| section.name() == name)
    }

    /// The first section whose virtual range contains `rva`.
    #[must_use]
    pub fn containing(&self, rva: u32) -> Option<&SectionHeader> {
        self.sections.iter().find(|section| section.contains_rva(rva))
    }

    /// Translate an RVA to a file offset through the section that maps it.
    ///
    /// Returns `None` if no section maps `rva`, or if the translated offset does not fit 32 bits.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use relocscope::File;
    /// use std::path::Path;
    ///
    /// let file = File::from_file(Path::new("app.efi"))?;
    /// if let Some(offset) = file.image().sections().rva_to_file_offset(0x1000) {
    ///     println!("RVA 0x1000 is at file offset 0x{offset:x}");
    /// }
    /// # Ok::<(), relocscope::Error>(())
    /// ```
    #[must_use]
    pub fn rva_to_file_offset(&self, rva: u32) -> Option<u32> {
        let section = self.containing(rva)?;
        section
            .file_offset
            .checked_add(rva - section.virtual_address)
    }
}

impl<'a> IntoIterator for &'a SectionTable {
    type Item = &'a SectionHeader;
    type IntoIter = std::slice::Iter<'a, SectionHeader>;

    fn into_iter(self) -> Self::IntoIter {
        self.sections.iter()
    }
}

//! PE header decoding.
//!
//! [`PeImage`] walks an image top to bottom: DOS stub, COFF header, optional header, data
//! directories and section table. Each structure has its own `read` routine in a submodule and
//! the first failure aborts the parse, there are no partially decoded images.
//!
//! # Key Components
//!
//! - [`dos::DosHeader`] - `MZ` stub and `e_lfanew`
//! - [`coff::CoffHeader`] - Machine, section count, optional header size
//! - [`optional::OptionalHeader`] - PE32 or PE32+ fixed fields
//! - [`directory::DataDirectories`] - The data directory table
//! - [`section::SectionTable`] - Section records and RVA translation

pub mod coff;
pub mod directory;
pub mod dos;
pub mod optional;
pub mod section;

use log::debug;

use crate::{
    file::cursor::ByteCursor,
    reloc::{decode_relocations, RelocationBlock, RelocationBlocks},
    Error, Result,
};
use coff::CoffHeader;
use directory::DataDirectories;
use dos::DosHeader;
use optional::OptionalHeader;
use section::SectionTable;

/// A parsed PE image borrowing its bytes.
///
/// Images with an `optional_header_size` of zero carry no optional header, no data directories
/// and no sections.
#[derive(Debug, Clone)]
pub struct PeImage<'a> {
    data: ByteCursor<'a>,
    dos: DosHeader,
    coff: CoffHeader,
    optional_header: Option<OptionalHeader>,
    directories: DataDirectories,
    sections: SectionTable,
}

impl<'a> PeImage<'a> {
    /// Parse the headers, data directories and section table of an image.
    ///
    /// # Errors
    /// - [`crate::Error::NotAnExecutable`] if the data does not start with `MZ`
    /// - [`crate::Error::NotAPeImage`] if `e_lfanew` does not point at `PE\0\0`
    /// - [`crate::Error::UnknownOptionalHeaderMagic`] for optional headers other than PE32/PE32+
    /// - [`crate::Error::TruncatedOptionalHeader`] if the optional header is too small for its
    ///   fields or its data directory table
    /// - [`crate::Error::OutOfBounds`] if any structure runs past the end of the data
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use relocscope::pe::PeImage;
    ///
    /// let data = std::fs::read("app.efi")?;
    /// let image = PeImage::parse(&data)?;
    /// println!("machine type: {:04x}", image.coff().machine);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn parse(data: &'a [u8]) -> Result<PeImage<'a>> {
        let data = ByteCursor::new(data);

        let dos = DosHeader::read(&data)?;
        let coff_offset = dos.coff_file_header_offset();
        let coff = CoffHeader::read(&data, coff_offset)?;
        debug!(
            "COFF header at 0x{:x}: machine 0x{:04x}, {} sections, optional header of {} bytes",
            coff_offset, coff.machine, coff.section_count, coff.optional_header_size
        );

        if coff.optional_header_size == 0 {
            debug!("No optional header, skipping data directories and sections");
            return Ok(PeImage {
                data,
                dos,
                coff,
                optional_header: None,
                directories: DataDirectories::default(),
                sections: SectionTable::default(),
            });
        }

        let optional_offset = coff_offset + CoffHeader::SIZE;
        let optional_data = data.slice(optional_offset, usize::from(coff.optional_header_size))?;
        let optional_header = OptionalHeader::read(&optional_data)?;
        let directories = DataDirectories::read(
            &optional_data,
            optional_header.directory_table_offset(),
            optional_header.data_directory_count(),
        )?;
        debug!(
            "Optional header magic 0x{:x} with {} data directories",
            optional_header.magic(),
            directories.len()
        );

        let sections_offset = optional_offset + usize::from(coff.optional_header_size);
        let sections = SectionTable::read(&data, sections_offset, coff.section_count)?;

        Ok(PeImage {
            data,
            dos,
            coff,
            optional_header: Some(optional_header),
            directories,
            sections,
        })
    }

    /// The DOS stub header
    #[must_use]
    pub fn dos(&self) -> &DosHeader {
        &self.dos
    }

    /// The COFF file header
    #[must_use]
    pub fn coff(&self) -> &CoffHeader {
        &self.coff
    }

    /// The optional header, `None` if the COFF header declares a size of zero
    #[must_use]
    pub fn optional_header(&self) -> Option<&OptionalHeader> {
        self.optional_header.as_ref()
    }

    /// The data directory table
    #[must_use]
    pub fn directories(&self) -> &DataDirectories {
        &self.directories
    }

    /// The section table
    #[must_use]
    pub fn sections(&self) -> &SectionTable {
        &self.sections
    }

    /// The raw image bytes
    #[must_use]
    pub fn data(&self) -> &'a [u8] {
        self.data.data()
    }

    /// Raw bytes of the base relocation directory.
    ///
    /// Returns `Ok(None)` if the image has no base relocation directory or it is empty.
    ///
    /// # Errors
    /// - [`crate::Error::UnmappedRva`] if no section maps the directory's RVA
    /// - [`crate::Error::OutOfBounds`] if the directory runs past the end of the data
    pub fn relocation_data(&self) -> Result<Option<&'a [u8]>> {
        let Some(directory) = self.directories.base_relocation() else {
            return Ok(None);
        };

        let offset = self
            .sections
            .rva_to_file_offset(directory.virtual_address)
            .ok_or(Error::UnmappedRva(directory.virtual_address))?;
        debug!(
            "Base relocation directory RVA 0x{:x} at file offset 0x{:x}, {} bytes",
            directory.virtual_address, offset, directory.size
        );

        let bytes = self
            .data
            .read_bytes(offset as usize, directory.size as usize)?;
        Ok(Some(bytes))
    }

    /// A streaming decoder over the relocation blocks, `None` without a relocation directory.
    ///
    /// # Errors
    /// Same as [`PeImage::relocation_data`].
    pub fn relocation_blocks(&self) -> Result<Option<RelocationBlocks<'a>>> {
        Ok(self.relocation_data()?.map(RelocationBlocks::new))
    }

    /// All relocation blocks of the image, empty without a relocation directory.
    ///
    /// # Errors
    /// Fails like [`PeImage::relocation_data`] and [`crate::reloc::decode_relocations`].
    pub fn relocations(&self) -> Result<Vec<RelocationBlock>> {
        match self.relocation_data()? {
            Some(data) => decode_relocations(data),
            None => Ok(Vec::new()),
        }
    }
}

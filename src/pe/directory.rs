//! Data directory table.
//!
//! The table sits at the end of the optional header and holds `(virtual_address, size)` pairs,
//! one per directory. Slot positions have fixed meanings, see [`DataDirectoryType`]. Images may
//! declare fewer than the 16 standard slots.

use strum::{EnumCount, EnumIter, IntoEnumIterator};

use crate::{file::cursor::ByteCursor, Error, Result};

/// The standard data directory slots, in table order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumCount)]
pub enum DataDirectoryType {
    /// Export table (`.edata`)
    ExportTable,
    /// Import table (`.idata`)
    ImportTable,
    /// Resource table (`.rsrc`)
    ResourceTable,
    /// Exception table (`.pdata`)
    ExceptionTable,
    /// Attribute certificate table, the address is a file offset
    CertificateTable,
    /// Base relocation table (`.reloc`)
    BaseRelocationTable,
    /// Debug data
    Debug,
    /// Reserved, must be zero
    Architecture,
    /// Global pointer register value
    GlobalPtr,
    /// Thread local storage table
    TlsTable,
    /// Load configuration table
    LoadConfigTable,
    /// Bound import table
    BoundImport,
    /// Import address table
    ImportAddressTable,
    /// Delay import descriptor
    DelayImportDescriptor,
    /// CLR runtime header
    ClrRuntimeHeader,
    /// Reserved, must be zero
    Reserved,
}

impl DataDirectoryType {
    /// Slot type for a table index, `None` past the 16 standard slots.
    #[must_use]
    pub fn from_index(index: usize) -> Option<DataDirectoryType> {
        DataDirectoryType::iter().nth(index)
    }

    /// Table index of this slot
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// A single `(virtual_address, size)` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DataDirectory {
    /// RVA of the directory, a file offset for [`DataDirectoryType::CertificateTable`]
    pub virtual_address: u32,
    /// Size in bytes
    pub size: u32,
}

impl DataDirectory {
    /// Size of one table entry on disk.
    pub const SIZE: usize = 8;

    /// `true` if the slot describes no data
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }
}

/// The decoded data directory table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DataDirectories {
    entries: Vec<DataDirectory>,
}

impl DataDirectories {
    /// Decode `count` entries starting at `offset` inside the optional header.
    ///
    /// # Errors
    /// Returns [`crate::Error::TruncatedOptionalHeader`] if the optional header ends before the
    /// last declared entry.
    pub fn read(header: &ByteCursor<'_>, offset: usize, count: u32) -> Result<DataDirectories> {
        let table_size = (count as usize)
            .checked_mul(DataDirectory::SIZE)
            .ok_or(Error::TruncatedOptionalHeader)?;
        let table = header
            .slice(offset, table_size)
            .map_err(|_| Error::TruncatedOptionalHeader)?;

        let mut entries = Vec::with_capacity(count as usize);
        for index in 0..count as usize {
            let entry_offset = index * DataDirectory::SIZE;
            entries.push(DataDirectory {
                virtual_address: table.read_u32_le(entry_offset)?,
                size: table.read_u32_le(entry_offset + 4)?,
            });
        }

        Ok(DataDirectories { entries })
    }

    /// Entry at a table index
    #[must_use]
    pub fn get(&self, index: usize) -> Option<DataDirectory> {
        self.entries.get(index).copied()
    }

    /// Entry for a standard slot, `None` if the image declares fewer slots.
    #[must_use]
    pub fn get_type(&self, kind: DataDirectoryType) -> Option<DataDirectory> {
        self.get(kind.index())
    }

    /// The base relocation directory, only if present and non-empty.
    #[must_use]
    pub fn base_relocation(&self) -> Option<DataDirectory> {
        self.get_type(DataDirectoryType::BaseRelocationTable)
            .filter(|directory| !directory.is_empty())
    }

    /// Entries in table order, with the slot type where the index is a standard one.
    pub fn iter(&self) -> impl Iterator<Item = (Option<DataDirectoryType>, DataDirectory)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .map(|(index, entry)| (DataDirectoryType::from_index(index), *entry))
    }

    /// Number of declared entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` if the image declares no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

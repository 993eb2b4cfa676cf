use super::{RelocationFilter, RelocationKind};
use crate::Result;

/// One relocation within a 4 KiB page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RelocationEntry {
    /// How the loader patches the target
    pub kind: RelocationKind,
    /// Offset of the target from the block's page, `0..=0xFFF`
    pub offset: u16,
}

impl RelocationEntry {
    /// Size of an encoded entry.
    pub const SIZE: usize = 2;

    /// Split an encoded entry into its 4-bit type and 12-bit offset.
    ///
    /// # Errors
    /// Returns [`crate::Error::UnknownRelocationType`] if the type code has no
    /// [`RelocationKind`].
    pub fn decode(raw: u16) -> Result<RelocationEntry> {
        // A u16 shifted right by 12 always fits in a u8
        #[allow(clippy::cast_possible_truncation)]
        let code = (raw >> 12) as u8;

        Ok(RelocationEntry {
            kind: RelocationKind::decode(code)?,
            offset: raw & 0x0FFF,
        })
    }

    /// The on-disk encoding, the inverse of [`RelocationEntry::decode`].
    #[must_use]
    pub fn encode(&self) -> u16 {
        (u16::from(self.kind.code()) << 12) | (self.offset & 0x0FFF)
    }

    /// The RVA this entry patches within the page at `page_rva`.
    #[must_use]
    pub fn target(&self, page_rva: u32) -> u32 {
        page_rva.wrapping_add(u32::from(self.offset))
    }
}

/// A decoded relocation block: the fixups of a single page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelocationBlock {
    /// RVA of the page the entries are relative to
    pub page_rva: u32,
    /// Size of the block in bytes, including the 8 byte header
    pub block_size: u32,
    /// Entries in on-disk order, padding included
    pub entries: Vec<RelocationEntry>,
}

impl RelocationBlock {
    /// Size of the `page_rva` / `block_size` header.
    pub const HEADER_SIZE: usize = 8;

    /// Absolute RVAs of the entries whose kind passes `filter`, in entry order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use relocscope::reloc::{decode_relocations, RelocationFilter};
    ///
    /// let data = [0x00, 0x10, 0x00, 0x00, 0x0C, 0x00, 0x00, 0x00, 0x10, 0xA0, 0x00, 0x00];
    /// let blocks = decode_relocations(&data)?;
    ///
    /// let targets: Vec<u32> = blocks[0].targets(&RelocationFilter::default()).collect();
    /// assert_eq!(targets, [0x1010]);
    /// # Ok::<(), relocscope::Error>(())
    /// ```
    pub fn targets<'a>(&'a self, filter: &'a RelocationFilter) -> impl Iterator<Item = u32> + 'a {
        self.entries
            .iter()
            .filter(|entry| filter.matches(entry.kind))
            .map(|entry| entry.target(self.page_rva))
    }

    /// Number of entries, padding included
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` if the block holds no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

use log::{trace, warn};

use super::{RelocationBlock, RelocationEntry};
use crate::{file::parser::Parser, Error, Result};

enum State {
    Scanning,
    Done,
}

/// Streaming decoder over the blocks of a base relocation directory.
///
/// Yields one block at a time. Once an error has been returned the iterator is exhausted, so a
/// corrupt directory never produces blocks past the point of failure.
///
/// # Examples
///
/// ```rust
/// use relocscope::reloc::RelocationBlocks;
///
/// let data = [0x00, 0x10, 0x00, 0x00, 0x0C, 0x00, 0x00, 0x00, 0x10, 0xA0, 0x20, 0xA0];
/// for block in RelocationBlocks::new(&data) {
///     let block = block?;
///     println!("page 0x{:x}: {} entries", block.page_rva, block.entries.len());
/// }
/// # Ok::<(), relocscope::Error>(())
/// ```
pub struct RelocationBlocks<'a> {
    parser: Parser<'a>,
    state: State,
}

impl<'a> RelocationBlocks<'a> {
    /// Create a decoder over the raw bytes of a relocation directory
    #[must_use]
    pub fn new(data: &'a [u8]) -> RelocationBlocks<'a> {
        RelocationBlocks {
            parser: Parser::new(data),
            state: State::Scanning,
        }
    }

    fn next_block(&mut self) -> Result<RelocationBlock> {
        let remaining = self.parser.remaining();
        if remaining < RelocationBlock::HEADER_SIZE {
            return Err(Error::TruncatedRelocationBlock);
        }

        let offset = self.parser.pos();
        let page_rva = self.parser.read_le::<u32>()?;
        let block_size = self.parser.read_le::<u32>()?;

        if (block_size as usize) < RelocationBlock::HEADER_SIZE {
            return Err(malformed_error!(
                "Relocation block at offset {} has size {} - smaller than its header",
                offset,
                block_size
            ));
        }
        if block_size as usize > remaining {
            return Err(Error::TruncatedRelocationBlock);
        }
        if block_size % 4 != 0 {
            warn!(
                "Relocation block at offset {} has unaligned size {}",
                offset, block_size
            );
        }

        let entry_count = (block_size as usize - RelocationBlock::HEADER_SIZE) / RelocationEntry::SIZE;
        let mut entries = Vec::with_capacity(entry_count);
        for _ in 0..entry_count {
            entries.push(RelocationEntry::decode(self.parser.read_le::<u16>()?)?);
        }

        self.parser.seek(offset + block_size as usize)?;

        trace!(
            "Relocation block page 0x{:x} size 0x{:x} with {} entries",
            page_rva,
            block_size,
            entry_count
        );

        Ok(RelocationBlock {
            page_rva,
            block_size,
            entries,
        })
    }
}

impl Iterator for RelocationBlocks<'_> {
    type Item = Result<RelocationBlock>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.state {
            State::Done => None,
            State::Scanning => {
                if !self.parser.has_more_data() {
                    self.state = State::Done;
                    return None;
                }

                let block = self.next_block();
                if block.is_err() {
                    self.state = State::Done;
                }
                Some(block)
            }
        }
    }
}

impl std::iter::FusedIterator for RelocationBlocks<'_> {}

/// Decode every block of a relocation directory, failing on the first malformed one.
///
/// # Errors
/// - [`crate::Error::TruncatedRelocationBlock`] if the data ends inside a block
/// - [`crate::Error::UnknownRelocationType`] if an entry has an unsupported type code
/// - [`crate::Error::Malformed`] if a block declares a size smaller than its header
pub fn decode_relocations(data: &[u8]) -> Result<Vec<RelocationBlock>> {
    RelocationBlocks::new(data).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reloc::RelocationKind;

    fn block(page_rva: u32, entries: &[u16]) -> Vec<u8> {
        let block_size = 8 + 2 * entries.len() as u32;
        let mut data = Vec::new();
        data.extend_from_slice(&page_rva.to_le_bytes());
        data.extend_from_slice(&block_size.to_le_bytes());
        for entry in entries {
            data.extend_from_slice(&entry.to_le_bytes());
        }
        data
    }

    #[test]
    fn empty_directory() {
        assert!(decode_relocations(&[]).unwrap().is_empty());
    }

    #[test]
    fn single_block() {
        #[rustfmt::skip]
        let data = [
            0x00, 0x10, 0x00, 0x00, // page_rva = 0x1000
            0x10, 0x00, 0x00, 0x00, // block_size = 16
            0x10, 0xA0,             // Dir64 @ 0x010
            0x20, 0xA0,             // Dir64 @ 0x020
            0x30, 0x00,             // Absolute @ 0x030
            0x40, 0xA0,             // Dir64 @ 0x040
        ];

        let blocks = decode_relocations(&data).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].page_rva, 0x1000);
        assert_eq!(blocks[0].block_size, 16);

        let entries: Vec<_> = blocks[0]
            .entries
            .iter()
            .map(|entry| (entry.kind, entry.offset))
            .collect();
        assert_eq!(
            entries,
            [
                (RelocationKind::Dir64, 0x10),
                (RelocationKind::Dir64, 0x20),
                (RelocationKind::Absolute, 0x30),
                (RelocationKind::Dir64, 0x40),
            ]
        );
    }

    #[test]
    fn sizes_add_up() {
        let mut data = block(0x1000, &[0xA008, 0xA010]);
        data.extend(block(0x2000, &[0x3004, 0x3008, 0x300C, 0x0000]));
        data.extend(block(0x5000, &[]));

        let blocks = decode_relocations(&data).unwrap();
        let entries: usize = blocks.iter().map(RelocationBlock::len).sum();
        assert_eq!(blocks.len(), 3);
        assert_eq!(entries * 2 + blocks.len() * 8, data.len());
        assert!(blocks[2].is_empty());
    }

    #[test]
    fn odd_block_size_drops_trailing_byte() {
        let mut data = block(0x1000, &[0xA008]);
        data[4] = 11;
        data.push(0xCC);
        data.extend(block(0x2000, &[0xA010]));

        let blocks = decode_relocations(&data).unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].len(), 1);
        assert_eq!(blocks[1].page_rva, 0x2000);
    }

    #[test]
    fn trailing_bytes() {
        let mut data = block(0x1000, &[0xA008, 0xA010]);
        data.extend_from_slice(&[0x00, 0x20, 0x00]);

        assert!(matches!(
            decode_relocations(&data),
            Err(Error::TruncatedRelocationBlock)
        ));
    }

    #[test]
    fn block_larger_than_directory() {
        let mut data = block(0x1000, &[0xA008, 0xA010]);
        data[4] = 0x20;

        assert!(matches!(
            decode_relocations(&data),
            Err(Error::TruncatedRelocationBlock)
        ));
    }

    #[test]
    fn block_smaller_than_header() {
        let mut data = block(0x1000, &[]);
        data[4] = 4;

        assert!(matches!(
            decode_relocations(&data),
            Err(Error::Malformed { .. })
        ));
    }

    #[test]
    fn unknown_type_is_fatal() {
        let mut data = block(0x1000, &[0xA008]);
        data.extend(block(0x2000, &[0xA008, 0x7010]));
        data.extend(block(0x3000, &[0xA008]));

        assert!(matches!(
            decode_relocations(&data),
            Err(Error::UnknownRelocationType(7))
        ));
    }

    #[test]
    fn fused_after_error() {
        let mut data = block(0x1000, &[0xA008]);
        data.extend(block(0x2000, &[0xF000]));
        data.extend(block(0x3000, &[0xA008]));

        let mut blocks = RelocationBlocks::new(&data);
        assert_eq!(blocks.next().unwrap().unwrap().page_rva, 0x1000);
        assert!(matches!(
            blocks.next(),
            Some(Err(Error::UnknownRelocationType(15)))
        ));
        assert!(blocks.next().is_none());
        assert!(blocks.next().is_none());
    }
}

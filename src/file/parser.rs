//! Sequential byte stream parser.
//!
//! This module provides the [`crate::file::parser::Parser`] type, a cursor-based reader that
//! advances by the width of every value it reads. It is used where a structure is consumed
//! front to back, most notably the relocation block stream, and complements the
//! offset-addressed [`crate::file::cursor::ByteCursor`].
//!
//! # Examples
//!
//! ```rust
//! use relocscope::Parser;
//!
//! // One relocation block header followed by a single DIR64 entry
//! let data = [0x00, 0x10, 0x00, 0x00, 0x0A, 0x00, 0x00, 0x00, 0x10, 0xA0];
//! let mut parser = Parser::new(&data);
//!
//! let page_rva = parser.read_le::<u32>()?;
//! let block_size = parser.read_le::<u32>()?;
//! let entry = parser.read_le::<u16>()?;
//!
//! assert_eq!((page_rva, block_size, entry), (0x1000, 10, 0xA010));
//! assert!(!parser.has_more_data());
//! # Ok::<(), relocscope::Error>(())
//! ```

use crate::{
    file::io::{read_le_at, PeIO},
    Error::OutOfBounds,
    Result,
};

/// A cursor over a byte slice that tracks its own position.
///
/// All reads are bounds-checked; a failed read leaves the position unchanged.
pub struct Parser<'a> {
    /// The binary data being parsed
    data: &'a [u8],
    /// Current position within the data buffer
    position: usize,
}

impl<'a> Parser<'a> {
    /// Create a new [`crate::file::parser::Parser`] from a byte slice.
    ///
    /// # Arguments
    /// * `data` - The byte slice to read from
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Parser { data, position: 0 }
    }

    /// Returns the length of the underlying data buffer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the parser has no data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns `true` if there is more data available to parse.
    #[must_use]
    pub fn has_more_data(&self) -> bool {
        self.position < self.data.len()
    }

    /// Returns the number of bytes between the current position and the end of the buffer.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// Move the current position to the specified index.
    ///
    /// Seeking to exactly the end of the buffer is allowed.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if position is beyond the data length.
    pub fn seek(&mut self, pos: usize) -> Result<()> {
        if pos > self.data.len() {
            return Err(OutOfBounds);
        }

        self.position = pos;
        Ok(())
    }

    /// Move the position forward by the specified number of bytes.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if advancing by step would exceed the data length.
    pub fn advance_by(&mut self, step: usize) -> Result<()> {
        match self.position.checked_add(step) {
            Some(end) if end <= self.data.len() => {
                self.position = end;
                Ok(())
            }
            _ => Err(OutOfBounds),
        }
    }

    /// Get the current position of the parser within the data buffer.
    #[must_use]
    pub fn pos(&self) -> usize {
        self.position
    }

    /// Get access to the underlying data buffer.
    #[must_use]
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Peek at a value of type `T` in little-endian format without advancing the position.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if reading `T` would exceed the data length.
    pub fn peek_le<T: PeIO>(&self) -> Result<T> {
        let mut temp_position = self.position;
        read_le_at::<T>(self.data, &mut temp_position)
    }

    /// Read a type `T` from the current position in little-endian format and advance the position.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if reading would exceed the data length.
    pub fn read_le<T: PeIO>(&mut self) -> Result<T> {
        read_le_at::<T>(self.data, &mut self.position)
    }

    /// Borrow the next `length` bytes and advance past them.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if fewer than `length` bytes remain.
    pub fn read_bytes(&mut self, length: usize) -> Result<&'a [u8]> {
        let start = self.position;
        self.advance_by(length)?;
        Ok(&self.data[start..self.position])
    }
}

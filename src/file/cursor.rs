//! Offset-addressed, bounds-checked view over an immutable byte buffer.
//!
//! [`ByteCursor`] is what the header, section and data directory decoders read through. Every
//! read names its absolute offset, so a structure's layout is stated once at its decode routine
//! instead of being tracked in a moving position. For sequential reads see
//! [`crate::file::parser::Parser`].

use crate::{file::io::read_le_at, Error::OutOfBounds, Result};

/// A read-only view over a byte buffer with typed little-endian reads at absolute offsets.
///
/// Reads never advance anything and never panic: a read of `width` bytes at `offset` fails with
/// [`crate::Error::OutOfBounds`] whenever `offset + width > len()`.
///
/// # Examples
///
/// ```rust
/// use relocscope::file::cursor::ByteCursor;
///
/// let data = [0x4D, 0x5A, 0x00, 0x00, 0x40, 0x00, 0x00, 0x00];
/// let cursor = ByteCursor::new(&data);
///
/// assert_eq!(cursor.read_bytes(0, 2)?, b"MZ");
/// assert_eq!(cursor.read_u32_le(4)?, 0x40);
/// assert!(cursor.read_u64_le(1).is_err());
/// # Ok::<(), relocscope::Error>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
}

impl<'a> ByteCursor<'a> {
    /// Create a new cursor over `data`.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        ByteCursor { data }
    }

    /// Returns the length of the underlying buffer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the underlying buffer is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the complete underlying buffer.
    #[must_use]
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Read a single byte at `offset`.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if `offset` is past the end of the buffer.
    pub fn read_u8(&self, offset: usize) -> Result<u8> {
        let mut position = offset;
        read_le_at(self.data, &mut position)
    }

    /// Read a little-endian `u16` at `offset`.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if fewer than 2 bytes are available at `offset`.
    pub fn read_u16_le(&self, offset: usize) -> Result<u16> {
        let mut position = offset;
        read_le_at(self.data, &mut position)
    }

    /// Read a little-endian `u32` at `offset`.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if fewer than 4 bytes are available at `offset`.
    pub fn read_u32_le(&self, offset: usize) -> Result<u32> {
        let mut position = offset;
        read_le_at(self.data, &mut position)
    }

    /// Read a little-endian `u64` at `offset`.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if fewer than 8 bytes are available at `offset`.
    pub fn read_u64_le(&self, offset: usize) -> Result<u64> {
        let mut position = offset;
        read_le_at(self.data, &mut position)
    }

    /// Borrow `len` bytes starting at `offset`.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the range exceeds the buffer or overflows.
    pub fn read_bytes(&self, offset: usize, len: usize) -> Result<&'a [u8]> {
        let Some(end) = offset.checked_add(len) else {
            return Err(OutOfBounds);
        };

        self.data.get(offset..end).ok_or(OutOfBounds)
    }

    /// Create a cursor over the sub-range `[offset, offset + len)`.
    ///
    /// Offsets used on the returned cursor are relative to `offset`.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the range exceeds the buffer.
    pub fn slice(&self, offset: usize, len: usize) -> Result<ByteCursor<'a>> {
        Ok(ByteCursor::new(self.read_bytes(offset, len)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATA: [u8; 10] = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A];

    #[test]
    fn typed_reads() {
        let cursor = ByteCursor::new(&DATA);

        assert_eq!(cursor.read_u8(9).unwrap(), 0x0A);
        assert_eq!(cursor.read_u16_le(0).unwrap(), 0x0201);
        assert_eq!(cursor.read_u32_le(6).unwrap(), 0x0A09_0807);
        assert_eq!(cursor.read_u64_le(2).unwrap(), 0x0A09_0807_0605_0403);
        assert_eq!(cursor.read_bytes(3, 2).unwrap(), &[0x04, 0x05]);
    }

    #[test]
    fn reads_are_pure() {
        let cursor = ByteCursor::new(&DATA);

        let first = cursor.read_u32_le(4).unwrap();
        let second = cursor.read_u32_le(4).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn bounds() {
        let cursor = ByteCursor::new(&DATA);

        assert!(matches!(cursor.read_u8(10), Err(OutOfBounds)));
        assert!(matches!(cursor.read_u16_le(9), Err(OutOfBounds)));
        assert!(matches!(cursor.read_u32_le(7), Err(OutOfBounds)));
        assert!(matches!(cursor.read_u64_le(3), Err(OutOfBounds)));
        assert!(matches!(cursor.read_bytes(8, 3), Err(OutOfBounds)));
        assert!(matches!(cursor.read_bytes(usize::MAX, 2), Err(OutOfBounds)));
        assert!(matches!(cursor.read_u32_le(usize::MAX - 1), Err(OutOfBounds)));

        let empty: &[u8] = &[];
        assert_eq!(cursor.read_bytes(10, 0).unwrap(), empty);
    }

    #[test]
    fn sub_slice() {
        let cursor = ByteCursor::new(&DATA);
        let inner = cursor.slice(4, 4).unwrap();

        assert_eq!(inner.len(), 4);
        assert_eq!(inner.read_u16_le(0).unwrap(), 0x0605);
        assert!(inner.read_u8(4).is_err());
        assert!(cursor.slice(8, 4).is_err());
    }
}

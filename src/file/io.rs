//! Low-level little-endian reading utilities for PE parsing.
//!
//! Every multi-byte field in the PE/COFF format is stored little-endian, so this module only
//! offers little-endian reads. All of them are bounds-checked and report
//! [`crate::Error::OutOfBounds`] instead of panicking when the buffer is too short.
//!
//! # Key Components
//!
//! - [`crate::file::io::PeIO`] - Trait describing how a primitive is built from its bytes
//! - [`crate::file::io::read_le`] - Read a value from the start of a buffer
//! - [`crate::file::io::read_le_at`] - Read a value at an offset and advance the offset
//!
//! # Examples
//!
//! ```rust
//! use relocscope::file::io::{read_le, read_le_at};
//!
//! let data = [0x4D, 0x5A, 0x90, 0x00, 0x03, 0x00, 0x00, 0x00];
//! let magic: u16 = read_le(&data)?;
//! assert_eq!(magic, 0x5A4D);
//!
//! let mut offset = 2;
//! let a: u16 = read_le_at(&data, &mut offset)?;
//! let b: u32 = read_le_at(&data, &mut offset)?;
//! assert_eq!((a, b, offset), (0x0090, 3, 8));
//! # Ok::<(), relocscope::Error>(())
//! ```

use crate::{Error::OutOfBounds, Result};

/// Trait for primitives that can be decoded from a fixed-size little-endian byte array.
///
/// Implemented for the unsigned widths the PE format uses: `u8`, `u16`, `u32` and `u64`.
pub trait PeIO: Sized {
    /// Associated type representing the byte array type for this numeric type.
    type Bytes: Sized + for<'a> TryFrom<&'a [u8]>;

    /// Read T from a byte buffer in little-endian
    fn from_le_bytes(bytes: Self::Bytes) -> Self;
}

impl PeIO for u64 {
    type Bytes = [u8; 8];

    fn from_le_bytes(bytes: Self::Bytes) -> Self {
        u64::from_le_bytes(bytes)
    }
}

impl PeIO for u32 {
    type Bytes = [u8; 4];

    fn from_le_bytes(bytes: Self::Bytes) -> Self {
        u32::from_le_bytes(bytes)
    }
}

impl PeIO for u16 {
    type Bytes = [u8; 2];

    fn from_le_bytes(bytes: Self::Bytes) -> Self {
        u16::from_le_bytes(bytes)
    }
}

impl PeIO for u8 {
    type Bytes = [u8; 1];

    fn from_le_bytes(bytes: Self::Bytes) -> Self {
        u8::from_le_bytes(bytes)
    }
}

/// Safely reads a value of type `T` in little-endian byte order from the start of a buffer.
///
/// # Errors
///
/// Returns [`crate::Error::OutOfBounds`] if there are insufficient bytes.
pub fn read_le<T: PeIO>(data: &[u8]) -> Result<T> {
    let mut offset = 0_usize;
    read_le_at(data, &mut offset)
}

/// Safely reads a value of type `T` in little-endian byte order at `offset`.
///
/// On success the offset is advanced by the size of `T`; on failure it is left untouched.
///
/// # Arguments
///
/// * `data` - The byte buffer to read from
/// * `offset` - Mutable reference to the offset position (will be advanced after reading)
///
/// # Errors
///
/// Returns [`crate::Error::OutOfBounds`] if `offset + size_of::<T>()` exceeds the buffer,
/// including the case where that sum would overflow.
pub fn read_le_at<T: PeIO>(data: &[u8], offset: &mut usize) -> Result<T> {
    let type_len = std::mem::size_of::<T>();
    let Some(end) = offset.checked_add(type_len) else {
        return Err(OutOfBounds);
    };
    if end > data.len() {
        return Err(OutOfBounds);
    }

    let Ok(read) = data[*offset..end].try_into() else {
        return Err(OutOfBounds);
    };

    *offset = end;

    Ok(T::from_le_bytes(read))
}

//! DOS stub header and PE signature validation.

use crate::{file::cursor::ByteCursor, Error, Result};

/// The `MZ` signature every executable starts with.
pub const DOS_MAGIC: [u8; 2] = *b"MZ";

/// The signature found at `e_lfanew`, in front of the COFF header.
pub const PE_SIGNATURE: [u8; 4] = *b"PE\0\0";

/// Offset of `e_lfanew`, the field holding the PE signature offset.
pub const E_LFANEW_OFFSET: usize = 0x3C;

/// The parts of the DOS header needed to find the PE headers.
///
/// A value of this type only exists for buffers that start with `MZ` and carry `PE\0\0` at
/// `coff_header_offset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DosHeader {
    /// Offset of the `PE\0\0` signature, the COFF header follows right after it
    pub coff_header_offset: u32,
}

impl DosHeader {
    /// Size of the PE signature preceding the COFF header.
    pub const SIGNATURE_SIZE: usize = 4;

    /// Parse the DOS header and validate the PE signature it points to.
    ///
    /// # Errors
    /// - [`crate::Error::NotAnExecutable`] if the buffer does not start with `MZ`
    /// - [`crate::Error::OutOfBounds`] if the buffer ends before `e_lfanew`
    /// - [`crate::Error::NotAPeImage`] if no `PE\0\0` is found at `e_lfanew`
    pub fn read(data: &ByteCursor<'_>) -> Result<DosHeader> {
        match data.read_bytes(0, DOS_MAGIC.len()) {
            Ok(magic) if magic == DOS_MAGIC => {}
            _ => return Err(Error::NotAnExecutable),
        }

        let coff_header_offset = data.read_u32_le(E_LFANEW_OFFSET)?;

        match data.read_bytes(coff_header_offset as usize, Self::SIGNATURE_SIZE) {
            Ok(signature) if signature == PE_SIGNATURE => {}
            _ => return Err(Error::NotAPeImage),
        }

        Ok(DosHeader { coff_header_offset })
    }

    /// Absolute offset of the COFF file header, right behind the PE signature.
    #[must_use]
    pub fn coff_file_header_offset(&self) -> usize {
        self.coff_header_offset as usize + Self::SIGNATURE_SIZE
    }
}

use super::Backend;
use crate::{Error::OutOfBounds, Result};

/// Input image backed by an owned buffer
#[derive(Debug)]
pub struct Memory {
    data: Vec<u8>,
}

impl Memory {
    /// Create a new memory backend
    ///
    /// ## Arguments
    /// * 'data' - The image bytes to take ownership of
    pub fn new(data: Vec<u8>) -> Memory {
        Memory { data }
    }
}

impl Backend for Memory {
    fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]> {
        let Some(offset_end) = offset.checked_add(len) else {
            return Err(OutOfBounds);
        };

        self.data.get(offset..offset_end).ok_or(OutOfBounds)
    }

    fn data(&self) -> &[u8] {
        self.data.as_slice()
    }

    fn len(&self) -> usize {
        self.data.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dos_stub_slice() {
        let mut data = vec![0x00_u8; 0x80];
        data[0] = b'M';
        data[1] = b'Z';
        data[0x3C] = 0x40;

        let memory = Memory::new(data);

        assert_eq!(memory.len(), 0x80);
        assert_eq!(memory.data_slice(0, 2).unwrap(), b"MZ");
        assert_eq!(memory.data_slice(0x3C, 4).unwrap(), &[0x40, 0x00, 0x00, 0x00]);
        assert!(memory.data_slice(0x7F, 2).is_err());
    }

    #[test]
    fn empty_buffer() {
        let memory = Memory::new(vec![]);

        assert_eq!(memory.len(), 0);
        assert!(memory.data_slice(0, 1).is_err());
        assert!(memory.data_slice(1, 0).is_err());
        let empty_slice: &[u8] = &[];
        assert_eq!(memory.data_slice(0, 0).unwrap(), empty_slice);
    }

    #[test]
    fn offset_overflow() {
        let memory = Memory::new(vec![0x00; 100]);

        let result = memory.data_slice(usize::MAX, 1);
        assert!(matches!(result.unwrap_err(), OutOfBounds));

        let result = memory.data_slice(100, 1);
        assert!(matches!(result.unwrap_err(), OutOfBounds));

        let result = memory.data_slice(99, 2);
        assert!(matches!(result.unwrap_err(), OutOfBounds));
    }
}

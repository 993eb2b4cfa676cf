//! PE file loading and low-level byte access.
//!
//! This module owns the bytes of an image and everything needed to read them safely. It
//! abstracts over where the bytes come from (a memory-mapped file or an owned buffer) and hands
//! a parsed [`crate::pe::PeImage`] back that borrows from them.
//!
//! # Key Components
//!
//! ## Core Types
//! - [`crate::file::File`] - Owner of a backend and the image parsed from it
//! - [`crate::file::Backend`] - Trait for different data sources (disk files, memory buffers)
//!
//! ## Parsing Infrastructure
//! - [`crate::file::cursor::ByteCursor`] - Offset addressed, bounds-checked reads
//! - [`crate::file::parser::Parser`] - Sequential reads with an advancing position
//! - [`crate::file::io`] - Little-endian primitive decoding
//! - [`crate::file::hexdump`] - `.reloc` bytes recovered from `objdump -s` output
//!
//! # Examples
//!
//! ## Loading from File
//!
//! ```rust,no_run
//! use relocscope::File;
//! use std::path::Path;
//!
//! let file = File::from_file(Path::new("BOOTX64.EFI"))?;
//! println!("Loaded PE file with {} bytes", file.len());
//! println!("Number of sections: {}", file.image().sections().len());
//! # Ok::<(), relocscope::Error>(())
//! ```
//!
//! ## Loading from Memory
//!
//! ```rust,no_run
//! use relocscope::File;
//!
//! let data = std::fs::read("BOOTX64.EFI")?;
//! let file = File::from_mem(data)?;
//!
//! for section in file.image().sections() {
//!     println!("{:8} RVA 0x{:x}", section.name(), section.virtual_address);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cursor;
pub mod hexdump;
pub mod io;
pub mod parser;

mod memory;
mod physical;

use std::path::Path;

use log::debug;
use memory::Memory;
use ouroboros::self_referencing;
use physical::Physical;

use crate::{
    pe::PeImage,
    reloc::RelocationBlock,
    Error::Empty,
    Result,
};

/// Backend trait for file data sources.
///
/// This trait abstracts over the source of PE data, allowing for both in-memory and on-disk
/// representations. All implementations must be thread-safe.
pub trait Backend: Send + Sync {
    /// Returns a slice of the data at the given offset and length.
    ///
    /// # Arguments
    ///
    /// * `offset` - The starting offset within the data.
    /// * `len` - The length of the slice in bytes.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::OutOfBounds`] if the requested range is out of bounds.
    fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]>;

    /// Returns the entire data buffer.
    fn data(&self) -> &[u8];

    /// Returns the total length of the data buffer.
    fn len(&self) -> usize;
}

#[self_referencing]
/// A loaded PE image.
///
/// Owns the backing bytes and the [`PeImage`] parsed from them, so the parsed headers can
/// never outlive the data they were read from.
///
/// # Examples
///
/// ```rust,no_run
/// use relocscope::File;
/// use std::path::Path;
///
/// let file = File::from_file(Path::new("BOOTX64.EFI"))?;
/// let image = file.image();
///
/// println!("machine type: {:04x}", image.coff().machine);
/// for block in image.relocations()? {
///     println!("Page RVA: 0x{:x}", block.page_rva);
/// }
/// # Ok::<(), relocscope::Error>(())
/// ```
pub struct File {
    /// The underlying data source (memory or file).
    data: Box<dyn Backend>,
    /// The parsed image, referencing the data.
    #[borrows(data)]
    #[covariant]
    image: PeImage<'this>,
}

impl File {
    /// Loads a PE file from the given path.
    ///
    /// The file is memory-mapped, not read into memory.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be opened or mapped ([`crate::Error::FileError`])
    /// - The file is empty ([`crate::Error::Empty`])
    /// - The headers fail to parse, see [`PeImage::parse`]
    pub fn from_file(file: &Path) -> Result<File> {
        let input = Physical::new(file)?;
        debug!("Mapped {} ({} bytes)", file.display(), input.len());

        Self::load(input)
    }

    /// Loads a PE file from a memory buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer is empty or the headers fail to parse, see
    /// [`PeImage::parse`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use relocscope::{Error, File};
    ///
    /// assert!(matches!(File::from_mem(Vec::new()), Err(Error::Empty)));
    /// assert!(matches!(File::from_mem(b"ELF".to_vec()), Err(Error::NotAnExecutable)));
    /// ```
    pub fn from_mem(data: Vec<u8>) -> Result<File> {
        let input = Memory::new(data);

        Self::load(input)
    }

    fn load<T: Backend + 'static>(data: T) -> Result<File> {
        if data.len() == 0 {
            return Err(Empty);
        }

        let data = Box::new(data);

        File::try_new(data, |data| PeImage::parse(data.data()))
    }

    /// Returns the total size of the loaded file in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data().len()
    }

    /// Returns `true` if the file has a length of zero.
    ///
    /// Loading rejects empty input, so this is `false` for every successfully loaded file.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The parsed image
    #[must_use]
    pub fn image(&self) -> &PeImage<'_> {
        self.borrow_image()
    }

    /// Decode all relocation blocks of the image.
    ///
    /// # Errors
    ///
    /// See [`PeImage::relocations`].
    pub fn relocations(&self) -> Result<Vec<RelocationBlock>> {
        self.image().relocations()
    }

    /// Returns the raw file data.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        self.with_data(|data| data.data())
    }

    /// Returns a slice of the file data at the given offset and length.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::OutOfBounds`] if the requested range is out of bounds.
    pub fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]> {
        self.with_data(|data| data.data_slice(offset, len))
    }
}

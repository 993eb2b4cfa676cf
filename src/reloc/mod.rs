//! Base relocation decoding.
//!
//! The base relocation directory is a sequence of variable sized blocks, each covering one
//! 4 KiB page of the image:
//!
//! ```text
//! +-----------+------------+---------+---------+-----+
//! | page_rva  | block_size | entry 0 | entry 1 | ... |
//! | u32       | u32        | u16     | u16     |     |
//! +-----------+------------+---------+---------+-----+
//! ```
//!
//! `block_size` counts the 8 byte header, so a block holds `(block_size - 8) / 2` entries. Every
//! entry packs a 4-bit [`RelocationKind`] above a 12-bit offset into the page. Linkers keep
//! blocks 4-byte aligned by appending an [`RelocationKind::Absolute`] entry, which the loader
//! skips.
//!
//! # Key Components
//!
//! - [`RelocationBlocks`] - Streaming decoder, one block per iteration
//! - [`decode_relocations`] - Collects all blocks, failing on the first error
//! - [`RelocationFilter`] - Selects which kinds a report shows
//!
//! # Examples
//!
//! ```rust,no_run
//! use relocscope::{File, reloc::RelocationFilter};
//! use std::path::Path;
//!
//! let file = File::from_file(Path::new("BOOTX64.EFI"))?;
//! let filter = RelocationFilter::default();
//!
//! for block in file.image().relocations()? {
//!     let targets: Vec<u32> = block.targets(&filter).collect();
//!     println!("Page RVA: 0x{:x}, {} relocations", block.page_rva, targets.len());
//! }
//! # Ok::<(), relocscope::Error>(())
//! ```

mod block;
mod decoder;
mod filter;
mod kind;

pub use block::{RelocationBlock, RelocationEntry};
pub use decoder::{decode_relocations, RelocationBlocks};
pub use filter::RelocationFilter;
pub use kind::RelocationKind;

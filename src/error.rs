use thiserror::Error;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Every failure is fatal for the structure being decoded: the decoder never hands out a
/// partially parsed header or a best-effort relocation list.
///
/// # Error Categories
///
/// ## Header Errors
/// - [`Error::NotAnExecutable`] - The buffer does not start with `MZ`
/// - [`Error::NotAPeImage`] - No `PE\0\0` signature where the DOS stub points
/// - [`Error::UnknownOptionalHeaderMagic`] - Neither PE32 nor PE32+
/// - [`Error::TruncatedOptionalHeader`] - The declared optional header cannot hold its fields
///
/// ## Relocation Errors
/// - [`Error::TruncatedRelocationBlock`] - The relocation directory ends inside a block
/// - [`Error::UnknownRelocationType`] - An entry carries a reserved type code
/// - [`Error::UnmappedRva`] - The relocation directory does not lie inside any section
///
/// ## Generic Errors
/// - [`Error::OutOfBounds`] - Attempted to read beyond the end of the buffer
/// - [`Error::Malformed`] - Structurally invalid input not covered above
/// - [`Error::Empty`] - Empty input provided
/// - [`Error::FileError`] - Filesystem I/O errors
///
/// # Examples
///
/// ```rust,no_run
/// use relocscope::{Error, File};
/// use std::path::Path;
///
/// match File::from_file(Path::new("driver.sys")) {
///     Ok(file) => println!("{} sections", file.image().sections().len()),
///     Err(Error::NotAPeImage) => eprintln!("MZ stub without a PE image"),
///     Err(Error::UnknownRelocationType(code)) => eprintln!("reserved relocation type {code}"),
///     Err(e) => eprintln!("Other error: {e}"),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The buffer does not start with the `MZ` DOS signature.
    #[error("Not an executable - missing MZ signature")]
    NotAnExecutable,

    /// The offset stored at `0x3C` does not point to a `PE\0\0` signature.
    #[error("Not a PE image - missing PE signature")]
    NotAPeImage,

    /// The optional header magic is neither `0x10B` (PE32) nor `0x20B` (PE32+).
    #[error("Unknown optional header magic - 0x{0:x}")]
    UnknownOptionalHeaderMagic(u16),

    /// The optional header is smaller than its fixed fields plus the declared data directories.
    #[error("Optional header is too small for its declared data directories")]
    TruncatedOptionalHeader,

    /// An out of bound access was attempted while parsing the file.
    ///
    /// Every fixed-offset and computed-offset read is checked against the buffer length,
    /// this is the error all of those checks report.
    #[error("Out of Bound read would have occurred!")]
    OutOfBounds,

    /// The relocation directory ends in the middle of a block.
    #[error("Relocation directory ends in the middle of a block")]
    TruncatedRelocationBlock,

    /// A relocation entry uses a type code outside of the known set.
    #[error("Unknown relocation type - {0}")]
    UnknownRelocationType(u8),

    /// An RVA could not be translated into a file offset because no section contains it.
    #[error("RVA 0x{0:x} is not covered by any section")]
    UnmappedRva(u32),

    /// The file is damaged and could not be parsed.
    ///
    /// The error includes the source location where the malformation was detected.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// Provided input was empty.
    #[error("Provided input was empty")]
    Empty,

    /// File I/O error.
    ///
    /// Wraps standard I/O errors that can occur while opening or mapping a file.
    #[error("{0}")]
    FileError(#[from] std::io::Error),
}

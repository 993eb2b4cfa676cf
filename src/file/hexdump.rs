//! Reconstruction of `.reloc` section bytes from an `objdump -s` text dump.
//!
//! `objdump -s` prints each section as lines of an address, up to sixteen bytes in four
//! space-separated 4-byte clusters, and an ASCII gutter:
//!
//! ```text
//! Contents of section .reloc:
//!  d000 00a00000 40000000 a8acb8ac c8acd8ac  ....@...........
//!  d0b0 a8ae0000                             ....
//! ```
//!
//! Only the hex column is used. Bytes are emitted left to right exactly as printed, the address
//! column is ignored, and the dump ends at the first line after the section header that does not
//! have this shape.

use std::sync::LazyLock;

use regex::Regex;

use crate::Result;

static SECTION_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Contents of section \.reloc:").expect("section header pattern is valid")
});

static DATA_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^ [a-f0-9]{4} ([a-f0-9 ]{36}) ").expect("data line pattern is valid")
});

static BYTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-f0-9]{2}").expect("byte pattern is valid"));

/// Extract the raw `.reloc` bytes from an `objdump -s` dump.
///
/// # Errors
/// Returns [`crate::Error::Malformed`] if the text contains no `.reloc` section.
///
/// # Examples
///
/// ```rust
/// use relocscope::file::hexdump::parse_reloc_dump;
///
/// let dump = "Contents of section .reloc:\n \
///             d000 00100000 0c000000 10a020a0           ............\n\n";
/// let bytes = parse_reloc_dump(dump)?;
/// assert_eq!(bytes, [0x00, 0x10, 0x00, 0x00, 0x0c, 0x00, 0x00, 0x00, 0x10, 0xa0, 0x20, 0xa0]);
/// # Ok::<(), relocscope::Error>(())
/// ```
pub fn parse_reloc_dump(text: &str) -> Result<Vec<u8>> {
    let mut lines = text.lines();
    if !lines.any(|line| SECTION_HEADER.is_match(line)) {
        return Err(malformed_error!("Dump does not contain a .reloc section"));
    }

    let mut data = Vec::new();
    for line in lines {
        let Some(captures) = DATA_LINE.captures(line) else {
            break;
        };

        for pair in BYTE.find_iter(&captures[1]) {
            // Two matched hex digits always fit a byte
            if let Ok(byte) = u8::from_str_radix(pair.as_str(), 16) {
                data.push(byte);
            }
        }
    }

    log::debug!("Reconstructed {} bytes from .reloc dump", data.len());
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn skips_other_sections() {
        let dump = "\
Contents of something:
 cfe0 aaaaaaaa bbbbbbbb dddddddd eeeeeeee  ................
Contents of section .reloc:
 d000 00a00000 0c000000 10a020a0           ............

 Disassembly blah:
";
        let data = parse_reloc_dump(dump).unwrap();
        assert_eq!(
            data,
            [0x00, 0xa0, 0x00, 0x00, 0x0c, 0x00, 0x00, 0x00, 0x10, 0xa0, 0x20, 0xa0]
        );
    }

    #[test]
    fn stops_at_first_foreign_line() {
        let dump = "\
Contents of section .reloc:
 d000 00a00000 0c000000 10a020a0           ............
Contents of section .rsrc:
 e000 01020304 05060708 090a0b0c 0d0e0f10  ................
";
        let data = parse_reloc_dump(dump).unwrap();
        assert_eq!(data.len(), 12);
    }

    #[test]
    fn full_line_keeps_byte_order() {
        let dump = "\
Contents of section .reloc:
 d000 00112233 44556677 8899aabb ccddeeff  .\"3DUfw........
";
        let data = parse_reloc_dump(dump).unwrap();
        assert_eq!(
            data,
            [
                0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xaa, 0xbb, 0xcc,
                0xdd, 0xee, 0xff
            ]
        );
    }

    #[test]
    fn empty_section() {
        let data = parse_reloc_dump("Contents of section .reloc:\n").unwrap();
        assert!(data.is_empty());
    }

    #[test]
    fn missing_section() {
        let result = parse_reloc_dump("Contents of section .text:\n d000 00000000\n");
        assert!(matches!(result, Err(Error::Malformed { .. })));
    }
}

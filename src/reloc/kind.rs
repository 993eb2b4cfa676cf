use strum::{Display, EnumCount, EnumIter, EnumString};

use crate::{Error, Result};

/// Base relocation types, the upper four bits of every entry.
///
/// Codes 6 to 9 are architecture specific (MIPS, RISC-V, LoongArch) and 11 to 15 are reserved.
/// Neither appears in the images this crate targets, so they are rejected instead of being
/// carried along as opaque values.
///
/// The string form used by `FromStr` and `Display` is the lower case variant name, e.g.
/// `dir64` or `highlow`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumCount, EnumString, Display,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[repr(u8)]
pub enum RelocationKind {
    /// Padding, the entry is skipped by the loader
    Absolute = 0,
    /// High 16 bits of a 32-bit address
    High = 1,
    /// Low 16 bits of a 32-bit address
    Low = 2,
    /// Full 32-bit address
    HighLow = 3,
    /// High 16 bits adjusted by the low half in the following entry
    HighAdj = 4,
    /// 32-bit address split over an ARM `MOVW`/`MOVT` pair
    ArmMov32 = 5,
    /// Full 64-bit address
    Dir64 = 10,
}

impl RelocationKind {
    /// Map a 4-bit type code to its kind.
    ///
    /// # Errors
    /// Returns [`crate::Error::UnknownRelocationType`] for any code without a variant.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use relocscope::reloc::RelocationKind;
    ///
    /// assert_eq!(RelocationKind::decode(10)?, RelocationKind::Dir64);
    /// assert!(RelocationKind::decode(11).is_err());
    /// # Ok::<(), relocscope::Error>(())
    /// ```
    pub fn decode(code: u8) -> Result<RelocationKind> {
        match code {
            0 => Ok(RelocationKind::Absolute),
            1 => Ok(RelocationKind::High),
            2 => Ok(RelocationKind::Low),
            3 => Ok(RelocationKind::HighLow),
            4 => Ok(RelocationKind::HighAdj),
            5 => Ok(RelocationKind::ArmMov32),
            10 => Ok(RelocationKind::Dir64),
            _ => Err(Error::UnknownRelocationType(code)),
        }
    }

    /// The 4-bit type code
    #[must_use]
    pub fn code(self) -> u8 {
        self as u8
    }

    /// The `IMAGE_REL_BASED_*` name of this kind
    #[must_use]
    pub fn image_name(self) -> &'static str {
        match self {
            RelocationKind::Absolute => "IMAGE_REL_BASED_ABSOLUTE",
            RelocationKind::High => "IMAGE_REL_BASED_HIGH",
            RelocationKind::Low => "IMAGE_REL_BASED_LOW",
            RelocationKind::HighLow => "IMAGE_REL_BASED_HIGHLOW",
            RelocationKind::HighAdj => "IMAGE_REL_BASED_HIGHADJ",
            RelocationKind::ArmMov32 => "IMAGE_REL_BASED_ARM_MOV32",
            RelocationKind::Dir64 => "IMAGE_REL_BASED_DIR64",
        }
    }
}

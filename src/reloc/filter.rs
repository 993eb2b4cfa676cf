use strum::IntoEnumIterator;

use super::RelocationKind;

/// The set of relocation kinds a report is interested in.
///
/// Defaults to [`RelocationKind::Dir64`] alone, the only kind that carries addresses in 64-bit
/// images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelocationFilter {
    mask: u16,
}

impl RelocationFilter {
    /// A filter matching nothing
    #[must_use]
    pub fn none() -> RelocationFilter {
        RelocationFilter { mask: 0 }
    }

    /// A filter matching every kind
    #[must_use]
    pub fn all() -> RelocationFilter {
        RelocationKind::iter().collect()
    }

    /// A filter matching a single kind
    #[must_use]
    pub fn only(kind: RelocationKind) -> RelocationFilter {
        RelocationFilter::none().with(kind)
    }

    /// This filter extended by `kind`
    #[must_use]
    pub fn with(mut self, kind: RelocationKind) -> RelocationFilter {
        self.mask |= 1 << kind.code();
        self
    }

    /// `true` if entries of `kind` pass the filter
    #[must_use]
    pub fn matches(&self, kind: RelocationKind) -> bool {
        self.mask & (1 << kind.code()) != 0
    }

    /// The kinds passing the filter, in type code order.
    pub fn kinds(&self) -> impl Iterator<Item = RelocationKind> + '_ {
        RelocationKind::iter().filter(|kind| self.matches(*kind))
    }
}

impl Default for RelocationFilter {
    fn default() -> Self {
        RelocationFilter::only(RelocationKind::Dir64)
    }
}

impl FromIterator<RelocationKind> for RelocationFilter {
    fn from_iter<I: IntoIterator<Item = RelocationKind>>(iter: I) -> Self {
        iter.into_iter().fold(RelocationFilter::none(), RelocationFilter::with)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_dir64() {
        let filter = RelocationFilter::default();
        assert!(filter.matches(RelocationKind::Dir64));
        assert!(!filter.matches(RelocationKind::Absolute));
        assert!(!filter.matches(RelocationKind::HighLow));
        assert_eq!(filter.kinds().collect::<Vec<_>>(), [RelocationKind::Dir64]);
    }

    #[test]
    fn all_and_none() {
        for kind in RelocationKind::iter() {
            assert!(RelocationFilter::all().matches(kind));
            assert!(!RelocationFilter::none().matches(kind));
        }
    }

    #[test]
    fn collected() {
        let filter: RelocationFilter = [RelocationKind::HighLow, RelocationKind::Absolute]
            .into_iter()
            .collect();
        assert_eq!(
            filter.kinds().collect::<Vec<_>>(),
            [RelocationKind::Absolute, RelocationKind::HighLow]
        );
    }
}

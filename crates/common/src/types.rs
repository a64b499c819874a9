use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a version node within a single file.
///
/// Ids are assigned in strictly increasing order per file; the root is always 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionId(pub u32);

impl VersionId {
    /// The root version every file starts with.
    pub const ROOT: Self = Self(0);

    /// The id that follows this one, or `None` once the id space is used up.
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl fmt::Display for VersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A reading of the registry's logical clock.
///
/// Tick 0 is the clock before any mutation; every mutation observes a tick >= 1.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Self = Self(0);

    /// Advance by one and return the new reading.
    pub fn advance(&mut self) -> Self {
        self.0 += 1;
        *self
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t={}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_id_next_stops_at_max() {
        assert_eq!(VersionId::ROOT.next(), Some(VersionId(1)));
        assert_eq!(VersionId(u32::MAX - 1).next(), Some(VersionId(u32::MAX)));
        assert_eq!(VersionId(u32::MAX).next(), None);
    }

    #[test]
    fn tick_advances_monotonically() {
        let mut clock = Tick::ZERO;
        let a = clock.advance();
        let b = clock.advance();
        assert_eq!(a, Tick(1));
        assert!(b > a);
        assert_eq!(clock, b);
    }

    #[test]
    fn display_forms() {
        assert_eq!(VersionId(7).to_string(), "7");
        assert_eq!(Tick(3).to_string(), "t=3");
    }
}

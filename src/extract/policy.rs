//! Positional conventions of the dialect, kept as named policies.

/// The segment column interleaves train type and train number: once empty
/// cells are dropped, even positions are types and odd positions numbers.
pub const ALTERNATING_FIELD_PARITY: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentField {
    Type,
    Number,
}

impl SegmentField {
    fn offset(self) -> usize {
        match self {
            SegmentField::Type => 0,
            SegmentField::Number => 1,
        }
    }

    /// Whether the non-empty segment entry at `index` belongs to this field.
    pub fn owns(self, index: usize) -> bool {
        index % ALTERNATING_FIELD_PARITY == self.offset()
    }
}

/// Which legs of the round-trip sequence carry the passenger list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegPolicy {
    /// The dialect lists passengers once, after the last leg.
    pub last_leg_gets_passengers: bool,
}

impl Default for LegPolicy {
    fn default() -> Self {
        Self {
            last_leg_gets_passengers: true,
        }
    }
}

impl LegPolicy {
    pub fn attaches_passengers(&self, index: usize, leg_count: usize) -> bool {
        self.last_leg_gets_passengers && index + 1 == leg_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_parity() {
        let owners: Vec<_> = (0..4).map(|i| SegmentField::Type.owns(i)).collect();
        assert_eq!(owners, vec![true, false, true, false]);
        assert!(SegmentField::Number.owns(1));
        assert!(!SegmentField::Number.owns(2));
    }

    #[test]
    fn test_only_last_leg_gets_passengers() {
        let policy = LegPolicy::default();
        let attached: Vec<_> = (0..3).map(|i| policy.attaches_passengers(i, 3)).collect();
        assert_eq!(attached, vec![false, false, true]);
    }

    #[test]
    fn test_disabled_policy_attaches_nothing() {
        let policy = LegPolicy {
            last_leg_gets_passengers: false,
        };
        assert!(!policy.attaches_passengers(0, 1));
    }
}

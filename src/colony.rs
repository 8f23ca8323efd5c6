/// Colony allegiance. Owner id 1 or 2; there is no "unowned" particle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Colony {
    First = 1,
    Second = 2,
}

/// Subtypes per colony.
pub const SUBTYPES: usize = 2;
/// Global types across both colonies.
pub const GLOBAL_TYPES: usize = 4;

impl Colony {
    pub const BOTH: [Colony; 2] = [Colony::First, Colony::Second];

    /// Owner id as used by renderers and logs (1 or 2).
    pub fn id(self) -> u8 {
        self as u8
    }

    /// Zero-based index (0 or 1).
    pub fn index(self) -> usize {
        self as usize - 1
    }

    pub fn opponent(self) -> Colony {
        match self {
            Colony::First => Colony::Second,
            Colony::Second => Colony::First,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Colony::First => "p1",
            Colony::Second => "p2",
        }
    }
}

/// Row/column of the force matrix for a particle.
#[inline]
pub fn global_type(owner: Colony, subtype: u8) -> usize {
    owner.index() * SUBTYPES + subtype as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_types_cover_zero_to_three() {
        assert_eq!(global_type(Colony::First, 0), 0);
        assert_eq!(global_type(Colony::First, 1), 1);
        assert_eq!(global_type(Colony::Second, 0), 2);
        assert_eq!(global_type(Colony::Second, 1), 3);
    }

    #[test]
    fn opponent_is_involution() {
        for c in Colony::BOTH {
            assert_ne!(c, c.opponent());
            assert_eq!(c, c.opponent().opponent());
        }
        assert_eq!(Colony::Second.id(), 2);
    }
}

//! Chess sides.

use std::fmt::{self, Display};

/// One of the two sides of a chess game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::IsVariant)]
pub enum Side {
    /// The side that moves first.
    White,
    /// The side that moves second.
    Black,
}

impl Side {
    /// Both sides, White first.
    pub const ALL: [Self; 2] = [Self::White, Self::Black];

    /// Returns the other side.
    ///
    /// # Examples
    ///
    /// ```
    /// use tactica_core::Side;
    ///
    /// assert_eq!(Side::White.opposite(), Side::Black);
    /// assert_eq!(Side::Black.opposite(), Side::White);
    /// ```
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }
}

impl Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::White => f.write_str("White"),
            Self::Black => f.write_str("Black"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposite_is_involution() {
        for side in Side::ALL {
            assert_ne!(side.opposite(), side);
            assert_eq!(side.opposite().opposite(), side);
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(Side::White.to_string(), "White");
        assert_eq!(Side::Black.to_string(), "Black");
        assert!(Side::Black.is_black());
    }
}

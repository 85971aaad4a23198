//! Square labels.

use std::{
    fmt::{self, Display},
    str::FromStr,
};

use crate::MalformedToken;

/// A square label: a file letter followed by a rank digit.
///
/// Labels are syntactic. Any ASCII lowercase letter and ASCII digit form a
/// well-formed label, so `z9` parses even though it does not name a square of
/// a standard board. Use [`Square::is_on_board`] to check that.
///
/// # Examples
///
/// ```
/// use tactica_core::Square;
///
/// let e4: Square = "e4".parse().unwrap();
/// assert_eq!(e4.file(), 'e');
/// assert_eq!(e4.rank(), '4');
/// assert!(e4.is_on_board());
///
/// let z9: Square = "z9".parse().unwrap();
/// assert!(!z9.is_on_board());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square {
    file: u8,
    rank: u8,
}

impl Square {
    /// Creates a square label from its file letter and rank digit.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedToken::InvalidFile`] if `file` is not an ASCII lowercase
    /// letter, or [`MalformedToken::InvalidRank`] if `rank` is not an ASCII digit.
    #[allow(clippy::cast_possible_truncation)]
    pub fn new(file: char, rank: char) -> Result<Self, MalformedToken> {
        if !file.is_ascii_lowercase() {
            return Err(MalformedToken::InvalidFile { ch: file });
        }
        if !rank.is_ascii_digit() {
            return Err(MalformedToken::InvalidRank { ch: rank });
        }
        Ok(Self {
            file: file as u8,
            rank: rank as u8,
        })
    }

    /// Creates an on-board square from zero-based file and rank indices.
    ///
    /// Returns `None` if either index is 8 or greater.
    #[must_use]
    pub const fn from_indices(file: u8, rank: u8) -> Option<Self> {
        if file >= 8 || rank >= 8 {
            return None;
        }
        Some(Self {
            file: b'a' + file,
            rank: b'1' + rank,
        })
    }

    /// Returns the file letter.
    #[must_use]
    pub const fn file(self) -> char {
        self.file as char
    }

    /// Returns the rank digit.
    #[must_use]
    pub const fn rank(self) -> char {
        self.rank as char
    }

    /// Returns whether the label lies within `a1..=h8`.
    #[must_use]
    pub const fn is_on_board(self) -> bool {
        matches!(self.file, b'a'..=b'h') && matches!(self.rank, b'1'..=b'8')
    }
}

impl Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

impl FromStr for Square {
    type Err = MalformedToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(file), Some(rank), None) => Self::new(file, rank),
            _ => Err(MalformedToken::InvalidSquare {
                len: s.chars().count(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let sq: Square = "a1".parse().unwrap();
        assert_eq!(Square::from_indices(0, 0), Some(sq));
        assert_eq!(sq.to_string(), "a1");

        let sq: Square = "h8".parse().unwrap();
        assert_eq!(Square::from_indices(7, 7), Some(sq));
    }

    #[test]
    fn test_from_indices_out_of_range() {
        assert_eq!(Square::from_indices(8, 0), None);
        assert_eq!(Square::from_indices(0, 8), None);
        assert!(Square::from_indices(3, 4).is_some_and(Square::is_on_board));
    }

    #[test]
    fn test_rejects_malformed_labels() {
        assert_eq!(
            "E4".parse::<Square>(),
            Err(MalformedToken::InvalidFile { ch: 'E' })
        );
        assert_eq!(
            "ex".parse::<Square>(),
            Err(MalformedToken::InvalidRank { ch: 'x' })
        );
        assert_eq!(
            "e".parse::<Square>(),
            Err(MalformedToken::InvalidSquare { len: 1 })
        );
        assert_eq!(
            "e44".parse::<Square>(),
            Err(MalformedToken::InvalidSquare { len: 3 })
        );
    }

    #[test]
    fn test_on_board() {
        assert!("a8".parse::<Square>().unwrap().is_on_board());
        assert!(!"i1".parse::<Square>().unwrap().is_on_board());
        assert!(!"a0".parse::<Square>().unwrap().is_on_board());
        assert!(!"a9".parse::<Square>().unwrap().is_on_board());
    }
}

//! Promotion pieces.

use std::fmt::{self, Display};

/// The piece a pawn promotes to.
///
/// Encoded in move tokens by its lowercase UCI letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Promotion {
    /// Promote to a queen (`q`).
    Queen,
    /// Promote to a rook (`r`).
    Rook,
    /// Promote to a bishop (`b`).
    Bishop,
    /// Promote to a knight (`n`).
    Knight,
}

impl Promotion {
    /// All promotion pieces.
    pub const ALL: [Self; 4] = [Self::Queen, Self::Rook, Self::Bishop, Self::Knight];

    /// Returns the promotion piece for a token letter, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use tactica_core::Promotion;
    ///
    /// assert_eq!(Promotion::from_char('n'), Some(Promotion::Knight));
    /// assert_eq!(Promotion::from_char('k'), None);
    /// ```
    #[must_use]
    pub const fn from_char(ch: char) -> Option<Self> {
        match ch {
            'q' => Some(Self::Queen),
            'r' => Some(Self::Rook),
            'b' => Some(Self::Bishop),
            'n' => Some(Self::Knight),
            _ => None,
        }
    }

    /// Returns the token letter of this piece.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::Queen => 'q',
            Self::Rook => 'r',
            Self::Bishop => 'b',
            Self::Knight => 'n',
        }
    }
}

impl Display for Promotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

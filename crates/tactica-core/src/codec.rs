//! Move tokens.
//!
//! A move token is the compact UCI-style form of a move: the origin label, the
//! destination label, and an optional promotion letter (`e2e4`, `e7e8q`).
//! Conversion is purely syntactic. Whether a token names a legal move is the
//! rules engine's business.

use std::{
    fmt::{self, Display},
    str::FromStr,
};

use crate::{Promotion, Square};

/// Errors produced when a move token cannot be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum MalformedToken {
    /// The token has fewer than 4 characters.
    #[display("move token too short: {len} characters")]
    TooShort {
        /// Number of characters in the token.
        len: usize,
    },
    /// The token has more than 5 characters.
    #[display("move token too long: {len} characters")]
    TooLong {
        /// Number of characters in the token.
        len: usize,
    },
    /// A square label does not have exactly two characters.
    #[display("square label must have 2 characters, got {len}")]
    InvalidSquare {
        /// Number of characters in the label.
        len: usize,
    },
    /// A file character is not an ASCII lowercase letter.
    #[display("invalid file character {ch:?}")]
    InvalidFile {
        /// The offending character.
        ch: char,
    },
    /// A rank character is not an ASCII digit.
    #[display("invalid rank character {ch:?}")]
    InvalidRank {
        /// The offending character.
        ch: char,
    },
    /// The fifth character is not a promotion letter.
    #[display("invalid promotion character {ch:?}")]
    InvalidPromotion {
        /// The offending character.
        ch: char,
    },
}

/// A structured move: origin, destination, and optional promotion piece.
///
/// `Display` produces the move token and `FromStr` parses one.
///
/// # Examples
///
/// ```
/// use tactica_core::{Move, Square};
///
/// let mv = Move::new("g1".parse().unwrap(), "f3".parse().unwrap());
/// assert_eq!(mv.to_string(), "g1f3");
/// assert_eq!("g1f3".parse::<Move>().unwrap(), mv);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    origin: Square,
    destination: Square,
    promotion: Option<Promotion>,
}

impl Move {
    /// Creates a move without promotion.
    #[must_use]
    pub const fn new(origin: Square, destination: Square) -> Self {
        Self {
            origin,
            destination,
            promotion: None,
        }
    }

    /// Creates a move with an optional promotion piece.
    #[must_use]
    pub const fn with_promotion(
        origin: Square,
        destination: Square,
        promotion: Option<Promotion>,
    ) -> Self {
        Self {
            origin,
            destination,
            promotion,
        }
    }

    /// Returns the origin square.
    #[must_use]
    pub const fn origin(&self) -> Square {
        self.origin
    }

    /// Returns the destination square.
    #[must_use]
    pub const fn destination(&self) -> Square {
        self.destination
    }

    /// Returns the promotion piece, if any.
    #[must_use]
    pub const fn promotion(&self) -> Option<Promotion> {
        self.promotion
    }

    /// Returns whether both moves travel between the same squares,
    /// ignoring promotion.
    #[must_use]
    pub fn same_squares(&self, other: &Self) -> bool {
        self.origin == other.origin && self.destination == other.destination
    }
}

impl Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.origin, self.destination)?;
        if let Some(promotion) = self.promotion {
            write!(f, "{promotion}")?;
        }
        Ok(())
    }
}

impl FromStr for Move {
    type Err = MalformedToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode(s)
    }
}

/// Encodes a move as a token.
///
/// # Examples
///
/// ```
/// use tactica_core::{Promotion, codec};
///
/// let a7 = "a7".parse().unwrap();
/// let a8 = "a8".parse().unwrap();
/// assert_eq!(codec::encode(a7, a8, None), "a7a8");
/// assert_eq!(codec::encode(a7, a8, Some(Promotion::Rook)), "a7a8r");
/// ```
#[must_use]
pub fn encode(origin: Square, destination: Square, promotion: Option<Promotion>) -> String {
    Move::with_promotion(origin, destination, promotion).to_string()
}

/// Decodes a token into a move.
///
/// A promotion piece is read only when the token has exactly 5 characters.
///
/// # Errors
///
/// Returns [`MalformedToken::TooShort`] for fewer than 4 characters,
/// [`MalformedToken::TooLong`] for more than 5, and the square or promotion
/// variants when a character is out of its alphabet.
pub fn decode(token: &str) -> Result<Move, MalformedToken> {
    let chars = token.chars().collect::<Vec<_>>();
    let len = chars.len();
    if len < 4 {
        return Err(MalformedToken::TooShort { len });
    }
    if len > 5 {
        return Err(MalformedToken::TooLong { len });
    }

    let origin = Square::new(chars[0], chars[1])?;
    let destination = Square::new(chars[2], chars[3])?;
    let promotion = match chars.get(4) {
        Some(&ch) => Some(Promotion::from_char(ch).ok_or(MalformedToken::InvalidPromotion { ch })?),
        None => None,
    };

    Ok(Move::with_promotion(origin, destination, promotion))
}

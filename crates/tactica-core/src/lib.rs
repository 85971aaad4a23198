//! Core value types for chess puzzle training.
//!
//! This crate holds the small, dependency-free vocabulary shared by the
//! catalog, session, and application crates:
//!
//! - [`square`]: syntactic square labels (a file letter and a rank digit)
//! - [`side`]: the two sides of a chess game
//! - [`promotion`]: promotion piece letters
//! - [`codec`]: conversion between structured moves and compact move tokens
//!
//! # Examples
//!
//! ```
//! use tactica_core::{Move, Promotion, Square, codec};
//!
//! let mv: Move = "e7e8q".parse().unwrap();
//! assert_eq!(mv.origin(), "e7".parse::<Square>().unwrap());
//! assert_eq!(mv.promotion(), Some(Promotion::Queen));
//! assert_eq!(codec::encode(mv.origin(), mv.destination(), mv.promotion()), "e7e8q");
//! ```

pub mod codec;
pub mod promotion;
pub mod side;
pub mod square;

pub use self::{
    codec::{MalformedToken, Move},
    promotion::Promotion,
    side::Side,
    square::Square,
};

//! The rules engine seam.
//!
//! A session never decides legality itself. It hands moves to a
//! [`RulesEngine`], which either applies them or refuses them.
//! [`ShakmatyEngine`] is the standard-chess implementation.

use shakmaty::{
    CastlingMode, Chess, Color, EnPassantMode, Position as _, fen::Fen, san::SanPlus,
    uci::UciMove,
};
use tactica_core::{Move, Side};

/// A position string the engine cannot load.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid position {fen:?}")]
pub struct InvalidPosition {
    /// The rejected position string.
    pub fen: String,
}

/// A move the engine accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayedMove {
    /// The move as played.
    pub mv: Move,
    /// Its standard algebraic notation, with check or mate suffix.
    pub san: String,
}

/// Validates and applies moves against a position.
///
/// Illegal moves are reported by returning `None`, never by panicking, and
/// leave the position untouched.
pub trait RulesEngine {
    /// Replaces the current position and clears the takeback history.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidPosition`] if `fen` cannot be parsed or describes an
    /// impossible position. The current position is then unspecified.
    fn load(&mut self, fen: &str) -> Result<(), InvalidPosition>;

    /// Plays `mv` if it is legal in the current position.
    fn play(&mut self, mv: &Move) -> Option<PlayedMove>;

    /// Takes back the last played move, returning it.
    fn undo(&mut self) -> Option<Move>;

    /// Returns the side to move.
    fn turn(&self) -> Side;

    /// Returns the current position in FEN.
    fn fen(&self) -> String;
}

/// A standard chess [`RulesEngine`] backed by `shakmaty`.
///
/// # Example
///
/// ```
/// use tactica_core::Side;
/// use tactica_session::{RulesEngine, ShakmatyEngine};
///
/// let mut engine = ShakmatyEngine::default();
/// let played = engine.play(&"g1f3".parse().unwrap()).unwrap();
/// assert_eq!(played.san, "Nf3");
/// assert_eq!(engine.turn(), Side::Black);
///
/// assert!(engine.play(&"e2e5".parse().unwrap()).is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ShakmatyEngine {
    position: Chess,
    history: Vec<(Chess, Move)>,
}

impl ShakmatyEngine {
    /// Creates an engine at the standard starting position.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl RulesEngine for ShakmatyEngine {
    fn load(&mut self, fen: &str) -> Result<(), InvalidPosition> {
        let invalid = || InvalidPosition {
            fen: fen.to_owned(),
        };
        let parsed: Fen = fen.trim().parse().map_err(|_| invalid())?;
        let position: Chess = parsed
            .into_position(CastlingMode::Standard)
            .map_err(|_| invalid())?;
        self.position = position;
        self.history.clear();
        Ok(())
    }

    fn play(&mut self, mv: &Move) -> Option<PlayedMove> {
        let uci: UciMove = mv.to_string().parse().ok()?;
        let legal = uci.to_move(&self.position).ok()?;
        let before = self.position.clone();
        let san = SanPlus::from_move_and_play_unchecked(&mut self.position, &legal);
        self.history.push((before, *mv));
        Some(PlayedMove {
            mv: *mv,
            san: san.to_string(),
        })
    }

    fn undo(&mut self) -> Option<Move> {
        let (position, mv) = self.history.pop()?;
        self.position = position;
        Some(mv)
    }

    fn turn(&self) -> Side {
        match self.position.turn() {
            Color::White => Side::White,
            Color::Black => Side::Black,
        }
    }

    fn fen(&self) -> String {
        Fen::from_position(self.position.clone(), EnPassantMode::Legal).to_string()
    }
}

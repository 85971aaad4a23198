//! Board presentation.

use std::fmt::{self, Display};

use tactica_core::Side;

/// Whether a dropped piece stays on its new square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum DropResponse {
    Accept,
    Snapback,
}

/// Something that can show a chess position.
pub trait BoardView {
    fn set_position(&mut self, fen: &str);
    fn set_orientation(&mut self, side: Side);
    fn orientation(&self) -> Side;
}

/// A plain-text board rendered from the FEN piece placement field.
///
/// # Examples
///
/// ```
/// use tactica_app::board_view::{BoardView, TerminalBoard};
/// use tactica_core::Side;
///
/// let mut board = TerminalBoard::new();
/// board.set_position("4k3/8/8/8/8/8/8/4K2R w K - 0 1");
/// let text = board.render();
/// assert!(text.starts_with("8 . . . . k . . ."));
///
/// board.set_orientation(Side::Black);
/// assert!(board.render().starts_with("1 R . . K . . . ."));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalBoard {
    ranks: Vec<Vec<char>>,
    orientation: Side,
}

impl Default for TerminalBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalBoard {
    #[must_use]
    pub fn new() -> Self {
        Self {
            ranks: vec![vec!['.'; 8]; 8],
            orientation: Side::White,
        }
    }

    /// Renders the board, rank labels on the left and file labels below.
    #[must_use]
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl BoardView for TerminalBoard {
    fn set_position(&mut self, fen: &str) {
        let placement = fen.split_whitespace().next().unwrap_or_default();
        self.ranks = placement
            .split('/')
            .map(|rank| {
                let mut squares = Vec::with_capacity(8);
                for ch in rank.chars() {
                    match ch.to_digit(10) {
                        Some(empty) => squares.extend((0..empty).map(|_| '.')),
                        None => squares.push(ch),
                    }
                }
                squares
            })
            .collect();
    }

    fn set_orientation(&mut self, side: Side) {
        self.orientation = side;
    }

    fn orientation(&self) -> Side {
        self.orientation
    }
}

impl Display for TerminalBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rows = self
            .ranks
            .iter()
            .enumerate()
            .map(|(i, squares)| (8 - i, squares.clone()))
            .collect::<Vec<_>>();
        let mut files = ('a'..='h').collect::<Vec<_>>();
        if self.orientation.is_black() {
            rows.reverse();
            for (_, squares) in &mut rows {
                squares.reverse();
            }
            files.reverse();
        }

        for (rank, squares) in rows {
            write!(f, "{rank}")?;
            for square in squares {
                write!(f, " {square}")?;
            }
            writeln!(f)?;
        }
        write!(f, " ")?;
        for file in files {
            write!(f, " {file}")?;
        }
        Ok(())
    }
}

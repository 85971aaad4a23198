use std::fmt::{self, Display};

use tactica_core::Side;

/// A read-only summary of a session, suitable for a status line.
///
/// # Examples
///
/// ```
/// use tactica_core::Side;
/// use tactica_session::SessionStatus;
///
/// let status = SessionStatus::ToMove {
///     side: Side::Black,
///     remaining_plies: 2,
///     last_reply: Some("Nf3".to_owned()),
/// };
/// assert_eq!(
///     status.to_string(),
///     "opponent played Nf3. Black to move (remaining: 2)"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    /// No puzzle is loaded.
    Idle,
    /// The solver is to move.
    ToMove {
        /// The side to move.
        side: Side,
        /// Solver moves left in the line.
        remaining_plies: usize,
        /// SAN of the last automatic move, if any.
        last_reply: Option<String>,
    },
    /// The opponent reply is pending.
    OpponentToMove,
    /// The line is complete.
    Solved,
    /// A wrong move ended the attempt.
    Failed,
    /// The puzzle data could not be played.
    Broken,
}

impl SessionStatus {
    /// Returns whether the attempt is over.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Solved | Self::Failed | Self::Broken)
    }
}

impl Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "no puzzle loaded"),
            Self::ToMove {
                side,
                remaining_plies,
                last_reply,
            } => {
                if let Some(san) = last_reply {
                    write!(f, "opponent played {san}. ")?;
                }
                write!(f, "{side} to move (remaining: {remaining_plies})")
            }
            Self::OpponentToMove => write!(f, "correct! opponent is thinking..."),
            Self::Solved => write!(f, "puzzle solved"),
            Self::Failed => write!(f, "wrong move, puzzle failed"),
            Self::Broken => write!(f, "puzzle data is broken, skip to the next puzzle"),
        }
    }
}

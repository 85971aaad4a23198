//! Puzzle sessions.
//!
//! A [`Session`] walks the solver through one puzzle's solution line. It asks a
//! [`RulesEngine`] whether each move is legal, compares it against the expected
//! move, and plays the scripted opponent replies when the caller presents the
//! matching [`ReplyTicket`].
//!
//! The session never waits on a clock. Callers that want a delay before the
//! reply schedule it themselves and hand the ticket back when it is due; a
//! ticket from an earlier puzzle is refused.

mod engine;
mod session;
mod status;

pub use self::{
    engine::{InvalidPosition, PlayedMove, RulesEngine, ShakmatyEngine},
    session::{
        FailurePolicy, LineConvention, MoveOutcome, Phase, ReplyOutcome, ReplyTicket, Session,
        SessionError, SessionId, SessionOptions,
    },
    status::SessionStatus,
};

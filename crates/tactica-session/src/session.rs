use log::{debug, error, info, warn};
use tactica_catalog::PuzzleRecord;
use tactica_core::{Move, Promotion, Side, Square};

use crate::{InvalidPosition, PlayedMove, RulesEngine, SessionStatus};

/// The phase of a puzzle session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::IsVariant)]
pub enum Phase {
    /// No puzzle has been started.
    #[display("idle")]
    Idle,
    /// Waiting for the solver's move.
    #[display("awaiting user")]
    AwaitingUser,
    /// The solver moved correctly; the scripted reply is pending.
    #[display("awaiting opponent reply")]
    AwaitingOpponentReply,
    /// The whole line has been played.
    #[display("solved")]
    Solved,
    /// The solver played a wrong move under [`FailurePolicy::Lock`].
    #[display("failed")]
    Failed,
    /// The puzzle data could not be played; the session is unusable.
    #[display("broken")]
    Broken,
}

impl Phase {
    /// Returns whether no further move can be made in this session.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Solved | Self::Failed | Self::Broken)
    }
}

/// Who plays the first move of a solution line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LineConvention {
    /// The side to move in the starting position is the solver.
    SolverFirst,
    /// The first move is the opponent's setup move and is played
    /// automatically when the puzzle begins.
    #[default]
    OpponentFirst,
}

/// What happens after a wrong move.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, derive_more::IsVariant)]
pub enum FailurePolicy {
    /// Take the move back and let the solver try again.
    #[default]
    Retry,
    /// Take the move back and end the session as failed.
    Lock,
}

/// Options controlling how a [`Session`] interprets puzzles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionOptions {
    /// Who plays the first move of each line.
    pub convention: LineConvention,
    /// What happens after a wrong move.
    pub failure_policy: FailurePolicy,
}

impl SessionOptions {
    /// Sets the line convention.
    #[must_use]
    pub fn convention(mut self, convention: LineConvention) -> Self {
        self.convention = convention;
        self
    }

    /// Sets the failure policy.
    #[must_use]
    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }
}

/// Identity of one puzzle attempt. A new identity is issued by every
/// [`Session::begin`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, derive_more::Display)]
#[display("#{_0}")]
pub struct SessionId(u64);

/// Permission to play the pending opponent reply.
///
/// Issued with [`MoveOutcome::CorrectAwaitingReply`] and bound to the session
/// identity and cursor it was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReplyTicket {
    session: SessionId,
    cursor: usize,
}

impl ReplyTicket {
    /// Returns the session the ticket belongs to.
    #[must_use]
    pub fn session(self) -> SessionId {
        self.session
    }
}

/// The result of a solver move attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum MoveOutcome {
    /// The session was not waiting for the solver; nothing changed.
    Ignored,
    /// The rules engine refused the move; nothing changed.
    Illegal,
    /// The move was legal but not the expected one and has been taken back.
    Incorrect,
    /// The move was correct and the opponent reply is now pending.
    CorrectAwaitingReply(ReplyTicket),
    /// The move was correct and completed the line.
    Completed,
}

/// The result of playing the scripted opponent reply.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::IsVariant)]
pub enum ReplyOutcome {
    /// The reply was played and the solver is to move.
    AwaitingUser(PlayedMove),
    /// The reply was played and completed the line.
    Completed(PlayedMove),
}

/// Errors raised by session operations.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum SessionError {
    /// The puzzle's starting position could not be loaded.
    #[display("puzzle position cannot be loaded: {_0}")]
    #[from]
    InvalidPosition(InvalidPosition),
    /// A scripted move from the puzzle data was refused by the rules engine.
    #[display("puzzle data is corrupt: scripted move {token} at ply {ply} cannot be played")]
    CorruptSolutionData {
        /// Zero-based index of the move in the solution line.
        ply: usize,
        /// The refused move.
        token: Move,
    },
    /// The solution line leaves no move for the solver.
    #[display("puzzle has no move for the solver")]
    NothingToSolve,
    /// The reply ticket does not match the pending reply.
    #[display("reply ticket is stale")]
    StaleReply,
}

/// A puzzle attempt: the state machine between a puzzle and its solver.
///
/// The session owns its rules engine and the active puzzle. The remaining
/// expected moves are always `solution[cursor..]`.
///
/// # Example
///
/// ```
/// use tactica_catalog::PuzzleRecord;
/// use tactica_session::{
///     LineConvention, MoveOutcome, Phase, ReplyOutcome, Session, SessionOptions, ShakmatyEngine,
/// };
///
/// let record = PuzzleRecord::from_tokens(
///     "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
///     ["e2e4", "e7e5"],
///     800,
/// )
/// .unwrap();
///
/// let options = SessionOptions::default().convention(LineConvention::SolverFirst);
/// let mut session = Session::new(ShakmatyEngine::new(), options);
/// session.begin(record).unwrap();
///
/// let outcome = session.attempt_user_move("e2".parse().unwrap(), "e4".parse().unwrap(), None);
/// let MoveOutcome::CorrectAwaitingReply(ticket) = outcome else {
///     panic!("expected a pending reply");
/// };
/// let reply = session.play_opponent_reply(ticket).unwrap();
/// assert!(matches!(reply, ReplyOutcome::Completed(_)));
/// assert_eq!(session.phase(), Phase::Solved);
/// ```
#[derive(Debug, Clone)]
pub struct Session<E> {
    engine: E,
    options: SessionOptions,
    id: SessionId,
    puzzle: Option<PuzzleRecord>,
    cursor: usize,
    phase: Phase,
    solver: Side,
    last_reply: Option<PlayedMove>,
}

impl<E> Session<E>
where
    E: RulesEngine,
{
    /// Creates an idle session.
    #[must_use]
    pub fn new(engine: E, options: SessionOptions) -> Self {
        Self {
            engine,
            options,
            id: SessionId::default(),
            puzzle: None,
            cursor: 0,
            phase: Phase::Idle,
            solver: Side::White,
            last_reply: None,
        }
    }

    /// Returns the session options.
    #[must_use]
    pub fn options(&self) -> SessionOptions {
        self.options
    }

    /// Replaces the session options. Takes effect at the next [`Session::begin`]
    /// for the line convention and immediately for the failure policy.
    pub fn set_options(&mut self, options: SessionOptions) {
        self.options = options;
    }

    /// Starts `record`, replacing any previous puzzle.
    ///
    /// Under [`LineConvention::OpponentFirst`] the setup move is played here,
    /// and [`Session::last_reply`] reports it.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidPosition`], [`SessionError::CorruptSolutionData`]
    /// for a refused setup move, or [`SessionError::NothingToSolve`]. In each case
    /// the session is left [`Phase::Broken`].
    pub fn begin(&mut self, record: PuzzleRecord) -> Result<(), SessionError> {
        self.id = SessionId(self.id.0 + 1);
        self.cursor = 0;
        self.last_reply = None;
        self.phase = Phase::Broken;
        let record = self.puzzle.insert(record);

        self.engine.load(record.position())?;

        if self.options.convention == LineConvention::OpponentFirst {
            let Some(&setup) = record.solution().first() else {
                return Err(SessionError::NothingToSolve);
            };
            let Some(played) = self.engine.play(&setup) else {
                error!("session {}: setup move {setup} refused", self.id);
                return Err(SessionError::CorruptSolutionData {
                    ply: 0,
                    token: setup,
                });
            };
            self.cursor = 1;
            self.last_reply = Some(played);
        }

        if self.cursor >= record.solution().len() {
            return Err(SessionError::NothingToSolve);
        }

        self.solver = self.engine.turn();
        self.phase = Phase::AwaitingUser;
        info!(
            "session {}: started puzzle rated {} ({} plies, {} to move)",
            self.id,
            record.rating(),
            record.solution().len(),
            self.solver
        );
        Ok(())
    }

    /// Attempts a solver move.
    ///
    /// When no promotion piece is given and the expected move travels between
    /// the same squares with a promotion, that promotion is assumed.
    pub fn attempt_user_move(
        &mut self,
        origin: Square,
        destination: Square,
        promotion: Option<Promotion>,
    ) -> MoveOutcome {
        if !self.phase.is_awaiting_user() {
            debug!("session {}: ignoring move while {}", self.id, self.phase);
            return MoveOutcome::Ignored;
        }
        let Some(&expected) = self.remaining().first() else {
            return MoveOutcome::Ignored;
        };

        let promotion = promotion.or_else(|| {
            Move::new(origin, destination)
                .same_squares(&expected)
                .then(|| expected.promotion())
                .flatten()
        });
        let attempt = Move::with_promotion(origin, destination, promotion);

        if self.engine.play(&attempt).is_none() {
            debug!("session {}: illegal move {attempt}", self.id);
            return MoveOutcome::Illegal;
        }

        if attempt != expected {
            self.engine.undo();
            if self.options.failure_policy.is_lock() {
                self.phase = Phase::Failed;
            }
            debug!(
                "session {}: incorrect move {attempt}, phase {}",
                self.id, self.phase
            );
            return MoveOutcome::Incorrect;
        }

        self.cursor += 1;
        if self.remaining().is_empty() {
            self.phase = Phase::Solved;
            info!("session {}: solved", self.id);
            return MoveOutcome::Completed;
        }

        self.phase = Phase::AwaitingOpponentReply;
        debug!("session {}: correct move {attempt}", self.id);
        MoveOutcome::CorrectAwaitingReply(ReplyTicket {
            session: self.id,
            cursor: self.cursor,
        })
    }

    /// Plays the scripted opponent reply authorized by `ticket`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::StaleReply`] if the ticket was issued by an
    /// earlier puzzle or has already been used; nothing changes. Returns
    /// [`SessionError::CorruptSolutionData`] if the rules engine refuses the
    /// scripted move; the position is untouched and the session becomes
    /// [`Phase::Broken`].
    pub fn play_opponent_reply(&mut self, ticket: ReplyTicket) -> Result<ReplyOutcome, SessionError> {
        if self.pending_reply() != Some(ticket) {
            warn!("session {}: dropping stale reply ticket {ticket:?}", self.id);
            return Err(SessionError::StaleReply);
        }
        let Some(&token) = self.remaining().first() else {
            return Err(SessionError::StaleReply);
        };

        let Some(played) = self.engine.play(&token) else {
            self.phase = Phase::Broken;
            error!(
                "session {}: scripted reply {token} at ply {} refused",
                self.id, self.cursor
            );
            return Err(SessionError::CorruptSolutionData {
                ply: self.cursor,
                token,
            });
        };

        self.cursor += 1;
        self.last_reply = Some(played.clone());
        if self.remaining().is_empty() {
            self.phase = Phase::Solved;
            info!("session {}: solved", self.id);
            return Ok(ReplyOutcome::Completed(played));
        }

        self.phase = Phase::AwaitingUser;
        debug_assert_eq!(self.engine.turn(), self.solver);
        Ok(ReplyOutcome::AwaitingUser(played))
    }

    /// Returns the ticket for the pending opponent reply, if one is pending.
    #[must_use]
    pub fn pending_reply(&self) -> Option<ReplyTicket> {
        self.phase.is_awaiting_opponent_reply().then_some(ReplyTicket {
            session: self.id,
            cursor: self.cursor,
        })
    }

    /// Returns the current session identity.
    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Returns the current phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns the active puzzle.
    #[must_use]
    pub fn puzzle(&self) -> Option<&PuzzleRecord> {
        self.puzzle.as_ref()
    }

    /// Returns how many moves of the solution line have been played.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Returns the moves of the solution line still to be played.
    #[must_use]
    pub fn remaining(&self) -> &[Move] {
        self.puzzle
            .as_ref()
            .and_then(|puzzle| puzzle.solution().get(self.cursor..))
            .unwrap_or_default()
    }

    /// Returns how many solver moves remain: `ceil(remaining / 2)`.
    #[must_use]
    pub fn remaining_plies(&self) -> usize {
        self.remaining().len().div_ceil(2)
    }

    /// Returns the side to move, as reported by the rules engine.
    #[must_use]
    pub fn current_turn_label(&self) -> Side {
        self.engine.turn()
    }

    /// Returns the side the solver plays in the active puzzle.
    #[must_use]
    pub fn solver_side(&self) -> Side {
        self.solver
    }

    /// Returns the current position in FEN.
    #[must_use]
    pub fn position(&self) -> String {
        self.engine.fen()
    }

    /// Returns the most recent automatically played move.
    #[must_use]
    pub fn last_reply(&self) -> Option<&PlayedMove> {
        self.last_reply.as_ref()
    }

    /// Returns the derived status view.
    #[must_use]
    pub fn status(&self) -> SessionStatus {
        match self.phase {
            Phase::Idle => SessionStatus::Idle,
            Phase::AwaitingUser => SessionStatus::ToMove {
                side: self.current_turn_label(),
                remaining_plies: self.remaining_plies(),
                last_reply: self.last_reply.as_ref().map(|played| played.san.clone()),
            },
            Phase::AwaitingOpponentReply => SessionStatus::OpponentToMove,
            Phase::Solved => SessionStatus::Solved,
            Phase::Failed => SessionStatus::Failed,
            Phase::Broken => SessionStatus::Broken,
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use tactica_catalog::source;

    use super::*;
    use crate::ShakmatyEngine;

    const START: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    fn record(fen: &str, tokens: &[&str]) -> PuzzleRecord {
        PuzzleRecord::from_tokens(fen, tokens, 1000).unwrap()
    }

    fn session(convention: LineConvention, policy: FailurePolicy) -> Session<ShakmatyEngine> {
        Session::new(
            ShakmatyEngine::new(),
            SessionOptions::default()
                .convention(convention)
                .failure_policy(policy),
        )
    }

    fn attempt(session: &mut Session<ShakmatyEngine>, token: &str) -> MoveOutcome {
        let mv: Move = token.parse().unwrap();
        session.attempt_user_move(mv.origin(), mv.destination(), mv.promotion())
    }

    #[test]
    fn test_new_session_is_idle() {
        let session = session(LineConvention::SolverFirst, FailurePolicy::Retry);
        assert_eq!(session.phase(), Phase::Idle);
        assert!(session.puzzle().is_none());
        assert!(session.remaining().is_empty());
        assert_eq!(session.status(), SessionStatus::Idle);
    }

    #[test]
    fn test_correct_move_then_reply_solves() {
        let mut session = session(LineConvention::SolverFirst, FailurePolicy::Retry);
        session.begin(record(START, &["e2e4", "e7e5"])).unwrap();
        assert_eq!(session.phase(), Phase::AwaitingUser);
        assert_eq!(session.current_turn_label(), Side::White);
        assert_eq!(session.solver_side(), Side::White);

        let MoveOutcome::CorrectAwaitingReply(ticket) = attempt(&mut session, "e2e4") else {
            panic!("expected a pending reply");
        };
        assert_eq!(session.phase(), Phase::AwaitingOpponentReply);
        assert_eq!(session.cursor(), 1);

        let reply = session.play_opponent_reply(ticket).unwrap();
        assert_eq!(
            reply,
            ReplyOutcome::Completed(PlayedMove {
                mv: "e7e5".parse().unwrap(),
                san: "e5".to_owned(),
            })
        );
        assert_eq!(session.phase(), Phase::Solved);
        assert_eq!(
            session.position(),
            "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2"
        );
        assert!(session.remaining().is_empty());
        assert_eq!(session.remaining_plies(), 0);
    }

    #[test]
    fn test_wrong_move_retry_policy() {
        let mut session = session(LineConvention::SolverFirst, FailurePolicy::Retry);
        session.begin(record(START, &["e2e4", "e7e5"])).unwrap();

        assert_eq!(attempt(&mut session, "d2d4"), MoveOutcome::Incorrect);
        assert_eq!(session.position(), START);
        assert_eq!(session.phase(), Phase::AwaitingUser);
        assert_eq!(session.cursor(), 0);

        assert!(attempt(&mut session, "e2e4").is_correct_awaiting_reply());
    }

    #[test]
    fn test_wrong_move_lock_policy() {
        let mut session = session(LineConvention::SolverFirst, FailurePolicy::Lock);
        session.begin(record(START, &["e2e4", "e7e5"])).unwrap();

        assert_eq!(attempt(&mut session, "d2d4"), MoveOutcome::Incorrect);
        assert_eq!(session.position(), START);
        assert_eq!(session.phase(), Phase::Failed);
        assert_eq!(session.status(), SessionStatus::Failed);

        assert_eq!(attempt(&mut session, "e2e4"), MoveOutcome::Ignored);
        assert_eq!(session.position(), START);
    }

    #[test]
    fn test_illegal_move_changes_nothing() {
        let mut session = session(LineConvention::SolverFirst, FailurePolicy::Lock);
        session.begin(record(START, &["e2e4", "e7e5"])).unwrap();

        assert_eq!(attempt(&mut session, "e2e5"), MoveOutcome::Illegal);
        assert_eq!(session.phase(), Phase::AwaitingUser);
        assert_eq!(session.position(), START);
    }

    #[test]
    fn test_attempts_ignored_while_reply_pending() {
        let mut session = session(LineConvention::SolverFirst, FailurePolicy::Retry);
        session
            .begin(record(START, &["e2e4", "e7e5", "g1f3", "b8c6"]))
            .unwrap();
        let MoveOutcome::CorrectAwaitingReply(ticket) = attempt(&mut session, "e2e4") else {
            panic!("expected a pending reply");
        };
        let fen = session.position();

        assert_eq!(attempt(&mut session, "g1f3"), MoveOutcome::Ignored);
        assert_eq!(session.position(), fen);
        assert_eq!(session.pending_reply(), Some(ticket));

        let reply = session.play_opponent_reply(ticket).unwrap();
        assert!(reply.is_awaiting_user());
        assert_eq!(session.phase(), Phase::AwaitingUser);
        assert_eq!(
            session.status(),
            SessionStatus::ToMove {
                side: Side::White,
                remaining_plies: 1,
                last_reply: Some("e5".to_owned()),
            }
        );
    }

    #[test]
    fn test_corrupt_reply_marks_session_broken() {
        let mut session = session(LineConvention::SolverFirst, FailurePolicy::Retry);
        session.begin(record(START, &["e2e4", "z9z9"])).unwrap();
        let MoveOutcome::CorrectAwaitingReply(ticket) = attempt(&mut session, "e2e4") else {
            panic!("expected a pending reply");
        };
        let before = session.position();

        assert_eq!(
            session.play_opponent_reply(ticket),
            Err(SessionError::CorruptSolutionData {
                ply: 1,
                token: "z9z9".parse().unwrap(),
            })
        );
        assert_eq!(session.phase(), Phase::Broken);
        assert_eq!(session.position(), before);
        assert_eq!(session.cursor(), 1);
        assert_eq!(attempt(&mut session, "e7e5"), MoveOutcome::Ignored);
    }

    #[test]
    fn test_stale_ticket_is_rejected() {
        let mut session = session(LineConvention::SolverFirst, FailurePolicy::Retry);
        session
            .begin(record(START, &["e2e4", "e7e5", "g1f3", "b8c6"]))
            .unwrap();
        let MoveOutcome::CorrectAwaitingReply(old_ticket) = attempt(&mut session, "e2e4") else {
            panic!("expected a pending reply");
        };

        // A new puzzle begins before the reply fires.
        session
            .begin(record(START, &["d2d4", "d7d5", "c2c4", "e7e6"]))
            .unwrap();
        assert_ne!(old_ticket.session(), session.id());
        let MoveOutcome::CorrectAwaitingReply(ticket) = attempt(&mut session, "d2d4") else {
            panic!("expected a pending reply");
        };

        let fen = session.position();
        assert_eq!(
            session.play_opponent_reply(old_ticket),
            Err(SessionError::StaleReply)
        );
        assert_eq!(session.position(), fen);

        session.play_opponent_reply(ticket).unwrap();
        // A ticket can only be used once.
        assert_eq!(
            session.play_opponent_reply(ticket),
            Err(SessionError::StaleReply)
        );
    }

    #[test]
    fn test_opponent_first_plays_setup_move() {
        let mut session = session(LineConvention::OpponentFirst, FailurePolicy::Retry);
        let fen = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1";
        session
            .begin(record(fen, &["e7e5", "g1f3", "g8f6", "f3e5", "f6e4"]))
            .unwrap();

        assert_eq!(session.cursor(), 1);
        assert_eq!(session.solver_side(), Side::White);
        assert_eq!(session.current_turn_label(), Side::White);
        assert_eq!(session.last_reply().map(|p| p.san.as_str()), Some("e5"));
        assert_eq!(session.remaining().len(), 4);
        assert_eq!(session.remaining_plies(), 2);
    }

    #[test]
    fn test_begin_failures_leave_session_broken() {
        let mut session = session(LineConvention::OpponentFirst, FailurePolicy::Retry);

        assert!(matches!(
            session.begin(record("garbage", &["e2e4", "e7e5"])),
            Err(SessionError::InvalidPosition(_))
        ));
        assert_eq!(session.phase(), Phase::Broken);

        // White to move, but the setup move is a black move.
        assert_eq!(
            session.begin(record(START, &["e7e5", "e2e4"])),
            Err(SessionError::CorruptSolutionData {
                ply: 0,
                token: "e7e5".parse().unwrap(),
            })
        );
        assert_eq!(session.phase(), Phase::Broken);

        assert_eq!(
            session.begin(record(START, &["e2e4"])),
            Err(SessionError::NothingToSolve)
        );
        assert_eq!(session.phase(), Phase::Broken);

        session.begin(record(START, &["e2e4", "e7e5"])).unwrap();
        assert_eq!(session.phase(), Phase::AwaitingUser);
    }

    #[test]
    fn test_promotion_inferred_from_expected_move() {
        let mut session = session(LineConvention::SolverFirst, FailurePolicy::Retry);
        session
            .begin(record("8/P6k/8/8/8/8/8/K7 w - - 0 1", &["a7a8n"]))
            .unwrap();
        assert_eq!(
            session.attempt_user_move(sq("a7"), sq("a8"), None),
            MoveOutcome::Completed
        );
        assert!(session.position().starts_with("N7/"));
    }

    #[test]
    fn test_explicit_wrong_promotion_is_incorrect() {
        let mut session = session(LineConvention::SolverFirst, FailurePolicy::Retry);
        session
            .begin(record("8/P6k/8/8/8/8/8/K7 w - - 0 1", &["a7a8n"]))
            .unwrap();
        assert_eq!(
            session.attempt_user_move(sq("a7"), sq("a8"), Some(Promotion::Queen)),
            MoveOutcome::Incorrect
        );
        assert_eq!(session.position(), "8/P6k/8/8/8/8/8/K7 w - - 0 1");
    }

    #[test]
    fn test_starter_catalog_is_playable() {
        let catalog = source::starter_catalog().unwrap();
        for record in &catalog {
            let mut session = session(LineConvention::OpponentFirst, FailurePolicy::Lock);
            session.begin(record.clone()).unwrap();
            while !session.phase().is_terminal() {
                let expected = session.remaining()[0];
                match session.attempt_user_move(
                    expected.origin(),
                    expected.destination(),
                    expected.promotion(),
                ) {
                    MoveOutcome::CorrectAwaitingReply(ticket) => {
                        session.play_opponent_reply(ticket).unwrap();
                    }
                    MoveOutcome::Completed => {}
                    outcome => panic!("unexpected outcome {outcome:?} for {record:?}"),
                }
            }
            assert_eq!(session.phase(), Phase::Solved, "{record:?}");
        }
    }

    proptest! {
        #[test]
        fn test_remaining_plies_decrease_to_zero_at_solved(
            line_len in 1usize..8,
            convention in prop_oneof![
                Just(LineConvention::SolverFirst),
                Just(LineConvention::OpponentFirst),
            ],
        ) {
            // Knights shuffling back and forth always have a legal line.
            let cycle = ["g1f3", "g8f6", "f3g1", "f6g8"];
            let min_len = if convention == LineConvention::OpponentFirst { 2 } else { 1 };
            let tokens = cycle.iter().cycle().take(line_len.max(min_len)).copied().collect::<Vec<_>>();

            let mut session = session(convention, FailurePolicy::Lock);
            session.begin(record(START, &tokens)).unwrap();

            let mut previous = session.remaining_plies();
            while session.phase() != Phase::Solved {
                prop_assert!(session.remaining_plies() > 0);
                let expected = session.remaining()[0];
                if let MoveOutcome::CorrectAwaitingReply(ticket) =
                    session.attempt_user_move(expected.origin(), expected.destination(), None)
                {
                    prop_assert!(session.remaining_plies() <= previous);
                    previous = session.remaining_plies();
                    session.play_opponent_reply(ticket).unwrap();
                }
                prop_assert!(session.remaining_plies() <= previous);
                previous = session.remaining_plies();
            }
            prop_assert_eq!(session.remaining_plies(), 0);
        }
    }
}

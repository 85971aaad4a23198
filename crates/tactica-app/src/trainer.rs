//! The trainer controller.
//!
//! [`Trainer`] owns the catalog, the selection cursor, the session, the
//! scheduler, and the board. It turns board gestures and due timers into
//! session calls and keeps the board and status messages in step.

use std::{mem, time::Instant};

use log::{debug, info, warn};
use rand::Rng;
use tactica_catalog::{
    Catalog, NoMatchingPuzzle, SelectorCursor, select_next, select_random_in_range,
};
use tactica_core::{Promotion, Square};
use tactica_session::{
    MoveOutcome, ReplyOutcome, ReplyTicket, RulesEngine, Session, SessionError, SessionStatus,
    ShakmatyEngine,
};

use crate::{
    board_view::{BoardView, DropResponse},
    scheduler::{Scheduler, Task},
    settings::{SelectionMode, Settings},
};

/// Shown while a puzzle whose position cannot be loaded is active.
const EMPTY_BOARD: &str = "8/8/8/8/8/8/8/8 w - - 0 1";

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum TrainerError {
    #[display("{_0}")]
    #[from]
    NoMatchingPuzzle(NoMatchingPuzzle),
    #[display("{_0}")]
    #[from]
    Session(SessionError),
}

#[derive(Debug)]
pub struct Trainer<B, R, E = ShakmatyEngine> {
    catalog: Catalog,
    cursor: SelectorCursor,
    session: Session<E>,
    scheduler: Scheduler<Task>,
    board: B,
    rng: R,
    settings: Settings,
    messages: Vec<String>,
}

impl<B, R> Trainer<B, R>
where
    B: BoardView,
    R: Rng,
{
    #[must_use]
    pub fn new(catalog: Catalog, settings: Settings, board: B, rng: R) -> Self {
        Self::with_engine(catalog, settings, board, rng, ShakmatyEngine::new())
    }
}

impl<B, R, E> Trainer<B, R, E>
where
    B: BoardView,
    R: Rng,
    E: RulesEngine,
{
    #[must_use]
    pub fn with_engine(catalog: Catalog, settings: Settings, board: B, rng: R, engine: E) -> Self {
        let session = Session::new(engine, settings.session.options());
        Self {
            catalog,
            cursor: SelectorCursor::BEFORE_FIRST,
            session,
            scheduler: Scheduler::new(),
            board,
            rng,
            settings,
            messages: Vec::new(),
        }
    }

    /// Selects and starts the next puzzle.
    ///
    /// Pending replies and advances of the previous puzzle are cancelled. If no
    /// puzzle matches, nothing changes and the previous puzzle stays active.
    pub fn next_puzzle(&mut self) -> Result<(), TrainerError> {
        let window = self.settings.selection.window();
        let (record, cursor) = match self.settings.selection.mode {
            SelectionMode::Random => {
                let selection =
                    select_random_in_range(&self.catalog, window.low, window.high, &mut self.rng);
                let picked = (selection.record.clone(), SelectorCursor::at(selection.index));
                if selection.fell_back {
                    self.notify(format!(
                        "no puzzle rated {}..={}, picking from the whole catalog",
                        window.low, window.high
                    ));
                }
                picked
            }
            SelectionMode::Sequential => {
                let selection = select_next(&self.catalog, self.cursor, |record| {
                    window.matches(record)
                })
                .inspect_err(|err| warn!("{err}"))?;
                (selection.record.clone(), selection.cursor)
            }
        };

        let cancelled = self.scheduler.cancel_all();
        if cancelled > 0 {
            debug!("cancelled {cancelled} pending tasks");
        }
        self.cursor = cursor;
        info!(
            "puzzle {} selected (rating {}, theme {})",
            record.id().unwrap_or("-"),
            record.rating(),
            record.theme().unwrap_or("-"),
        );

        let started = self.session.begin(record);
        if matches!(started, Err(SessionError::InvalidPosition(_))) {
            self.board.set_position(EMPTY_BOARD);
        } else {
            self.board.set_position(&self.session.position());
        }
        match started {
            Ok(()) => {
                self.board.set_orientation(self.session.solver_side());
                self.notify_status();
                Ok(())
            }
            Err(err) => {
                self.notify(format!("cannot start puzzle: {err}"));
                Err(err.into())
            }
        }
    }

    /// Handles a piece dropped from `origin` onto `destination`.
    pub fn on_drop(
        &mut self,
        origin: Square,
        destination: Square,
        promotion: Option<Promotion>,
        now: Instant,
    ) -> DropResponse {
        match self
            .session
            .attempt_user_move(origin, destination, promotion)
        {
            MoveOutcome::Ignored => DropResponse::Snapback,
            MoveOutcome::Illegal => {
                self.notify("illegal move");
                DropResponse::Snapback
            }
            MoveOutcome::Incorrect => {
                if self.session.phase().is_failed() {
                    self.notify_status();
                } else {
                    self.notify("wrong, try again");
                }
                DropResponse::Snapback
            }
            MoveOutcome::CorrectAwaitingReply(ticket) => {
                self.board.set_position(&self.session.position());
                self.scheduler.schedule(
                    now + self.settings.timing.reply_delay(),
                    Task::OpponentReply(ticket),
                );
                self.notify_status();
                DropResponse::Accept
            }
            MoveOutcome::Completed => {
                self.board.set_position(&self.session.position());
                self.on_solved(now);
                DropResponse::Accept
            }
        }
    }

    /// Runs every task due at `now`. Returns how many tasks ran.
    pub fn poll(&mut self, now: Instant) -> usize {
        let mut ran = 0;
        while let Some(task) = self.scheduler.pop_due(now) {
            ran += 1;
            match task {
                Task::OpponentReply(ticket) => self.play_reply(ticket, now),
                Task::AdvancePuzzle => {
                    if let Err(err) = self.next_puzzle() {
                        self.notify(err.to_string());
                    }
                }
            }
        }
        ran
    }

    fn play_reply(&mut self, ticket: ReplyTicket, now: Instant) {
        match self.session.play_opponent_reply(ticket) {
            Ok(ReplyOutcome::AwaitingUser(_)) => {
                self.board.set_position(&self.session.position());
                self.notify_status();
            }
            Ok(ReplyOutcome::Completed(played)) => {
                self.board.set_position(&self.session.position());
                self.notify(format!("opponent played {}", played.san));
                self.on_solved(now);
            }
            Err(SessionError::StaleReply) => {
                debug!("dropped stale reply for session {}", ticket.session());
            }
            Err(err) => {
                self.notify(format!("{err}"));
                self.notify_status();
            }
        }
    }

    fn on_solved(&mut self, now: Instant) {
        self.notify_status();
        self.scheduler
            .schedule(now + self.settings.timing.advance_delay(), Task::AdvancePuzzle);
    }

    /// Replaces the settings.
    ///
    /// Selection and timing changes apply from the next puzzle or scheduled
    /// task. The failure policy applies to the current puzzle; the line
    /// convention from the next one.
    pub fn set_settings(&mut self, settings: Settings) {
        self.session.set_options(settings.session.options());
        self.settings = settings;
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Turns the board around.
    pub fn flip(&mut self) {
        let side = self.board.orientation().opposite();
        self.board.set_orientation(side);
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.session.status()
    }

    /// Drains the status messages produced since the last call.
    pub fn take_messages(&mut self) -> Vec<String> {
        mem::take(&mut self.messages)
    }

    #[must_use]
    pub fn next_wakeup(&self) -> Option<Instant> {
        self.scheduler.next_due()
    }

    #[must_use]
    pub fn board(&self) -> &B {
        &self.board
    }

    #[must_use]
    pub fn session(&self) -> &Session<E> {
        &self.session
    }

    #[must_use]
    pub fn cursor(&self) -> SelectorCursor {
        self.cursor
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    fn notify(&mut self, message: impl Into<String>) {
        let message = message.into();
        debug!("status: {message}");
        self.messages.push(message);
    }

    fn notify_status(&mut self) {
        let status = self.session.status().to_string();
        self.notify(status);
    }
}

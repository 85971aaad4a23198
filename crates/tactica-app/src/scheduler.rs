use std::time::Instant;

use tactica_session::ReplyTicket;

/// Deferred work owned by the trainer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Play the scripted opponent reply.
    OpponentReply(ReplyTicket),
    /// Move on to the next puzzle after a solve.
    AdvancePuzzle,
}

/// A due-time ordered queue of tasks, polled by the event loop.
///
/// Tasks due at the same instant run in the order they were scheduled.
#[derive(Debug)]
pub struct Scheduler<T> {
    entries: Vec<Entry<T>>,
    next_seq: u64,
}

#[derive(Debug)]
struct Entry<T> {
    due: Instant,
    seq: u64,
    task: T,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_seq: 0,
        }
    }

    pub fn schedule(&mut self, due: Instant, task: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        let at = self
            .entries
            .partition_point(|entry| (entry.due, entry.seq) <= (due, seq));
        self.entries.insert(at, Entry { due, seq, task });
    }

    /// Removes and returns the earliest task due at or before `now`.
    pub fn pop_due(&mut self, now: Instant) -> Option<T> {
        if self.entries.first()?.due > now {
            return None;
        }
        Some(self.entries.remove(0).task)
    }

    #[must_use]
    pub fn next_due(&self) -> Option<Instant> {
        self.entries.first().map(|entry| entry.due)
    }

    pub fn cancel_all(&mut self) -> usize {
        let cancelled = self.entries.len();
        self.entries.clear();
        cancelled
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

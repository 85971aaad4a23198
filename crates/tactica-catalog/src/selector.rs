//! Puzzle selection.
//!
//! Two modes are provided:
//!
//! - [`select_next`] walks the catalog in insertion order from a cursor,
//!   wrapping once, and returns the first record accepted by a predicate.
//! - [`select_random_in_range`] draws uniformly among records within a rating
//!   window, falling back to the whole catalog when the window is empty.

use log::{debug, warn};
use rand::Rng;

use crate::{Catalog, PuzzleRecord};

/// The index of the last selected puzzle.
///
/// Starts [before the first record](SelectorCursor::BEFORE_FIRST) and is only
/// advanced by selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectorCursor(Option<usize>);

impl SelectorCursor {
    /// The cursor before any selection has happened.
    pub const BEFORE_FIRST: Self = Self(None);

    /// Creates a cursor pointing at `index`.
    #[must_use]
    pub const fn at(index: usize) -> Self {
        Self(Some(index))
    }

    /// Returns the last selected index, if any.
    #[must_use]
    pub const fn index(self) -> Option<usize> {
        self.0
    }
}

/// The result of a sequential selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection<'a> {
    /// The selected puzzle.
    pub record: &'a PuzzleRecord,
    /// The cursor to pass to the next selection.
    pub cursor: SelectorCursor,
}

/// No puzzle in a full cycle of the catalog satisfies the predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("no puzzle matches the current filter ({probed} candidates examined)")]
pub struct NoMatchingPuzzle {
    /// How many records were examined.
    pub probed: usize,
}

/// An inclusive rating range used as a selection filter.
///
/// # Examples
///
/// ```
/// use tactica_catalog::RatingWindow;
///
/// let window = RatingWindow::around(600, 200);
/// assert_eq!((window.low, window.high), (400, 800));
/// assert!(window.contains(650));
/// assert!(!window.contains(1400));
///
/// // The lower bound saturates at zero.
/// assert_eq!(RatingWindow::around(100, 200).low, 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatingWindow {
    /// Lowest accepted rating.
    pub low: u32,
    /// Highest accepted rating.
    pub high: u32,
}

impl RatingWindow {
    /// Creates a window from explicit bounds.
    #[must_use]
    pub const fn new(low: u32, high: u32) -> Self {
        Self { low, high }
    }

    /// Creates the window `target ± tolerance`, clamped at zero.
    #[must_use]
    pub const fn around(target: u32, tolerance: u32) -> Self {
        Self {
            low: target.saturating_sub(tolerance),
            high: target.saturating_add(tolerance),
        }
    }

    /// Creates the window `0..=max`.
    #[must_use]
    pub const fn at_most(max: u32) -> Self {
        Self { low: 0, high: max }
    }

    /// Returns whether `rating` lies within the window.
    #[must_use]
    pub const fn contains(self, rating: u32) -> bool {
        self.low <= rating && rating <= self.high
    }

    /// Returns whether the record's rating lies within the window.
    #[must_use]
    pub fn matches(self, record: &PuzzleRecord) -> bool {
        self.contains(record.rating())
    }
}

/// Selects the next puzzle after `cursor` that satisfies `predicate`.
///
/// The scan starts at `cursor + 1` and wraps around the end of the catalog.
/// From [`SelectorCursor::BEFORE_FIRST`] every record is examined; otherwise
/// every record except the one under the cursor is, so the current puzzle is
/// never served twice in a row. At most [`Catalog::size`] records are probed.
///
/// # Errors
///
/// Returns [`NoMatchingPuzzle`] if no examined record satisfies `predicate`.
///
/// # Examples
///
/// ```
/// use tactica_catalog::{Catalog, PuzzleRecord, RatingWindow, SelectorCursor, select_next};
///
/// let fen = "8/8/8/8/8/8/8/K6k w - - 0 1";
/// let catalog = Catalog::from_records(vec![
///     PuzzleRecord::from_tokens(fen, ["a1a2"], 1200).unwrap(),
///     PuzzleRecord::from_tokens(fen, ["a1b1"], 500).unwrap(),
/// ])
/// .unwrap();
///
/// let window = RatingWindow::at_most(800);
/// let selection =
///     select_next(&catalog, SelectorCursor::BEFORE_FIRST, |r| window.matches(r)).unwrap();
/// assert_eq!(selection.record.rating(), 500);
/// assert_eq!(selection.cursor, SelectorCursor::at(1));
/// ```
pub fn select_next<P>(
    catalog: &Catalog,
    cursor: SelectorCursor,
    mut predicate: P,
) -> Result<Selection<'_>, NoMatchingPuzzle>
where
    P: FnMut(&PuzzleRecord) -> bool,
{
    let size = catalog.size();
    let (start, budget) = match cursor.index() {
        None => (0, size),
        Some(index) => ((index % size + 1) % size, size - 1),
    };

    for offset in 0..budget {
        let index = (start + offset) % size;
        let Ok(record) = catalog.at(index) else {
            continue;
        };
        if predicate(record) {
            debug!("selected puzzle #{index} after {} probes", offset + 1);
            return Ok(Selection {
                record,
                cursor: SelectorCursor::at(index),
            });
        }
    }

    Err(NoMatchingPuzzle { probed: budget })
}

/// The result of a random selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RandomSelection<'a> {
    /// The selected puzzle.
    pub record: &'a PuzzleRecord,
    /// Its catalog index.
    pub index: usize,
    /// Whether no puzzle was in range and the whole catalog was used instead.
    pub fell_back: bool,
}

/// Picks a puzzle uniformly at random among those rated within `low..=high`.
///
/// If the range is empty, the pick is made over the whole catalog and
/// [`RandomSelection::fell_back`] is set.
pub fn select_random_in_range<'a, R>(
    catalog: &'a Catalog,
    low: u32,
    high: u32,
    rng: &mut R,
) -> RandomSelection<'a>
where
    R: Rng + ?Sized,
{
    let window = RatingWindow::new(low, high);
    let mut candidates = catalog
        .iter()
        .enumerate()
        .filter(|(_, record)| window.matches(record))
        .collect::<Vec<_>>();

    let fell_back = candidates.is_empty();
    if fell_back {
        warn!("no puzzle rated {low}..={high}; choosing from the whole catalog");
        candidates = catalog.iter().enumerate().collect();
    }

    let (index, record) = candidates[rng.random_range(0..candidates.len())];
    debug!(
        "randomly selected puzzle #{index} (rating {}) from {} candidates",
        record.rating(),
        candidates.len()
    );
    RandomSelection {
        record,
        index,
        fell_back,
    }
}

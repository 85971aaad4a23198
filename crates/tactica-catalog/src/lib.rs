//! Puzzle catalog: records, ingestion, and selection.
//!
//! - [`record`]: the immutable [`PuzzleRecord`]
//! - [`source`]: adapters that normalize puzzle data files into records
//! - [`catalog`]: the validated, ordered [`Catalog`]
//! - [`selector`]: sequential and random puzzle selection
//!
//! # Examples
//!
//! ```
//! use tactica_catalog::{SelectorCursor, select_next, source};
//!
//! let catalog = source::starter_catalog().unwrap();
//! let selection = select_next(&catalog, SelectorCursor::BEFORE_FIRST, |r| r.rating() < 1000).unwrap();
//! assert!(selection.record.rating() < 1000);
//! ```

pub mod catalog;
pub mod record;
pub mod selector;
pub mod source;

pub use self::{
    catalog::{Catalog, CatalogError, ValidationPolicy},
    record::{PuzzleRecord, RecordDefect},
    selector::{
        NoMatchingPuzzle, RandomSelection, RatingWindow, Selection, SelectorCursor, select_next,
        select_random_in_range,
    },
    source::{LoadError, RawRecord, SourceFormat},
};

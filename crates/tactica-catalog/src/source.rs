//! Ingestion of puzzle data files.
//!
//! Puzzle data arrives as a JSON array in one of two shapes:
//!
//! - **Embedded**: `{ "fen", "full_solution_uci": [..], "rating", "theme"? }`
//! - **Lichess**: `{ "PuzzleId"?, "FEN", "Moves": "e2e4 e7e5", "Rating", "Themes"? }`
//!
//! Each shape has its own adapter that produces a [`RawRecord`]; nothing past
//! this module looks at source field names.

use std::{
    fs,
    io,
    path::{Path, PathBuf},
};

use log::{debug, info};
use serde::Deserialize;
use serde_json::Value;

use crate::{Catalog, CatalogError, PuzzleRecord, RecordDefect, ValidationPolicy};

const STARTER_DATA: &str = include_str!("../data/starter.json");

/// A puzzle record as read from a source, before validation.
///
/// Every field is optional so that missing data can be reported per record
/// instead of failing the whole document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    /// Source identifier.
    pub id: Option<String>,
    /// Starting position in FEN.
    pub position: Option<String>,
    /// Solution tokens, already split.
    pub moves: Option<Vec<String>>,
    /// Difficulty rating.
    pub rating: Option<u32>,
    /// Descriptive theme.
    pub theme: Option<String>,
    /// Set when the source record could not be read into the fields above.
    pub unreadable: Option<String>,
}

impl RawRecord {
    /// Validates the record and converts it into a [`PuzzleRecord`].
    ///
    /// # Errors
    ///
    /// Returns the first [`RecordDefect`] found.
    pub fn into_record(self) -> Result<PuzzleRecord, RecordDefect> {
        if let Some(message) = self.unreadable {
            return Err(RecordDefect::InvalidField { message });
        }
        let position = self.position.ok_or(RecordDefect::MissingPosition)?;
        let moves = self.moves.ok_or(RecordDefect::MissingMoves)?;
        let rating = self.rating.ok_or(RecordDefect::MissingRating)?;
        let mut record = PuzzleRecord::from_tokens(position, moves, rating)?;
        if let Some(id) = self.id {
            record = record.with_id(id);
        }
        if let Some(theme) = self.theme.filter(|theme| !theme.trim().is_empty()) {
            record = record.with_theme(theme);
        }
        Ok(record)
    }
}

#[derive(Debug, Deserialize)]
struct EmbeddedRecord {
    fen: Option<String>,
    full_solution_uci: Option<Vec<String>>,
    rating: Option<u32>,
    theme: Option<String>,
}

impl From<EmbeddedRecord> for RawRecord {
    fn from(record: EmbeddedRecord) -> Self {
        Self {
            id: None,
            position: record.fen,
            moves: record.full_solution_uci,
            rating: record.rating,
            theme: record.theme,
            unreadable: None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct LichessRecord {
    puzzle_id: Option<String>,
    #[serde(rename = "FEN")]
    fen: Option<String>,
    moves: Option<String>,
    rating: Option<u32>,
    themes: Option<String>,
}

impl From<LichessRecord> for RawRecord {
    fn from(record: LichessRecord) -> Self {
        Self {
            id: record.puzzle_id,
            position: record.fen,
            moves: record
                .moves
                .map(|moves| moves.split_whitespace().map(str::to_owned).collect()),
            rating: record.rating,
            theme: record.themes,
            unreadable: None,
        }
    }
}

/// The shape of a puzzle data document.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum SourceFormat {
    /// Detect the shape from the keys of the first record.
    #[default]
    Auto,
    /// Lowercase `fen` / `full_solution_uci` / `rating` / `theme` records.
    Embedded,
    /// Lichess-style `FEN` / `Moves` / `Rating` records.
    Lichess,
}

#[derive(Debug, Clone, Copy)]
enum Shape {
    Embedded,
    Lichess,
}

impl Shape {
    fn resolve(format: SourceFormat, records: &[Value]) -> Result<Self, LoadError> {
        match format {
            SourceFormat::Embedded => Ok(Self::Embedded),
            SourceFormat::Lichess => Ok(Self::Lichess),
            SourceFormat::Auto => Self::detect(records),
        }
    }

    fn detect(records: &[Value]) -> Result<Self, LoadError> {
        let Some(first) = records.first() else {
            return Ok(Self::Embedded);
        };
        let Some(object) = first.as_object() else {
            return Err(LoadError::UnknownFormat);
        };
        if object.contains_key("fen") || object.contains_key("full_solution_uci") {
            Ok(Self::Embedded)
        } else if object.contains_key("FEN") || object.contains_key("Moves") {
            Ok(Self::Lichess)
        } else {
            Err(LoadError::UnknownFormat)
        }
    }
}

/// Errors raised while loading puzzle data.
///
/// `Read`, `Parse`, and `UnknownFormat` mean the data could not be ingested at
/// all; `Catalog` means it was ingested but did not form a usable catalog.
#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum LoadError {
    /// The data file could not be read.
    #[display("cannot read puzzle data {}: {source}", path.display())]
    Read {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// The data is not valid JSON of the expected shape.
    #[display("cannot parse puzzle data: {_0}")]
    #[from]
    Parse(serde_json::Error),
    /// The record shape could not be recognized.
    #[display("unrecognized puzzle data format")]
    UnknownFormat,
    /// The records did not form a usable catalog.
    #[display("{_0}")]
    #[from]
    Catalog(CatalogError),
}

/// Parses a JSON document into raw records.
///
/// A record whose fields have the wrong types does not fail the document; it
/// comes back with [`RawRecord::unreadable`] set so that validation can report
/// it by index.
///
/// # Errors
///
/// Returns [`LoadError::Parse`] if the document is not a JSON array, or
/// [`LoadError::UnknownFormat`] if auto-detection fails.
pub fn parse_records(json: &str, format: SourceFormat) -> Result<Vec<RawRecord>, LoadError> {
    let values: Vec<Value> = serde_json::from_str(json)?;
    let shape = Shape::resolve(format, &values)?;
    debug!("parsing {} puzzle records as {shape:?}", values.len());

    let records = values
        .into_iter()
        .map(|value| {
            let raw = match shape {
                Shape::Embedded => {
                    serde_json::from_value::<EmbeddedRecord>(value).map(RawRecord::from)
                }
                Shape::Lichess => {
                    serde_json::from_value::<LichessRecord>(value).map(RawRecord::from)
                }
            };
            raw.unwrap_or_else(|err| RawRecord {
                unreadable: Some(err.to_string()),
                ..RawRecord::default()
            })
        })
        .collect();
    Ok(records)
}

/// Parses and validates a JSON document into a catalog.
///
/// # Errors
///
/// Returns any error of [`parse_records`] or [`Catalog::load`].
pub fn load_str(
    json: &str,
    format: SourceFormat,
    policy: ValidationPolicy,
) -> Result<Catalog, LoadError> {
    let records = parse_records(json, format)?;
    Ok(Catalog::load(records, policy)?)
}

/// Reads, parses, and validates a puzzle data file.
///
/// # Errors
///
/// Returns [`LoadError::Read`] if the file cannot be read, or any error of
/// [`load_str`].
pub fn load_path(
    path: &Path,
    format: SourceFormat,
    policy: ValidationPolicy,
) -> Result<Catalog, LoadError> {
    let json = fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_owned(),
        source,
    })?;
    let catalog = load_str(&json, format, policy)?;
    info!("loaded {} puzzles from {}", catalog.size(), path.display());
    Ok(catalog)
}

/// Returns the bundled starter catalog.
///
/// # Errors
///
/// Propagates [`load_str`] errors; the bundled data is expected to load.
pub fn starter_catalog() -> Result<Catalog, LoadError> {
    load_str(STARTER_DATA, SourceFormat::Embedded, ValidationPolicy::RejectAll)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_shape() {
        let json = r#"[
            {"fen": "8/8/8/8/8/8/8/K6k w - - 0 1", "full_solution_uci": ["a1a2", "h1h2"], "rating": 700, "theme": "Kings"}
        ]"#;
        let records = parse_records(json, SourceFormat::Auto).unwrap();
        assert_eq!(
            records,
            [RawRecord {
                id: None,
                position: Some("8/8/8/8/8/8/8/K6k w - - 0 1".to_owned()),
                moves: Some(vec!["a1a2".to_owned(), "h1h2".to_owned()]),
                rating: Some(700),
                theme: Some("Kings".to_owned()),
                unreadable: None,
            }]
        );
    }

    #[test]
    fn test_lichess_shape_splits_moves() {
        let json = r#"[
            {"PuzzleId": "00sHx", "FEN": "8/8/8/8/8/8/8/K6k w - - 0 1", "Moves": "a1a2  h1h2 a2a3", "Rating": 1500, "Themes": "endgame short"}
        ]"#;
        let catalog = load_str(json, SourceFormat::Auto, ValidationPolicy::RejectAll).unwrap();
        let record = catalog.at(0).unwrap();
        assert_eq!(record.id(), Some("00sHx"));
        assert_eq!(record.solution().len(), 3);
        assert_eq!(record.rating(), 1500);
        assert_eq!(record.theme(), Some("endgame short"));
    }

    #[test]
    fn test_explicit_format_ignores_other_shape() {
        // Lowercase keys read as Lichess records have no fields at all.
        let json = r#"[{"fen": "8/8/8/8/8/8/8/K6k w - - 0 1", "full_solution_uci": ["a1a2"], "rating": 1}]"#;
        let result = load_str(json, SourceFormat::Lichess, ValidationPolicy::RejectAll);
        assert!(matches!(
            result,
            Err(LoadError::Catalog(CatalogError::InvalidRecord {
                index: 0,
                defect: RecordDefect::MissingPosition,
            }))
        ));
    }

    #[test]
    fn test_load_failures_are_distinct_from_catalog_errors() {
        assert!(matches!(
            load_str("not json", SourceFormat::Auto, ValidationPolicy::RejectAll),
            Err(LoadError::Parse(_))
        ));
        assert!(matches!(
            load_str(r#"[{"x": 1}]"#, SourceFormat::Auto, ValidationPolicy::RejectAll),
            Err(LoadError::UnknownFormat)
        ));
        assert!(matches!(
            load_str("[]", SourceFormat::Auto, ValidationPolicy::RejectAll),
            Err(LoadError::Catalog(CatalogError::EmptyCatalog))
        ));
        assert!(matches!(
            load_path(
                Path::new("/nonexistent/tactica/puzzles.json"),
                SourceFormat::Auto,
                ValidationPolicy::RejectAll
            ),
            Err(LoadError::Read { .. })
        ));
    }

    #[test]
    fn test_wrongly_typed_record_is_reported_by_index() {
        let json = r#"[
            {"fen": "8/8/8/8/8/8/8/K6k w - - 0 1", "full_solution_uci": ["a1a2"], "rating": 700},
            {"fen": "8/8/8/8/8/8/8/K6k w - - 0 1", "full_solution_uci": ["a1a2"], "rating": "1500"},
            {"fen": "8/8/8/8/8/8/8/K6k w - - 0 1", "full_solution_uci": "a1a2", "rating": 900}
        ]"#;

        let catalog = load_str(json, SourceFormat::Auto, ValidationPolicy::SkipInvalid).unwrap();
        assert_eq!(catalog.size(), 1);
        assert_eq!(catalog.at(0).unwrap().rating(), 700);

        let result = load_str(json, SourceFormat::Auto, ValidationPolicy::RejectAll);
        assert!(matches!(
            result,
            Err(LoadError::Catalog(CatalogError::InvalidRecord {
                index: 1,
                defect: RecordDefect::InvalidField { .. },
            }))
        ));
    }

    #[test]
    fn test_wrongly_typed_lichess_moves() {
        let json = r#"[
            {"FEN": "8/8/8/8/8/8/8/K6k w - - 0 1", "Moves": ["a1a2"], "Rating": 1500},
            {"FEN": "8/8/8/8/8/8/8/K6k w - - 0 1", "Moves": "a1a2", "Rating": 1500.0}
        ]"#;
        let records = parse_records(json, SourceFormat::Lichess).unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|raw| raw.unreadable.is_some()));
        assert!(matches!(
            load_str(json, SourceFormat::Lichess, ValidationPolicy::SkipInvalid),
            Err(LoadError::Catalog(CatalogError::EmptyCatalog))
        ));
    }

    #[test]
    fn test_blank_theme_is_dropped() {
        let raw = RawRecord {
            position: Some("8/8/8/8/8/8/8/K6k w - - 0 1".to_owned()),
            moves: Some(vec!["a1a2".to_owned()]),
            rating: Some(1),
            theme: Some("  ".to_owned()),
            ..RawRecord::default()
        };
        assert_eq!(raw.into_record().unwrap().theme(), None);
    }

    #[test]
    fn test_starter_catalog_loads() {
        let catalog = starter_catalog().unwrap();
        assert_eq!(catalog.size(), 6);
        assert!(catalog.iter().all(|record| record.theme().is_some()));
    }
}

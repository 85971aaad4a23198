use log::warn;

use crate::{PuzzleRecord, RawRecord, RecordDefect};

/// How [`Catalog::load`] treats records that fail validation.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum ValidationPolicy {
    /// Fail on the first invalid record.
    #[default]
    RejectAll,
    /// Drop invalid records with a warning and keep the rest.
    SkipInvalid,
}

/// Errors raised while building or indexing a catalog.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum CatalogError {
    /// No usable records were supplied.
    #[display("puzzle catalog is empty")]
    EmptyCatalog,
    /// A record failed validation.
    #[display("invalid puzzle record #{index}: {defect}")]
    InvalidRecord {
        /// Zero-based position of the record in the source.
        index: usize,
        /// What is wrong with it.
        #[error(source)]
        defect: RecordDefect,
    },
    /// An index past the end of the catalog was requested.
    #[display("puzzle index {index} out of range (catalog size {size})")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// The catalog size.
        size: usize,
    },
}

/// An ordered, non-empty collection of puzzles.
///
/// Insertion order is preserved and drives sequential selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    records: Vec<PuzzleRecord>,
}

impl Catalog {
    /// Validates raw records and builds a catalog.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidRecord`] for the first invalid record under
    /// [`ValidationPolicy::RejectAll`], and [`CatalogError::EmptyCatalog`] if no
    /// record survives validation.
    pub fn load<I>(raw_records: I, policy: ValidationPolicy) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = RawRecord>,
    {
        let mut records = Vec::new();
        for (index, raw) in raw_records.into_iter().enumerate() {
            match raw.into_record() {
                Ok(record) => records.push(record),
                Err(defect) => match policy {
                    ValidationPolicy::RejectAll => {
                        return Err(CatalogError::InvalidRecord { index, defect });
                    }
                    ValidationPolicy::SkipInvalid => {
                        warn!("skipping puzzle record #{index}: {defect}");
                    }
                },
            }
        }
        Self::from_records(records)
    }

    /// Builds a catalog from already validated records.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::EmptyCatalog`] if `records` is empty.
    pub fn from_records(records: Vec<PuzzleRecord>) -> Result<Self, CatalogError> {
        if records.is_empty() {
            return Err(CatalogError::EmptyCatalog);
        }
        Ok(Self { records })
    }

    /// Returns the number of puzzles. Always at least one.
    #[must_use]
    pub fn size(&self) -> usize {
        self.records.len()
    }

    /// Returns the puzzle at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::IndexOutOfRange`] if `index >= self.size()`.
    pub fn at(&self, index: usize) -> Result<&PuzzleRecord, CatalogError> {
        self.records
            .get(index)
            .ok_or(CatalogError::IndexOutOfRange {
                index,
                size: self.size(),
            })
    }

    /// Iterates over the puzzles in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, PuzzleRecord> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a PuzzleRecord;
    type IntoIter = std::slice::Iter<'a, PuzzleRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

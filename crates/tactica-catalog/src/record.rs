use tactica_core::{MalformedToken, Move};

/// A puzzle: a starting position and the scripted line that solves it.
///
/// Records are immutable once built. The constructor guarantees a non-empty
/// position string and a non-empty solution line.
///
/// # Example
///
/// ```
/// use tactica_catalog::PuzzleRecord;
///
/// let record = PuzzleRecord::from_tokens(
///     "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
///     ["e2e4", "e7e5"],
///     800,
/// )
/// .unwrap()
/// .with_theme("Opening");
///
/// assert_eq!(record.solution().len(), 2);
/// assert_eq!(record.theme(), Some("Opening"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PuzzleRecord {
    id: Option<String>,
    position: String,
    solution: Vec<Move>,
    rating: u32,
    theme: Option<String>,
}

/// Reasons a puzzle record is rejected.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum RecordDefect {
    /// The record has no position, or the position is blank.
    #[display("missing position")]
    MissingPosition,
    /// The record has no move list.
    #[display("missing move list")]
    MissingMoves,
    /// The move list is present but empty.
    #[display("empty move list")]
    EmptyMoves,
    /// The record has no rating.
    #[display("missing rating")]
    MissingRating,
    /// A field holds a value of the wrong type.
    #[display("invalid field: {message}")]
    InvalidField {
        /// What the reader rejected.
        message: String,
    },
    /// A move token could not be parsed.
    #[display("malformed move token {token:?}: {source}")]
    MalformedMove {
        /// The token as it appeared in the source.
        token: String,
        /// Why the token was rejected.
        source: MalformedToken,
    },
}

impl PuzzleRecord {
    /// Creates a record from a position and a parsed solution line.
    ///
    /// # Errors
    ///
    /// Returns [`RecordDefect::MissingPosition`] if `position` is blank and
    /// [`RecordDefect::EmptyMoves`] if `solution` is empty.
    pub fn new(
        position: impl Into<String>,
        solution: Vec<Move>,
        rating: u32,
    ) -> Result<Self, RecordDefect> {
        let position = position.into();
        if position.trim().is_empty() {
            return Err(RecordDefect::MissingPosition);
        }
        if solution.is_empty() {
            return Err(RecordDefect::EmptyMoves);
        }
        Ok(Self {
            id: None,
            position: position.trim().to_owned(),
            solution,
            rating,
            theme: None,
        })
    }

    /// Creates a record from a position and solution tokens.
    ///
    /// # Errors
    ///
    /// Returns [`RecordDefect::MalformedMove`] for the first token that fails to
    /// parse, or any error of [`PuzzleRecord::new`].
    pub fn from_tokens<I, S>(
        position: impl Into<String>,
        tokens: I,
        rating: u32,
    ) -> Result<Self, RecordDefect>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let solution = tokens
            .into_iter()
            .map(|token| {
                let token = token.as_ref();
                token.parse().map_err(|source| RecordDefect::MalformedMove {
                    token: token.to_owned(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(position, solution, rating)
    }

    /// Attaches a source identifier.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Attaches a descriptive theme.
    #[must_use]
    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = Some(theme.into());
        self
    }

    /// Returns the source identifier, if the source provided one.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Returns the starting position in FEN.
    #[must_use]
    pub fn position(&self) -> &str {
        &self.position
    }

    /// Returns the full solution line.
    #[must_use]
    pub fn solution(&self) -> &[Move] {
        &self.solution
    }

    /// Returns the difficulty rating.
    #[must_use]
    pub fn rating(&self) -> u32 {
        self.rating
    }

    /// Returns the theme, if any.
    #[must_use]
    pub fn theme(&self) -> Option<&str> {
        self.theme.as_deref()
    }
}

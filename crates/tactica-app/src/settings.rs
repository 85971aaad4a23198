//! Trainer settings.
//!
//! Settings come from an optional JSON file and are then overridden by
//! command-line flags. Every field has a default, so a settings file only
//! needs to name what it changes.

use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};
use tactica_catalog::RatingWindow;
use tactica_session::{FailurePolicy, LineConvention, SessionOptions};

/// Rating used when no player rating is known.
pub const GUEST_RATING: u32 = 600;

/// Rating used to simulate a signed-in player.
pub const SIMULATED_USER_RATING: u32 = 1500;

/// Accepted distance between a puzzle rating and the target rating.
pub const RATING_TOLERANCE: u32 = 200;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub selection: SelectionSettings,
    pub session: SessionSettings,
    pub timing: TimingSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionSettings {
    pub mode: SelectionMode,
    pub target_rating: u32,
    pub tolerance: u32,
}

impl Default for SelectionSettings {
    fn default() -> Self {
        Self {
            mode: SelectionMode::default(),
            target_rating: GUEST_RATING,
            tolerance: RATING_TOLERANCE,
        }
    }
}

impl SelectionSettings {
    #[must_use]
    pub fn window(&self) -> RatingWindow {
        RatingWindow::around(self.target_rating, self.tolerance)
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    derive_more::IsVariant,
)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionMode {
    /// Uniformly random among puzzles in the rating window.
    #[default]
    Random,
    /// Catalog order, skipping puzzles outside the rating window.
    Sequential,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    pub line: LineStart,
    pub on_wrong: OnWrong,
}

impl SessionSettings {
    #[must_use]
    pub fn options(&self) -> SessionOptions {
        SessionOptions::default()
            .convention(self.line.into())
            .failure_policy(self.on_wrong.into())
    }
}

/// Who plays the first move of a solution line.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum LineStart {
    /// The first move is the opponent's setup move.
    #[default]
    Opponent,
    /// The first move is the solver's.
    Solver,
}

impl From<LineStart> for LineConvention {
    fn from(line: LineStart) -> Self {
        match line {
            LineStart::Opponent => Self::OpponentFirst,
            LineStart::Solver => Self::SolverFirst,
        }
    }
}

/// What happens after a wrong move.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum OnWrong {
    /// Take the move back and try again.
    #[default]
    Retry,
    /// Take the move back and fail the puzzle.
    Lock,
}

impl From<OnWrong> for FailurePolicy {
    fn from(on_wrong: OnWrong) -> Self {
        match on_wrong {
            OnWrong::Retry => Self::Retry,
            OnWrong::Lock => Self::Lock,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingSettings {
    pub reply_delay_ms: u64,
    pub advance_delay_ms: u64,
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            reply_delay_ms: 500,
            advance_delay_ms: 5000,
        }
    }
}

impl TimingSettings {
    #[must_use]
    pub fn reply_delay(&self) -> Duration {
        Duration::from_millis(self.reply_delay_ms)
    }

    #[must_use]
    pub fn advance_delay(&self) -> Duration {
        Duration::from_millis(self.advance_delay_ms)
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum SettingsError {
    #[display("cannot read settings {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[display("cannot parse settings {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl Settings {
    pub fn from_path(path: &Path) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_owned(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|source| SettingsError::Parse {
            path: path.to_owned(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.selection.mode, SelectionMode::Random);
        assert_eq!(settings.selection.window(), RatingWindow::new(400, 800));
        assert_eq!(settings.timing.reply_delay(), Duration::from_millis(500));
        assert_eq!(settings.timing.advance_delay(), Duration::from_secs(5));

        let options = settings.session.options();
        assert_eq!(options.convention, LineConvention::OpponentFirst);
        assert_eq!(options.failure_policy, FailurePolicy::Retry);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let json = r#"{
            "selection": { "mode": "sequential", "target_rating": 1500 },
            "session": { "on_wrong": "lock" }
        }"#;
        let settings: Settings = serde_json::from_str(json).unwrap();
        assert!(settings.selection.mode.is_sequential());
        assert_eq!(settings.selection.target_rating, SIMULATED_USER_RATING);
        assert_eq!(settings.selection.tolerance, RATING_TOLERANCE);
        assert_eq!(settings.session.line, LineStart::Opponent);
        assert_eq!(settings.session.on_wrong, OnWrong::Lock);
        assert_eq!(settings.timing, TimingSettings::default());
    }

    #[test]
    fn test_missing_settings_file() {
        let result = Settings::from_path(Path::new("/nonexistent/tactica/settings.json"));
        assert!(matches!(result, Err(SettingsError::Read { .. })));
    }
}

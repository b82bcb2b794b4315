//! Error types for key2pane.
//!
//! All errors in key2pane are represented by [`Key2PaneError`], which covers
//! configuration issues, settings resolution, tmux failures, and action
//! selection problems.

use crate::tmux::PaneTarget;
use std::path::PathBuf;
use thiserror::Error;

/// Underlying parser failure for a config document.
#[derive(Error, Debug)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed.
    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    /// The document parsed, but is not a key/value mapping.
    #[error("expected a mapping at the top level")]
    NotAMapping,

    /// A known setting has a value of the wrong type.
    #[error("invalid value for `{key}`: {source}")]
    InvalidSetting {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure of a single tmux invocation.
#[derive(Error, Debug)]
pub enum TmuxError {
    /// tmux ran but exited unsuccessfully.
    #[error("tmux command failed: {0}")]
    CommandFailed(String),

    /// tmux could not be started.
    #[error("failed to run tmux: {0}")]
    Io(#[from] std::io::Error),
}

/// All possible errors that can occur in key2pane.
#[derive(Error, Debug)]
pub enum Key2PaneError {
    /// Config file does not exist at the given path.
    #[error("Config file not found: {0}")]
    ConfigNotFound(PathBuf),

    /// Config file exists but could not be parsed.
    #[error("Invalid config file {path}: {source}")]
    ConfigInvalid {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    /// Merging all setting layers left required fields unset.
    #[error("Incomplete settings, missing: {}", .0.join(", "))]
    SettingsIncomplete(Vec<&'static str>),

    /// Asking tmux about a pane failed.
    #[error("Pane query failed: {0}")]
    PaneQueryFailed(String),

    /// No pane with the requested index exists in the session/window.
    #[error("Pane not found: {0}")]
    PaneNotFound(PaneTarget),

    /// `tmux send-keys` failed.
    #[error("Sending keys to pane {target} failed: {reason}")]
    PaneSendFailed { target: PaneTarget, reason: String },

    /// No configured action matches the pane's command.
    #[error("No action matched command: {0:?}")]
    NoActionMatched(String),

    /// More than one configured action matches the pane's command.
    #[error(
        "Ambiguous action for command {command:?}, matching patterns: {}",
        .patterns.join(", ")
    )]
    AmbiguousAction {
        command: String,
        patterns: Vec<String>,
    },

    /// A keystroke template references a positional argument that was not given.
    #[error("Insufficient arguments for keys {keys:?}: {supplied} supplied")]
    InsufficientArguments { keys: String, supplied: usize },

    /// Could not determine the user's config directory.
    #[error("Could not determine config directory")]
    NoConfigDir,

    /// Unexpected I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Key2PaneError {
    /// Whether this error is an expected, user-facing condition.
    ///
    /// Anything else points at a defect or a broken environment and is
    /// reported with full detail.
    pub fn is_expected(&self) -> bool {
        !matches!(self, Key2PaneError::NoConfigDir | Key2PaneError::Io(_))
    }
}

/// Convenient Result type alias for key2pane operations.
pub type Result<T> = std::result::Result<T, Key2PaneError>;

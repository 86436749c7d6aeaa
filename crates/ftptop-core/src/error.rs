use std::path::PathBuf;
use thiserror::Error;

/// Failure to open or validate the scoreboard for one scan.
///
/// `BadMagic`, `OlderVersion` and `NewerVersion` are format errors: the file
/// exists but does not carry a layout this reader understands. They are
/// recoverable per refresh cycle.
#[derive(Error, Debug)]
pub enum ScoreboardError {
    /// The scoreboard could not be opened or its header could not be read.
    #[error("unable to open scoreboard {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The header is truncated or its magic number does not match.
    #[error("scoreboard is corrupted or old (magic {found:#010x})")]
    BadMagic { found: u32 },

    /// The header version predates the supported layout.
    #[error("scoreboard is too old (version {found:#010x}, supported {supported:#010x})")]
    OlderVersion { found: u32, supported: u32 },

    /// The header version is newer than the supported layout.
    #[error("scoreboard is too new (version {found:#010x}, supported {supported:#010x})")]
    NewerVersion { found: u32, supported: u32 },
}

impl ScoreboardError {
    /// `true` for the format-mismatch kinds (magic or version).
    pub fn is_format_error(&self) -> bool {
        !matches!(self, ScoreboardError::Io { .. })
    }

    /// Short label for the status line.
    pub fn short_label(&self) -> &'static str {
        match self {
            ScoreboardError::Io { .. } => "unreadable",
            ScoreboardError::BadMagic { .. } => "corrupted",
            ScoreboardError::OlderVersion { .. } => "too old",
            ScoreboardError::NewerVersion { .. } => "too new",
        }
    }
}

/// All errors produced by ftptop.
#[derive(Error, Debug)]
pub enum FtptopError {
    /// A command-line value is invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The scoreboard path cannot be reached at startup.
    #[error("unable to stat '{path}': {source}")]
    ScoreboardUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A scan-level scoreboard failure.
    #[error(transparent)]
    Scoreboard(#[from] ScoreboardError),

    /// The terminal cannot be used for the dashboard.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the ftptop crates.
pub type Result<T> = std::result::Result<T, FtptopError>;

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Directory bootstrap ────────────────────────────────────────────────────────

/// `~/.ftptop`, or `./.ftptop` when no home directory is known.
pub fn ftptop_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".ftptop")
}

/// Where logs go when `--log-file` is not given.
pub fn default_log_path() -> PathBuf {
    ftptop_dir().join("logs").join("ftptop.log")
}

/// Ensure `~/.ftptop/logs/` exists.
pub fn ensure_directories() -> anyhow::Result<()> {
    fs::create_dir_all(ftptop_dir().join("logs"))?;
    Ok(())
}

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a `--log-level` name to an [`EnvFilter`] directive.
pub fn level_directive(log_level: &str) -> &'static str {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug",
        "INFO" => "info",
        "ERROR" => "error",
        _ => "warn",
    }
}

/// Open `path` for appending, creating it and its parent directories.
fn open_log_file(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Where to write logs: `log_file` as given, or the default path with its
/// directory created. `~/.ftptop` is only touched in the second case.
pub fn resolve_log_path(log_file: Option<&Path>) -> anyhow::Result<PathBuf> {
    match log_file {
        Some(path) => Ok(path.to_path_buf()),
        None => {
            ensure_directories()?;
            Ok(default_log_path())
        }
    }
}

/// Initialise the global `tracing` subscriber.
///
/// The dashboard owns the terminal, so events are written to `log_file`
/// (default [`default_log_path`]) rather than stderr.
pub fn setup_logging(log_level: &str, log_file: Option<&Path>) -> anyhow::Result<()> {
    let path = resolve_log_path(log_file)?;
    let file = open_log_file(&path)?;

    let filter = EnvFilter::try_new(level_directive(log_level))?;
    let layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()?;

    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────────────────────

use clap::parser::ValueSource;
use clap::{ArgAction, ArgMatches, CommandFactory, FromArgMatches, Parser};
use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::FtptopError;
use crate::models::DisplayFilter;

/// Scoreboard location used when neither `-f` nor `FTPTOP_SCOREBOARD` is set.
pub const DEFAULT_SCOREBOARD_PATH: &str = "/var/run/proftpd.scoreboard";

/// Product/version string printed by `-V` and shown in the dashboard header.
pub const VERSION: &str = concat!("ftptop/", env!("CARGO_PKG_VERSION"));

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Shows who is online via the FTP server, in a manner similar to top
#[derive(Parser, Debug, Clone)]
#[command(
    name = "ftptop",
    about = "Shows who is online via the FTP server, in a manner similar to top",
    disable_version_flag = true
)]
pub struct Settings {
    /// Show only downloading sessions
    #[arg(short = 'D', action = ArgAction::Count)]
    pub downloads_only: u8,

    /// Show only idle sessions
    #[arg(short = 'I', action = ArgAction::Count)]
    pub idle_only: u8,

    /// Show only uploading sessions
    #[arg(short = 'U', action = ArgAction::Count)]
    pub uploads_only: u8,

    /// Ignore idle connections when listing
    #[arg(short = 'i', action = ArgAction::Count)]
    pub hide_idle: u8,

    /// Refresh delay in seconds
    #[arg(
        short = 'd',
        value_name = "SECONDS",
        default_value_t = 2,
        allow_negative_numbers = true
    )]
    pub delay: i64,

    /// Scoreboard file to read
    #[arg(
        short = 'f',
        value_name = "PATH",
        env = "FTPTOP_SCOREBOARD",
        default_value = DEFAULT_SCOREBOARD_PATH
    )]
    pub scoreboard: PathBuf,

    /// Logging level
    #[arg(long, default_value = "WARNING", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Print version information and exit
    #[arg(short = 'V', long = "version", action = ArgAction::SetTrue)]
    pub version: bool,

    /// Display filter resolved from `-D`, `-I`, `-U` and `-i` in command-line
    /// order.
    #[arg(skip)]
    pub filter: DisplayFilter,
}

// ── Config ─────────────────────────────────────────────────────────────────────

/// Validated, immutable startup configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub filter: DisplayFilter,
    /// Maximum wait for a keystroke between refreshes.
    pub delay: Duration,
    pub scoreboard_path: PathBuf,
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse the process arguments.
    pub fn try_load() -> Result<Self, clap::Error> {
        Self::try_load_from(std::env::args_os())
    }

    /// Parse an explicit argument list (the first item is the program name).
    ///
    /// Help requests come back as an error of kind
    /// [`clap::error::ErrorKind::DisplayHelp`]; `-V` sets
    /// [`Settings::version`] instead.
    pub fn try_load_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = Settings::command().try_get_matches_from(args)?;
        let mut settings = Settings::from_arg_matches(&matches)?;

        settings.filter = resolve_filter(&matches);

        // --debug overrides log level.
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }

        Ok(settings)
    }

    /// Validate the parsed values into a [`Config`].
    ///
    /// Runs before anything touches the scoreboard.
    pub fn to_config(&self) -> Result<Config, FtptopError> {
        if self.delay < 0 {
            return Err(FtptopError::Config(format!(
                "negative delay illegal: {}",
                self.delay
            )));
        }

        Ok(Config {
            filter: self.filter,
            delay: Duration::from_secs(self.delay.unsigned_abs()),
            scoreboard_path: self.scoreboard.clone(),
        })
    }
}

// ── Filter resolution ──────────────────────────────────────────────────────────

/// Replay the filter flags in the order they appeared.
///
/// `-D`, `-I` and `-U` replace the whole filter, so only the last of them
/// matters. `-i` clears the idle bit of whatever state exists when it is
/// seen, so it only has an effect when it comes after the last reset.
fn resolve_filter(matches: &ArgMatches) -> DisplayFilter {
    let resets = [
        ("downloads_only", DisplayFilter::DOWNLOAD),
        ("idle_only", DisplayFilter::IDLE),
        ("uploads_only", DisplayFilter::UPLOAD),
    ];

    let last_reset = resets
        .iter()
        .filter_map(|(id, filter)| last_index(matches, id).map(|idx| (idx, *filter)))
        .max_by_key(|(idx, _)| *idx);

    let (reset_at, mut filter) = match last_reset {
        Some((idx, filter)) => (Some(idx), filter),
        None => (None, DisplayFilter::ALL),
    };

    if let Some(hide_at) = last_index(matches, "hide_idle") {
        if reset_at.map_or(true, |reset_at| hide_at > reset_at) {
            filter = filter.without(DisplayFilter::IDLE);
        }
    }

    filter
}

/// Position of the last command-line occurrence of `id`.
///
/// Defaults are ignored; clap records indices for them too.
fn last_index(matches: &ArgMatches, id: &str) -> Option<usize> {
    if matches.value_source(id) != Some(ValueSource::CommandLine) {
        return None;
    }
    matches.indices_of(id).and_then(|indices| indices.max())
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    fn load(args: &[&str]) -> Settings {
        let mut argv = vec!["ftptop"];
        argv.extend_from_slice(args);
        Settings::try_load_from(argv).expect("valid arguments")
    }

    fn filter_for(args: &[&str]) -> DisplayFilter {
        load(args).filter
    }

    // ── Defaults ──────────────────────────────────────────────────────────────

    #[test]
    fn test_defaults() {
        let settings = load(&["-f", "/tmp/scoreboard"]);
        assert_eq!(settings.filter, DisplayFilter::ALL);
        assert_eq!(settings.delay, 2);
        assert_eq!(settings.log_level, "WARNING");
        assert!(settings.log_file.is_none());

        let config = settings.to_config().unwrap();
        assert_eq!(config.delay, Duration::from_secs(2));
        assert_eq!(config.scoreboard_path, PathBuf::from("/tmp/scoreboard"));
        assert_eq!(config.filter, DisplayFilter::ALL);
    }

    // ── Filter flags ──────────────────────────────────────────────────────────

    #[test]
    fn test_single_resets() {
        assert_eq!(filter_for(&["-D"]), DisplayFilter::DOWNLOAD);
        assert_eq!(filter_for(&["-I"]), DisplayFilter::IDLE);
        assert_eq!(filter_for(&["-U"]), DisplayFilter::UPLOAD);
    }

    #[test]
    fn test_later_reset_wins() {
        assert_eq!(filter_for(&["-D", "-U"]), DisplayFilter::UPLOAD);
        assert_eq!(filter_for(&["-U", "-D"]), DisplayFilter::DOWNLOAD);
        assert_eq!(filter_for(&["-U", "-D", "-I"]), DisplayFilter::IDLE);
    }

    #[test]
    fn test_hide_idle_on_default_filter() {
        let filter = filter_for(&["-i"]);
        assert!(filter.contains(DisplayFilter::DOWNLOAD));
        assert!(filter.contains(DisplayFilter::UPLOAD));
        assert!(!filter.contains(DisplayFilter::IDLE));
    }

    #[test]
    fn test_hide_idle_after_idle_only_clears_everything() {
        assert_eq!(filter_for(&["-I", "-i"]), DisplayFilter::NONE);
    }

    #[test]
    fn test_reset_after_hide_idle_wins() {
        assert_eq!(filter_for(&["-i", "-I"]), DisplayFilter::IDLE);
        assert_eq!(filter_for(&["-i", "-D"]), DisplayFilter::DOWNLOAD);
    }

    #[test]
    fn test_hide_idle_after_download_only_is_noop() {
        assert_eq!(filter_for(&["-D", "-i"]), DisplayFilter::DOWNLOAD);
    }

    #[test]
    fn test_clustered_short_flags_keep_order() {
        assert_eq!(filter_for(&["-Ii"]), DisplayFilter::NONE);
        assert_eq!(filter_for(&["-iI"]), DisplayFilter::IDLE);
    }

    #[test]
    fn test_repeated_flags_use_last_occurrence() {
        assert_eq!(filter_for(&["-D", "-U", "-D"]), DisplayFilter::DOWNLOAD);
        assert_eq!(filter_for(&["-i", "-I", "-i"]), DisplayFilter::NONE);
    }

    // ── Delay ─────────────────────────────────────────────────────────────────

    #[test]
    fn test_delay_value() {
        let config = load(&["-d", "5"]).to_config().unwrap();
        assert_eq!(config.delay, Duration::from_secs(5));
    }

    #[test]
    fn test_zero_delay_is_allowed() {
        let config = load(&["-d", "0"]).to_config().unwrap();
        assert_eq!(config.delay, Duration::ZERO);
    }

    #[test]
    fn test_largest_delay_is_accepted() {
        let config = load(&["-d", "9223372036854775807"]).to_config().unwrap();
        assert_eq!(config.delay, Duration::from_secs(i64::MAX as u64));
    }

    #[test]
    fn test_negative_delay_is_config_error() {
        let settings = load(&["-d", "-1", "-f", "/nonexistent/scoreboard"]);
        let err = settings.to_config().unwrap_err();
        assert!(matches!(err, FtptopError::Config(_)));
        assert!(err.to_string().contains("negative delay illegal: -1"));
    }

    #[test]
    fn test_non_numeric_delay_is_rejected() {
        let err = Settings::try_load_from(["ftptop", "-d", "soon"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }

    // ── Help / version / unknown ──────────────────────────────────────────────

    #[test]
    fn test_help_is_reported_as_display_help() {
        let err = Settings::try_load_from(["ftptop", "-h"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_version_flag() {
        assert!(load(&["-V"]).version);
        assert!(load(&["--version"]).version);
        assert!(!load(&[]).version);
    }

    #[test]
    fn test_version_string_is_product_slash_version() {
        assert_eq!(VERSION, format!("ftptop/{}", env!("CARGO_PKG_VERSION")));
        assert!(!VERSION.contains(' '));
    }

    #[test]
    fn test_version_flag_ignores_invalid_delay() {
        let settings = load(&["-V", "-d", "-3"]);
        assert!(settings.version);
        assert!(settings.to_config().is_err());
    }

    #[test]
    fn test_unknown_flag_is_rejected() {
        let err = Settings::try_load_from(["ftptop", "-z"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }

    // ── Logging flags ─────────────────────────────────────────────────────────

    #[test]
    fn test_debug_overrides_log_level() {
        let settings = load(&["--log-level", "ERROR", "--debug"]);
        assert_eq!(settings.log_level, "DEBUG");
    }

    #[test]
    fn test_log_file_flag() {
        let settings = load(&["--log-file", "/tmp/ftptop.log"]);
        assert_eq!(settings.log_file, Some(PathBuf::from("/tmp/ftptop.log")));
    }

    #[test]
    fn test_command_definition_is_valid() {
        Settings::command().debug_assert();
    }
}

//! One refresh cycle: open the scoreboard, classify every record, close it.
//!
//! [`SessionScanner::scan`] returns a [`CycleReport`] owning a brand-new
//! [`SessionSet`]; nothing is carried from one cycle to the next. Scan
//! failures never escape a cycle: they are recorded in the report and the
//! set is left empty.

use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use ftptop_core::classifier::SessionClassifier;
use ftptop_core::error::{FtptopError, ScoreboardError};
use ftptop_core::models::DisplayFilter;
use ftptop_core::session_set::SessionSet;
use ftptop_data::ScoreboardReader;

// ── CycleReport ───────────────────────────────────────────────────────────────

/// Everything the renderer needs for one frame.
#[derive(Debug)]
pub struct CycleReport {
    /// Sessions that passed the filter plus unconditional counters.
    pub sessions: SessionSet,
    /// Why the scoreboard could not be read this cycle, if it could not.
    pub scan_error: Option<ScoreboardError>,
    /// When the scan was taken.
    pub taken_at: DateTime<Local>,
}

// ── SessionScanner ────────────────────────────────────────────────────────────

/// Re-scans the scoreboard at `path` on demand.
#[derive(Debug, Clone)]
pub struct SessionScanner {
    path: PathBuf,
    classifier: SessionClassifier,
}

impl SessionScanner {
    pub fn new(path: impl Into<PathBuf>, filter: DisplayFilter) -> Self {
        Self {
            path: path.into(),
            classifier: SessionClassifier::new(filter),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn filter(&self) -> DisplayFilter {
        self.classifier.filter()
    }

    /// Run one full scan.
    pub fn scan(&self) -> CycleReport {
        let mut sessions = SessionSet::new();

        let scan_error = match ScoreboardReader::open(&self.path) {
            Ok(reader) => {
                drain_into(reader, &self.classifier, &mut sessions);
                None
            }
            Err(e) => {
                if e.is_format_error() {
                    tracing::warn!(error = %e, "scoreboard format rejected; rendering empty view");
                } else {
                    tracing::warn!(error = %e, "scoreboard unreadable; rendering empty view");
                }
                Some(e)
            }
        };

        let counters = sessions.counters();
        tracing::debug!(
            total = counters.total,
            shown = sessions.len(),
            downloading = counters.downloading,
            uploading = counters.uploading,
            idle = counters.idle,
            "scan complete"
        );

        CycleReport {
            sessions,
            scan_error,
            taken_at: Local::now(),
        }
    }
}

/// Feed every record from `reader` through `classifier` into `sessions`,
/// then release the reader.
pub fn drain_into<R: Read>(
    mut reader: ScoreboardReader<R>,
    classifier: &SessionClassifier,
    sessions: &mut SessionSet,
) {
    let producer_pid = reader.header().producer_pid;
    for record in reader.by_ref() {
        classifier.ingest(&record, sessions);
    }
    tracing::debug!(
        producer_pid,
        records = reader.records_read(),
        "scoreboard drained"
    );
    reader.close();
}

// ── Startup check ─────────────────────────────────────────────────────────────

/// Make sure the scoreboard path exists before the display starts.
pub fn verify_scoreboard(path: &Path) -> Result<(), FtptopError> {
    std::fs::metadata(path)
        .map(|_| ())
        .map_err(|source| FtptopError::ScoreboardUnavailable {
            path: path.to_path_buf(),
            source,
        })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use ftptop_core::session_set::SessionCounters;
    use ftptop_data::layout::SCOREBOARD_VERSION;
    use ftptop_data::testing::ScoreboardImage;
    use tempfile::TempDir;

    fn write(tmp: &TempDir, image: ScoreboardImage) -> PathBuf {
        let path = tmp.path().join("proftpd.scoreboard");
        image.write_to(&path).expect("write scoreboard");
        path
    }

    fn example_image() -> ScoreboardImage {
        ScoreboardImage::new()
            .session(100, "(idle)")
            .session(200, "RETR a.txt")
            .session(300, "STOR b.txt")
            .session(400, "LIST")
    }

    fn codes(report: &CycleReport) -> String {
        report
            .sessions
            .iter()
            .map(|r| r.category().status_code())
            .collect()
    }

    // ── scan ──────────────────────────────────────────────────────────────

    #[test]
    fn test_scan_default_filter() {
        let tmp = TempDir::new().unwrap();
        let path = write(&tmp, example_image());

        let report = SessionScanner::new(&path, DisplayFilter::ALL).scan();

        assert!(report.scan_error.is_none());
        assert_eq!(codes(&report), "IDUL");
        let c = report.sessions.counters();
        assert_eq!((c.idle, c.downloading, c.uploading), (1, 1, 1));
        assert_eq!(c.total, 4);
    }

    #[test]
    fn test_scan_download_only_filter_keeps_counters() {
        let tmp = TempDir::new().unwrap();
        let path = write(&tmp, example_image());

        let report = SessionScanner::new(&path, DisplayFilter::DOWNLOAD).scan();

        assert_eq!(codes(&report), "DL");
        let c = report.sessions.counters();
        assert_eq!((c.idle, c.downloading, c.uploading), (1, 1, 1));
    }

    #[test]
    fn test_scan_empty_scoreboard() {
        let tmp = TempDir::new().unwrap();
        let path = write(&tmp, ScoreboardImage::new());

        let report = SessionScanner::new(&path, DisplayFilter::ALL).scan();

        assert!(report.scan_error.is_none());
        assert!(report.sessions.is_empty());
        assert_eq!(*report.sessions.counters(), SessionCounters::default());
    }

    #[test]
    fn test_scan_format_errors_are_recoverable() {
        let tmp = TempDir::new().unwrap();
        let scanner = SessionScanner::new(tmp.path().join("proftpd.scoreboard"), DisplayFilter::ALL);

        write(&tmp, example_image().version(SCOREBOARD_VERSION + 1));
        let report = scanner.scan();
        assert!(matches!(
            report.scan_error,
            Some(ScoreboardError::NewerVersion { .. })
        ));
        assert!(report.sessions.is_empty());

        // The next cycle starts over with a fresh scan.
        write(&tmp, example_image());
        let report = scanner.scan();
        assert!(report.scan_error.is_none());
        assert_eq!(report.sessions.len(), 4);
    }

    #[test]
    fn test_scan_missing_file_reports_io_error() {
        let tmp = TempDir::new().unwrap();
        let report = SessionScanner::new(tmp.path().join("gone"), DisplayFilter::ALL).scan();
        assert!(matches!(report.scan_error, Some(ScoreboardError::Io { .. })));
        assert!(report.sessions.is_empty());
    }

    #[test]
    fn test_scan_partial_results_survive_malformed_slot() {
        let tmp = TempDir::new().unwrap();
        let path = write(
            &tmp,
            ScoreboardImage::new()
                .session(1, "RETR a")
                .session(2, "STOR b")
                .malformed(3)
                .session(4, "LIST"),
        );

        let report = SessionScanner::new(&path, DisplayFilter::ALL).scan();

        assert!(report.scan_error.is_none());
        assert_eq!(codes(&report), "DU");
    }

    #[test]
    fn test_scans_do_not_share_state() {
        let tmp = TempDir::new().unwrap();
        let path = write(&tmp, example_image());
        let scanner = SessionScanner::new(&path, DisplayFilter::ALL);

        let first = scanner.scan();
        let second = scanner.scan();
        assert_eq!(first.sessions.len(), second.sessions.len());
        assert_eq!(first.sessions.counters(), second.sessions.counters());
    }

    // ── verify_scoreboard ─────────────────────────────────────────────────

    #[test]
    fn test_verify_scoreboard_missing() {
        let tmp = TempDir::new().unwrap();
        let err = verify_scoreboard(&tmp.path().join("missing")).unwrap_err();
        assert!(matches!(err, FtptopError::ScoreboardUnavailable { .. }));
        assert!(err.to_string().contains("unable to stat"));
    }

    #[test]
    fn test_verify_scoreboard_present() {
        let tmp = TempDir::new().unwrap();
        let path = write(&tmp, ScoreboardImage::new());
        assert!(verify_scoreboard(&path).is_ok());
    }
}

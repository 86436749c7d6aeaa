//! Three-line dashboard header: product and scan time, totals, status.

use chrono::{DateTime, Local};
use ftptop_core::error::ScoreboardError;
use ftptop_core::session_set::SessionCounters;
use ratatui::text::{Line, Span};

use crate::themes::Theme;

/// Product identifier shown at the start of the first header line.
pub const PRODUCT: &str = ftptop_core::settings::VERSION;

/// `ctime(3)`-style timestamp, e.g. `Thu Oct 16 09:05:01 2026`.
pub fn format_timestamp(at: &DateTime<Local>) -> String {
    at.format("%a %b %e %H:%M:%S %Y").to_string()
}

/// The aggregate summary line.
///
/// `total` counts every record scanned; when the filter hid some of them
/// the number actually listed is appended.
pub fn summary_text(counters: &SessionCounters, shown: usize) -> String {
    let mut text = format!(
        "{} Total FTP Sessions: {} downloading, {} uploading, {} idle",
        counters.total, counters.downloading, counters.uploading, counters.idle
    );
    if shown != counters.total as usize {
        text.push_str(&format!(" ({shown} shown)"));
    }
    text
}

/// Dashboard header rendering three lines:
///
/// 1. Product/version and scan time.
/// 2. Session totals.
/// 3. Scoreboard status (blank when the scan succeeded).
pub struct Header<'a> {
    pub taken_at: &'a DateTime<Local>,
    pub counters: &'a SessionCounters,
    /// Lines that passed the display filter.
    pub shown: usize,
    pub scan_error: Option<&'a ScoreboardError>,
    pub theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let status = match self.scan_error {
            Some(err) => Line::from(Span::styled(
                format!("scoreboard {}: {}", err.short_label(), err),
                self.theme.error,
            )),
            None => Line::from(""),
        };

        vec![
            Line::from(Span::styled(
                format!("{}: {}", PRODUCT, format_timestamp(self.taken_at)),
                self.theme.header,
            )),
            Line::from(Span::styled(
                summary_text(self.counters, self.shown),
                self.theme.header,
            )),
            status,
        ]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn line_text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn counters(total: u32, downloading: u32, uploading: u32, idle: u32) -> SessionCounters {
        SessionCounters {
            total,
            downloading,
            uploading,
            idle,
            listing: total - downloading - uploading - idle,
            authenticating: 0,
        }
    }

    #[test]
    fn test_format_timestamp_ctime_style() {
        let at = Local.with_ymd_and_hms(2026, 10, 6, 9, 5, 1).unwrap();
        assert_eq!(format_timestamp(&at), "Tue Oct  6 09:05:01 2026");
    }

    #[test]
    fn test_summary_unfiltered() {
        assert_eq!(
            summary_text(&counters(4, 1, 1, 1), 4),
            "4 Total FTP Sessions: 1 downloading, 1 uploading, 1 idle"
        );
    }

    #[test]
    fn test_summary_reports_shown_count_when_filtered() {
        assert_eq!(
            summary_text(&counters(4, 1, 1, 1), 2),
            "4 Total FTP Sessions: 1 downloading, 1 uploading, 1 idle (2 shown)"
        );
    }

    #[test]
    fn test_header_lines() {
        let theme = Theme::classic();
        let at = Local.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        let c = counters(0, 0, 0, 0);
        let header = Header {
            taken_at: &at,
            counters: &c,
            shown: 0,
            scan_error: None,
            theme: &theme,
        };
        let lines = header.to_lines();

        assert_eq!(lines.len(), 3);
        assert!(line_text(&lines[0]).starts_with("ftptop/"));
        assert!(line_text(&lines[0]).ends_with("Fri Jan  2 03:04:05 2026"));
        assert!(line_text(&lines[1]).starts_with("0 Total FTP Sessions"));
        assert_eq!(line_text(&lines[2]), "");
    }

    #[test]
    fn test_header_status_line_names_error() {
        let theme = Theme::classic();
        let at = Local::now();
        let c = SessionCounters::default();
        let err = ScoreboardError::OlderVersion {
            found: 1,
            supported: 2,
        };
        let header = Header {
            taken_at: &at,
            counters: &c,
            shown: 0,
            scan_error: Some(&err),
            theme: &theme,
        };
        let status = line_text(&header.to_lines()[2]);
        assert!(status.starts_with("scoreboard too old:"), "got: {status}");
    }
}

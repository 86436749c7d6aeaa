//! Session table view.
//!
//! Paints the header block, the reverse-video column bar and one row per
//! session line, in scan order. Rows past the bottom of the terminal are
//! clipped.

use ftptop_core::formatting::COLUMN_HEADER;
use ftptop_runtime::cycle::CycleReport;
use ratatui::{
    layout::Rect,
    text::{Line, Span, Text},
    widgets::Paragraph,
    Frame,
};

use crate::components::header::Header;
use crate::themes::Theme;

/// Build every line of the dashboard for `report`.
///
/// `width` pads the column bar so the reverse video spans the full row.
pub fn dashboard_lines<'a>(report: &'a CycleReport, theme: &'a Theme, width: u16) -> Vec<Line<'a>> {
    let header = Header {
        taken_at: &report.taken_at,
        counters: report.sessions.counters(),
        shown: report.sessions.len(),
        scan_error: report.scan_error.as_ref(),
        theme,
    };

    let mut lines = header.to_lines();
    lines.push(Line::from(Span::styled(
        format!("{:<width$}", COLUMN_HEADER, width = width as usize),
        theme.column_header,
    )));
    lines.extend(report.sessions.iter().map(|record| {
        Line::from(Span::styled(
            record.line().trim_end_matches('\n'),
            theme.row,
        ))
    }));
    lines
}

/// Render the dashboard for `report` into `area`.
pub fn render_session_table(frame: &mut Frame, area: Rect, report: &CycleReport, theme: &Theme) {
    let lines = dashboard_lines(report, theme, area.width);
    frame.render_widget(Paragraph::new(Text::from(lines)), area);
}

// ── Tests ──────────────────────────────────────────────────────────────────────

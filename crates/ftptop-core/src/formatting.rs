//! Fixed-layout text formatting for session lines and the table header.

use crate::models::{RawSessionRecord, SessionCategory};

/// Column header printed above the session lines.
pub const COLUMN_HEADER: &str = "PID   S USER     ADDR        SRVR    TIME COMMAND";

/// Widest user name shown before truncation.
pub const USER_WIDTH: usize = 10;
/// Widest client address shown before truncation.
pub const CLIENT_WIDTH: usize = 7;
/// Widest command shown before truncation.
pub const COMMAND_WIDTH: usize = 20;

/// Return at most the first `max` characters of `s`.
///
/// # Examples
///
/// ```
/// use ftptop_core::formatting::truncate;
///
/// assert_eq!(truncate("anonymous-user", 10), "anonymous-");
/// assert_eq!(truncate("bob", 10), "bob");
/// ```
pub fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Format one session as a newline-terminated display line.
///
/// Layout: pid left-justified in 5 columns, status code, user (10),
/// client address (7), server address, the reserved `0` time field and the
/// command (20).
///
/// # Examples
///
/// ```
/// use ftptop_core::formatting::format_session_line;
/// use ftptop_core::models::{RawSessionRecord, SessionCategory};
///
/// let raw = RawSessionRecord {
///     pid: 200,
///     user: "alice".into(),
///     client_addr: "10.0.0.7".into(),
///     server_addr: "10.0.0.1".into(),
///     command: "RETR a.txt".into(),
/// };
/// assert_eq!(
///     format_session_line(&raw, SessionCategory::Downloading),
///     "200   D alice 10.0.0. 10.0.0.1 0 RETR a.txt\n"
/// );
/// ```
pub fn format_session_line(raw: &RawSessionRecord, category: SessionCategory) -> String {
    format!(
        "{:<5} {} {} {} {} 0 {}\n",
        raw.pid,
        category.status_code(),
        truncate(&raw.user, USER_WIDTH),
        truncate(&raw.client_addr, CLIENT_WIDTH),
        raw.server_addr,
        truncate(&raw.command, COMMAND_WIDTH),
    )
}

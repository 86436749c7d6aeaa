//! Activity classification of scoreboard records.

use crate::models::{DisplayFilter, RawSessionRecord, SessionCategory};
use crate::session_set::{SessionRecord, SessionSet};

const UPLOAD_COMMANDS: [&str; 3] = ["STOR", "APPE", "STOU"];
const LISTING_COMMANDS: [&str; 2] = ["LIST", "NLST"];

/// Classify a command descriptor.
///
/// Substrings are tested in priority order and the first match wins:
/// `(idle)`, `RETR`, then the upload commands, then the listing commands.
/// Anything else is still authenticating.
///
/// # Examples
///
/// ```
/// use ftptop_core::classifier::classify;
/// use ftptop_core::models::SessionCategory;
///
/// assert_eq!(classify("RETR a.txt"), SessionCategory::Downloading);
/// assert_eq!(classify("PASS (hidden)"), SessionCategory::Authenticating);
/// ```
pub fn classify(command: &str) -> SessionCategory {
    if command.contains("(idle)") {
        SessionCategory::Idle
    } else if command.contains("RETR") {
        SessionCategory::Downloading
    } else if UPLOAD_COMMANDS.iter().any(|c| command.contains(*c)) {
        SessionCategory::Uploading
    } else if LISTING_COMMANDS.iter().any(|c| command.contains(*c)) {
        SessionCategory::Listing
    } else {
        SessionCategory::Authenticating
    }
}

/// Classifies records and routes them into a [`SessionSet`].
#[derive(Debug, Clone, Copy)]
pub struct SessionClassifier {
    filter: DisplayFilter,
}

impl SessionClassifier {
    pub fn new(filter: DisplayFilter) -> Self {
        Self { filter }
    }

    pub fn filter(&self) -> DisplayFilter {
        self.filter
    }

    /// Count `raw` in `set` and append its display line when the filter
    /// admits its category. Returns the category.
    pub fn ingest(&self, raw: &RawSessionRecord, set: &mut SessionSet) -> SessionCategory {
        let category = classify(&raw.command);
        set.observe(category);
        if self.filter.admits(category) {
            set.push(SessionRecord::from_raw(raw, category));
        }
        category
    }
}

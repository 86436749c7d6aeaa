//! Per-cycle collection of ready-to-render session lines.
//!
//! A [`SessionSet`] is built from empty at the start of every refresh cycle,
//! filled by the classifier, handed to the renderer and then dropped.

use crate::formatting::format_session_line;
use crate::models::{RawSessionRecord, SessionCategory};

/// Number of entries added to the set's storage on each growth step.
pub const SESSION_CHUNK: usize = 3;

/// One formatted display line plus the category it was classified as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    line: String,
    category: SessionCategory,
}

impl SessionRecord {
    /// Format `raw` into a display line.
    pub fn from_raw(raw: &RawSessionRecord, category: SessionCategory) -> Self {
        Self {
            line: format_session_line(raw, category),
            category,
        }
    }

    /// The newline-terminated display line.
    pub fn line(&self) -> &str {
        &self.line
    }

    pub fn category(&self) -> SessionCategory {
        self.category
    }
}

/// Per-category tallies for one scan.
///
/// Every scanned record is counted here regardless of the display filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionCounters {
    /// Records read from the scoreboard this cycle.
    pub total: u32,
    pub downloading: u32,
    pub uploading: u32,
    pub idle: u32,
    pub listing: u32,
    pub authenticating: u32,
}

impl SessionCounters {
    /// Count one scanned record of `category`.
    pub fn observe(&mut self, category: SessionCategory) {
        self.total += 1;
        match category {
            SessionCategory::Downloading => self.downloading += 1,
            SessionCategory::Uploading => self.uploading += 1,
            SessionCategory::Idle => self.idle += 1,
            SessionCategory::Listing => self.listing += 1,
            SessionCategory::Authenticating => self.authenticating += 1,
        }
    }
}

/// Ordered session lines for the current cycle plus aggregate counters.
#[derive(Debug, Clone)]
pub struct SessionSet {
    records: Vec<SessionRecord>,
    counters: SessionCounters,
    growth_events: usize,
}

impl SessionSet {
    /// An empty set with room for one chunk.
    pub fn new() -> Self {
        Self {
            records: Vec::with_capacity(SESSION_CHUNK),
            counters: SessionCounters::default(),
            growth_events: 0,
        }
    }

    /// Tally a scanned record; see [`SessionCounters::observe`].
    pub fn observe(&mut self, category: SessionCategory) {
        self.counters.observe(category);
    }

    /// Append a record, growing storage by one chunk when the current count
    /// is a non-zero multiple of [`SESSION_CHUNK`].
    pub fn push(&mut self, record: SessionRecord) {
        let len = self.records.len();
        if len > 0 && len % SESSION_CHUNK == 0 {
            self.records.reserve_exact(SESSION_CHUNK);
            self.growth_events += 1;
        }
        self.records.push(record);
    }

    /// Records in insertion order.
    pub fn records(&self) -> &[SessionRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &SessionRecord> {
        self.records.iter()
    }

    /// Number of records that passed the filter.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn counters(&self) -> &SessionCounters {
        &self.counters
    }

    /// How many times storage has grown beyond the initial chunk.
    pub fn growth_events(&self) -> usize {
        self.growth_events
    }
}

impl Default for SessionSet {
    fn default() -> Self {
        Self::new()
    }
}

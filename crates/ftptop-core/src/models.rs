use std::fmt;

/// One live session as read from the scoreboard.
///
/// Produced per scan and dropped once classified; nothing here survives a
/// refresh cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSessionRecord {
    /// Process id of the session's server child.
    pub pid: u32,
    /// Authenticated (or attempted) user name.
    pub user: String,
    /// Remote client address.
    pub client_addr: String,
    /// Local server address the client connected to.
    pub server_addr: String,
    /// Free-form descriptor of the current command, e.g. `"RETR a.txt"`.
    pub command: String,
}

/// Activity classification of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionCategory {
    /// Connected but not yet running a recognised command.
    Authenticating,
    /// Waiting for the next command.
    Idle,
    /// Sending a file to the client.
    Downloading,
    /// Receiving a file from the client.
    Uploading,
    /// Producing a directory listing.
    Listing,
}

impl SessionCategory {
    /// One-letter status code shown in the `S` column.
    pub fn status_code(self) -> char {
        match self {
            SessionCategory::Authenticating => 'A',
            SessionCategory::Idle => 'I',
            SessionCategory::Downloading => 'D',
            SessionCategory::Uploading => 'U',
            SessionCategory::Listing => 'L',
        }
    }

    /// The filter bit governing this category, `None` for categories that
    /// are always shown.
    pub fn filter_bit(self) -> Option<DisplayFilter> {
        match self {
            SessionCategory::Idle => Some(DisplayFilter::IDLE),
            SessionCategory::Downloading => Some(DisplayFilter::DOWNLOAD),
            SessionCategory::Uploading => Some(DisplayFilter::UPLOAD),
            SessionCategory::Authenticating | SessionCategory::Listing => None,
        }
    }
}

impl fmt::Display for SessionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionCategory::Authenticating => "authenticating",
            SessionCategory::Idle => "idle",
            SessionCategory::Downloading => "downloading",
            SessionCategory::Uploading => "uploading",
            SessionCategory::Listing => "listing",
        };
        f.write_str(name)
    }
}

/// Bitmask of the filterable categories an operator wants to see.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct DisplayFilter(u8);

impl DisplayFilter {
    pub const NONE: DisplayFilter = DisplayFilter(0);
    pub const DOWNLOAD: DisplayFilter = DisplayFilter(0x01);
    pub const UPLOAD: DisplayFilter = DisplayFilter(0x02);
    pub const IDLE: DisplayFilter = DisplayFilter(0x04);
    pub const ALL: DisplayFilter = DisplayFilter(0x07);

    /// `true` when every bit of `other` is set in `self`.
    pub fn contains(self, other: DisplayFilter) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns the filter with the bits of `other` cleared.
    pub fn without(self, other: DisplayFilter) -> DisplayFilter {
        DisplayFilter(self.0 & !other.0)
    }

    /// Whether a session of `category` passes this filter.
    ///
    /// Listing and authenticating sessions always pass.
    pub fn admits(self, category: SessionCategory) -> bool {
        category.filter_bit().map_or(true, |bit| self.contains(bit))
    }

    /// Raw bit representation.
    pub fn bits(self) -> u8 {
        self.0
    }
}

impl Default for DisplayFilter {
    fn default() -> Self {
        DisplayFilter::ALL
    }
}

impl std::ops::BitOr for DisplayFilter {
    type Output = DisplayFilter;

    fn bitor(self, rhs: DisplayFilter) -> DisplayFilter {
        DisplayFilter(self.0 | rhs.0)
    }
}

impl fmt::Debug for DisplayFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = Vec::new();
        if self.contains(DisplayFilter::DOWNLOAD) {
            names.push("DOWNLOAD");
        }
        if self.contains(DisplayFilter::UPLOAD) {
            names.push("UPLOAD");
        }
        if self.contains(DisplayFilter::IDLE) {
            names.push("IDLE");
        }
        if names.is_empty() {
            names.push("NONE");
        }
        write!(f, "DisplayFilter({})", names.join(" | "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(SessionCategory::Authenticating.status_code(), 'A');
        assert_eq!(SessionCategory::Idle.status_code(), 'I');
        assert_eq!(SessionCategory::Downloading.status_code(), 'D');
        assert_eq!(SessionCategory::Uploading.status_code(), 'U');
        assert_eq!(SessionCategory::Listing.status_code(), 'L');
    }

    #[test]
    fn test_default_filter_shows_everything() {
        let filter = DisplayFilter::default();
        assert_eq!(filter, DisplayFilter::ALL);
        assert!(filter.admits(SessionCategory::Idle));
        assert!(filter.admits(SessionCategory::Downloading));
        assert!(filter.admits(SessionCategory::Uploading));
    }

    #[test]
    fn test_listing_and_authenticating_are_never_filtered() {
        let filter = DisplayFilter::NONE;
        assert!(filter.admits(SessionCategory::Listing));
        assert!(filter.admits(SessionCategory::Authenticating));
        assert!(!filter.admits(SessionCategory::Idle));
        assert!(!filter.admits(SessionCategory::Downloading));
        assert!(!filter.admits(SessionCategory::Uploading));
    }

    #[test]
    fn test_without_clears_only_requested_bit() {
        let filter = DisplayFilter::ALL.without(DisplayFilter::IDLE);
        assert!(filter.contains(DisplayFilter::DOWNLOAD | DisplayFilter::UPLOAD));
        assert!(!filter.contains(DisplayFilter::IDLE));
        assert_eq!(filter.bits(), 0x03);
    }

    #[test]
    fn test_filter_debug_lists_bits() {
        assert_eq!(
            format!("{:?}", DisplayFilter::DOWNLOAD | DisplayFilter::IDLE),
            "DisplayFilter(DOWNLOAD | IDLE)"
        );
        assert_eq!(format!("{:?}", DisplayFilter::NONE), "DisplayFilter(NONE)");
    }
}

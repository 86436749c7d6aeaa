//! Scoreboard access for ftptop.
//!
//! Decodes the versioned binary scoreboard written by the FTP server and
//! exposes its live session records as a lazy, read-only stream.

pub mod layout;
pub mod scoreboard;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use ftptop_core as core;
pub use scoreboard::ScoreboardReader;

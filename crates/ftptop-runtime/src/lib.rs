//! Runtime layer for ftptop.
//!
//! Runs one scoreboard refresh cycle at a time and carries the cancellation
//! token that termination signals flip.

pub mod cancel;
pub mod cycle;

pub use ftptop_core as core;
pub use ftptop_data as data;

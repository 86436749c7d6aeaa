//! Terminal UI layer for ftptop.
//!
//! Owns the terminal for the lifetime of the dashboard, paints the session
//! table with [`ratatui`] and runs the refresh/quit display loop.

pub mod app;
pub mod components;
pub mod session_table;
pub mod terminal;
pub mod themes;

pub use ftptop_core as core;

//! Core types for ftptop.
//!
//! Holds the startup configuration, the error taxonomy, the session data
//! model, activity classification and the per-cycle session set.

pub mod classifier;
pub mod error;
pub mod formatting;
pub mod models;
pub mod session_set;
pub mod settings;

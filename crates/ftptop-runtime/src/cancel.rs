//! Cooperative cancellation for the display loop.
//!
//! SIGINT and SIGTERM only flip an atomic flag; the loop notices it the next
//! time its wait step checks the token, and shuts down through the same path
//! as the quit key.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook::SigId;

/// Shared "stop now" flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Route SIGINT and SIGTERM into this token.
    ///
    /// The handlers stay registered until the returned guard is dropped.
    pub fn install_signal_handlers(&self) -> io::Result<SignalGuard> {
        let mut ids = Vec::with_capacity(2);
        for signal in [SIGINT, SIGTERM] {
            ids.push(signal_hook::flag::register(
                signal,
                Arc::clone(&self.cancelled),
            )?);
        }
        tracing::debug!("SIGINT/SIGTERM handlers installed");
        Ok(SignalGuard { ids })
    }
}

/// Unregisters the token's signal handlers on drop.
#[derive(Debug)]
pub struct SignalGuard {
    ids: Vec<SigId>,
}

impl Drop for SignalGuard {
    fn drop(&mut self) {
        for id in self.ids.drain(..) {
            signal_hook::low_level::unregister(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_starts_uncancelled() {
        assert!(!CancellationToken::new().is_cancelled());
    }

    #[test]
    fn test_cancel_is_visible_through_clones() {
        let token = CancellationToken::new();
        let clone = token.clone();
        clone.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_sigterm_cancels_token() {
        let token = CancellationToken::new();
        let _guard = token.install_signal_handlers().unwrap();

        signal_hook::low_level::raise(SIGTERM).unwrap();

        assert!(token.is_cancelled());
    }
}

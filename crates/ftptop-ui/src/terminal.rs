//! Scoped ownership of the terminal's display mode.

use std::io::{self, IsTerminal, Stdout};

use crossterm::{
    cursor::{Hide, Show},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ftptop_core::error::FtptopError;
use ratatui::{backend::CrosstermBackend, Terminal};

// ── Modes ─────────────────────────────────────────────────────────────────────

/// Switches a terminal into and out of dashboard mode.
pub trait TerminalMode {
    /// Enter dashboard mode. A failed enter leaves nothing half-applied.
    fn enter(&mut self) -> io::Result<()>;

    /// Return to the mode in effect before [`TerminalMode::enter`].
    fn leave(&mut self) -> io::Result<()>;
}

/// Raw mode, alternate screen and hidden cursor on stdout.
#[derive(Debug, Default)]
pub struct CrosstermMode;

impl TerminalMode for CrosstermMode {
    fn enter(&mut self) -> io::Result<()> {
        enable_raw_mode()?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen, Hide) {
            let _ = disable_raw_mode();
            return Err(e);
        }
        Ok(())
    }

    fn leave(&mut self) -> io::Result<()> {
        let raw = disable_raw_mode();
        let screen = execute!(io::stdout(), LeaveAlternateScreen, Show);
        raw.and(screen)
    }
}

// ── ModeGuard ─────────────────────────────────────────────────────────────────

/// Holds a [`TerminalMode`] entered until [`ModeGuard::restore`] or drop.
///
/// Leaving happens exactly once whichever way the owner exits: explicit
/// restore, early return on error, or panic unwinding.
#[derive(Debug)]
pub struct ModeGuard<M: TerminalMode> {
    mode: M,
    active: bool,
}

impl<M: TerminalMode> ModeGuard<M> {
    pub fn enter(mut mode: M) -> io::Result<Self> {
        mode.enter()?;
        tracing::debug!("terminal switched to dashboard mode");
        Ok(Self { mode, active: true })
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Leave the mode. Idempotent.
    pub fn restore(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        let result = self.mode.leave();
        tracing::debug!("terminal restored");
        result
    }
}

impl<M: TerminalMode> Drop for ModeGuard<M> {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            tracing::warn!(error = %e, "failed to restore terminal");
        }
    }
}

// ── TerminalGuard ─────────────────────────────────────────────────────────────

/// The dashboard's terminal, in dashboard mode for as long as this lives.
pub struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    mode: ModeGuard<CrosstermMode>,
}

impl TerminalGuard {
    /// Switch stdout into dashboard mode.
    pub fn acquire() -> Result<Self, FtptopError> {
        if !io::stdout().is_terminal() {
            return Err(FtptopError::Terminal("stdout is not a terminal".to_string()));
        }

        let mode = ModeGuard::enter(CrosstermMode)
            .map_err(|e| FtptopError::Terminal(format!("terminal setup failed: {e}")))?;

        // On failure `mode` drops here and leaves dashboard mode.
        let terminal = Terminal::new(CrosstermBackend::new(io::stdout()))
            .map_err(|e| FtptopError::Terminal(e.to_string()))?;

        Ok(Self { terminal, mode })
    }

    pub fn terminal_mut(&mut self) -> &mut Terminal<CrosstermBackend<Stdout>> {
        &mut self.terminal
    }

    /// Leave raw mode and the alternate screen. Idempotent.
    pub fn restore(&mut self) -> io::Result<()> {
        self.mode.restore()
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

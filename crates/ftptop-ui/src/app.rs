//! Display loop for ftptop.
//!
//! [`App`] walks `Initializing → Rendering ⇄ Waiting → Terminated`. Each
//! pass through `Rendering` runs one full scoreboard scan and paints it;
//! `Waiting` is the only place the loop blocks, for at most the refresh
//! delay, and is where quit keys and cancellation are noticed.

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{backend::Backend, Terminal};

use ftptop_core::error::FtptopError;
use ftptop_core::settings::Config;
use ftptop_runtime::cancel::CancellationToken;
use ftptop_runtime::cycle::{verify_scoreboard, SessionScanner};

use crate::session_table;
use crate::terminal::TerminalGuard;
use crate::themes::Theme;

/// Longest single poll while waiting, so cancellation is seen promptly.
pub const POLL_SLICE: Duration = Duration::from_millis(100);

// ── LoopState ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Initializing,
    Rendering,
    Waiting,
    Terminated,
}

/// How a wait step ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// Delay elapsed or a non-quit key was pressed.
    Refresh,
    /// The operator pressed the quit key.
    Quit,
    /// The cancellation token was set.
    Cancelled,
}

// ── Key input ─────────────────────────────────────────────────────────────────

/// Source of keystrokes for the wait step.
pub trait KeySource {
    /// Wait up to `timeout` for a key press. `Ok(None)` means no key arrived,
    /// possibly early.
    fn next_key(&mut self, timeout: Duration) -> io::Result<Option<KeyEvent>>;
}

/// Keys from the controlling terminal.
#[derive(Debug, Default)]
pub struct CrosstermKeys;

impl KeySource for CrosstermKeys {
    fn next_key(&mut self, timeout: Duration) -> io::Result<Option<KeyEvent>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => Ok(Some(key)),
            _ => Ok(None),
        }
    }
}

/// `q`/`Q`, or Ctrl+C, which raw mode delivers as a key instead of SIGINT.
pub fn is_quit_key(key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => true,
        KeyCode::Char(c) => c.eq_ignore_ascii_case(&'q'),
        _ => false,
    }
}

/// Block for up to `delay` waiting for one keystroke.
///
/// A zero delay polls once without blocking. A delay too large to place on
/// the clock waits until a key or cancellation arrives.
pub fn wait_for_key<K: KeySource>(
    keys: &mut K,
    delay: Duration,
    cancel: &CancellationToken,
) -> io::Result<WaitOutcome> {
    let deadline = Instant::now().checked_add(delay);
    let expired = || deadline.is_some_and(|d| Instant::now() >= d);
    loop {
        if cancel.is_cancelled() {
            return Ok(WaitOutcome::Cancelled);
        }

        let remaining = match deadline {
            Some(d) => d.saturating_duration_since(Instant::now()),
            None => Duration::MAX,
        };
        match keys.next_key(remaining.min(POLL_SLICE))? {
            Some(key) if is_quit_key(&key) => return Ok(WaitOutcome::Quit),
            Some(_) => return Ok(WaitOutcome::Refresh),
            None if expired() => {
                return Ok(if cancel.is_cancelled() {
                    WaitOutcome::Cancelled
                } else {
                    WaitOutcome::Refresh
                });
            }
            None => {}
        }
    }
}

// ── App ───────────────────────────────────────────────────────────────────────

/// Root state of the dashboard.
pub struct App {
    scanner: SessionScanner,
    delay: Duration,
    cancel: CancellationToken,
    theme: Theme,
    state: LoopState,
    cycles: u64,
}

impl App {
    pub fn new(config: &Config, cancel: CancellationToken) -> Self {
        Self {
            scanner: SessionScanner::new(config.scoreboard_path.clone(), config.filter),
            delay: config.delay,
            cancel,
            theme: Theme::from_env(),
            state: LoopState::Initializing,
            cycles: 0,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Completed render passes.
    pub(crate) fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Run on the controlling terminal until quit or cancellation.
    ///
    /// Fails before touching the terminal when the scoreboard path cannot be
    /// reached or no terminal is available.
    pub fn run(mut self) -> Result<(), FtptopError> {
        verify_scoreboard(self.scanner.path())?;
        let _signals = self.cancel.install_signal_handlers()?;

        let mut guard = TerminalGuard::acquire()?;
        let result = self.drive(guard.terminal_mut(), &mut CrosstermKeys);
        guard.restore()?;

        tracing::info!(cycles = self.cycles(), "display loop finished");
        result
    }

    /// Drive the state machine against any backend and key source.
    pub fn drive<B, K>(&mut self, terminal: &mut Terminal<B>, keys: &mut K) -> Result<(), FtptopError>
    where
        B: Backend,
        K: KeySource,
    {
        loop {
            self.state = match self.state {
                LoopState::Initializing => LoopState::Rendering,
                LoopState::Rendering => {
                    self.render_cycle(terminal)?;
                    LoopState::Waiting
                }
                LoopState::Waiting => match wait_for_key(keys, self.delay, &self.cancel)? {
                    WaitOutcome::Refresh => LoopState::Rendering,
                    WaitOutcome::Quit => {
                        tracing::info!("quit key received");
                        LoopState::Terminated
                    }
                    WaitOutcome::Cancelled => {
                        tracing::info!("termination signal received");
                        LoopState::Terminated
                    }
                },
                LoopState::Terminated => return Ok(()),
            };
        }
    }

    fn render_cycle<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), FtptopError> {
        let report = self.scanner.scan();
        let theme = &self.theme;
        terminal
            .draw(|frame| {
                let area = frame.area();
                session_table::render_session_table(frame, area, &report, theme);
            })
            .map_err(|e| FtptopError::Terminal(e.to_string()))?;
        self.cycles += 1;
        Ok(())
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

use ratatui::style::{Color, Modifier, Style};

/// Styles used by the session dashboard.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Version/timestamp line and the session summary.
    pub header: Style,
    /// Reverse-video column header bar.
    pub column_header: Style,
    /// Session lines.
    pub row: Style,
    /// Status line naming a scoreboard problem.
    pub error: Style,
}

impl Theme {
    /// Bold header, reverse-video column bar and a red status line.
    pub fn classic() -> Self {
        Self {
            header: Style::default().add_modifier(Modifier::BOLD),
            column_header: Style::default().add_modifier(Modifier::REVERSED),
            row: Style::default(),
            error: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        }
    }

    /// Attributes only, no colours.
    pub fn monochrome() -> Self {
        Self {
            error: Style::default().add_modifier(Modifier::BOLD),
            ..Self::classic()
        }
    }

    /// [`Theme::monochrome`] when `NO_COLOR` is set to a non-empty value,
    /// [`Theme::classic`] otherwise.
    pub fn from_env() -> Self {
        match std::env::var_os("NO_COLOR") {
            Some(v) if !v.is_empty() => Self::monochrome(),
            _ => Self::classic(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::classic()
    }
}

//! Styles for the wizard, passed in at construction

use ratatui::style::{Color, Modifier, Style};

const PURPLE: Color = Color::Rgb(0x87, 0x4b, 0xfc);
const RED: Color = Color::Rgb(0xff, 0x55, 0x55);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub title: Style,
    pub item: Style,
    pub selected: Style,
    pub description: Style,
    pub check_mark: Style,
    pub error: Style,
    pub help: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            title: Style::default().add_modifier(Modifier::BOLD),
            item: Style::default(),
            selected: Style::default().fg(Color::Indexed(170)),
            description: Style::default().fg(Color::Indexed(241)),
            check_mark: Style::default().fg(PURPLE),
            error: Style::default().fg(RED),
            help: Style::default().fg(Color::DarkGray),
        }
    }
}

impl Theme {
    /// No colors, only emphasis (for NO_COLOR and dumb terminals)
    pub fn plain() -> Self {
        Self {
            title: Style::default().add_modifier(Modifier::BOLD),
            item: Style::default(),
            selected: Style::default().add_modifier(Modifier::BOLD),
            description: Style::default(),
            check_mark: Style::default(),
            error: Style::default().add_modifier(Modifier::BOLD),
            help: Style::default(),
        }
    }

    /// Colored when the terminal supports it
    pub fn detect() -> Self {
        if console::colors_enabled() {
            Self::default()
        } else {
            Self::plain()
        }
    }
}

//! Full-screen wizard: keystroke decoding, event loop and rendering

use super::theme::Theme;
use crate::catalog::Catalog;
use crate::repo::CloneRequest;
use crate::wizard::{ListView, Stage, Transition, Wizard, WizardEvent};
use anyhow::{Context, Result};
use crossterm::{
    cursor::Show,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
    Frame, Terminal,
};
use std::io;
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// How the wizard ended
#[derive(Debug, Clone, PartialEq)]
pub enum WizardOutcome {
    Cancelled,
    Clone {
        request: CloneRequest,
        banner: Vec<String>,
    },
}

/// Decode a keystroke for the given stage
///
/// Letters are text on the path stage; on list stages `j`/`k` move and `q` quits.
pub fn map_key(key: KeyEvent, stage: Stage) -> Option<WizardEvent> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(WizardEvent::Cancel),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Esc => Some(WizardEvent::Cancel),
        KeyCode::Enter => Some(WizardEvent::Confirm),
        KeyCode::Up => Some(WizardEvent::Up),
        KeyCode::Down => Some(WizardEvent::Down),
        KeyCode::Left => Some(WizardEvent::Left),
        KeyCode::Right => Some(WizardEvent::Right),
        KeyCode::Backspace => Some(WizardEvent::Backspace),
        KeyCode::Char(c) if stage == Stage::EnterPath => Some(WizardEvent::Char(c)),
        KeyCode::Char('k') => Some(WizardEvent::Up),
        KeyCode::Char('j') => Some(WizardEvent::Down),
        KeyCode::Char('q') => Some(WizardEvent::Cancel),
        _ => None,
    }
}

/// Wizard state plus everything needed to draw it
pub struct WizardApp<'c> {
    wizard: Wizard<'c>,
    theme: Theme,
    list_state: ListState,
}

impl<'c> WizardApp<'c> {
    pub fn new(catalog: &'c Catalog, theme: Theme) -> Self {
        Self {
            wizard: Wizard::new(catalog),
            theme,
            list_state: ListState::default(),
        }
    }

    /// Apply one keystroke; `Some` once the wizard is over
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<Option<WizardOutcome>> {
        if key.kind != KeyEventKind::Press {
            return Ok(None);
        }
        let Some(event) = map_key(key, self.wizard.stage()) else {
            return Ok(None);
        };

        match self.wizard.handle(event)? {
            Transition::Cancelled => Ok(Some(WizardOutcome::Cancelled)),
            Transition::Finished(request) => Ok(Some(WizardOutcome::Clone {
                request,
                banner: self.wizard.banner().to_vec(),
            })),
            Transition::Advanced(_) => {
                self.list_state = ListState::default();
                Ok(None)
            }
            Transition::Stay => Ok(None),
        }
    }

    fn event_loop<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<WizardOutcome> {
        loop {
            terminal
                .draw(|frame| self.render(frame))
                .context("failed to draw wizard")?;

            if event::poll(POLL_INTERVAL)? {
                if let Event::Key(key) = event::read()? {
                    if let Some(outcome) = self.handle_key(key)? {
                        return Ok(outcome);
                    }
                }
            }
        }
    }

    pub fn render(&mut self, frame: &mut Frame) {
        let banner = self.wizard.banner();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(banner.len() as u16), // Confirmed choices
                Constraint::Length(2),                   // Title
                Constraint::Min(3),                      // List or input
                Constraint::Length(1),                   // Help
            ])
            .split(frame.area());

        let banner_lines: Vec<Line> = banner
            .iter()
            .map(|line| match line.split_once(' ') {
                Some((mark, rest)) => Line::from(vec![
                    Span::styled(mark.to_string(), self.theme.check_mark),
                    Span::raw(format!(" {}", rest)),
                ]),
                None => Line::from(line.clone()),
            })
            .collect();
        frame.render_widget(Paragraph::new(banner_lines), chunks[0]);

        match self.wizard.active_list() {
            Some(list) => {
                let title = Paragraph::new(list.title().to_string()).style(self.theme.title);
                frame.render_widget(title, chunks[1]);
                self.list_state.select(Some(list.cursor()));
                let items = list_items(list, &self.theme);
                frame.render_stateful_widget(List::new(items), chunks[2], &mut self.list_state);
                frame.render_widget(
                    Paragraph::new("↑/k up • ↓/j down • enter select • q quit")
                        .style(self.theme.help),
                    chunks[3],
                );
            }
            None if self.wizard.stage() == Stage::EnterPath => {
                self.render_path(frame, chunks[1], chunks[2]);
                frame.render_widget(
                    Paragraph::new("enter confirm • esc quit").style(self.theme.help),
                    chunks[3],
                );
            }
            None => {}
        }
    }

    fn render_path(&self, frame: &mut Frame, title_area: Rect, input_area: Rect) {
        let input = self.wizard.path_input();

        let title = match input.error() {
            Some(error) => Paragraph::new(error.to_string()).style(self.theme.error),
            None => Paragraph::new(input.title().to_string()).style(self.theme.title),
        };
        frame.render_widget(title, title_area);

        let text = if input.value().is_empty() {
            Span::styled(input.placeholder().to_string(), self.theme.description)
        } else {
            Span::raw(input.value().to_string())
        };
        frame.render_widget(
            Paragraph::new(Line::from(vec![Span::raw("> "), text])),
            input_area,
        );

        frame.set_cursor_position((
            input_area.x + 2 + input.cursor() as u16,
            input_area.y,
        ));
    }
}

fn list_items<'a>(list: &'a dyn ListView, theme: &Theme) -> Vec<ListItem<'a>> {
    (0..list.len())
        .filter_map(|index| list.row(index).map(|row| (index, row)))
        .map(|(index, (title, description))| {
            let selected = index == list.cursor();
            let (prefix, style) = if selected {
                ("> ", theme.selected)
            } else {
                ("  ", theme.item)
            };

            let mut lines = vec![Line::from(Span::styled(
                format!("{}{}. {}", prefix, index + 1, title),
                style,
            ))];
            if let Some(description) = description {
                let style = if selected {
                    theme.selected
                } else {
                    theme.description
                };
                lines.push(Line::from(Span::styled(
                    format!("     {}", description),
                    style,
                )));
            }
            ListItem::new(lines)
        })
        .collect()
}

/// Leave the alternate screen and raw mode; safe to call more than once
pub fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
}

/// Restores the terminal when dropped, whichever way the wizard exits
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode().context("failed to enable raw mode")?;
        let guard = TerminalGuard;
        execute!(io::stdout(), EnterAlternateScreen).context("failed to enter alternate screen")?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        restore_terminal();
    }
}

/// Run the wizard on the real terminal until it finishes or is cancelled
pub fn run_wizard(catalog: &Catalog, theme: Theme) -> Result<WizardOutcome> {
    let _guard = TerminalGuard::enter()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend).context("failed to initialize terminal")?;

    let mut app = WizardApp::new(catalog, theme);
    app.event_loop(&mut terminal)
}

//! Terminal front end: the ratatui wizard and cliclack reporting
//!
//! This module is optional and only available when the `tui` feature is enabled.

mod app;
mod prompts;
mod theme;

pub use app::{map_key, restore_terminal, run_wizard, WizardApp, WizardOutcome};
pub use prompts::{run, run_with};
pub use theme::Theme;

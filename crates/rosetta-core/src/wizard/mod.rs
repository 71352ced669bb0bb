//! Headless selection wizard
//!
//! The state machine consumes decoded input events and owns the widget state;
//! rendering and keystroke decoding live in the `tui` module.

pub mod state;
pub mod widgets;

pub use state::{Selection, Stage, Transition, Wizard, WizardEvent};
pub use widgets::{ListEntry, ListView, ListWidget, TextInput};

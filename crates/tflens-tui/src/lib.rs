//! tflens-tui - Terminal UI for tflens
//!
//! Draws the run log tree, the timeline chart and the selection dialogs on
//! top of the state and update loop from tflens-app.

pub mod event;
pub mod layout;
pub mod render;
pub mod runner;
pub mod terminal;
pub mod theme;
pub mod widgets;

#[cfg(test)]
pub mod test_utils;

pub use runner::run;

//! Terminal host for the home screen.
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard input handling
//! - `render` - Tab bar, page and analytics panels
//! - `status` - Status bar widget

mod input;
mod loop_runner;
mod render;
mod status;

pub use loop_runner::{run, Action};

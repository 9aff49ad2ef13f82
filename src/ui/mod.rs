//! Terminal User Interface module.
//!
//! # Module Structure
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard input handling
//! - `render` - View rendering dispatch
//! - `articles` - Article list widget
//! - `facets` - Category, tag, and recent-article panels
//! - `chips` - Active filter chips
//! - `reader` - Article reader with comments
//! - `compose` - Comment form overlay
//! - `status` - Status bar widget
//! - `help` - Keybinding help overlay

mod articles;
mod chips;
mod compose;
mod facets;
mod help;
mod input;
mod loop_runner;
mod reader;
mod render;
mod status;

pub use loop_runner::{run, Action};

//! blogdeck: a terminal blog browser.
//!
//! Articles are browsed with free-text search plus tag and category filters.
//! Comments and the light/dark preference are kept in a local SQLite
//! key-value store, so they survive restarts.

pub mod app;
pub mod blog;
pub mod browser;
pub mod catalog;
pub mod config;
pub mod filter;
pub mod keybindings;
pub mod storage;
pub mod theme;
pub mod ui;
pub mod util;

//! Text helpers for terminal rendering.
//!
//! - **HTML**: article bodies are HTML; the terminal shows plain paragraphs
//!   and short excerpts
//! - **Width**: Unicode-aware display width and truncation
//! - **Sanitizing**: stripping control characters from user-supplied text
//!
//! ```
//! use blogdeck::util::{display_width, excerpt, truncate_to_width};
//!
//! assert_eq!(excerpt("<p>Hello <b>there</b></p>", 5), "Hello…");
//! assert_eq!(display_width("Hello"), 5);
//! assert_eq!(truncate_to_width("Long article title", 7), "Long...");
//! ```

mod text;

pub use text::{
    display_width, excerpt, html_to_paragraphs, html_to_text, strip_control_chars,
    truncate_to_width,
};

/// Maximum length of the search box contents.
pub const MAX_SEARCH_QUERY_LENGTH: usize = 256;

/// Maximum length of a comment author name.
pub const MAX_COMMENT_NAME_LENGTH: usize = 80;

/// Maximum length of a comment body.
pub const MAX_COMMENT_TEXT_LENGTH: usize = 2000;

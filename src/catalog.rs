//! Seed articles.
//!
//! The catalog is only consulted when no article snapshot exists yet. After
//! the first run the stored snapshot is what the browser shows, even if the
//! catalog changes (start with `--reset-db` to re-seed).
use std::path::Path;

use thiserror::Error;

use crate::storage::{validate_articles, Article, ArticleError};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON in catalog file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid article in catalog: {0}")]
    Invalid(#[from] ArticleError),

    #[error("Catalog file too large: {0}")]
    TooLarge(String),
}

/// Maximum catalog file size (8 MB).
const MAX_FILE_SIZE: u64 = 8 * 1_048_576;

fn article(
    id: &str,
    title: &str,
    date: &str,
    content: &str,
    image: &str,
    tags: &[&str],
    category: &str,
) -> Article {
    Article {
        id: id.to_string(),
        title: title.to_string(),
        date: date.to_string(),
        content: content.to_string(),
        image: image.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        category: category.to_string(),
    }
}

/// The articles shipped with the application.
pub fn builtin() -> Vec<Article> {
    vec![
        article(
            "p1",
            "My First Blog Post",
            "2025-01-01",
            "<p>Welcome to this demo blog. This post introduces the blog features: \
             search, tags, dark mode and comments stored locally.</p>\
             <p>Experiment with the interface. Everything runs on your machine.</p>",
            "https://picsum.photos/id/1015/900/500",
            &["intro", "feature"],
            "General",
        ),
        article(
            "p2",
            "A Journey to the Mountains",
            "2025-01-10",
            "<p>A short travel-themed post. Mountains, fresh air, and stories from the trail.</p>\
             <p>Use tags and categories to filter posts.</p>",
            "https://picsum.photos/id/1005/900/500",
            &["travel", "outdoors"],
            "Travel",
        ),
        article(
            "p3",
            "Technology and the Future",
            "2025-01-20",
            "<p>Thoughts on technology trends. Build, experiment, and iterate.</p>",
            "https://picsum.photos/id/1050/900/500",
            &["tech", "future"],
            "Technology",
        ),
    ]
}

/// Read a catalog from a JSON array of articles.
///
/// The file is validated as a whole: one bad record rejects the catalog.
pub fn load_file(path: &Path) -> Result<Vec<Article>, CatalogError> {
    let meta = std::fs::metadata(path)?;
    if meta.len() > MAX_FILE_SIZE {
        return Err(CatalogError::TooLarge(format!(
            "Catalog file is {} bytes (max {} bytes)",
            meta.len(),
            MAX_FILE_SIZE
        )));
    }

    let content = std::fs::read_to_string(path)?;
    let articles: Vec<Article> = serde_json::from_str(&content)?;
    validate_articles(&articles)?;

    tracing::info!(path = %path.display(), count = articles.len(), "Loaded article catalog");
    Ok(articles)
}

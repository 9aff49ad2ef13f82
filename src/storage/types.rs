use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Database-specific errors with user-friendly messages
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Another instance of the application has locked the database
    #[error("Another instance of blogdeck appears to be running. Please close it and try again.")]
    InstanceLocked,

    /// Migration failed
    #[error("Database migration failed: {0}")]
    Migration(String),

    /// Generic database error
    #[error("Database error: {0}")]
    Other(#[from] sqlx::Error),
}

impl DatabaseError {
    /// Check if a sqlx error indicates database locking
    pub(crate) fn from_sqlx(err: sqlx::Error) -> Self {
        let error_string = err.to_string().to_lowercase();

        // SQLITE_BUSY (5), SQLITE_LOCKED (6), SQLITE_CANTOPEN (14)
        if error_string.contains("database is locked")
            || error_string.contains("database table is locked")
            || error_string.contains("sqlite_busy")
            || error_string.contains("sqlite_locked")
            || error_string.contains("unable to open database file")
        {
            return DatabaseError::InstanceLocked;
        }

        DatabaseError::Other(err)
    }
}

/// Schema violations found when validating an article record.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArticleError {
    #[error("Article id is empty")]
    EmptyId,

    #[error("Article '{id}' has an invalid date '{date}' (expected YYYY-MM-DD)")]
    InvalidDate { id: String, date: String },

    #[error("Article '{id}' has an invalid image URL '{image}'")]
    InvalidImage { id: String, image: String },

    #[error("Duplicate article id '{0}'")]
    DuplicateId(String),
}

// ============================================================================
// Data Structures
// ============================================================================

/// A single blog article.
///
/// `date` is kept as the ISO `YYYY-MM-DD` string it is stored as: ordering by
/// plain string comparison is the same as ordering by calendar date.
/// `content` is HTML rich text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    pub title: String,
    pub date: String,
    pub content: String,
    pub image: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub category: String,
}

impl AsRef<Article> for Article {
    fn as_ref(&self) -> &Article {
        self
    }
}

impl Article {
    /// Check the record against the snapshot schema.
    ///
    /// The image may be empty; when present it must be an absolute URL or a
    /// well-formed relative reference such as `images/cover.png`.
    pub fn validate(&self) -> Result<(), ArticleError> {
        if self.id.trim().is_empty() {
            return Err(ArticleError::EmptyId);
        }

        // Zero-padded form only: "2025-1-5" parses but breaks string ordering.
        if self.date.len() != 10 || NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").is_err() {
            return Err(ArticleError::InvalidDate {
                id: self.id.clone(),
                date: self.date.clone(),
            });
        }

        if !self.image.is_empty() && !is_image_reference(&self.image) {
            return Err(ArticleError::InvalidImage {
                id: self.id.clone(),
                image: self.image.clone(),
            });
        }

        Ok(())
    }
}

/// An absolute URL, or a relative reference that resolves against a page URL.
fn is_image_reference(image: &str) -> bool {
    match url::Url::parse(image) {
        Ok(_) => true,
        Err(url::ParseError::RelativeUrlWithoutBase) => url::Url::parse("http://localhost/")
            .and_then(|base| base.join(image))
            .is_ok(),
        Err(_) => false,
    }
}

/// Validate a whole article collection: every record plus id uniqueness.
pub fn validate_articles(articles: &[Article]) -> Result<(), ArticleError> {
    let mut seen = HashSet::with_capacity(articles.len());
    for article in articles {
        article.validate()?;
        if !seen.insert(article.id.as_str()) {
            return Err(ArticleError::DuplicateId(article.id.clone()));
        }
    }
    Ok(())
}

/// A reader comment attached to one article.
///
/// `when` is already formatted for display; it is never parsed back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub name: String,
    pub text: String,
    pub when: String,
}

/// Comments grouped by article id, each sequence newest first.
pub type CommentIndex = BTreeMap<String, Vec<Comment>>;

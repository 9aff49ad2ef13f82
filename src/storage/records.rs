//! Typed records on top of local storage.
//!
//! Three independent records share the `local_storage` table under distinct
//! keys. Every failure below this layer (missing row, corrupt JSON, schema
//! violation, SQLite error) is logged and turned into "no value"; callers
//! always supply their own default.
use serde::{de::DeserializeOwned, Serialize};

use super::schema::Database;
use super::types::{validate_articles, Article, CommentIndex};
use crate::theme::ThemeVariant;

/// Storage keys. Namespaced and versioned so records never collide.
pub mod keys {
    /// Article snapshot: `[Article]`.
    pub const ARTICLES: &str = "demo_blog_posts_v1";
    /// Comment index: `{ articleId: [Comment] }`.
    pub const COMMENTS: &str = "demo_blog_comments_v1";
    /// Theme preference: `"light"` or `"dark"`.
    pub const THEME: &str = "demo_blog_theme_v1";
}

/// Typed, failure-absorbing accessor over the local storage database.
#[derive(Clone)]
pub struct Store {
    db: Database,
}

impl Store {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// The underlying database handle.
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Whether a record exists under `key`, regardless of whether it parses.
    ///
    /// Returns `None` when storage could not be read, so callers can tell
    /// "absent" apart from "unknown".
    pub async fn contains(&self, key: &str) -> Option<bool> {
        match self.db.get_item(key).await {
            Ok(value) => Some(value.is_some()),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Local storage read failed");
                None
            }
        }
    }

    /// Load and parse the record under `key`.
    ///
    /// Returns `None` when the key is absent or the payload cannot be read
    /// or parsed.
    pub async fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.db.get_item(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!(key = %key, "No stored record");
                return None;
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Local storage read failed, using default");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Stored record is corrupt, using default");
                None
            }
        }
    }

    /// Serialize `value` and write it under `key`.
    ///
    /// The write has completed when this returns. Failures are logged and
    /// otherwise ignored, so callers must keep their own copy of anything
    /// they still need this session.
    pub async fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Failed to serialize record");
                return;
            }
        };

        if let Err(e) = self.db.set_item(key, &raw).await {
            tracing::warn!(key = %key, error = %e, "Local storage write failed");
        }
    }

    // ========================================================================
    // Record Accessors
    // ========================================================================

    /// Load the article snapshot, rejecting it as a whole if any record
    /// violates the schema.
    pub async fn load_articles(&self) -> Option<Vec<Article>> {
        let articles: Vec<Article> = self.load(keys::ARTICLES).await?;
        match validate_articles(&articles) {
            Ok(()) => Some(articles),
            Err(e) => {
                tracing::warn!(error = %e, "Stored article snapshot failed validation, using default");
                None
            }
        }
    }

    pub async fn save_articles(&self, articles: &[Article]) {
        self.save(keys::ARTICLES, articles).await;
    }

    /// `None` when storage could not be read.
    pub async fn has_articles(&self) -> Option<bool> {
        self.contains(keys::ARTICLES).await
    }

    /// Load the comment index; a missing or corrupt index reads as empty.
    pub async fn load_comments(&self) -> CommentIndex {
        self.load(keys::COMMENTS).await.unwrap_or_default()
    }

    pub async fn save_comments(&self, index: &CommentIndex) {
        self.save(keys::COMMENTS, index).await;
    }

    pub async fn load_theme(&self) -> Option<ThemeVariant> {
        self.load(keys::THEME).await
    }

    pub async fn save_theme(&self, theme: ThemeVariant) {
        self.save(keys::THEME, &theme).await;
    }
}

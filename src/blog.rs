//! The command/query surface of the application.
//!
//! `Blog` ties together the persisted records (article snapshot, comments,
//! theme) and the in-memory view state. The terminal shell talks only to
//! this type.
use std::sync::Arc;

use crate::browser::{Browser, Mode, Rendered, DEFAULT_RECENT_LIMIT};
use crate::storage::{Article, Comment, CommentRepository, Store};
use crate::theme::ThemeVariant;

/// Settings that come from the config file.
#[derive(Debug, Clone, Copy)]
pub struct BlogOptions {
    pub recent_limit: usize,
    /// Theme used when none has been stored yet.
    pub default_theme: ThemeVariant,
}

impl Default for BlogOptions {
    fn default() -> Self {
        Self {
            recent_limit: DEFAULT_RECENT_LIMIT,
            default_theme: ThemeVariant::Light,
        }
    }
}

pub struct Blog {
    store: Store,
    comments: CommentRepository,
    browser: Browser,
    theme: ThemeVariant,
}

impl Blog {
    /// Load the blog from `store`, seeding the snapshot on first run.
    ///
    /// The seed is written only when the store reports that no snapshot
    /// record exists. Once one does, it is what gets shown, even if the seed
    /// has since changed. An unreadable snapshot falls back to the seed for
    /// this session without overwriting the stored record.
    pub async fn open(store: Store, seed: Vec<Article>, options: BlogOptions) -> Self {
        match store.has_articles().await {
            Some(false) => {
                tracing::info!(count = seed.len(), "Seeding article snapshot");
                store.save_articles(&seed).await;
            }
            Some(true) => {}
            None => tracing::warn!("Could not check for a stored snapshot, not seeding"),
        }

        let articles = match store.load_articles().await {
            Some(articles) => articles,
            None => {
                tracing::warn!("Article snapshot unavailable, showing seed articles");
                seed
            }
        };

        let theme = store.load_theme().await.unwrap_or(options.default_theme);

        tracing::info!(
            articles = articles.len(),
            theme = theme.as_str(),
            "Blog opened"
        );

        Self {
            comments: CommentRepository::load(store.clone()).await,
            store,
            browser: Browser::with_recent_limit(articles, options.recent_limit),
            theme,
        }
    }

    pub fn browser(&self) -> &Browser {
        &self.browser
    }

    pub fn mode(&self) -> Mode {
        self.browser.mode()
    }

    pub fn current_article(&self) -> Option<&Arc<Article>> {
        self.browser.current_article()
    }

    // ========================================================================
    // View State
    // ========================================================================

    pub fn render(&mut self) -> &Rendered {
        self.browser.render()
    }

    /// Last render output; stale while an article is open.
    pub fn rendered(&self) -> &Rendered {
        self.browser.rendered()
    }

    pub fn open_article(&mut self, id: &str) -> bool {
        self.browser.open_article(id)
    }

    pub fn close_article(&mut self) {
        self.browser.close_article();
    }

    pub fn set_query(&mut self, text: &str) {
        self.browser.set_query(text);
    }

    pub fn set_tag(&mut self, tag: Option<&str>) {
        self.browser.set_tag(tag);
    }

    pub fn set_category(&mut self, category: Option<&str>) {
        self.browser.set_category(category);
    }

    pub fn toggle_tag(&mut self, tag: &str) {
        self.browser.toggle_tag(tag);
    }

    pub fn browse_tag(&mut self, tag: &str) {
        self.browser.browse_tag(tag);
    }

    pub fn clear_query(&mut self) {
        self.browser.clear_query();
    }

    pub fn clear_tag(&mut self) {
        self.browser.clear_tag();
    }

    pub fn clear_category(&mut self) {
        self.browser.clear_category();
    }

    pub fn clear_filters(&mut self) {
        self.browser.clear_filters();
    }

    // ========================================================================
    // Comments
    // ========================================================================

    pub fn list_comments(&self, article_id: &str) -> Vec<Comment> {
        self.comments.list(article_id)
    }

    /// Returns `false` when the comment was rejected (blank name or text).
    pub async fn add_comment(&mut self, article_id: &str, name: &str, text: &str) -> bool {
        self.comments.add(article_id, name, text).await
    }

    pub async fn clear_comments(&mut self, article_id: &str) {
        self.comments.clear(article_id).await;
    }

    // ========================================================================
    // Theme
    // ========================================================================

    pub fn theme(&self) -> ThemeVariant {
        self.theme
    }

    pub async fn set_theme(&mut self, theme: ThemeVariant) {
        self.theme = theme;
        self.store.save_theme(theme).await;
        tracing::debug!(theme = theme.as_str(), "Theme changed");
    }

    pub async fn toggle_theme(&mut self) -> ThemeVariant {
        let next = self.theme.toggled();
        self.set_theme(next).await;
        next
    }
}

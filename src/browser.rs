//! View-state controller.
//!
//! `Browser` owns the article collection and the filter state, and is the
//! only thing that mutates them. It has two modes: Listing (the filtered
//! article list) and Viewing (one article). Every mutation made while
//! Listing is followed by [`Browser::render`]; mutations made while Viewing
//! only take effect on screen once the user returns to the list.
use std::sync::Arc;

use crate::filter;
use crate::storage::Article;

/// Default number of entries in the "recent" list.
pub const DEFAULT_RECENT_LIMIT: usize = 5;

// ============================================================================
// State Types
// ============================================================================

/// Which of the two views is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Listing,
    Viewing,
}

/// The filters currently in effect. Each one is shown to the user as a chip
/// that can be removed on its own.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveFilters {
    pub query: Option<String>,
    pub tag: Option<String>,
    pub category: Option<String>,
}

impl ActiveFilters {
    pub fn is_empty(&self) -> bool {
        self.query.is_none() && self.tag.is_none() && self.category.is_none()
    }
}

/// Output of one render pass, handed to the presentation layer as plain data.
#[derive(Debug, Clone, Default)]
pub struct Rendered {
    /// Filtered articles, newest first.
    pub visible: Vec<Arc<Article>>,
    /// Head of `visible`, at most `recent_limit` entries.
    pub recent: Vec<Arc<Article>>,
    /// Every category in the full collection, first-occurrence order.
    pub categories: Vec<String>,
    /// Every tag in the full collection, ascending.
    pub tags: Vec<String>,
    pub active_filters: ActiveFilters,
}

/// In-memory UI state. Never persisted.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    /// Normalized search text (trimmed, lowercased).
    pub query: String,
    pub active_tag: Option<String>,
    pub active_category: Option<String>,
    /// Index into `articles` of the article being viewed.
    current: Option<usize>,
    pub articles: Vec<Arc<Article>>,
}

impl ViewState {
    pub fn new(articles: Vec<Article>) -> Self {
        Self {
            articles: articles.into_iter().map(Arc::new).collect(),
            ..Self::default()
        }
    }

    pub fn mode(&self) -> Mode {
        if self.current.is_some() {
            Mode::Viewing
        } else {
            Mode::Listing
        }
    }

    pub fn current_article(&self) -> Option<&Arc<Article>> {
        self.current.and_then(|i| self.articles.get(i))
    }

    pub fn active_filters(&self) -> ActiveFilters {
        ActiveFilters {
            query: (!self.query.is_empty()).then(|| self.query.clone()),
            tag: self.active_tag.clone(),
            category: self.active_category.clone(),
        }
    }
}

/// Blank tags and categories mean "no filter".
fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_owned)
}

// ============================================================================
// Browser
// ============================================================================

pub struct Browser {
    state: ViewState,
    rendered: Rendered,
    recent_limit: usize,
}

impl Browser {
    /// Create a controller in Listing mode and render once.
    pub fn new(articles: Vec<Article>) -> Self {
        Self::with_recent_limit(articles, DEFAULT_RECENT_LIMIT)
    }

    pub fn with_recent_limit(articles: Vec<Article>, recent_limit: usize) -> Self {
        let mut browser = Self {
            state: ViewState::new(articles),
            rendered: Rendered::default(),
            recent_limit,
        };
        browser.render();
        browser
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn mode(&self) -> Mode {
        self.state.mode()
    }

    pub fn current_article(&self) -> Option<&Arc<Article>> {
        self.state.current_article()
    }

    /// Look up an article in the full collection.
    pub fn article(&self, id: &str) -> Option<&Arc<Article>> {
        self.state.articles.iter().find(|a| a.id == id)
    }

    /// Output of the most recent render pass.
    ///
    /// While Viewing this may lag behind filter changes; it catches up when
    /// the user returns to the list.
    pub fn rendered(&self) -> &Rendered {
        &self.rendered
    }

    /// Recompute the visible list and the derived collections.
    ///
    /// Facets (tags, categories) are taken from the full collection so that
    /// a narrowed list never hides the options needed to broaden it again.
    pub fn render(&mut self) -> &Rendered {
        let s = &self.state;
        let visible: Vec<Arc<Article>> = filter::visible(
            &s.articles,
            &s.query,
            s.active_tag.as_deref(),
            s.active_category.as_deref(),
        )
        .into_iter()
        .cloned()
        .collect();
        let recent = visible.iter().take(self.recent_limit).cloned().collect();

        self.rendered = Rendered {
            recent,
            visible,
            categories: filter::all_categories(&s.articles),
            tags: filter::all_tags(&s.articles),
            active_filters: s.active_filters(),
        };

        tracing::trace!(
            visible = self.rendered.visible.len(),
            query = %s.query,
            tag = ?s.active_tag,
            category = ?s.active_category,
            "Rendered article list"
        );
        &self.rendered
    }

    fn render_if_listing(&mut self) {
        if self.mode() == Mode::Listing {
            self.render();
        }
    }

    // ========================================================================
    // Mode Transitions
    // ========================================================================

    /// Switch to viewing the article with `id`.
    ///
    /// Returns `false` and changes nothing when the id is unknown.
    pub fn open_article(&mut self, id: &str) -> bool {
        match self.state.articles.iter().position(|a| a.id == id) {
            Some(index) => {
                self.state.current = Some(index);
                tracing::debug!(article_id = %id, "Opened article");
                true
            }
            None => {
                tracing::debug!(article_id = %id, "Ignoring open of unknown article");
                false
            }
        }
    }

    /// Return to the list and bring it up to date with the current filters.
    pub fn close_article(&mut self) {
        self.state.current = None;
        self.render();
    }

    // ========================================================================
    // Filter Mutations
    // ========================================================================

    pub fn set_query(&mut self, text: &str) {
        self.state.query = filter::normalize_query(text);
        self.render_if_listing();
    }

    pub fn set_tag(&mut self, tag: Option<&str>) {
        self.state.active_tag = non_empty(tag);
        self.render_if_listing();
    }

    pub fn set_category(&mut self, category: Option<&str>) {
        self.state.active_category = non_empty(category);
        self.render_if_listing();
    }

    /// Select `tag`, or clear it if it is already the active tag.
    pub fn toggle_tag(&mut self, tag: &str) {
        if self.state.active_tag.as_deref() == Some(tag) {
            self.set_tag(None);
        } else {
            self.set_tag(Some(tag));
        }
    }

    /// Filter by `tag` and go back to the list (tag links inside an article).
    pub fn browse_tag(&mut self, tag: &str) {
        self.state.active_tag = non_empty(Some(tag));
        self.close_article();
    }

    pub fn clear_query(&mut self) {
        self.set_query("");
    }

    pub fn clear_tag(&mut self) {
        self.set_tag(None);
    }

    pub fn clear_category(&mut self) {
        self.set_category(None);
    }

    pub fn clear_filters(&mut self) {
        self.state.query.clear();
        self.state.active_tag = None;
        self.state.active_category = None;
        self.render_if_listing();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn article(id: &str, date: &str, tags: &[&str], category: &str) -> Article {
        Article {
            id: id.to_string(),
            title: format!("Post {id}"),
            date: date.to_string(),
            content: format!("<p>Body of {id}</p>"),
            image: String::new(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            category: category.to_string(),
        }
    }

    fn two_posts() -> Browser {
        Browser::new(vec![
            article("p1", "2025-01-01", &["intro"], "General"),
            article("p2", "2025-01-20", &["tech"], "Technology"),
        ])
    }

    fn visible_ids(b: &Browser) -> Vec<&str> {
        b.rendered().visible.iter().map(|a| a.id.as_str()).collect()
    }

    #[test]
    fn test_initial_render_lists_newest_first() {
        let b = two_posts();
        assert_eq!(b.mode(), Mode::Listing);
        assert_eq!(visible_ids(&b), vec!["p2", "p1"]);
        assert!(b.rendered().active_filters.is_empty());
    }

    #[test]
    fn test_set_tag_then_toggle_clears() {
        let mut b = two_posts();
        b.set_tag(Some("intro"));
        assert_eq!(visible_ids(&b), vec!["p1"]);

        b.toggle_tag("intro");
        assert_eq!(b.state().active_tag, None);
        assert_eq!(visible_ids(&b), vec!["p2", "p1"]);
    }

    #[test]
    fn test_toggle_twice_restores_original() {
        let mut b = two_posts();
        b.set_tag(Some("tech"));
        b.toggle_tag("intro");
        assert_eq!(b.state().active_tag.as_deref(), Some("intro"));
        b.toggle_tag("intro");
        assert_eq!(b.state().active_tag, None);

        let mut b = two_posts();
        b.toggle_tag("intro");
        b.toggle_tag("intro");
        assert_eq!(b.state().active_tag, None);
    }

    #[test]
    fn test_set_query_normalizes() {
        let mut b = two_posts();
        b.set_query("  BODY OF P2 ");
        assert_eq!(b.state().query, "body of p2");
        assert_eq!(visible_ids(&b), vec!["p2"]);
        assert_eq!(
            b.rendered().active_filters.query.as_deref(),
            Some("body of p2")
        );

        b.set_query("   ");
        assert_eq!(b.rendered().active_filters.query, None);
        assert_eq!(visible_ids(&b), vec!["p2", "p1"]);
    }

    #[test]
    fn test_tag_and_category_combine() {
        let mut b = Browser::new(vec![
            article("a", "2025-01-01", &["rust"], "Technology"),
            article("b", "2025-01-02", &["rust"], "General"),
        ]);
        b.set_tag(Some("rust"));
        b.set_category(Some("General"));
        assert_eq!(visible_ids(&b), vec!["b"]);

        let filters = &b.rendered().active_filters;
        assert_eq!(filters.tag.as_deref(), Some("rust"));
        assert_eq!(filters.category.as_deref(), Some("General"));
    }

    #[test]
    fn test_blank_tag_and_category_mean_unset() {
        let mut b = two_posts();
        b.set_tag(Some(""));
        b.set_category(Some(""));
        assert_eq!(b.state().active_tag, None);
        assert_eq!(b.state().active_category, None);
        assert_eq!(visible_ids(&b).len(), 2);
    }

    #[test]
    fn test_facets_ignore_filters() {
        let mut b = Browser::new(vec![
            article("a", "2025-01-01", &["x", "y"], "Travel"),
            article("b", "2025-01-02", &["z"], "General"),
        ]);
        let tags = b.rendered().tags.clone();
        let categories = b.rendered().categories.clone();

        b.set_tag(Some("z"));
        b.set_category(Some("General"));
        b.set_query("post b");

        assert_eq!(b.rendered().visible.len(), 1);
        assert_eq!(b.rendered().tags, tags);
        assert_eq!(b.rendered().categories, categories);
        assert_eq!(categories, vec!["Travel", "General"]);
    }

    #[test]
    fn test_recent_is_head_of_visible() {
        let articles: Vec<Article> = (1..=8)
            .map(|d| article(&format!("p{d}"), &format!("2025-01-0{d}"), &[], "General"))
            .collect();
        let b = Browser::new(articles);
        let recent: Vec<&str> = b.rendered().recent.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(recent, vec!["p8", "p7", "p6", "p5", "p4"]);

        let b = Browser::with_recent_limit(
            vec![article("only", "2025-01-01", &[], "General")],
            DEFAULT_RECENT_LIMIT,
        );
        assert_eq!(b.rendered().recent.len(), 1);
    }

    #[test]
    fn test_recent_follows_filters() {
        let mut b = two_posts();
        b.set_category(Some("General"));
        let recent: Vec<&str> = b.rendered().recent.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(recent, vec!["p1"]);
    }

    #[test]
    fn test_open_unknown_article_is_noop() {
        let mut b = two_posts();
        assert!(!b.open_article("nope"));
        assert_eq!(b.mode(), Mode::Listing);
        assert!(b.current_article().is_none());
    }

    #[test]
    fn test_open_and_close_article() {
        let mut b = two_posts();
        assert!(b.open_article("p1"));
        assert_eq!(b.mode(), Mode::Viewing);
        assert_eq!(b.current_article().map(|a| a.id.as_str()), Some("p1"));

        // Switching articles while viewing is allowed.
        assert!(b.open_article("p2"));
        assert_eq!(b.current_article().map(|a| a.id.as_str()), Some("p2"));

        b.close_article();
        assert_eq!(b.mode(), Mode::Listing);
        assert!(b.current_article().is_none());

        // Closing again is harmless.
        b.close_article();
        assert_eq!(b.mode(), Mode::Listing);
    }

    #[test]
    fn test_filters_while_viewing_apply_on_close() {
        let mut b = two_posts();
        b.open_article("p1");

        b.set_tag(Some("tech"));
        assert_eq!(b.state().active_tag.as_deref(), Some("tech"));
        assert_eq!(b.mode(), Mode::Viewing);
        // Not re-filtered yet.
        assert_eq!(visible_ids(&b), vec!["p2", "p1"]);

        b.close_article();
        assert_eq!(visible_ids(&b), vec!["p2"]);
    }

    #[test]
    fn test_browse_tag_returns_to_list() {
        let mut b = two_posts();
        b.open_article("p1");
        b.browse_tag("intro");

        assert_eq!(b.mode(), Mode::Listing);
        assert_eq!(visible_ids(&b), vec!["p1"]);
    }

    #[test]
    fn test_clear_individual_filters() {
        let mut b = two_posts();
        b.set_query("post");
        b.set_tag(Some("intro"));
        b.set_category(Some("General"));

        b.clear_tag();
        assert_eq!(b.rendered().active_filters.tag, None);
        assert!(b.rendered().active_filters.query.is_some());

        b.clear_category();
        b.clear_query();
        assert!(b.rendered().active_filters.is_empty());
        assert_eq!(visible_ids(&b).len(), 2);
    }

    #[test]
    fn test_clear_filters() {
        let mut b = two_posts();
        b.set_query("p1");
        b.set_tag(Some("intro"));
        b.clear_filters();
        assert!(b.rendered().active_filters.is_empty());
        assert_eq!(visible_ids(&b), vec!["p2", "p1"]);
    }

    #[test]
    fn test_article_lookup() {
        let b = two_posts();
        assert_eq!(b.article("p2").map(|a| a.title.as_str()), Some("Post p2"));
        assert!(b.article("p3").is_none());
    }
}

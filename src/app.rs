use crate::blog::Blog;
use crate::browser::Mode;
use crate::keybindings::KeybindingRegistry;
use crate::storage::{Article, Comment};
use crate::theme::{StyleMap, ThemeVariant};
use ratatui::style::Style;
use std::borrow::Cow;
use std::sync::Arc;
use tokio::time::Instant;

/// Maximum scroll offset for the reader view (ratatui u16 limit).
pub const MAX_SCROLL: usize = u16::MAX as usize;

/// How long a status message stays visible.
const STATUS_TTL_SECS: u64 = 3;

// ============================================================================
// View and Focus Enums
// ============================================================================

/// Which screen is showing. Follows the blog's mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Browse,
    Reader,
}

/// Which panel has focus in Browse view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Articles,
    Categories,
    Tags,
    Recent,
}

impl Focus {
    /// Tab order.
    pub fn next(self) -> Self {
        match self {
            Self::Articles => Self::Categories,
            Self::Categories => Self::Tags,
            Self::Tags => Self::Recent,
            Self::Recent => Self::Articles,
        }
    }
}

// ============================================================================
// Comment Draft
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Name,
    Text,
}

/// The comment form shown over the reader.
#[derive(Debug, Clone)]
pub struct CommentDraft {
    pub name: String,
    pub text: String,
    pub field: DraftField,
}

impl CommentDraft {
    pub fn new(name: String) -> Self {
        // Skip straight to the comment when the name is remembered.
        let field = if name.is_empty() {
            DraftField::Name
        } else {
            DraftField::Text
        };
        Self {
            name,
            text: String::new(),
            field,
        }
    }

    pub fn active_mut(&mut self) -> &mut String {
        match self.field {
            DraftField::Name => &mut self.name,
            DraftField::Text => &mut self.text,
        }
    }

    pub fn switch_field(&mut self) {
        self.field = match self.field {
            DraftField::Name => DraftField::Text,
            DraftField::Text => DraftField::Name,
        };
    }
}

// ============================================================================
// App
// ============================================================================

pub struct App {
    pub blog: Blog,

    /// Active style map, rebuilt when the theme changes.
    pub theme: StyleMap,
    pub keybindings: KeybindingRegistry,
    /// Characters of plain text in each list excerpt.
    pub excerpt_length: usize,

    // Browse state
    pub focus: Focus,
    pub selected_article: usize,
    /// Index into the category panel; 0 is "All".
    pub selected_category: usize,
    pub selected_tag: usize,
    pub selected_recent: usize,

    // Search
    pub search_mode: bool,
    pub search_input: String,
    /// Query in effect before search mode was entered, restored on cancel.
    pub search_before: String,

    // Reader
    /// Comments on the open article, newest first.
    pub comments: Vec<Comment>,
    pub scroll_offset: usize,
    /// Reader viewport height, updated on each render (borders excluded).
    pub reader_visible_lines: usize,
    /// Wrapped line count of the reader content at the last render.
    pub reader_total_lines: usize,
    pub draft: Option<CommentDraft>,
    /// Name from the last posted comment, prefilled in the next form.
    pub last_comment_name: String,

    // Overlays and chrome
    pub show_help: bool,
    pub help_scroll_offset: usize,
    pub status_message: Option<(Cow<'static, str>, Instant)>,

    /// Skip frames when nothing changed.
    pub needs_redraw: bool,
}

impl App {
    pub fn new(blog: Blog, keybindings: KeybindingRegistry, excerpt_length: usize) -> Self {
        let theme = StyleMap::from_palette(&blog.theme().palette());
        Self {
            blog,
            theme,
            keybindings,
            excerpt_length,
            focus: Focus::Articles,
            selected_article: 0,
            selected_category: 0,
            selected_tag: 0,
            selected_recent: 0,
            search_mode: false,
            search_input: String::new(),
            search_before: String::new(),
            comments: Vec::new(),
            scroll_offset: 0,
            reader_visible_lines: 0,
            reader_total_lines: 0,
            draft: None,
            last_comment_name: String::new(),
            show_help: false,
            help_scroll_offset: 0,
            status_message: None,
            needs_redraw: true,
        }
    }

    /// Resolve a semantic role name to its `Style`.
    pub fn style(&self, role: &str) -> Style {
        self.theme.resolve(role)
    }

    pub fn view(&self) -> View {
        match self.blog.mode() {
            Mode::Listing => View::Browse,
            Mode::Viewing => View::Reader,
        }
    }

    pub fn theme_variant(&self) -> ThemeVariant {
        self.blog.theme()
    }

    /// Flip light/dark, persist it, and restyle.
    pub async fn toggle_theme(&mut self) -> ThemeVariant {
        let variant = self.blog.toggle_theme().await;
        self.theme = StyleMap::from_palette(&variant.palette());
        self.needs_redraw = true;
        variant
    }

    // ========================================================================
    // Browse Navigation
    // ========================================================================

    /// Number of rows in the focused panel.
    fn focused_len(&self) -> usize {
        let rendered = self.blog.rendered();
        match self.focus {
            Focus::Articles => rendered.visible.len(),
            Focus::Categories => rendered.categories.len() + 1,
            Focus::Tags => rendered.tags.len(),
            Focus::Recent => rendered.recent.len(),
        }
    }

    fn focused_selection(&mut self) -> &mut usize {
        match self.focus {
            Focus::Articles => &mut self.selected_article,
            Focus::Categories => &mut self.selected_category,
            Focus::Tags => &mut self.selected_tag,
            Focus::Recent => &mut self.selected_recent,
        }
    }

    pub fn nav_up(&mut self) {
        let selected = self.focused_selection();
        *selected = selected.saturating_sub(1);
    }

    pub fn nav_down(&mut self) {
        let len = self.focused_len();
        if len == 0 {
            return;
        }
        let selected = self.focused_selection();
        *selected = selected.saturating_add(1).min(len - 1);
    }

    pub fn cycle_focus(&mut self) {
        self.focus = self.focus.next();
    }

    /// Keep every selection inside its list after the lists change.
    pub fn clamp_selections(&mut self) {
        let rendered = self.blog.rendered();
        let (articles, categories, tags, recent) = (
            rendered.visible.len(),
            rendered.categories.len() + 1,
            rendered.tags.len(),
            rendered.recent.len(),
        );
        self.selected_article = self.selected_article.min(articles.saturating_sub(1));
        self.selected_category = self.selected_category.min(categories.saturating_sub(1));
        self.selected_tag = self.selected_tag.min(tags.saturating_sub(1));
        self.selected_recent = self.selected_recent.min(recent.saturating_sub(1));
    }

    pub fn selected_article(&self) -> Option<&Arc<Article>> {
        self.blog.rendered().visible.get(self.selected_article)
    }

    /// Act on the focused panel's selection: open an article or toggle a
    /// filter.
    pub fn select(&mut self) {
        let rendered = self.blog.rendered();
        match self.focus {
            Focus::Articles => {
                if let Some(id) = rendered.visible.get(self.selected_article).map(|a| a.id.clone()) {
                    self.open_article(&id);
                }
            }
            Focus::Recent => {
                if let Some(id) = rendered.recent.get(self.selected_recent).map(|a| a.id.clone()) {
                    self.open_article(&id);
                }
            }
            Focus::Categories => {
                let choice = match self.selected_category {
                    0 => None,
                    i => rendered.categories.get(i - 1).cloned(),
                };
                let active = rendered.active_filters.category.clone();
                if choice.is_some() && choice == active {
                    self.blog.clear_category();
                } else {
                    self.blog.set_category(choice.as_deref());
                }
                self.after_filter_change();
            }
            Focus::Tags => {
                if let Some(tag) = rendered.tags.get(self.selected_tag).cloned() {
                    self.blog.toggle_tag(&tag);
                    self.after_filter_change();
                }
            }
        }
    }

    /// Reset the list position after the visible set changed.
    pub fn after_filter_change(&mut self) {
        self.selected_article = 0;
        self.selected_recent = 0;
        self.clamp_selections();
        self.needs_redraw = true;
    }

    // ========================================================================
    // Search
    // ========================================================================

    pub fn enter_search(&mut self) {
        self.search_mode = true;
        self.search_before = self.blog.browser().state().query.clone();
        self.search_input = self.search_before.clone();
    }

    /// Live search: every keystroke re-filters the list.
    pub fn update_search(&mut self) {
        self.blog.set_query(&self.search_input);
        self.after_filter_change();
    }

    pub fn commit_search(&mut self) {
        self.search_mode = false;
        self.focus = Focus::Articles;
    }

    pub fn cancel_search(&mut self) {
        self.search_mode = false;
        self.search_input = std::mem::take(&mut self.search_before);
        self.blog.set_query(&self.search_input);
        self.after_filter_change();
    }

    // ========================================================================
    // Reader
    // ========================================================================

    pub fn open_article(&mut self, id: &str) -> bool {
        if !self.blog.open_article(id) {
            return false;
        }
        self.comments = self.blog.list_comments(id);
        self.scroll_offset = 0;
        self.draft = None;
        self.needs_redraw = true;
        true
    }

    pub fn exit_reader(&mut self) {
        self.blog.close_article();
        self.comments.clear();
        self.draft = None;
        self.scroll_offset = 0;
        self.clamp_selections();
    }

    /// Follow the nth tag link (1-based) of the open article.
    pub fn browse_tag(&mut self, n: usize) -> Option<String> {
        let tag = self
            .blog
            .current_article()?
            .tags
            .get(n.checked_sub(1)?)?
            .clone();
        self.blog.browse_tag(&tag);
        self.comments.clear();
        self.draft = None;
        self.scroll_offset = 0;
        self.focus = Focus::Articles;
        self.after_filter_change();
        Some(tag)
    }

    fn current_article_id(&self) -> Option<String> {
        self.blog.current_article().map(|a| a.id.clone())
    }

    pub fn start_comment(&mut self) {
        if self.blog.current_article().is_some() {
            self.draft = Some(CommentDraft::new(self.last_comment_name.clone()));
        }
    }

    /// Post the draft. Returns `false` (keeping the draft open) when it was
    /// rejected.
    pub async fn submit_comment(&mut self) -> bool {
        let (Some(id), Some(draft)) = (self.current_article_id(), self.draft.as_ref()) else {
            return false;
        };
        if !self.blog.add_comment(&id, &draft.name, &draft.text).await {
            return false;
        }
        self.last_comment_name = draft.name.trim().to_string();
        self.draft = None;
        self.comments = self.blog.list_comments(&id);
        true
    }

    pub async fn clear_comments(&mut self) {
        if let Some(id) = self.current_article_id() {
            self.blog.clear_comments(&id).await;
            self.comments = self.blog.list_comments(&id);
        }
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_add(lines);
    }

    /// Clamp scroll to the content measured at the last render.
    pub fn clamp_reader_scroll(&mut self) {
        let max_scroll = self
            .reader_total_lines
            .saturating_sub(self.reader_visible_lines);
        self.scroll_offset = self.scroll_offset.min(max_scroll).min(MAX_SCROLL);
    }

    // ========================================================================
    // Status
    // ========================================================================

    /// Set status message (expires after a few seconds).
    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
    }

    /// Clear the status message if expired. Returns true if one was cleared.
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed().as_secs() >= STATUS_TTL_SECS {
                self.status_message = None;
                return true;
            }
        }
        false
    }
}

//! Keybinding registry: maps key events to actions, per context, with
//! overrides from config.toml.
use crossterm::event::{KeyCode, KeyModifiers};
use std::collections::HashMap;

// ============================================================================
// Action Enum
// ============================================================================

/// All user-facing actions that can be triggered by keybindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    NavDown,
    NavUp,
    CycleFocus,
    Back,
    Select,
    EnterSearch,
    ExitSearch,
    CommitSearch,
    ClearFilters,
    ClearQuery,
    ClearTag,
    ClearCategory,
    ToggleTheme,
    ShowHelp,
    ScrollDown,
    ScrollUp,
    PageDown,
    PageUp,
    ExitReader,
    ComposeComment,
    ClearComments,
    NextField,
    SubmitComment,
    CancelCompose,
}

impl Action {
    /// Human-readable description for the help screen.
    pub fn describe(self) -> &'static str {
        match self {
            Self::Quit => "Quit application",
            Self::NavDown => "Navigate down",
            Self::NavUp => "Navigate up",
            Self::CycleFocus => "Cycle panel focus",
            Self::Back => "Go back / dismiss",
            Self::Select => "Open article / toggle filter",
            Self::EnterSearch => "Search articles",
            Self::ExitSearch => "Cancel search",
            Self::CommitSearch => "Keep search, return to list",
            Self::ClearFilters => "Clear all filters",
            Self::ClearQuery => "Remove search filter",
            Self::ClearTag => "Remove tag filter",
            Self::ClearCategory => "Remove category filter",
            Self::ToggleTheme => "Toggle light / dark theme",
            Self::ShowHelp => "Show help",
            Self::ScrollDown => "Scroll down one line",
            Self::ScrollUp => "Scroll up one line",
            Self::PageDown => "Page down",
            Self::PageUp => "Page up",
            Self::ExitReader => "Back to article list",
            Self::ComposeComment => "Write a comment",
            Self::ClearComments => "Clear comments on article",
            Self::NextField => "Switch name / comment field",
            Self::SubmitComment => "Post comment",
            Self::CancelCompose => "Discard comment",
        }
    }

    /// Name accepted in the `[keybindings]` config table.
    fn config_name(self) -> &'static str {
        match self {
            Self::Quit => "quit",
            Self::NavDown => "nav_down",
            Self::NavUp => "nav_up",
            Self::CycleFocus => "cycle_focus",
            Self::Back => "back",
            Self::Select => "select",
            Self::EnterSearch => "search",
            Self::ExitSearch => "exit_search",
            Self::CommitSearch => "commit_search",
            Self::ClearFilters => "clear_filters",
            Self::ClearQuery => "clear_query",
            Self::ClearTag => "clear_tag",
            Self::ClearCategory => "clear_category",
            Self::ToggleTheme => "toggle_theme",
            Self::ShowHelp => "help",
            Self::ScrollDown => "scroll_down",
            Self::ScrollUp => "scroll_up",
            Self::PageDown => "page_down",
            Self::PageUp => "page_up",
            Self::ExitReader => "exit_reader",
            Self::ComposeComment => "comment",
            Self::ClearComments => "clear_comments",
            Self::NextField => "next_field",
            Self::SubmitComment => "submit_comment",
            Self::CancelCompose => "cancel_comment",
        }
    }

    const ALL: [Action; 25] = [
        Self::Quit,
        Self::NavDown,
        Self::NavUp,
        Self::CycleFocus,
        Self::Back,
        Self::Select,
        Self::EnterSearch,
        Self::ExitSearch,
        Self::CommitSearch,
        Self::ClearFilters,
        Self::ClearQuery,
        Self::ClearTag,
        Self::ClearCategory,
        Self::ToggleTheme,
        Self::ShowHelp,
        Self::ScrollDown,
        Self::ScrollUp,
        Self::PageDown,
        Self::PageUp,
        Self::ExitReader,
        Self::ComposeComment,
        Self::ClearComments,
        Self::NextField,
        Self::SubmitComment,
        Self::CancelCompose,
    ];
}

/// Parse an action name from config. Hyphens and case are ignored.
fn parse_action_name(name: &str) -> Option<Action> {
    let normalized = name.trim().to_lowercase().replace('-', "_");
    Action::ALL
        .into_iter()
        .find(|a| a.config_name() == normalized)
}

// ============================================================================
// Context Enum
// ============================================================================

/// Dispatch context: determines which bindings are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Context {
    /// Article list and facet panels.
    Global,
    Reader,
    Search,
    Compose,
}

impl Context {
    pub fn label(self) -> &'static str {
        match self {
            Self::Global => "Browse",
            Self::Reader => "Reader",
            Self::Search => "Search",
            Self::Compose => "Comment",
        }
    }
}

// ============================================================================
// Key Specification
// ============================================================================

/// A key event: code + modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeySpec {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeySpec {
    pub const fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub const fn char(c: char) -> Self {
        Self::plain(KeyCode::Char(c))
    }

    pub const fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }
}

/// Parse a key string from config into a KeySpec.
///
/// Supported formats:
/// - Single char: "q", "j", "/"
/// - Named keys: "Enter", "Esc", "Tab", "Up", "Down", "Backspace", "Space"
/// - Modifier combos: "Ctrl+d"
/// - Function keys: "F1" through "F12"
fn parse_key_string(s: &str) -> Option<KeySpec> {
    let s = s.trim();

    if let Some(rest) = s.strip_prefix("Ctrl+") {
        let mut chars = rest.trim().chars();
        return match (chars.next(), chars.next()) {
            (Some(c), None) => Some(KeySpec::ctrl(c)),
            _ => None,
        };
    }

    let named = match s.to_lowercase().as_str() {
        "enter" | "return" => Some(KeyCode::Enter),
        "esc" | "escape" => Some(KeyCode::Esc),
        "tab" => Some(KeyCode::Tab),
        "up" => Some(KeyCode::Up),
        "down" => Some(KeyCode::Down),
        "left" => Some(KeyCode::Left),
        "right" => Some(KeyCode::Right),
        "backspace" => Some(KeyCode::Backspace),
        "pageup" => Some(KeyCode::PageUp),
        "pagedown" => Some(KeyCode::PageDown),
        "space" => Some(KeyCode::Char(' ')),
        _ => None,
    };
    if let Some(code) = named {
        return Some(KeySpec::plain(code));
    }

    if let Some(n) = s
        .strip_prefix('F')
        .or_else(|| s.strip_prefix('f'))
        .and_then(|n| n.parse::<u8>().ok())
    {
        return (1..=12).contains(&n).then(|| KeySpec::plain(KeyCode::F(n)));
    }

    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(KeySpec::char(c)),
        _ => None,
    }
}

/// Format a KeySpec for the help screen.
fn format_key(key: &KeySpec) -> String {
    let modifier = if key.modifiers.contains(KeyModifiers::CONTROL) {
        "Ctrl+"
    } else {
        ""
    };

    let key_name = match key.code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Up => "Up".to_string(),
        KeyCode::Down => "Down".to_string(),
        KeyCode::Left => "Left".to_string(),
        KeyCode::Right => "Right".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::PageUp => "PageUp".to_string(),
        KeyCode::PageDown => "PageDown".to_string(),
        KeyCode::F(n) => format!("F{}", n),
        _ => "?".to_string(),
    };

    format!("{}{}", modifier, key_name)
}

// ============================================================================
// Default Bindings
// ============================================================================

const DEFAULT_BINDINGS: &[(Context, KeySpec, Action)] = &[
    // Browse
    (Context::Global, KeySpec::char('q'), Action::Quit),
    (Context::Global, KeySpec::char('j'), Action::NavDown),
    (Context::Global, KeySpec::plain(KeyCode::Down), Action::NavDown),
    (Context::Global, KeySpec::char('k'), Action::NavUp),
    (Context::Global, KeySpec::plain(KeyCode::Up), Action::NavUp),
    (Context::Global, KeySpec::plain(KeyCode::Tab), Action::CycleFocus),
    (Context::Global, KeySpec::plain(KeyCode::Esc), Action::Back),
    (Context::Global, KeySpec::plain(KeyCode::Enter), Action::Select),
    (Context::Global, KeySpec::char('/'), Action::EnterSearch),
    (Context::Global, KeySpec::char('x'), Action::ClearFilters),
    (Context::Global, KeySpec::ctrl('u'), Action::ClearQuery),
    (Context::Global, KeySpec::char('T'), Action::ClearTag),
    (Context::Global, KeySpec::char('C'), Action::ClearCategory),
    (Context::Global, KeySpec::char('d'), Action::ToggleTheme),
    (Context::Global, KeySpec::char('?'), Action::ShowHelp),
    // Reader
    (Context::Reader, KeySpec::char('q'), Action::Quit),
    (Context::Reader, KeySpec::char('b'), Action::ExitReader),
    (Context::Reader, KeySpec::plain(KeyCode::Esc), Action::ExitReader),
    (Context::Reader, KeySpec::char('j'), Action::ScrollDown),
    (Context::Reader, KeySpec::plain(KeyCode::Down), Action::ScrollDown),
    (Context::Reader, KeySpec::char('k'), Action::ScrollUp),
    (Context::Reader, KeySpec::plain(KeyCode::Up), Action::ScrollUp),
    (Context::Reader, KeySpec::ctrl('d'), Action::PageDown),
    (Context::Reader, KeySpec::plain(KeyCode::PageDown), Action::PageDown),
    (Context::Reader, KeySpec::ctrl('u'), Action::PageUp),
    (Context::Reader, KeySpec::plain(KeyCode::PageUp), Action::PageUp),
    (Context::Reader, KeySpec::char('c'), Action::ComposeComment),
    (Context::Reader, KeySpec::char('X'), Action::ClearComments),
    // Search
    (Context::Search, KeySpec::plain(KeyCode::Esc), Action::ExitSearch),
    (Context::Search, KeySpec::plain(KeyCode::Enter), Action::CommitSearch),
    // Comment form
    (Context::Compose, KeySpec::plain(KeyCode::Esc), Action::CancelCompose),
    (Context::Compose, KeySpec::plain(KeyCode::Tab), Action::NextField),
    (Context::Compose, KeySpec::plain(KeyCode::Enter), Action::SubmitComment),
];

// ============================================================================
// Keybinding Registry
// ============================================================================

/// Registry of keybindings, supporting default bindings and config overrides.
///
/// The same key can map to different actions in different contexts. Reader
/// lookups fall back to Global; Search and Compose are text-entry contexts
/// and do not.
pub struct KeybindingRegistry {
    lookup: HashMap<(Context, KeySpec), Action>,
    /// Insertion order, for the help screen.
    bindings: Vec<(Context, KeySpec, Action)>,
}

impl KeybindingRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            lookup: HashMap::new(),
            bindings: Vec::with_capacity(DEFAULT_BINDINGS.len()),
        };
        for &(context, key, action) in DEFAULT_BINDINGS {
            registry.bind(context, key, action);
        }
        registry
    }

    fn bind(&mut self, context: Context, key: KeySpec, action: Action) {
        self.lookup.insert((context, key), action);
        self.bindings.push((context, key, action));
    }

    /// Apply user overrides from the config `[keybindings]` table.
    ///
    /// Keys in the map are action names (e.g., "quit", "nav_down").
    /// Values are key strings (e.g., "q", "Ctrl+d", "F5"). An override
    /// replaces every default key for that action, in every context the
    /// action was bound in.
    ///
    /// Returns a warning for each unknown action name or unparseable key.
    pub fn apply_overrides(&mut self, overrides: &HashMap<String, String>) -> Vec<String> {
        let mut warnings = Vec::new();

        for (action_name, key_str) in overrides {
            let Some(action) = parse_action_name(action_name) else {
                warnings.push(format!("Unknown action '{}', ignoring", action_name));
                continue;
            };
            let Some(key) = parse_key_string(key_str) else {
                warnings.push(format!(
                    "Cannot parse key '{}' for action '{}', ignoring",
                    key_str, action_name
                ));
                continue;
            };

            let mut contexts: Vec<Context> = Vec::new();
            for (ctx, _, a) in &self.bindings {
                if *a == action && !contexts.contains(ctx) {
                    contexts.push(*ctx);
                }
            }

            self.lookup.retain(|_, a| *a != action);
            self.bindings.retain(|(_, _, a)| *a != action);
            for ctx in contexts {
                self.bind(ctx, key, action);
            }

            tracing::info!(action = %action_name, key = %key_str, "Applied keybinding override");
        }

        warnings
    }

    /// Look up the action for a key in a context.
    pub fn action_for_key(
        &self,
        code: KeyCode,
        modifiers: KeyModifiers,
        context: Context,
    ) -> Option<Action> {
        // Terminals report uppercase letters with SHIFT; the char already
        // carries the case.
        let modifiers = match code {
            KeyCode::Char(_) => modifiers.difference(KeyModifiers::SHIFT),
            _ => modifiers,
        };
        let key = KeySpec::new(code, modifiers);
        if let Some(&action) = self.lookup.get(&(context, key)) {
            return Some(action);
        }
        match context {
            Context::Reader => self.lookup.get(&(Context::Global, key)).copied(),
            _ => None,
        }
    }

    /// Bindings for the help screen: (context, key label, description).
    pub fn all_bindings(&self) -> Vec<(Context, String, &'static str)> {
        self.bindings
            .iter()
            .map(|(ctx, key, action)| (*ctx, format_key(key), action.describe()))
            .collect()
    }
}

impl Default for KeybindingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(reg: &KeybindingRegistry, key: KeySpec, ctx: Context) -> Option<Action> {
        reg.action_for_key(key.code, key.modifiers, ctx)
    }

    #[test]
    fn test_default_browse_keys() {
        let reg = KeybindingRegistry::new();
        assert_eq!(lookup(&reg, KeySpec::char('q'), Context::Global), Some(Action::Quit));
        assert_eq!(lookup(&reg, KeySpec::char('j'), Context::Global), Some(Action::NavDown));
        assert_eq!(
            lookup(&reg, KeySpec::plain(KeyCode::Up), Context::Global),
            Some(Action::NavUp)
        );
        assert_eq!(
            lookup(&reg, KeySpec::char('/'), Context::Global),
            Some(Action::EnterSearch)
        );
        assert_eq!(
            lookup(&reg, KeySpec::char('d'), Context::Global),
            Some(Action::ToggleTheme)
        );
    }

    #[test]
    fn test_reader_context_overrides_global() {
        let reg = KeybindingRegistry::new();
        assert_eq!(
            lookup(&reg, KeySpec::char('j'), Context::Reader),
            Some(Action::ScrollDown)
        );
        assert_eq!(
            lookup(&reg, KeySpec::plain(KeyCode::Esc), Context::Reader),
            Some(Action::ExitReader)
        );
        // Ctrl+u pages in the reader but clears the search in the list.
        assert_eq!(lookup(&reg, KeySpec::ctrl('u'), Context::Reader), Some(Action::PageUp));
        assert_eq!(
            lookup(&reg, KeySpec::ctrl('u'), Context::Global),
            Some(Action::ClearQuery)
        );
    }

    #[test]
    fn test_shifted_char_matches_uppercase_binding() {
        let reg = KeybindingRegistry::new();
        assert_eq!(
            reg.action_for_key(KeyCode::Char('X'), KeyModifiers::SHIFT, Context::Reader),
            Some(Action::ClearComments)
        );
        assert_eq!(
            reg.action_for_key(KeyCode::Char('T'), KeyModifiers::SHIFT, Context::Global),
            Some(Action::ClearTag)
        );
    }

    #[test]
    fn test_reader_falls_back_to_global() {
        let reg = KeybindingRegistry::new();
        assert_eq!(
            lookup(&reg, KeySpec::char('d'), Context::Reader),
            Some(Action::ToggleTheme)
        );
        assert_eq!(lookup(&reg, KeySpec::char('?'), Context::Reader), Some(Action::ShowHelp));
    }

    #[test]
    fn test_text_contexts_do_not_fall_back() {
        let reg = KeybindingRegistry::new();
        // Typing 'q' into the search box must not quit.
        assert_eq!(lookup(&reg, KeySpec::char('q'), Context::Search), None);
        assert_eq!(lookup(&reg, KeySpec::char('d'), Context::Compose), None);
        assert_eq!(
            lookup(&reg, KeySpec::plain(KeyCode::Enter), Context::Compose),
            Some(Action::SubmitComment)
        );
        assert_eq!(
            lookup(&reg, KeySpec::plain(KeyCode::Esc), Context::Search),
            Some(Action::ExitSearch)
        );
    }

    #[test]
    fn test_comment_keys_only_in_reader() {
        let reg = KeybindingRegistry::new();
        assert_eq!(
            lookup(&reg, KeySpec::char('c'), Context::Reader),
            Some(Action::ComposeComment)
        );
        assert_eq!(lookup(&reg, KeySpec::char('c'), Context::Global), None);
        assert_eq!(lookup(&reg, KeySpec::char('X'), Context::Global), None);
    }

    #[test]
    fn test_unknown_key_returns_none() {
        let reg = KeybindingRegistry::new();
        assert_eq!(lookup(&reg, KeySpec::plain(KeyCode::F(12)), Context::Global), None);
    }

    #[test]
    fn test_apply_overrides_valid() {
        let mut reg = KeybindingRegistry::new();
        let overrides = HashMap::from([("quit".to_string(), "Ctrl+q".to_string())]);

        assert!(reg.apply_overrides(&overrides).is_empty());
        assert_eq!(lookup(&reg, KeySpec::char('q'), Context::Global), None);
        assert_eq!(lookup(&reg, KeySpec::ctrl('q'), Context::Global), Some(Action::Quit));
        // Reader had its own 'q' too; it moves with the override.
        assert_eq!(lookup(&reg, KeySpec::ctrl('q'), Context::Reader), Some(Action::Quit));
    }

    #[test]
    fn test_override_replaces_all_default_keys() {
        let mut reg = KeybindingRegistry::new();
        let overrides = HashMap::from([("nav-down".to_string(), "n".to_string())]);

        assert!(reg.apply_overrides(&overrides).is_empty());
        assert_eq!(lookup(&reg, KeySpec::char('n'), Context::Global), Some(Action::NavDown));
        assert_eq!(lookup(&reg, KeySpec::char('j'), Context::Global), None);
        assert_eq!(lookup(&reg, KeySpec::plain(KeyCode::Down), Context::Global), None);
    }

    #[test]
    fn test_apply_overrides_warnings() {
        let mut reg = KeybindingRegistry::new();
        let overrides = HashMap::from([("nonexistent_action".to_string(), "q".to_string())]);
        let warnings = reg.apply_overrides(&overrides);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("Unknown action"));

        let overrides = HashMap::from([("quit".to_string(), "Ctrl+Alt+Q".to_string())]);
        let warnings = reg.apply_overrides(&overrides);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("Cannot parse key"));
    }

    #[test]
    fn test_parse_action_names() {
        for action in Action::ALL {
            assert_eq!(parse_action_name(action.config_name()), Some(action));
        }
        assert_eq!(parse_action_name("Toggle-Theme"), Some(Action::ToggleTheme));
        assert_eq!(parse_action_name("refresh"), None);
    }

    #[test]
    fn test_parse_key_string() {
        assert_eq!(parse_key_string("Enter"), Some(KeySpec::plain(KeyCode::Enter)));
        assert_eq!(parse_key_string("esc"), Some(KeySpec::plain(KeyCode::Esc)));
        assert_eq!(parse_key_string("space"), Some(KeySpec::char(' ')));
        assert_eq!(parse_key_string("F5"), Some(KeySpec::plain(KeyCode::F(5))));
        assert_eq!(parse_key_string("F13"), None);
        assert_eq!(parse_key_string("Ctrl+d"), Some(KeySpec::ctrl('d')));
        assert_eq!(parse_key_string("/"), Some(KeySpec::char('/')));
        assert_eq!(parse_key_string("F"), Some(KeySpec::char('F')));
        assert_eq!(parse_key_string("é"), Some(KeySpec::char('é')));
        assert_eq!(parse_key_string("jj"), None);
    }

    #[test]
    fn test_format_key_display() {
        assert_eq!(format_key(&KeySpec::char('q')), "q");
        assert_eq!(format_key(&KeySpec::ctrl('d')), "Ctrl+d");
        assert_eq!(format_key(&KeySpec::plain(KeyCode::Enter)), "Enter");
        assert_eq!(format_key(&KeySpec::char(' ')), "Space");
    }

    #[test]
    fn test_all_bindings_cover_every_action() {
        let reg = KeybindingRegistry::new();
        let bindings = reg.all_bindings();
        assert_eq!(bindings.len(), DEFAULT_BINDINGS.len());
        for action in Action::ALL {
            assert!(
                bindings.iter().any(|(_, _, d)| *d == action.describe()),
                "{:?} has no default key",
                action
            );
        }
    }
}

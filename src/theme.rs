//! Theme preference and terminal palettes.
//!
//! `ThemeVariant` is the persisted light/dark preference. It also selects a
//! `ColorPalette`, and `StyleMap` resolves semantic role names to concrete
//! ratatui styles.

use ratatui::style::{Color, Modifier, Style};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// Theme Variant
// ============================================================================

/// Display preference. Serialized as `"light"` / `"dark"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeVariant {
    #[default]
    Light,
    Dark,
}

impl ThemeVariant {
    /// Parse a variant name from a string (case-insensitive).
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    /// Build the `ColorPalette` for this variant.
    pub fn palette(self) -> ColorPalette {
        match self {
            Self::Light => ColorPalette::light(),
            Self::Dark => ColorPalette::dark(),
        }
    }

    /// The other variant: Light ↔ Dark.
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Stored form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Human-readable name for status display.
    pub fn name(self) -> &'static str {
        match self {
            Self::Light => "Light",
            Self::Dark => "Dark",
        }
    }
}

// ============================================================================
// Color Palette — semantic roles to Style
// ============================================================================

/// A complete color palette mapping every semantic UI role to a `Style`.
#[derive(Debug, Clone)]
pub struct ColorPalette {
    // -- Article list --
    pub article_title: Style,
    pub article_selected: Style,
    pub article_date: Style,
    pub article_tags: Style,
    pub article_excerpt: Style,

    // -- Facet panels (categories, tags, recent) --
    pub facet_normal: Style,
    pub facet_selected: Style,
    pub facet_active: Style,

    // -- Reader --
    pub reader_heading: Style,
    pub reader_body: Style,
    pub reader_metadata: Style,
    pub reader_tag: Style,

    // -- Comments --
    pub comment_author: Style,
    pub comment_when: Style,
    pub comment_body: Style,
    pub comment_empty: Style,

    // -- Chrome --
    pub filter_chip: Style,
    pub status_bar: Style,
    pub panel_border: Style,
    pub panel_border_focused: Style,
    pub dialog_border: Style,
    pub input_active: Style,
}

impl ColorPalette {
    /// Light palette, the default for fresh installs.
    fn light() -> Self {
        Self {
            article_title: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            article_selected: Style::default().bg(Color::Blue).fg(Color::White),
            article_date: Style::default().fg(Color::DarkGray),
            article_tags: Style::default().fg(Color::Blue),
            article_excerpt: Style::default().fg(Color::DarkGray),

            facet_normal: Style::default().fg(Color::Black),
            facet_selected: Style::default().bg(Color::Blue).fg(Color::White),
            facet_active: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),

            reader_heading: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            reader_body: Style::default().fg(Color::Black),
            reader_metadata: Style::default().fg(Color::DarkGray),
            reader_tag: Style::default().fg(Color::Magenta),

            comment_author: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            comment_when: Style::default().fg(Color::DarkGray),
            comment_body: Style::default().fg(Color::Black),
            comment_empty: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),

            filter_chip: Style::default().bg(Color::Magenta).fg(Color::White),
            status_bar: Style::default().bg(Color::White).fg(Color::Black),
            panel_border: Style::default().fg(Color::DarkGray),
            panel_border_focused: Style::default().fg(Color::Blue),
            dialog_border: Style::default().fg(Color::Magenta),
            input_active: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
        }
    }

    /// Dark palette for dark terminal backgrounds.
    fn dark() -> Self {
        Self {
            article_title: Style::default().add_modifier(Modifier::BOLD),
            article_selected: Style::default().bg(Color::DarkGray).fg(Color::White),
            article_date: Style::default().fg(Color::DarkGray),
            article_tags: Style::default().fg(Color::Cyan),
            article_excerpt: Style::default().fg(Color::Gray),

            facet_normal: Style::default(),
            facet_selected: Style::default().bg(Color::DarkGray).fg(Color::White),
            facet_active: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),

            reader_heading: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            reader_body: Style::default(),
            reader_metadata: Style::default().fg(Color::DarkGray),
            reader_tag: Style::default().fg(Color::Yellow),

            comment_author: Style::default().add_modifier(Modifier::BOLD),
            comment_when: Style::default().fg(Color::DarkGray),
            comment_body: Style::default(),
            comment_empty: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),

            filter_chip: Style::default().bg(Color::Yellow).fg(Color::Black),
            status_bar: Style::default().bg(Color::DarkGray).fg(Color::White),
            panel_border: Style::default(),
            panel_border_focused: Style::default().fg(Color::Cyan),
            dialog_border: Style::default().fg(Color::Yellow),
            input_active: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        }
    }
}

// ============================================================================
// Style Map — string-keyed lookup
// ============================================================================

/// String-keyed style lookup built from a `ColorPalette`.
#[derive(Debug, Clone)]
pub struct StyleMap {
    map: HashMap<&'static str, Style>,
}

/// All semantic role names, in declaration order.
const ROLE_NAMES: [&str; 22] = [
    "article_title",
    "article_selected",
    "article_date",
    "article_tags",
    "article_excerpt",
    "facet_normal",
    "facet_selected",
    "facet_active",
    "reader_heading",
    "reader_body",
    "reader_metadata",
    "reader_tag",
    "comment_author",
    "comment_when",
    "comment_body",
    "comment_empty",
    "filter_chip",
    "status_bar",
    "panel_border",
    "panel_border_focused",
    "dialog_border",
    "input_active",
];

impl StyleMap {
    /// Build a `StyleMap` from a `ColorPalette`.
    pub fn from_palette(p: &ColorPalette) -> Self {
        let styles: [Style; 22] = [
            p.article_title,
            p.article_selected,
            p.article_date,
            p.article_tags,
            p.article_excerpt,
            p.facet_normal,
            p.facet_selected,
            p.facet_active,
            p.reader_heading,
            p.reader_body,
            p.reader_metadata,
            p.reader_tag,
            p.comment_author,
            p.comment_when,
            p.comment_body,
            p.comment_empty,
            p.filter_chip,
            p.status_bar,
            p.panel_border,
            p.panel_border_focused,
            p.dialog_border,
            p.input_active,
        ];

        let map = ROLE_NAMES.iter().copied().zip(styles).collect();
        Self { map }
    }

    /// Resolve a role name to its `Style`. Returns `Style::default()` for unknown roles.
    pub fn resolve(&self, role: &str) -> Style {
        self.map.get(role).copied().unwrap_or_default()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_variant_is_light() {
        assert_eq!(ThemeVariant::default(), ThemeVariant::Light);
    }

    #[test]
    fn variant_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ThemeVariant::Dark).unwrap(),
            "\"dark\""
        );
        assert_eq!(
            serde_json::from_str::<ThemeVariant>("\"light\"").unwrap(),
            ThemeVariant::Light
        );
        assert!(serde_json::from_str::<ThemeVariant>("\"Dark\"").is_err());
    }

    #[test]
    fn variant_from_str_name() {
        assert_eq!(
            ThemeVariant::from_str_name("dark"),
            Some(ThemeVariant::Dark)
        );
        assert_eq!(
            ThemeVariant::from_str_name(" Light "),
            Some(ThemeVariant::Light)
        );
        assert_eq!(ThemeVariant::from_str_name("neon"), None);
    }

    #[test]
    fn toggled_twice_is_identity() {
        for v in [ThemeVariant::Light, ThemeVariant::Dark] {
            assert_ne!(v.toggled(), v);
            assert_eq!(v.toggled().toggled(), v);
        }
    }

    #[test]
    fn as_str_matches_serde() {
        for v in [ThemeVariant::Light, ThemeVariant::Dark] {
            assert_eq!(
                serde_json::to_string(&v).unwrap(),
                format!("\"{}\"", v.as_str())
            );
        }
    }

    #[test]
    fn palettes_differ() {
        let light = ThemeVariant::Light.palette();
        let dark = ThemeVariant::Dark.palette();
        assert_ne!(light.article_selected, dark.article_selected);
        assert_ne!(light.status_bar, dark.status_bar);
    }

    #[test]
    fn style_map_resolves_known_roles() {
        let palette = ThemeVariant::Dark.palette();
        let sm = StyleMap::from_palette(&palette);

        assert_eq!(sm.resolve("article_selected"), palette.article_selected);
        assert_eq!(sm.resolve("reader_heading"), palette.reader_heading);
        assert_eq!(sm.resolve("status_bar"), palette.status_bar);
    }

    #[test]
    fn style_map_returns_default_for_unknown() {
        let sm = StyleMap::from_palette(&ThemeVariant::Light.palette());
        assert_eq!(sm.resolve("nonexistent_role"), Style::default());
    }

    #[test]
    fn style_map_has_all_roles() {
        let sm = StyleMap::from_palette(&ThemeVariant::Light.palette());
        assert_eq!(sm.map.len(), ROLE_NAMES.len());
        for name in ROLE_NAMES {
            assert!(sm.map.contains_key(name), "Role '{}' missing", name);
        }
    }
}

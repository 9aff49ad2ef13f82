//! Sidebar panels: categories, tag cloud, and recent articles.
use crate::app::{App, Focus};
use crate::util::{strip_control_chars, truncate_to_width};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::Span,
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

/// Label of the first category row, which clears the category filter.
pub const ALL_CATEGORIES: &str = "All";

/// Render the three sidebar panels stacked vertically.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let rendered = app.blog.rendered();
    // +2 for borders; categories include the "All" row.
    let categories_height = (rendered.categories.len() + 3).min(12) as u16;
    let recent_height = (rendered.recent.len().max(1) + 2) as u16;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(categories_height),
            Constraint::Min(3),
            Constraint::Length(recent_height),
        ])
        .split(area);

    render_categories(f, app, chunks[0]);
    render_tags(f, app, chunks[1]);
    render_recent(f, app, chunks[2]);
}

fn border_style(app: &App, focus: Focus) -> Style {
    if app.focus == focus {
        app.style("panel_border_focused")
    } else {
        app.style("panel_border")
    }
}

/// Style for one facet row: selection highlight wins over the active marker.
fn row_style(app: &App, focus: Focus, selected: bool, active: bool) -> Style {
    if app.focus == focus && selected {
        app.style("facet_selected")
    } else if active {
        app.style("facet_active")
    } else {
        app.style("facet_normal")
    }
}

fn render_list(
    f: &mut Frame,
    app: &App,
    area: Rect,
    focus: Focus,
    title: &str,
    items: Vec<ListItem>,
    selected: usize,
) {
    if area.width < 3 || area.height < 3 {
        return;
    }
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style(app, focus))
            .title(title.to_string()),
    );
    let mut state = ListState::default().with_selected(Some(selected));
    f.render_stateful_widget(list, area, &mut state);
}

fn render_categories(f: &mut Frame, app: &App, area: Rect) {
    let rendered = app.blog.rendered();
    let active = rendered.active_filters.category.as_deref();
    let width = area.width.saturating_sub(4) as usize;

    let rows = std::iter::once((ALL_CATEGORIES, active.is_none()))
        .chain(
            rendered
                .categories
                .iter()
                .map(|c| (c.as_str(), Some(c.as_str()) == active)),
        );
    let items: Vec<ListItem> = rows
        .enumerate()
        .map(|(i, (name, is_active))| {
            let marker = if is_active { "● " } else { "  " };
            let style = row_style(app, Focus::Categories, i == app.selected_category, is_active);
            let name = strip_control_chars(name);
            ListItem::new(Span::styled(
                format!("{marker}{}", truncate_to_width(&name, width)),
                style,
            ))
        })
        .collect();

    render_list(
        f,
        app,
        area,
        Focus::Categories,
        " Categories ",
        items,
        app.selected_category,
    );
}

fn render_tags(f: &mut Frame, app: &App, area: Rect) {
    let rendered = app.blog.rendered();
    let active = rendered.active_filters.tag.as_deref();
    let width = area.width.saturating_sub(3) as usize;

    let items: Vec<ListItem> = if rendered.tags.is_empty() {
        vec![ListItem::new(Span::styled("No tags", app.style("comment_empty")))]
    } else {
        rendered
            .tags
            .iter()
            .enumerate()
            .map(|(i, tag)| {
                let is_active = Some(tag.as_str()) == active;
                let style = row_style(app, Focus::Tags, i == app.selected_tag, is_active);
                let label = format!("#{}", strip_control_chars(tag));
                ListItem::new(Span::styled(
                    truncate_to_width(&label, width).into_owned(),
                    style,
                ))
            })
            .collect()
    };

    render_list(f, app, area, Focus::Tags, " Tags ", items, app.selected_tag);
}

fn render_recent(f: &mut Frame, app: &App, area: Rect) {
    let rendered = app.blog.rendered();
    let width = area.width.saturating_sub(3) as usize;

    let items: Vec<ListItem> = if rendered.recent.is_empty() {
        vec![ListItem::new(Span::styled("Nothing yet", app.style("comment_empty")))]
    } else {
        rendered
            .recent
            .iter()
            .enumerate()
            .map(|(i, article)| {
                let style = row_style(app, Focus::Recent, i == app.selected_recent, false);
                let title = strip_control_chars(&article.title);
                ListItem::new(Span::styled(
                    truncate_to_width(&title, width).into_owned(),
                    style,
                ))
            })
            .collect()
    };

    render_list(f, app, area, Focus::Recent, " Recent ", items, app.selected_recent);
}

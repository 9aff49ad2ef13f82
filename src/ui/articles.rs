use crate::app::{App, Focus};
use crate::util::{excerpt, strip_control_chars, truncate_to_width};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

/// Render the article list panel.
///
/// Each entry is three lines: title and date, category and tags, excerpt.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    let is_focused = app.focus == Focus::Articles;
    let rendered = app.blog.rendered();
    let inner_width = area.width.saturating_sub(2) as usize;

    let style_title = app.style("article_title");
    let style_selected = app.style("article_selected");
    let style_date = app.style("article_date");
    let style_tags = app.style("article_tags");
    let style_excerpt = app.style("article_excerpt");

    let items: Vec<ListItem> = if rendered.visible.is_empty() {
        vec![ListItem::new(Span::styled(
            "No articles match the current filters",
            app.style("comment_empty"),
        ))]
    } else {
        rendered
            .visible
            .iter()
            .enumerate()
            .map(|(i, article)| {
                let selected = is_focused && i == app.selected_article;
                let title_style = if selected { style_selected } else { style_title };

                let title_width = inner_width.saturating_sub(article.date.len() + 2);
                let title = strip_control_chars(&article.title);
                let title = truncate_to_width(&title, title_width).into_owned();

                let meta = if article.tags.is_empty() {
                    article.category.clone()
                } else {
                    let tags: Vec<String> = article.tags.iter().map(|t| format!("#{t}")).collect();
                    format!("{} · {}", article.category, tags.join(" "))
                };
                let preview = excerpt(&article.content, app.excerpt_length);

                ListItem::new(vec![
                    Line::from(vec![
                        Span::styled(title, title_style),
                        Span::styled(format!("  {}", article.date), style_date),
                    ]),
                    Line::from(Span::styled(
                        truncate_to_width(&meta, inner_width).into_owned(),
                        style_tags,
                    )),
                    Line::from(Span::styled(
                        truncate_to_width(&preview, inner_width).into_owned(),
                        style_excerpt,
                    )),
                ])
            })
            .collect()
    };

    let border_style = if is_focused {
        app.style("panel_border_focused")
    } else {
        app.style("panel_border")
    };

    let title = if app.search_mode {
        format!(" Search: {}_ ", app.search_input)
    } else {
        format!(" Articles ({}) ", rendered.visible.len())
    };

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(title),
    );

    let mut state = ListState::default().with_selected(Some(app.selected_article));
    f.render_stateful_widget(list, area, &mut state);
}

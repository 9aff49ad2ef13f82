//! Active filter chips shown above the article list.
use crate::app::App;
use crate::browser::ActiveFilters;
use crate::util::{strip_control_chars, truncate_to_width};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Chip labels in display order: tag, category, search.
pub fn chip_labels(filters: &ActiveFilters) -> Vec<String> {
    let mut chips = Vec::with_capacity(3);
    if let Some(tag) = &filters.tag {
        chips.push(format!("Tag: #{}", strip_control_chars(tag)));
    }
    if let Some(category) = &filters.category {
        chips.push(format!("Category: {}", strip_control_chars(category)));
    }
    if let Some(query) = &filters.query {
        chips.push(format!("Search: \"{}\"", strip_control_chars(query)));
    }
    chips
}

pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let filters = &app.blog.rendered().active_filters;
    let line = if filters.is_empty() {
        Line::from(Span::styled(
            "Showing all articles",
            app.style("article_date"),
        ))
    } else {
        let chip = app.style("filter_chip");
        let mut spans = vec![Span::styled("Filters: ", app.style("article_date"))];
        for label in chip_labels(filters) {
            let label = truncate_to_width(&label, 40).into_owned();
            spans.push(Span::styled(format!(" {label} "), chip));
            spans.push(Span::raw(" "));
        }
        spans.push(Span::styled("[x] clear", app.style("article_date")));
        Line::from(spans)
    };

    f.render_widget(Paragraph::new(line), area);
}

use crate::app::{App, MAX_SCROLL};
use crate::storage::{Article, Comment};
use crate::util::{html_to_paragraphs, strip_control_chars};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

/// Render the single-article view: header, body, tag links, comments.
pub fn render(f: &mut Frame, app: &mut App, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    let Some(article) = app.blog.current_article().cloned() else {
        let paragraph = Paragraph::new("No article selected")
            .block(Block::default().borders(Borders::ALL).title(" Reader "));
        f.render_widget(paragraph, area);
        return;
    };

    let lines = build_lines(app, &article, &app.comments);

    let viewport_width = area.width.saturating_sub(2) as usize;
    app.reader_visible_lines = area.height.saturating_sub(2) as usize;
    app.reader_total_lines = lines
        .iter()
        .map(|line| wrapped_line_count(line, viewport_width))
        .sum();
    // Clamp before drawing so a resize never shows an out-of-range frame.
    app.clamp_reader_scroll();

    let paragraph = Paragraph::new(Text::from(lines))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.style("panel_border_focused"))
                .title(format!(" {} ", article.category)),
        )
        .wrap(Wrap { trim: false })
        .scroll((app.scroll_offset.min(MAX_SCROLL) as u16, 0));

    f.render_widget(paragraph, area);
}

fn build_lines(app: &App, article: &Article, comments: &[Comment]) -> Vec<Line<'static>> {
    let heading = app.style("reader_heading");
    let body = app.style("reader_body");
    let metadata = app.style("reader_metadata");

    let mut lines = vec![
        Line::from(Span::styled(
            strip_control_chars(&article.title).into_owned(),
            heading,
        )),
        Line::from(Span::styled(
            format!("{} · {}", article.date, article.category),
            metadata,
        )),
    ];
    if !article.image.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("[Image: {}]", article.image),
            metadata,
        )));
    }
    lines.push(Line::from(""));

    for paragraph in html_to_paragraphs(&article.content) {
        lines.push(Line::from(Span::styled(paragraph, body)));
        lines.push(Line::from(""));
    }

    if !article.tags.is_empty() {
        let mut spans = vec![Span::styled("Tags: ", metadata)];
        for (i, tag) in article.tags.iter().enumerate() {
            let label = format!("[{}] #{}", i + 1, strip_control_chars(tag));
            spans.push(Span::styled(label, app.style("reader_tag")));
            spans.push(Span::raw("  "));
        }
        lines.push(Line::from(spans));
        lines.push(Line::from(""));
    }

    lines.push(Line::from(Span::styled(
        format!("Comments ({})", comments.len()),
        heading,
    )));
    lines.push(Line::from(""));
    lines.extend(comment_lines(app, comments));
    lines
}

fn comment_lines(app: &App, comments: &[Comment]) -> Vec<Line<'static>> {
    if comments.is_empty() {
        return vec![Line::from(Span::styled(
            "No comments yet, write something! (press c)",
            app.style("comment_empty"),
        ))];
    }

    let author: Style = app.style("comment_author");
    let when = app.style("comment_when");
    let body = app.style("comment_body");

    let mut lines = Vec::with_capacity(comments.len() * 3);
    for comment in comments {
        lines.push(Line::from(vec![
            Span::styled(strip_control_chars(&comment.name).into_owned(), author),
            Span::styled(format!("  {}", comment.when), when),
        ]));
        for text_line in comment.text.lines() {
            lines.push(Line::from(Span::styled(
                strip_control_chars(text_line).into_owned(),
                body,
            )));
        }
        lines.push(Line::from(""));
    }
    lines
}

/// Display lines a single Line occupies after wrapping to `viewport_width`.
fn wrapped_line_count(line: &Line<'_>, viewport_width: usize) -> usize {
    let width = viewport_width.max(1);
    let line_width: usize = line.spans.iter().map(|s| s.content.width()).sum();
    if line_width == 0 {
        1
    } else {
        line_width.div_ceil(width)
    }
}

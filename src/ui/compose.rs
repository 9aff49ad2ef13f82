//! Comment form overlay drawn on top of the reader.
use crate::app::{App, CommentDraft, DraftField};
use crate::util::{MAX_COMMENT_NAME_LENGTH, MAX_COMMENT_TEXT_LENGTH};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

pub fn render(f: &mut Frame, app: &App, draft: &CommentDraft) {
    let area = f.area();
    let width = 64u16.min(area.width.saturating_sub(4));
    let height = 12u16.min(area.height.saturating_sub(4));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    let overlay = Rect::new(x, y, width, height);

    if overlay.width < 20 || overlay.height < 8 {
        return;
    }

    f.render_widget(Clear, overlay);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.style("dialog_border"))
        .title(" Leave a comment ");
    let inner = block.inner(overlay);
    f.render_widget(block, overlay);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(2),
            Constraint::Length(1),
        ])
        .split(inner);

    let field_style = |field: DraftField| -> Style {
        if draft.field == field {
            app.style("input_active")
        } else {
            app.style("reader_body")
        }
    };
    let cursor = |field: DraftField| if draft.field == field { "_" } else { "" };

    let name = Paragraph::new(vec![
        Line::from(Span::styled(
            format!("Name ({}/{})", draft.name.chars().count(), MAX_COMMENT_NAME_LENGTH),
            app.style("reader_metadata"),
        )),
        Line::from(Span::styled(
            format!("> {}{}", draft.name, cursor(DraftField::Name)),
            field_style(DraftField::Name),
        )),
    ]);
    f.render_widget(name, chunks[0]);

    let text = Paragraph::new(vec![
        Line::from(Span::styled(
            format!("Comment ({}/{})", draft.text.chars().count(), MAX_COMMENT_TEXT_LENGTH),
            app.style("reader_metadata"),
        )),
        Line::from(Span::styled(
            format!("> {}{}", draft.text, cursor(DraftField::Text)),
            field_style(DraftField::Text),
        )),
    ])
    .wrap(Wrap { trim: false });
    f.render_widget(text, chunks[1]);

    let hint = Paragraph::new(Span::styled(
        "(Enter) Post  (Tab) Switch field  (Esc) Cancel",
        app.style("reader_metadata"),
    ));
    f.render_widget(hint, chunks[2]);
}

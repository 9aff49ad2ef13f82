use crate::app::{App, View};
use ratatui::{layout::Rect, widgets::Paragraph, Frame};
use std::borrow::Cow;

/// Render the status bar
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let text: Cow<'_, str> = if let Some((msg, _)) = &app.status_message {
        Cow::Borrowed(&**msg)
    } else if app.draft.is_some() {
        Cow::Borrowed("Type your comment | TAB switch field | ENTER post | ESC cancel")
    } else {
        match app.view() {
            View::Browse if app.search_mode => {
                Cow::Borrowed("Type to search | ESC cancel | ENTER confirm")
            }
            View::Browse => Cow::Owned(format!(
                "[/]search [Tab]panel [Enter]select [x]clear filters [d]{} [?]help [q]uit",
                app.theme_variant().toggled().name().to_lowercase()
            )),
            View::Reader => {
                Cow::Borrowed("[b]ack [j/k]scroll [1-9]tag [c]omment [X]clear comments [q]uit")
            }
        }
    };

    let paragraph = Paragraph::new(text).style(app.style("status_bar"));
    f.render_widget(paragraph, area);
}

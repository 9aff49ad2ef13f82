//! Input handling for the TUI.
//!
//! Routes each key press to the overlay or view that currently owns input.

use crate::app::{App, DraftField, View};
use crate::keybindings::{Action as KbAction, Context as KbContext};
use crate::util::{MAX_COMMENT_NAME_LENGTH, MAX_COMMENT_TEXT_LENGTH, MAX_SEARCH_QUERY_LENGTH};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyModifiers};

use super::Action;

/// Lines moved by a page scroll in the reader.
const PAGE_SCROLL: usize = 20;

/// Main input dispatch function.
pub(super) async fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
) -> Result<Action> {
    if app.show_help {
        return Ok(handle_help_input(app, code));
    }

    if app.draft.is_some() {
        return handle_compose_input(app, code, modifiers).await;
    }

    if app.search_mode {
        return Ok(handle_search_input(app, code, modifiers));
    }

    match app.view() {
        View::Browse => handle_browse_input(app, code, modifiers).await,
        View::Reader => handle_reader_input(app, code, modifiers).await,
    }
}

/// Handle input while the help overlay is visible.
///
/// Captures all keys: j/k/Up/Down scroll, Esc/q/? dismiss.
fn handle_help_input(app: &mut App, code: KeyCode) -> Action {
    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
            app.show_help = false;
            app.help_scroll_offset = 0;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_sub(1);
        }
        _ => {}
    }
    Action::Continue
}

/// Actions shared by the browse view and the reader.
async fn handle_common(app: &mut App, action: KbAction) -> Option<Action> {
    match action {
        KbAction::Quit => return Some(Action::Quit),
        KbAction::ShowHelp => {
            app.show_help = true;
            app.help_scroll_offset = 0;
        }
        KbAction::ToggleTheme => {
            let variant = app.toggle_theme().await;
            app.set_status(format!("{} theme", variant.name()));
        }
        _ => return None,
    }
    Some(Action::Continue)
}

async fn handle_browse_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
) -> Result<Action> {
    let Some(action) = app
        .keybindings
        .action_for_key(code, modifiers, KbContext::Global)
    else {
        return Ok(Action::Continue);
    };

    if let Some(result) = handle_common(app, action).await {
        return Ok(result);
    }

    match action {
        KbAction::NavDown => app.nav_down(),
        KbAction::NavUp => app.nav_up(),
        KbAction::CycleFocus => app.cycle_focus(),
        KbAction::Select => app.select(),
        KbAction::EnterSearch => app.enter_search(),
        KbAction::Back | KbAction::ClearFilters => {
            if !app.blog.rendered().active_filters.is_empty() {
                app.blog.clear_filters();
                app.after_filter_change();
                app.set_status("Filters cleared");
            }
        }
        KbAction::ClearQuery => {
            app.blog.clear_query();
            app.after_filter_change();
        }
        KbAction::ClearTag => {
            app.blog.clear_tag();
            app.after_filter_change();
        }
        KbAction::ClearCategory => {
            app.blog.clear_category();
            app.after_filter_change();
        }
        _ => {}
    }
    Ok(Action::Continue)
}

async fn handle_reader_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
) -> Result<Action> {
    // Digit keys follow the numbered tag links.
    if let KeyCode::Char(c @ '1'..='9') = code {
        if modifiers.is_empty() {
            let n = c as usize - '0' as usize;
            if let Some(tag) = app.browse_tag(n) {
                app.set_status(format!("Showing #{tag}"));
            }
            return Ok(Action::Continue);
        }
    }

    let Some(action) = app
        .keybindings
        .action_for_key(code, modifiers, KbContext::Reader)
    else {
        return Ok(Action::Continue);
    };

    if let Some(result) = handle_common(app, action).await {
        return Ok(result);
    }

    match action {
        KbAction::ExitReader => app.exit_reader(),
        KbAction::ScrollDown => {
            app.scroll_down(1);
            app.clamp_reader_scroll();
        }
        KbAction::ScrollUp => app.scroll_up(1),
        KbAction::PageDown => {
            app.scroll_down(PAGE_SCROLL);
            app.clamp_reader_scroll();
        }
        KbAction::PageUp => app.scroll_up(PAGE_SCROLL),
        KbAction::ComposeComment => app.start_comment(),
        KbAction::ClearComments => {
            if app.comments.is_empty() {
                app.set_status("No comments to clear");
            } else {
                app.clear_comments().await;
                app.set_status("Comments cleared");
            }
        }
        _ => {}
    }
    Ok(Action::Continue)
}

/// Handle input in search mode. Every edit re-filters the list.
fn handle_search_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Action {
    match app
        .keybindings
        .action_for_key(code, modifiers, KbContext::Search)
    {
        Some(KbAction::ExitSearch) => {
            app.cancel_search();
            return Action::Continue;
        }
        Some(KbAction::CommitSearch) => {
            app.commit_search();
            return Action::Continue;
        }
        _ => {}
    }

    match code {
        KeyCode::Backspace => {
            app.search_input.pop();
            app.update_search();
        }
        KeyCode::Char(c) => {
            if app.search_input.chars().count() >= MAX_SEARCH_QUERY_LENGTH {
                app.set_status(format!(
                    "Search query at max length ({} chars)",
                    MAX_SEARCH_QUERY_LENGTH
                ));
                return Action::Continue;
            }
            app.search_input.push(c);
            app.update_search();
        }
        _ => {}
    }
    Action::Continue
}

/// Handle input while the comment form is open.
async fn handle_compose_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
) -> Result<Action> {
    match app
        .keybindings
        .action_for_key(code, modifiers, KbContext::Compose)
    {
        Some(KbAction::CancelCompose) => {
            app.draft = None;
            return Ok(Action::Continue);
        }
        Some(KbAction::NextField) => {
            if let Some(draft) = app.draft.as_mut() {
                draft.switch_field();
            }
            return Ok(Action::Continue);
        }
        Some(KbAction::SubmitComment) => {
            if app.submit_comment().await {
                app.set_status("Comment posted");
            } else {
                app.set_status("Name and comment are both required");
            }
            return Ok(Action::Continue);
        }
        _ => {}
    }

    let Some(draft) = app.draft.as_mut() else {
        return Ok(Action::Continue);
    };
    let limit = match draft.field {
        DraftField::Name => MAX_COMMENT_NAME_LENGTH,
        DraftField::Text => MAX_COMMENT_TEXT_LENGTH,
    };
    match code {
        KeyCode::Backspace => {
            draft.active_mut().pop();
        }
        KeyCode::Char(c) => {
            let field = draft.active_mut();
            if field.chars().count() < limit {
                field.push(c);
            } else {
                app.set_status(format!("Field is limited to {limit} characters"));
            }
        }
        _ => {}
    }
    Ok(Action::Continue)
}

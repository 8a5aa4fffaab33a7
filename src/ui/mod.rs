pub mod command_bar;
pub mod header;
pub mod help;
pub mod input;
pub mod search;
pub mod status_bar;
pub mod user_card;
pub mod user_list;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};
use unicode_width::UnicodeWidthChar;

use crate::app::{App, AppMode};

use command_bar::CommandBar;
use header::ProfileHeader;
use help::HelpView;
use search::SearchBox;
use status_bar::StatusBar;
use user_list::UserList;

pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Layout: header + search box + user list + status bar + optional command bar
    let bottom_height = if app.mode == AppMode::Command { 2 } else { 1 };

    let [header_area, search_area, list_area, bottom_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Min(1),
        Constraint::Length(bottom_height),
    ])
    .areas(area);

    frame.render_widget(ProfileHeader::new(app), header_area);
    frame.render_widget(SearchBox::new(app), search_area);
    frame.render_widget(UserList::new(app), list_area);

    if app.mode == AppMode::Command {
        let [status_area, cmd_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(bottom_area);
        frame.render_widget(StatusBar::new(app), status_area);
        frame.render_widget(CommandBar::new(app), cmd_area);
    } else {
        frame.render_widget(StatusBar::new(app), bottom_area);
    }

    if app.show_help {
        frame.render_widget(HelpView::new(), list_area);
    }
}

/// Cut `text` to at most `max_width` terminal columns, ending in an ellipsis
/// when anything was dropped.
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    let total: usize = text.chars().filter_map(|c| c.width()).sum();
    if total <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max_width - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('\u{2026}');
    out
}

/// The rightmost part of `text` that fits in `max_width` columns.
pub fn tail_to_width(text: &str, max_width: usize) -> &str {
    let mut used = 0;
    let mut start = text.len();
    for (idx, c) in text.char_indices().rev() {
        let w = c.width().unwrap_or(0);
        if used + w > max_width {
            break;
        }
        used += w;
        start = idx;
    }
    &text[start..]
}

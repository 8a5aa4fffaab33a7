use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Widget};

use crate::app::App;
use crate::directory::listing::QueryContext;
use crate::ui::user_card::{FollowBadge, UserCard, user_card_height};

/// A scrollable list of users with selection highlight and follow badges.
pub struct UserList<'a> {
    pub app: &'a App,
}

impl<'a> UserList<'a> {
    pub fn new(app: &'a App) -> Self {
        Self { app }
    }

    fn title(&self) -> String {
        match &self.app.directory.listing().context {
            QueryContext::Browse => " People ".to_string(),
            QueryContext::Search(term) => format!(" Results for \"{term}\" "),
        }
    }

    fn badge_for(&self, user_id: &str) -> FollowBadge {
        let directory = &self.app.directory;
        if directory.is_toggle_pending(user_id) {
            FollowBadge::Pending
        } else if directory.is_following(user_id) {
            FollowBadge::Following
        } else {
            FollowBadge::Follow
        }
    }
}

impl Widget for UserList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(self.title())
            .title_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .border_style(Style::default().fg(Color::DarkGray));

        let inner = block.inner(area);
        block.render(area, buf);

        let directory = &self.app.directory;
        let users = &directory.listing().items;

        if users.is_empty() {
            let msg = if directory.is_loading() {
                "Loading..."
            } else {
                "No users found"
            };
            buf.set_string(
                inner.x + 1,
                inner.y,
                msg,
                Style::default().fg(Color::DarkGray),
            );
            return;
        }

        // Reserve the last row for the "load more" hint.
        let footer = u16::from(directory.listing().has_more);
        let available_height = inner.height.saturating_sub(footer);
        let content_width = inner.width.saturating_sub(1); // 1 char left margin
        let selected_index = self.app.selected_index.min(users.len() - 1);

        // Pre-compute heights for each card (including separator).
        let heights: Vec<u16> = users.iter().map(|u| user_card_height(u) + 1).collect();
        let scroll_start = compute_scroll_start(&heights, selected_index, available_height);

        let bottom = inner.y + available_height;
        let mut y = inner.y;
        let mut idx = scroll_start;
        while idx < users.len() && y < bottom {
            let user = &users[idx];
            let card_h = heights[idx];
            let render_h = card_h.min(bottom - y);

            let visible_h = render_h.saturating_sub(1).max(1);
            let card_area = Rect::new(inner.x + 1, y, content_width, visible_h);
            UserCard::new(user, self.badge_for(&user.id))
                .selected(idx == selected_index)
                .render(card_area, buf);

            y += render_h;

            // Draw separator line
            if y < bottom && idx + 1 < users.len() {
                let sep = "\u{2500}".repeat(content_width as usize);
                buf.set_string(
                    inner.x + 1,
                    y.saturating_sub(1),
                    &sep,
                    Style::default().fg(Color::DarkGray),
                );
            }

            idx += 1;
        }

        if footer == 1 && inner.height > 0 {
            let hint = if directory.is_loading() {
                "Loading..."
            } else {
                "Press n to load more"
            };
            buf.set_stringn(
                inner.x + 1,
                inner.y + inner.height - 1,
                hint,
                content_width as usize,
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::ITALIC),
            );
        }
    }
}

/// Find the smallest scroll start index so that the selected item fits
/// within the available height.
fn compute_scroll_start(heights: &[u16], selected: usize, available: u16) -> usize {
    if heights.is_empty() {
        return 0;
    }

    let selected = selected.min(heights.len() - 1);
    if available == 0 {
        return selected;
    }

    // Build a viewport that always includes the selected card and packs as
    // many previous items as can fit above it.
    let mut start = selected;
    let mut used = heights[selected];

    while start > 0 {
        let next = used.saturating_add(heights[start - 1]);
        if next > available {
            break;
        }
        start -= 1;
        used = next;
    }

    start
}

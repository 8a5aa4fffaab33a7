use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Widget;

use crate::app::{App, AppMode};
use crate::ui::truncate_to_width;

/// Bottom status bar showing mode, listing position, and status messages.
pub struct StatusBar<'a> {
    pub app: &'a App,
}

impl<'a> StatusBar<'a> {
    pub fn new(app: &'a App) -> Self {
        Self { app }
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        // Background
        let bg_style = Style::default().bg(Color::DarkGray).fg(Color::White);
        for x in area.x..area.x + area.width {
            buf[(x, area.y)].set_style(bg_style);
        }

        let mut spans = Vec::new();

        // Mode indicator
        let mode_str = match self.app.mode {
            AppMode::Normal => " NORMAL ",
            AppMode::Search => " SEARCH ",
            AppMode::Command => " COMMAND ",
        };
        let mode_style = Style::default()
            .bg(match self.app.mode {
                AppMode::Normal => Color::Blue,
                AppMode::Search => Color::Yellow,
                AppMode::Command => Color::Magenta,
            })
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);
        spans.push(Span::styled(mode_str, mode_style));
        spans.push(Span::raw(" "));

        // Listing position
        let directory = &self.app.directory;
        let listing = directory.listing();
        let context = match listing.context.term() {
            Some(term) => format!("Search: {term}"),
            None => "Browse".to_string(),
        };
        spans.push(Span::styled(context, bg_style));
        spans.push(Span::styled(
            format!(
                " \u{00B7} {} users \u{00B7} page {}{}",
                listing.len(),
                listing.current_page,
                if listing.has_more { " (more)" } else { "" },
            ),
            bg_style,
        ));

        // Loading indicator
        if directory.is_loading() {
            spans.push(Span::styled(
                " [loading...]",
                Style::default().bg(Color::DarkGray).fg(Color::Yellow),
            ));
        }

        // Status message (right-aligned)
        let message = self
            .app
            .status_message
            .as_deref()
            .or_else(|| directory.error());
        if let Some(msg) = message {
            let left_width: usize = spans.iter().map(|s| s.width()).sum();
            let room = (area.width as usize).saturating_sub(left_width + 1);
            let msg = truncate_to_width(msg, room);
            let padding = room.saturating_sub(Span::raw(msg.as_str()).width()) + 1;
            spans.push(Span::styled(" ".repeat(padding), bg_style));
            spans.push(Span::styled(
                msg,
                Style::default().bg(Color::DarkGray).fg(Color::Red),
            ));
        }

        let line = Line::from(spans);
        buf.set_line(area.x, area.y, &line, area.width);
    }
}

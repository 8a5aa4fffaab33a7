use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Widget};

use crate::app::{App, AppMode};
use crate::ui::input::TextInput;

const PLACEHOLDER: &str = "Search by username or name... (press / to type)";

/// The search box above the user list.
pub struct SearchBox<'a> {
    pub app: &'a App,
}

impl<'a> SearchBox<'a> {
    pub fn new(app: &'a App) -> Self {
        Self { app }
    }
}

impl Widget for SearchBox<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let editing = self.app.mode == AppMode::Search;
        let border_color = if editing { Color::Yellow } else { Color::DarkGray };

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Search Users ")
            .title_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .border_style(Style::default().fg(border_color));

        let inner = block.inner(area);
        block.render(area, buf);

        if self.app.search_input.is_empty() && !editing {
            buf.set_stringn(
                inner.x + 1,
                inner.y,
                PLACEHOLDER,
                inner.width.saturating_sub(1) as usize,
                Style::default().fg(Color::DarkGray),
            );
            return;
        }

        TextInput::new(" ", &self.app.search_input)
            .focused(editing)
            .render(inner, buf);
    }
}

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::Widget;

use crate::ui::tail_to_width;

/// A simple single-line text input renderer.
///
/// Renders the prompt + text content, with a cursor indicator at the end
/// while focused.
pub struct TextInput<'a> {
    pub prompt: &'a str,
    pub text: &'a str,
    pub focused: bool,
    pub style: Style,
}

impl<'a> TextInput<'a> {
    pub fn new(prompt: &'a str, text: &'a str) -> Self {
        Self {
            prompt,
            text,
            focused: true,
            style: Style::default().fg(Color::White),
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }
}

impl Widget for TextInput<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let cursor = if self.focused { "\u{2588}" } else { "" };
        let display = format!("{}{}{cursor}", self.prompt, self.text);
        // If the display is wider than the area, show the rightmost portion.
        let visible = tail_to_width(&display, area.width as usize);

        buf.set_string(area.x, area.y, visible, self.style);
    }
}

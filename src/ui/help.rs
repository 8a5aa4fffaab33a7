use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget};

/// Key bindings grouped by section, in display order.
const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "People",
        &[
            ("j / k", "Move selection"),
            ("f, Enter", "Follow or unfollow"),
            ("n", "Load more"),
            ("r", "Reload page 1"),
        ],
    ),
    (
        "Search",
        &[
            ("/, i", "Edit the query (live)"),
            ("Ctrl-U", "Clear the query"),
            ("Enter, Esc", "Back to the list"),
        ],
    ),
    (
        "Other",
        &[
            (":", "Command mode"),
            ("?", "Toggle this help"),
            ("Esc", "Dismiss message"),
            ("q, Ctrl-C", "Quit"),
        ],
    ),
];

const KEY_COLUMN: usize = 12;

/// Help overlay showing keybindings.
#[derive(Default)]
pub struct HelpView;

impl HelpView {
    pub fn new() -> Self {
        Self
    }

    fn lines() -> Vec<Line<'static>> {
        let heading = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let key = Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD);

        let mut lines = Vec::new();
        for (i, (title, bindings)) in SECTIONS.iter().enumerate() {
            if i > 0 {
                lines.push(Line::default());
            }
            lines.push(Line::from(Span::styled(*title, heading)));
            lines.extend(bindings.iter().map(|(keys, action)| {
                Line::from(vec![
                    Span::styled(format!(" {keys:<KEY_COLUMN$}"), key),
                    Span::raw(*action),
                ])
            }));
        }
        lines
    }
}

impl Widget for HelpView {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let lines = Self::lines();

        // Size the panel to its content, clamped to the screen.
        let wanted_height = lines.len() as u16 + 2;
        let width = 48u16.min(area.width.saturating_sub(4));
        let height = wanted_height.min(area.height.saturating_sub(2));
        let panel = Rect::new(
            area.x + area.width.saturating_sub(width) / 2,
            area.y + area.height.saturating_sub(height) / 2,
            width,
            height,
        );

        Clear.render(panel, buf);
        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(Color::Cyan))
                    .title(" Keys ")
                    .title_alignment(Alignment::Center),
            )
            .render(panel, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_section_is_listed() {
        let text: Vec<String> = HelpView::lines().iter().map(|l| l.to_string()).collect();
        for (title, _) in SECTIONS {
            assert!(text.iter().any(|l| l == title), "missing {title}");
        }
        assert!(text.iter().any(|l| l.contains("Follow or unfollow")));
    }
}

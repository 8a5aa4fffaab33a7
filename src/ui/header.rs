use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Widget;

use crate::app::App;

/// Top line: app title and who is signed in.
///
/// Shows the cached profile when there is one, otherwise the bare user id.
pub struct ProfileHeader<'a> {
    pub app: &'a App,
}

impl<'a> ProfileHeader<'a> {
    pub fn new(app: &'a App) -> Self {
        Self { app }
    }
}

impl Widget for ProfileHeader<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let mut spans = vec![
            Span::styled(
                " RecipeShare ",
                Style::default()
                    .fg(Color::White)
                    .bg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" People  ", Style::default().fg(Color::Magenta)),
        ];

        match (&self.app.profile, &self.app.actor_id) {
            (Some(profile), _) => {
                spans.push(Span::styled(
                    profile.name.as_str(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ));
                if let Some(ref email) = profile.email {
                    spans.push(Span::styled(
                        format!(" {email}"),
                        Style::default().fg(Color::DarkGray),
                    ));
                }
            }
            (None, Some(user_id)) => {
                spans.push(Span::styled(
                    format!("signed in as {user_id}"),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            (None, None) => {
                spans.push(Span::styled(
                    "not signed in (set RECIPESHARE_TOKEN and RECIPESHARE_USER_ID)",
                    Style::default().fg(Color::Red),
                ));
            }
        }

        spans.push(Span::styled(
            format!("  {}", self.app.config.api_base_url),
            Style::default().fg(Color::DarkGray),
        ));

        buf.set_line(area.x, area.y, &Line::from(spans), area.width);
    }
}

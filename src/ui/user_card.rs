use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Widget;
use unicode_width::UnicodeWidthStr;

use crate::api::types::UserSummary;
use crate::ui::truncate_to_width;

/// Relationship badge state for a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowBadge {
    Follow,
    Following,
    Pending,
}

impl FollowBadge {
    fn label(self) -> &'static str {
        match self {
            Self::Follow => "[ Follow ]",
            Self::Following => "[ Following ]",
            Self::Pending => "[ ... ]",
        }
    }

    fn style(self) -> Style {
        match self {
            Self::Follow => Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
            Self::Following => Style::default().fg(Color::DarkGray),
            Self::Pending => Style::default().fg(Color::Yellow),
        }
    }
}

/// Renders a single user as a compact card.
///
/// Layout:
///   Name  handle                              [ Follow ]
///   Bio (one line, truncated)
///   12 followers
pub struct UserCard<'a> {
    pub user: &'a UserSummary,
    pub badge: FollowBadge,
    pub selected: bool,
}

impl<'a> UserCard<'a> {
    pub fn new(user: &'a UserSummary, badge: FollowBadge) -> Self {
        Self {
            user,
            badge,
            selected: false,
        }
    }

    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }
}

/// Height of a card, not counting the separator.
pub fn user_card_height(user: &UserSummary) -> u16 {
    if has_bio(user) { 3 } else { 2 }
}

fn has_bio(user: &UserSummary) -> bool {
    user.bio.as_deref().is_some_and(|b| !b.trim().is_empty())
}

impl Widget for UserCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let name_style = if self.selected {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD)
        };
        let width = area.width as usize;
        let mut y = area.y;

        // -- Line 1: name, handle, badge --
        let label = self.badge.label();
        let label_width = label.width();
        let left_budget = width.saturating_sub(label_width + 1);

        let name = truncate_to_width(&self.user.display_name, left_budget);
        let handle_budget = left_budget.saturating_sub(name.width() + 2);
        let handle = truncate_to_width(&self.user.contact_handle, handle_budget);

        let mut spans = vec![
            if self.selected {
                Span::styled("\u{25B8}", name_style)
            } else {
                Span::raw(" ")
            },
            Span::styled(name.clone(), name_style),
        ];
        if !handle.is_empty() {
            spans.push(Span::styled(
                format!(" {handle}"),
                Style::default().fg(Color::DarkGray),
            ));
        }
        let used: usize = spans.iter().map(|s| s.width()).sum();
        let padding = width.saturating_sub(used + label_width);
        if padding > 0 {
            spans.push(Span::raw(" ".repeat(padding)));
        }
        spans.push(Span::styled(label, self.badge.style()));
        buf.set_line(area.x, y, &Line::from(spans), area.width);
        y += 1;

        // -- Line 2: bio --
        if has_bio(self.user) && y < area.y + area.height {
            let bio = self.user.bio.as_deref().unwrap_or_default().trim();
            let bio = truncate_to_width(bio, width.saturating_sub(1));
            buf.set_line(
                area.x,
                y,
                &Line::from(vec![
                    Span::raw(" "),
                    Span::styled(bio, Style::default().fg(Color::Gray)),
                ]),
                area.width,
            );
            y += 1;
        }

        // -- Line 3: follower count --
        if y < area.y + area.height {
            let count = self.user.follower_count;
            let noun = if count == 1 { "follower" } else { "followers" };
            buf.set_line(
                area.x,
                y,
                &Line::from(vec![
                    Span::raw(" "),
                    Span::styled(
                        format_count(count),
                        Style::default()
                            .fg(Color::White)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(format!(" {noun}"), Style::default().fg(Color::DarkGray)),
                ]),
                area.width,
            );
        }
    }
}

fn format_count(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chef(bio: Option<&str>) -> UserSummary {
        UserSummary {
            id: "u1".into(),
            display_name: "Chef Ana".into(),
            contact_handle: "ana@example.com".into(),
            avatar_url: None,
            bio: bio.map(str::to_string),
            follower_count: 1234,
        }
    }

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol())
            .collect::<String>()
    }

    #[test]
    fn card_height_depends_on_bio() {
        assert_eq!(user_card_height(&chef(None)), 2);
        assert_eq!(user_card_height(&chef(Some("   "))), 2);
        assert_eq!(user_card_height(&chef(Some("Pasta"))), 3);
    }

    #[test]
    fn formats_counts() {
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_234), "1.2K");
        assert_eq!(format_count(2_500_000), "2.5M");
    }

    #[test]
    fn renders_name_badge_bio_and_count() {
        let user = chef(Some("Pasta every day"));
        let area = Rect::new(0, 0, 50, 3);
        let mut buf = Buffer::empty(area);

        UserCard::new(&user, FollowBadge::Following).render(area, &mut buf);

        let first = row(&buf, 0);
        assert!(first.contains("Chef Ana"));
        assert!(first.contains("ana@example.com"));
        assert!(first.trim_end().ends_with("[ Following ]"));
        assert!(row(&buf, 1).contains("Pasta every day"));
        assert!(row(&buf, 2).contains("1.2K followers"));
    }
}

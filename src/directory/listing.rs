use std::cmp::Ordering;

use icu_collator::{Collator, CollatorOptions, Strength};

use crate::api::types::{ResultPage, UserSummary};

/// What the visible listing was fetched for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum QueryContext {
    #[default]
    Browse,
    Search(String),
}

impl QueryContext {
    /// Browse when the trimmed query is empty, otherwise search for it.
    pub fn from_query(query: &str) -> Self {
        let term = query.trim();
        if term.is_empty() {
            Self::Browse
        } else {
            Self::Search(term.to_string())
        }
    }

    pub fn term(&self) -> Option<&str> {
        match self {
            Self::Browse => None,
            Self::Search(term) => Some(term),
        }
    }
}

/// The users currently on screen plus the pagination cursor.
///
/// Items are sorted by display name after a replace, but pages appended by
/// "load more" keep server order and never reshuffle what is already shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleListing {
    pub items: Vec<UserSummary>,
    pub current_page: u32,
    pub has_more: bool,
    pub context: QueryContext,
}

impl Default for VisibleListing {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            current_page: 1,
            has_more: false,
            context: QueryContext::Browse,
        }
    }
}

impl VisibleListing {
    /// Discard the current items and show `page` instead, sorted.
    ///
    /// Returns the ids now visible.
    pub fn replace(
        &mut self,
        context: QueryContext,
        page: ResultPage,
        actor_id: &str,
    ) -> Vec<String> {
        let mut users = exclude_actor(page.users, actor_id);
        sort_by_display_name(&mut users);

        self.items = users;
        self.current_page = page.current_page;
        self.has_more = page.has_more;
        self.context = context;

        self.items.iter().map(|u| u.id.clone()).collect()
    }

    /// Append `page` after the existing items in server order.
    ///
    /// Returns the ids that were added.
    pub fn append(&mut self, page: ResultPage, actor_id: &str) -> Vec<String> {
        let users = exclude_actor(page.users, actor_id);
        let added = users.iter().map(|u| u.id.clone()).collect();

        self.items.extend(users);
        self.current_page = page.current_page;
        self.has_more = page.has_more;

        added
    }

    /// Apply a confirmed follow (+1) or unfollow (-1) to `user_id`'s count.
    ///
    /// The count never drops below zero.
    pub fn adjust_follower_count(&mut self, user_id: &str, followed: bool) {
        for user in self.items.iter_mut().filter(|u| u.id == user_id) {
            user.follower_count = if followed {
                user.follower_count.saturating_add(1)
            } else {
                user.follower_count.saturating_sub(1)
            };
        }
    }

    pub fn get(&self, user_id: &str) -> Option<&UserSummary> {
        self.items.iter().find(|u| u.id == user_id)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

fn exclude_actor(users: Vec<UserSummary>, actor_id: &str) -> Vec<UserSummary> {
    users.into_iter().filter(|u| u.id != actor_id).collect()
}

/// Sort ascending by display name with root-locale collation.
///
/// Case and accents only break ties between otherwise equal names, and
/// lowercase sorts before uppercase. Equal names keep their server order.
pub fn sort_by_display_name(users: &mut [UserSummary]) {
    match name_collator() {
        Some(collator) => {
            users.sort_by(|a, b| collator.compare(&a.display_name, &b.display_name));
        }
        None => users.sort_by(|a, b| fold_case(&a.display_name, &b.display_name)),
    }
}

fn name_collator() -> Option<Collator> {
    let mut options = CollatorOptions::new();
    options.strength = Some(Strength::Tertiary);
    match Collator::try_new(&Default::default(), options) {
        Ok(collator) => Some(collator),
        Err(e) => {
            tracing::warn!("collation data unavailable, sorting by folded case: {e}");
            None
        }
    }
}

fn fold_case(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
        .then_with(|| b.cmp(a))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::directory::testing::{page, user};

    fn names(listing: &VisibleListing) -> Vec<&str> {
        listing.items.iter().map(|u| u.display_name.as_str()).collect()
    }

    #[test]
    fn query_context_from_trimmed_query() {
        assert_eq!(QueryContext::from_query("   "), QueryContext::Browse);
        assert_eq!(
            QueryContext::from_query("  cha "),
            QueryContext::Search("cha".into())
        );
    }

    #[test]
    fn replace_excludes_actor_and_sorts_case_insensitively() {
        let mut listing = VisibleListing::default();
        let ids = listing.replace(
            QueryContext::Browse,
            page(
                vec![
                    user("3", "charlie"),
                    user("me", "Me Myself"),
                    user("1", "Bravo"),
                    user("2", "alpha"),
                ],
                1,
                true,
            ),
            "me",
        );

        assert_eq!(names(&listing), vec!["alpha", "Bravo", "charlie"]);
        assert_eq!(ids, vec!["2", "1", "3"]);
        assert_eq!(listing.current_page, 1);
        assert!(listing.has_more);
    }

    #[test]
    fn browse_page_of_nine_with_actor_shows_eight() {
        let mut users: Vec<_> = (0..8)
            .map(|i| user(&format!("u{i}"), &format!("User {}", 8 - i)))
            .collect();
        users.insert(4, user("me", "Actor"));

        let mut listing = VisibleListing::default();
        listing.replace(QueryContext::Browse, page(users, 1, true), "me");

        assert_eq!(listing.len(), 8);
        assert!(listing.get("me").is_none());
        assert_eq!(listing.items[0].display_name, "User 1");
        assert_eq!(listing.items[7].display_name, "User 8");
    }

    #[test]
    fn append_keeps_server_order_and_existing_positions() {
        let mut listing = VisibleListing::default();
        listing.replace(
            QueryContext::Browse,
            page(vec![user("b", "Bea"), user("a", "Ann")], 1, true),
            "me",
        );

        let added = listing.append(
            page(vec![user("z", "Zed"), user("me", "Me"), user("c", "Cy")], 2, false),
            "me",
        );

        assert_eq!(names(&listing), vec!["Ann", "Bea", "Zed", "Cy"]);
        assert_eq!(added, vec!["z", "c"]);
        assert_eq!(listing.current_page, 2);
        assert!(!listing.has_more);
    }

    #[test]
    fn append_does_not_deduplicate() {
        let mut listing = VisibleListing::default();
        listing.replace(QueryContext::Browse, page(vec![user("a", "Ann")], 1, true), "me");
        listing.append(page(vec![user("a", "Ann")], 2, false), "me");
        assert_eq!(listing.len(), 2);
    }

    #[test]
    fn replace_resets_context_and_cursor() {
        let mut listing = VisibleListing::default();
        listing.replace(QueryContext::Browse, page(vec![user("a", "Ann")], 1, true), "me");
        listing.append(page(vec![user("b", "Bo")], 2, true), "me");

        listing.replace(
            QueryContext::Search("cy".into()),
            page(vec![user("c", "Cy")], 1, false),
            "me",
        );

        assert_eq!(names(&listing), vec!["Cy"]);
        assert_eq!(listing.current_page, 1);
        assert_eq!(listing.context, QueryContext::Search("cy".into()));
    }

    #[test]
    fn follower_count_adjusts_and_saturates() {
        let mut listing = VisibleListing::default();
        let mut ann = user("a", "Ann");
        ann.follower_count = 5;
        listing.replace(
            QueryContext::Browse,
            page(vec![ann, user("b", "Bo")], 1, false),
            "me",
        );

        listing.adjust_follower_count("a", true);
        assert_eq!(listing.get("a").unwrap().follower_count, 6);

        listing.adjust_follower_count("b", false);
        assert_eq!(listing.get("b").unwrap().follower_count, 0);
    }

    #[test]
    fn names_differing_only_in_case_put_lowercase_first() {
        let mut users = vec![user("1", "ANN"), user("2", "Ann"), user("3", "ann")];
        sort_by_display_name(&mut users);
        let ordered: Vec<_> = users.iter().map(|u| u.display_name.as_str()).collect();
        assert_eq!(ordered, vec!["ann", "Ann", "ANN"]);
    }

    #[test]
    fn accented_names_sort_with_their_base_letter() {
        let mut users = vec![
            user("1", "Zoe"),
            user("2", "\u{c9}mile"),
            user("3", "Ann"),
            user("4", "ann"),
            user("5", "emma"),
        ];
        sort_by_display_name(&mut users);
        let ordered: Vec<_> = users.iter().map(|u| u.display_name.as_str()).collect();
        assert_eq!(ordered, vec!["ann", "Ann", "\u{c9}mile", "emma", "Zoe"]);
    }

    #[test]
    fn folded_fallback_puts_lowercase_first() {
        assert_eq!(fold_case("ann", "Ann"), Ordering::Less);
        assert_eq!(fold_case("Bo", "alpha"), Ordering::Greater);
    }
}

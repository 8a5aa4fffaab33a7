use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Avatar shown for users that never uploaded a profile picture.
pub const DEFAULT_AVATAR_URL: &str = "https://cdn-icons-png.flaticon.com/512/2922/2922510.png";

// ---------------------------------------------------------------------------
// Directory pages
// ---------------------------------------------------------------------------

/// One page of the user directory (GET /users/initial, GET /users/search).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultPage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub users: Vec<UserSummary>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub has_more: bool,
    #[serde(default = "first_page")]
    pub current_page: u32,
}

fn first_page() -> u32 {
    1
}

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "name")]
    pub display_name: String,
    #[serde(rename = "email", default, deserialize_with = "null_as_default")]
    pub contact_handle: String,
    #[serde(rename = "profilePicture", default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(rename = "followerCount", default, deserialize_with = "null_as_default")]
    pub follower_count: u64,
}

/// Treat an explicit `null` like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl UserSummary {
    /// The avatar to display, falling back to the shared placeholder.
    pub fn avatar(&self) -> &str {
        resolve_avatar(self.avatar_url.as_deref())
    }
}

fn resolve_avatar(url: Option<&str>) -> &str {
    match url {
        Some(url) if !url.trim().is_empty() => url,
        _ => DEFAULT_AVATAR_URL,
    }
}

// ---------------------------------------------------------------------------
// Relationships
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowState {
    pub is_following: bool,
}

// ---------------------------------------------------------------------------
// Profile of the signed-in user
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "profilePicture", default)]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
}

impl Profile {
    pub fn avatar(&self) -> &str {
        resolve_avatar(self.profile_picture.as_deref())
    }
}

/// A profile as persisted on disk, stamped with when it was fetched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedProfile {
    pub profile: Profile,
    pub fetched_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_directory_page() {
        let body = r#"{
            "users": [
                {"_id": "u1", "name": "Chandra", "email": "chandra@example.com",
                 "profilePicture": "https://img/1.png", "bio": "Bakes bread", "followerCount": 5},
                {"_id": "u2", "name": "bo", "email": "bo@example.com"}
            ],
            "hasMore": true,
            "currentPage": 2
        }"#;

        let page: ResultPage = serde_json::from_str(body).unwrap();
        assert_eq!(page.current_page, 2);
        assert!(page.has_more);
        assert_eq!(page.users.len(), 2);
        assert_eq!(page.users[0].display_name, "Chandra");
        assert_eq!(page.users[0].follower_count, 5);
        assert_eq!(page.users[1].follower_count, 0);
        assert_eq!(page.users[1].bio, None);
    }

    #[test]
    fn null_user_fields_do_not_lose_the_page() {
        let body = r#"{
            "users": [
                {"_id": "u1", "name": "Ana", "email": null, "followerCount": null},
                {"_id": "u2", "name": "Bo", "email": "bo@example.com", "followerCount": 3}
            ],
            "hasMore": false,
            "currentPage": 1
        }"#;

        let page: ResultPage = serde_json::from_str(body).unwrap();
        assert_eq!(page.users.len(), 2);
        assert_eq!(page.users[0].follower_count, 0);
        assert_eq!(page.users[0].contact_handle, "");
        assert_eq!(page.users[1].follower_count, 3);
    }

    #[test]
    fn missing_page_fields_use_defaults() {
        let page: ResultPage = serde_json::from_str(r#"{"users": []}"#).unwrap();
        assert_eq!(page.current_page, 1);
        assert!(!page.has_more);
    }

    #[test]
    fn avatar_falls_back_to_placeholder() {
        let mut user: UserSummary =
            serde_json::from_str(r#"{"_id": "u1", "name": "Ana"}"#).unwrap();
        assert_eq!(user.avatar(), DEFAULT_AVATAR_URL);

        user.avatar_url = Some("  ".into());
        assert_eq!(user.avatar(), DEFAULT_AVATAR_URL);

        user.avatar_url = Some("https://img/ana.png".into());
        assert_eq!(user.avatar(), "https://img/ana.png");
    }

    #[test]
    fn parses_follow_state() {
        let state: FollowState = serde_json::from_str(r#"{"isFollowing": true}"#).unwrap();
        assert!(state.is_following);
    }
}

use crate::api::types::FollowState;
use crate::api::{ApiClientError, DirectoryClient};

impl DirectoryClient {
    /// Whether the signed-in user follows `user_id`.
    pub async fn is_following(&self, user_id: &str) -> Result<bool, ApiClientError> {
        let url = self.url(&format!("/users/{user_id}/is-following"));
        let state: FollowState = self.bearer_get(&url).await?;
        Ok(state.is_following)
    }

    /// Start following `user_id`.
    pub async fn follow(&self, user_id: &str) -> Result<(), ApiClientError> {
        let url = self.url(&format!("/users/{user_id}/follow"));
        self.bearer_post(&url).await
    }

    /// Stop following `user_id`.
    pub async fn unfollow(&self, user_id: &str) -> Result<(), ApiClientError> {
        let url = self.url(&format!("/users/{user_id}/unfollow"));
        self.bearer_post(&url).await
    }
}

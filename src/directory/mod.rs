//! Incremental search over the user directory with a follow-state overlay.
//!
//! The pieces are deliberately small: [`listing`] merges pages into the
//! visible set, [`resolver`] fans out follow-status lookups, [`debounce`]
//! settles free-text input, and [`controller`] owns all of that state and
//! turns user intents into requests and request outcomes into transitions.

pub mod controller;
pub mod debounce;
pub mod listing;
pub mod resolver;

#[cfg(test)]
pub(crate) mod testing;

use async_trait::async_trait;

use crate::api::types::ResultPage;
use crate::api::{ApiClientError, DirectoryClient};

/// The remote operations the directory pipeline depends on.
#[async_trait]
pub trait DirectoryApi: Send + Sync {
    async fn fetch_browse_page(&self, page: u32, limit: u32) -> Result<ResultPage, ApiClientError>;
    async fn fetch_search_page(
        &self,
        term: &str,
        page: u32,
        limit: u32,
    ) -> Result<ResultPage, ApiClientError>;
    async fn is_following(&self, user_id: &str) -> Result<bool, ApiClientError>;
    async fn follow(&self, user_id: &str) -> Result<(), ApiClientError>;
    async fn unfollow(&self, user_id: &str) -> Result<(), ApiClientError>;
}

#[async_trait]
impl DirectoryApi for DirectoryClient {
    async fn fetch_browse_page(&self, page: u32, limit: u32) -> Result<ResultPage, ApiClientError> {
        DirectoryClient::fetch_browse_page(self, page, limit).await
    }

    async fn fetch_search_page(
        &self,
        term: &str,
        page: u32,
        limit: u32,
    ) -> Result<ResultPage, ApiClientError> {
        DirectoryClient::fetch_search_page(self, term, page, limit).await
    }

    async fn is_following(&self, user_id: &str) -> Result<bool, ApiClientError> {
        DirectoryClient::is_following(self, user_id).await
    }

    async fn follow(&self, user_id: &str) -> Result<(), ApiClientError> {
        DirectoryClient::follow(self, user_id).await
    }

    async fn unfollow(&self, user_id: &str) -> Result<(), ApiClientError> {
        DirectoryClient::unfollow(self, user_id).await
    }
}

//! In-memory directory service for exercising the pipeline without HTTP.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::api::ApiClientError;
use crate::api::types::{ResultPage, UserSummary};
use crate::directory::DirectoryApi;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Browse { page: u32, limit: u32 },
    Search { term: String, page: u32, limit: u32 },
    IsFollowing(String),
    Follow(String),
    Unfollow(String),
}

#[derive(Default)]
pub struct FakeDirectory {
    browse: HashMap<u32, ResultPage>,
    search: HashMap<(String, u32), ResultPage>,
    following: Mutex<HashSet<String>>,
    failing_lookups: HashSet<String>,
    failing_toggles: bool,
    lookup_barrier: Option<Arc<tokio::sync::Barrier>>,
    calls: Mutex<Vec<Call>>,
}

impl FakeDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_browse_page(mut self, page_no: u32, page: ResultPage) -> Self {
        self.browse.insert(page_no, page);
        self
    }

    pub fn with_search_page(mut self, term: &str, page_no: u32, page: ResultPage) -> Self {
        self.search.insert((term.to_string(), page_no), page);
        self
    }

    pub fn following(self, user_id: &str) -> Self {
        self.following
            .lock()
            .unwrap()
            .insert(user_id.to_string());
        self
    }

    pub fn failing_lookup(mut self, user_id: &str) -> Self {
        self.failing_lookups.insert(user_id.to_string());
        self
    }

    pub fn failing_toggles(mut self) -> Self {
        self.failing_toggles = true;
        self
    }

    pub fn with_lookup_barrier(mut self, barrier: Arc<tokio::sync::Barrier>) -> Self {
        self.lookup_barrier = Some(barrier);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

fn server_error() -> ApiClientError {
    ApiClientError::ApiError {
        status: 500,
        detail: "internal error".into(),
    }
}

#[async_trait]
impl DirectoryApi for FakeDirectory {
    async fn fetch_browse_page(&self, page: u32, limit: u32) -> Result<ResultPage, ApiClientError> {
        self.record(Call::Browse { page, limit });
        self.browse.get(&page).cloned().ok_or_else(server_error)
    }

    async fn fetch_search_page(
        &self,
        term: &str,
        page: u32,
        limit: u32,
    ) -> Result<ResultPage, ApiClientError> {
        self.record(Call::Search {
            term: term.to_string(),
            page,
            limit,
        });
        self.search
            .get(&(term.to_string(), page))
            .cloned()
            .ok_or_else(server_error)
    }

    async fn is_following(&self, user_id: &str) -> Result<bool, ApiClientError> {
        self.record(Call::IsFollowing(user_id.to_string()));
        if let Some(barrier) = &self.lookup_barrier {
            barrier.wait().await;
        }
        if self.failing_lookups.contains(user_id) {
            return Err(server_error());
        }
        Ok(self.following.lock().unwrap().contains(user_id))
    }

    async fn follow(&self, user_id: &str) -> Result<(), ApiClientError> {
        self.record(Call::Follow(user_id.to_string()));
        if self.failing_toggles {
            return Err(server_error());
        }
        self.following.lock().unwrap().insert(user_id.to_string());
        Ok(())
    }

    async fn unfollow(&self, user_id: &str) -> Result<(), ApiClientError> {
        self.record(Call::Unfollow(user_id.to_string()));
        if self.failing_toggles {
            return Err(server_error());
        }
        self.following.lock().unwrap().remove(user_id);
        Ok(())
    }
}

pub fn user(id: &str, name: &str) -> UserSummary {
    UserSummary {
        id: id.to_string(),
        display_name: name.to_string(),
        contact_handle: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        avatar_url: None,
        bio: None,
        follower_count: 0,
    }
}

pub fn page(users: Vec<UserSummary>, current_page: u32, has_more: bool) -> ResultPage {
    ResultPage {
        users,
        has_more,
        current_page,
    }
}

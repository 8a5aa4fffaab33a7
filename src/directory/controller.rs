use std::collections::HashSet;

use crate::api::ApiClientError;
use crate::api::types::ResultPage;
use crate::directory::DirectoryApi;
use crate::directory::listing::{QueryContext, VisibleListing};
use crate::directory::resolver::{RelationshipFlags, merge_flags};
use crate::event::ApiResult;

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// A fresh query: the page replaces the listing.
    Replace,
    /// "Load more": the page is appended to the listing.
    Append,
}

/// A page fetch, tagged with the listing generation it was issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub generation: u64,
    pub mode: FetchMode,
    pub context: QueryContext,
    pub page: u32,
    pub limit: u32,
}

impl FetchRequest {
    pub async fn execute(&self, api: &dyn DirectoryApi) -> Result<ResultPage, ApiClientError> {
        match &self.context {
            QueryContext::Browse => api.fetch_browse_page(self.page, self.limit).await,
            QueryContext::Search(term) => api.fetch_search_page(term, self.page, self.limit).await,
        }
    }

    fn failure_message(&self) -> &'static str {
        match (self.mode, &self.context) {
            (FetchMode::Append, _) => "Failed to load more users. Please try again.",
            (FetchMode::Replace, QueryContext::Browse) => "Failed to load users. Please try again.",
            (FetchMode::Replace, QueryContext::Search(_)) => {
                "Failed to search users. Please try again."
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowAction {
    Follow,
    Unfollow,
}

impl FollowAction {
    pub fn verb(self) -> &'static str {
        match self {
            Self::Follow => "follow",
            Self::Unfollow => "unfollow",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleRequest {
    pub user_id: String,
    pub action: FollowAction,
}

impl ToggleRequest {
    pub async fn execute(&self, api: &dyn DirectoryApi) -> Result<(), ApiClientError> {
        match self.action {
            FollowAction::Follow => api.follow(&self.user_id).await,
            FollowAction::Unfollow => api.unfollow(&self.user_id).await,
        }
    }
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// Sole owner of the visible listing and the relationship flags.
///
/// Every mutation is one of a handful of transitions (begin/apply a page,
/// merge flags, begin/apply a toggle) invoked from the event loop, so there
/// is exactly one writer. Network work happens elsewhere with the request
/// values these methods hand out.
#[derive(Debug)]
pub struct DirectoryController {
    actor_id: Option<String>,
    page_size: u32,
    listing: VisibleListing,
    flags: RelationshipFlags,
    /// Bumped by every fresh query; responses for older generations are dropped.
    generation: u64,
    loading: bool,
    pending_toggles: HashSet<String>,
    error: Option<String>,
}

impl DirectoryController {
    /// `actor_id` is `None` when nobody is signed in, in which case every
    /// request is short-circuited.
    pub fn new(actor_id: Option<String>, page_size: u32) -> Self {
        Self {
            actor_id,
            page_size,
            listing: VisibleListing::default(),
            flags: RelationshipFlags::new(),
            generation: 0,
            loading: false,
            pending_toggles: HashSet::new(),
            error: None,
        }
    }

    pub fn listing(&self) -> &VisibleListing {
        &self.listing
    }

    pub fn flags(&self) -> &RelationshipFlags {
        &self.flags
    }

    pub fn is_following(&self, user_id: &str) -> bool {
        self.flags.get(user_id).copied().unwrap_or(false)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_toggle_pending(&self, user_id: &str) -> bool {
        self.pending_toggles.contains(user_id)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    // -- Page fetches -------------------------------------------------------

    /// A debounced query settled: search when it has text, browse otherwise.
    pub fn query_settled(&mut self, query: &str) -> Option<FetchRequest> {
        self.begin_refresh(QueryContext::from_query(query))
    }

    /// Start page 1 of `context`, superseding anything in flight.
    pub fn begin_refresh(&mut self, context: QueryContext) -> Option<FetchRequest> {
        self.begin_page(context, 1)
    }

    /// Start a replace-mode fetch of `page` for `context`.
    pub fn begin_page(&mut self, context: QueryContext, page: u32) -> Option<FetchRequest> {
        if self.actor_id.is_none() {
            tracing::debug!("not signed in, skipping directory fetch");
            return None;
        }

        self.generation += 1;
        self.loading = true;
        self.error = None;

        let request = FetchRequest {
            generation: self.generation,
            mode: FetchMode::Replace,
            context,
            page: page.max(1),
            limit: self.page_size,
        };
        tracing::debug!(?request, "dispatching page fetch");
        Some(request)
    }

    /// Start fetching the next page of the current context.
    ///
    /// A no-op while there is nothing more to load or any page fetch is in
    /// flight, which also keeps "load more" from racing a pending search.
    pub fn begin_load_more(&mut self) -> Option<FetchRequest> {
        if self.actor_id.is_none() || !self.listing.has_more || self.loading {
            return None;
        }

        self.loading = true;

        let request = FetchRequest {
            generation: self.generation,
            mode: FetchMode::Append,
            context: self.listing.context.clone(),
            page: self.listing.current_page + 1,
            limit: self.page_size,
        };
        tracing::debug!(?request, "dispatching load more");
        Some(request)
    }

    /// Fold a completed fetch into the listing.
    ///
    /// Returns the ids whose follow status should be resolved: every visible
    /// id after a replace, only the new ones after an append. Responses for a
    /// superseded generation are discarded whether they succeeded or not.
    pub fn apply_page(
        &mut self,
        request: &FetchRequest,
        result: ApiResult<ResultPage>,
    ) -> Option<Vec<String>> {
        if request.generation != self.generation {
            tracing::debug!(
                stale = request.generation,
                current = self.generation,
                "discarding superseded page"
            );
            return None;
        }

        self.loading = false;
        let actor_id = self.actor_id.as_deref()?;

        match result {
            Ok(page) => {
                let ids = match request.mode {
                    FetchMode::Replace => {
                        self.listing.replace(request.context.clone(), page, actor_id)
                    }
                    FetchMode::Append => self.listing.append(page, actor_id),
                };
                Some(ids)
            }
            Err(e) => {
                tracing::warn!(?request.context, page = request.page, "page fetch failed: {e}");
                self.error = Some(request.failure_message().to_string());
                None
            }
        }
    }

    /// Merge a resolved batch of follow flags.
    pub fn merge_flags(&mut self, batch: RelationshipFlags) {
        merge_flags(&mut self.flags, batch);
    }

    // -- Follow toggles -----------------------------------------------------

    /// Start following or unfollowing `user_id` based on its current flag.
    ///
    /// A no-op for the actor, when signed out, or while a toggle for the same
    /// user is already in flight.
    pub fn begin_toggle(&mut self, user_id: &str) -> Option<ToggleRequest> {
        let actor_id = self.actor_id.as_deref()?;
        if actor_id == user_id || self.pending_toggles.contains(user_id) {
            return None;
        }

        let action = if self.is_following(user_id) {
            FollowAction::Unfollow
        } else {
            FollowAction::Follow
        };
        self.pending_toggles.insert(user_id.to_string());

        Some(ToggleRequest {
            user_id: user_id.to_string(),
            action,
        })
    }

    /// Reconcile a finished toggle. State only changes once the service has
    /// confirmed it, so a failure leaves nothing to roll back.
    pub fn apply_toggle(&mut self, request: &ToggleRequest, result: ApiResult<()>) {
        self.pending_toggles.remove(&request.user_id);

        match result {
            Ok(()) => {
                let followed = request.action == FollowAction::Follow;
                self.flags.insert(request.user_id.clone(), followed);
                self.listing.adjust_follower_count(&request.user_id, followed);
                tracing::info!(
                    user_id = %request.user_id,
                    action = request.action.verb(),
                    "relationship updated"
                );
            }
            Err(e) => {
                let verb = request.action.verb();
                tracing::warn!(user_id = %request.user_id, "{verb} failed: {e}");
                self.error = Some(format!("Failed to {} user", request.action.verb()));
            }
        }
    }
}

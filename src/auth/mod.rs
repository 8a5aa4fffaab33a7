//! Session handling for the RecipeShare API.
//!
//! The service authenticates every request with a bearer token issued at
//! login. Acquiring that token is out of scope here; it is read from the
//! environment alongside the id of the signed-in user.

pub mod credentials;

use thiserror::Error;

use credentials::CredentialError;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("credential error: {0}")]
    Credential(#[from] CredentialError),
    #[error("not signed in")]
    NoSession,
}

/// The signed-in user (the actor) and the credential it acts with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user_id: String,
}

impl Session {
    pub fn new(token: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            user_id: user_id.into(),
        }
    }

    /// Return a `Bearer <token>` header value.
    pub fn bearer_header(&self) -> String {
        format!("Bearer {}", self.token)
    }

    /// Whether `user_id` identifies the actor.
    pub fn is_actor(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_header_carries_token() {
        let session = Session::new("abc123", "me");
        assert_eq!(session.bearer_header(), "Bearer abc123");
    }

    #[test]
    fn actor_is_compared_by_id() {
        let session = Session::new("t", "me");
        assert!(session.is_actor("me"));
        assert!(!session.is_actor("you"));
    }
}

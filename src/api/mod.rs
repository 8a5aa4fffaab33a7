pub mod relationships;
pub mod types;
pub mod users;

use std::time::Duration;

use reqwest::Response;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::auth::{AuthError, Session};
use crate::config::AppConfig;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Failure of a single request: transport, non-success status, or a body that
/// does not match the expected shape. Requests are never retried.
#[derive(Debug, Error)]
pub enum ApiClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error (status {status}): {detail}")]
    ApiError { status: u16, detail: String },
    #[error("auth error: {0}")]
    Auth(#[from] AuthError),
    #[error("deserialization error: {0}")]
    Deserialize(String),
}

// ---------------------------------------------------------------------------
// API client
// ---------------------------------------------------------------------------

pub struct DirectoryClient {
    http_client: reqwest::Client,
    base_url: String,
    session: Option<Session>,
}

impl DirectoryClient {
    pub fn new(config: &AppConfig, session: Option<Session>) -> Result<Self, ApiClientError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http_client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    /// The signed-in user, if any.
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Resolve the bearer header, short-circuiting before any request is
    /// built when there is no session.
    fn auth_header(&self) -> Result<String, ApiClientError> {
        self.session
            .as_ref()
            .map(Session::bearer_header)
            .ok_or(ApiClientError::Auth(AuthError::NoSession))
    }

    /// Issue a GET request with bearer-token authorization.
    pub(crate) async fn bearer_get<T: DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<T, ApiClientError> {
        let auth_header = self.auth_header()?;

        let resp = self
            .http_client
            .get(url)
            .header("Authorization", &auth_header)
            .send()
            .await?;

        self.handle_response(resp).await
    }

    /// Issue a body-less POST request whose outcome is carried by the status
    /// alone.
    pub(crate) async fn bearer_post(&self, url: &str) -> Result<(), ApiClientError> {
        let auth_header = self.auth_header()?;

        let resp = self
            .http_client
            .post(url)
            .header("Authorization", &auth_header)
            .send()
            .await?;

        Self::check_status(resp).await.map(|_| ())
    }

    /// Check status and deserialize the body.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: Response,
    ) -> Result<T, ApiClientError> {
        let resp = Self::check_status(resp).await?;
        let body = resp.text().await?;
        serde_json::from_str::<T>(&body)
            .map_err(|e| ApiClientError::Deserialize(format!("{e}: {body}")))
    }

    async fn check_status(resp: Response) -> Result<Response, ApiClientError> {
        let status = resp.status();

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApiClientError::ApiError {
                status: status.as_u16(),
                detail: body,
            });
        }

        Ok(resp)
    }

    /// Build a full API URL from a path (e.g. "/users/profile").
    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_base_and_path() {
        let config = AppConfig {
            api_base_url: "http://localhost:3000/api/".into(),
            ..AppConfig::default()
        };
        let client = DirectoryClient::new(&config, None).unwrap();
        assert_eq!(
            client.url("/users/profile"),
            "http://localhost:3000/api/users/profile"
        );
    }

    #[tokio::test]
    async fn missing_session_short_circuits_before_sending() {
        // Nothing listens on this port; reaching the network would yield an
        // Http error instead of Auth.
        let config = AppConfig {
            api_base_url: "http://127.0.0.1:9".into(),
            ..AppConfig::default()
        };
        let client = DirectoryClient::new(&config, None).unwrap();
        let result = client.fetch_browse_page(1, 9).await;
        assert!(matches!(
            result,
            Err(ApiClientError::Auth(AuthError::NoSession))
        ));
    }
}

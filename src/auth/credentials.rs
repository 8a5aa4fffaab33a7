use std::path::PathBuf;

use thiserror::Error;

use crate::auth::Session;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("no session found; set RECIPESHARE_TOKEN and RECIPESHARE_USER_ID in env or .env")]
    NoCredentials,
    #[error("{0} is set but {1} is missing")]
    Incomplete(&'static str, &'static str),
}

const TOKEN_VAR: &str = "RECIPESHARE_TOKEN";
const USER_ID_VAR: &str = "RECIPESHARE_USER_ID";

/// Return candidate .env paths in priority order.
fn env_file_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".config/recipeshare-people/.env"));
    }
    paths.push(PathBuf::from(".env"));
    paths
}

/// Load .env files without overriding variables already in the environment.
///
/// Earlier files win because dotenvy never overwrites an existing variable.
pub fn load_env_files() {
    for path in env_file_paths() {
        if path.exists() {
            let _ = dotenvy::from_path(&path);
        }
    }
}

/// Load the session from environment variables, trying .env files first.
pub fn load_session() -> Result<Session, CredentialError> {
    load_env_files();
    session_from(|name| std::env::var(name).ok())
}

/// Build a session from a variable lookup. Empty values count as missing.
fn session_from(lookup: impl Fn(&str) -> Option<String>) -> Result<Session, CredentialError> {
    let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    match (get(TOKEN_VAR), get(USER_ID_VAR)) {
        (Some(token), Some(user_id)) => Ok(Session::new(token, user_id)),
        (Some(_), None) => Err(CredentialError::Incomplete(TOKEN_VAR, USER_ID_VAR)),
        (None, Some(_)) => Err(CredentialError::Incomplete(USER_ID_VAR, TOKEN_VAR)),
        (None, None) => Err(CredentialError::NoCredentials),
    }
}

//! On-disk cache of the signed-in user's profile.
//!
//! The header shows the signed-in user's cached profile so it renders before
//! the first refresh completes, and keeps showing it when a refresh fails.

use std::path::{Path, PathBuf};

use chrono::Utc;
use thiserror::Error;

use crate::api::types::{CachedProfile, Profile};

#[derive(Debug, Error)]
pub enum ProfileCacheError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct ProfileCache {
    path: PathBuf,
}

impl ProfileCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The cache under the app's config directory.
    pub fn default_location() -> Self {
        let dir = crate::config::config_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::new(dir.join("profile.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the cached profile. A missing file is not an error.
    pub fn load(&self) -> Result<Option<CachedProfile>, ProfileCacheError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&contents)?))
    }

    /// Load the cached profile only if it belongs to `actor_id`.
    ///
    /// Signed out, the cache is cleared. A profile cached for a different
    /// user is ignored and left for the next refresh to overwrite.
    pub fn load_for(
        &self,
        actor_id: Option<&str>,
    ) -> Result<Option<CachedProfile>, ProfileCacheError> {
        let Some(actor_id) = actor_id else {
            self.clear()?;
            return Ok(None);
        };
        Ok(self.load()?.filter(|cached| cached.profile.id == actor_id))
    }

    /// Persist `profile`, replacing whatever was cached.
    pub fn save(&self, profile: &Profile) -> Result<CachedProfile, ProfileCacheError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let cached = CachedProfile {
            profile: profile.clone(),
            fetched_at: Utc::now(),
        };
        let json = serde_json::to_string_pretty(&cached)?;
        std::fs::write(&self.path, json)?;
        Ok(cached)
    }

    /// Remove the cached profile. Clearing an empty cache succeeds.
    pub fn clear(&self) -> Result<(), ProfileCacheError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

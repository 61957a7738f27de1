//! API key lookup and caching
//!
//! The environment wins over the stored key so a deployment can pin one.

use std::sync::Arc;

use crate::error::{ApiError, Result};
use crate::store::KeyValueStore;

/// Environment variable consulted first
pub const API_KEY_ENV: &str = "YT_API_KEY";

/// Store key of the cached API key
pub const API_KEY_STORE_KEY: &str = "yt_api_key";

pub struct ApiKeyStore {
    store: Arc<dyn KeyValueStore>,
}

impl ApiKeyStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Key from `YT_API_KEY`, else from the store; blank counts as absent
    pub fn load(&self) -> Option<String> {
        self.load_with_env(std::env::var(API_KEY_ENV).ok())
    }

    fn load_with_env(&self, env_value: Option<String>) -> Option<String> {
        trimmed(env_value).or_else(|| trimmed(self.store.get(API_KEY_STORE_KEY)))
    }

    /// Like [`load`](Self::load), but a missing key is an error
    pub fn require(&self) -> Result<String> {
        self.load().ok_or(ApiError::MissingApiKey)
    }

    /// Cache `api_key`, trimmed
    pub fn save(&self, api_key: &str) {
        self.store.set(API_KEY_STORE_KEY, api_key.trim());
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

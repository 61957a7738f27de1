//! TubeScout Tauri Integration
//!
//! Provides a Tauri plugin exposing quota-aware YouTube search to the frontend.
//!
//! # Usage
//!
//! Register the plugin in your Tauri application:
//!
//! ```ignore
//! fn main() {
//!     tauri::Builder::default()
//!         .plugin(tubescout_tauri::init())
//!         .run(tauri::generate_context!())
//!         .expect("error while running tauri application");
//! }
//! ```
//!
//! Then invoke commands from the frontend:
//!
//! ```javascript
//! import { invoke } from '@tauri-apps/api/core';
//!
//! const videos = await invoke('plugin:tubescout|search_videos', {
//!   criteria: { mode: 'keyword', keyword: 'rust', apiKey, minViews: 1000 }
//! });
//!
//! // null when requests are allowed, otherwise minutes left
//! const wait = await invoke('plugin:tubescout|quota_status');
//! ```
//!
//! Failed commands reject with `{ kind, status, reason, message, waitMinutes }`.

use std::path::Path;
use std::sync::Arc;

use tauri::{
    Manager, Runtime,
    plugin::{Builder, TauriPlugin},
};
use tokio::sync::Mutex;
use tubescout_core::{
    ApiError, ApiKeyStore, CooldownStatus, JsonFileStore, KeyValueStore, MemoryStore, TubeScout,
    VideoRecord,
};

mod commands;

/// File in the app data directory holding the cooldown and cached key
const STORE_FILE: &str = "tubescout.json";

/// Thread-safe wrapper shared by all plugin commands
///
/// Searches run one at a time through `search_lock`, so two windows never
/// spend quota concurrently. Cooldown status, reset, and the key check
/// skip that lock and stay responsive while a search waits out a backoff.
pub struct ScoutState {
    pub(crate) scout: Arc<TubeScout>,
    search_lock: Mutex<()>,
    pub(crate) api_keys: ApiKeyStore,
}

impl ScoutState {
    /// Create state over the given store
    ///
    /// # Errors
    /// Returns error string if the HTTP client cannot be created
    pub fn new(store: Arc<dyn KeyValueStore>) -> Result<Self, String> {
        let scout = TubeScout::new(store.clone()).map_err(|e| e.to_string())?;
        Ok(Self {
            scout: Arc::new(scout),
            search_lock: Mutex::new(()),
            api_keys: ApiKeyStore::new(store),
        })
    }

    /// Run a search, waiting for any search already in flight
    pub async fn search(&self, criteria: &SearchCriteria) -> Result<Vec<VideoRecord>, ApiError> {
        let _running = self.search_lock.lock().await;
        self.scout.run_search(criteria).await
    }

    /// Minutes left on the quota cooldown, `None` when requests are allowed
    pub fn quota_wait_minutes(&self) -> Option<i64> {
        match self.scout.cooldown_status() {
            CooldownStatus::Allowed => None,
            CooldownStatus::Blocked { wait_minutes } => Some(wait_minutes),
        }
    }

    /// State persisted to `tubescout.json` inside `dir`
    pub fn in_dir(dir: &Path) -> Result<Self, String> {
        let store = JsonFileStore::open(dir.join(STORE_FILE)).map_err(|e| e.to_string())?;
        Self::new(Arc::new(store))
    }
}

impl Default for ScoutState {
    fn default() -> Self {
        Self::new(Arc::new(MemoryStore::new())).expect("Failed to create default ScoutState")
    }
}

/// Initialize the tubescout plugin
///
/// # Returns
/// A configured TauriPlugin ready to be registered with the Tauri application
pub fn init<R: Runtime>() -> TauriPlugin<R> {
    Builder::new("tubescout")
        .invoke_handler(tauri::generate_handler![
            commands::search_videos,
            commands::check_api_key,
            commands::load_api_key,
            commands::save_api_key,
            commands::quota_status,
            commands::reset_quota_cooldown
        ])
        .setup(|app, _api| {
            let state = match app.path().app_data_dir() {
                Ok(dir) => ScoutState::in_dir(&dir),
                Err(e) => {
                    tracing::warn!(error = %e, "no app data directory, state will not persist");
                    ScoutState::new(Arc::new(MemoryStore::new()))
                }
            }
            .map_err(Box::<dyn std::error::Error>::from)?;
            app.manage(state);
            Ok(())
        })
        .build()
}

// Re-export types for convenience
pub use tubescout_core::{SearchCriteria, VideoRecord as Video};

//! Tauri commands for the tubescout plugin
//!
//! This module contains all Tauri command implementations.

use tauri::State;
use tubescout_core::{ApiError, SearchCriteria, VideoRecord};

use crate::ScoutState;

/// Run a search
///
/// # Arguments
/// * `state` - Managed ScoutState from Tauri
/// * `criteria` - Search criteria from the frontend
///
/// # Returns
/// Filtered videos in listing order
///
/// # Errors
/// Returns the structured `ApiError`; `kind == "cooldown"` carries
/// `waitMinutes`
#[tauri::command]
pub async fn search_videos(
    state: State<'_, ScoutState>,
    criteria: SearchCriteria,
) -> Result<Vec<VideoRecord>, ApiError> {
    state.search(&criteria).await
}

/// Check whether an API key is accepted
#[tauri::command]
pub async fn check_api_key(state: State<'_, ScoutState>, api_key: String) -> Result<bool, ()> {
    Ok(state.scout.check_api_key(&api_key).await)
}

/// API key from the environment or the cache, if any
#[tauri::command]
pub fn load_api_key(state: State<'_, ScoutState>) -> Option<String> {
    state.api_keys.load()
}

/// Cache an API key for later sessions
#[tauri::command]
pub fn save_api_key(state: State<'_, ScoutState>, api_key: String) {
    state.api_keys.save(&api_key);
}

/// Minutes left on the quota cooldown, or null when requests are allowed
#[tauri::command]
pub fn quota_status(state: State<'_, ScoutState>) -> Option<i64> {
    state.quota_wait_minutes()
}

/// Clear the quota cooldown, even while a search is waiting on it
#[tauri::command]
pub fn reset_quota_cooldown(state: State<'_, ScoutState>) {
    state.scout.reset_cooldown();
}

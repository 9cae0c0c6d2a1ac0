//! Tauri commands backing the panel page.

use tauri::{AppHandle, Emitter, State};
use tracing::{error, info};

use crate::providers::{Provider, ProviderOption};
use crate::PanelState;

/// Fetch the provider listing from the backend.
///
/// A failed fetch is logged and reported as an empty listing; the page
/// shows nothing rather than an error (diagnostics live in the log).
#[tauri::command]
pub async fn load_providers(state: State<'_, PanelState>) -> Result<Vec<Provider>, String> {
    match state.panel.load().await {
        Ok(listing) => Ok(listing),
        Err(e) => {
            error!(error = %e, "error fetching providers");
            Ok(Vec::new())
        }
    }
}

/// Snapshot of the in-memory provider collection.
#[tauri::command]
pub async fn get_providers(state: State<'_, PanelState>) -> Result<Vec<Provider>, String> {
    Ok(state.panel.providers().await)
}

/// Choice entries with render-contract labels.
#[tauri::command]
pub async fn provider_options(
    state: State<'_, PanelState>,
) -> Result<Vec<ProviderOption>, String> {
    Ok(state.panel.options().await)
}

/// Name the selector control should show as selected, if any.
#[tauri::command]
pub async fn selected_provider(state: State<'_, PanelState>) -> Result<Option<String>, String> {
    Ok(state.panel.selected().await)
}

/// Run the full switch flow for the named provider and return the
/// replaced collection. Also emits `providers-updated` so other listeners
/// can re-render.
#[tauri::command]
pub async fn select_provider(
    app: AppHandle,
    name: String,
    state: State<'_, PanelState>,
) -> Result<Vec<Provider>, String> {
    info!(provider = %name, "switching provider");

    let updated = state
        .panel
        .change_provider(&name)
        .await
        .map_err(|e| e.to_string())?;

    if let Err(e) = app.emit("providers-updated", &updated) {
        error!(error = %e, "failed to emit providers-updated");
    }
    Ok(updated)
}

/// Most recent image URL the feed has delivered.
#[tauri::command]
pub async fn last_image_url(state: State<'_, PanelState>) -> Result<Option<String>, String> {
    Ok(state.feed.last_url().await)
}

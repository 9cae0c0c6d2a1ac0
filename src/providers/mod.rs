//! Provider model and the selection flow built around it.

use serde::{Deserialize, Serialize};

pub mod api;
pub mod commands;
pub mod http;
pub mod panel;

pub use api::ProviderApi;
pub use panel::ProviderPanel;

/// One external service the backend can draw images from.
///
/// The record is backend-owned; the client only ever rewrites the mirrored
/// `is_current` flag, and does so by replacing the whole collection. The
/// backend omits `authorization_url` and `is_current` when empty/false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provider {
    pub name: String,
    pub authorized: bool,
    #[serde(default)]
    pub is_current: bool,
    #[serde(default)]
    pub authorization_url: String,
}

impl Provider {
    /// Status suffix shown next to the provider name in the choice control.
    pub fn status_label(&self) -> &'static str {
        if self.is_current {
            "Current"
        } else if self.authorized {
            "Ready"
        } else {
            "Requires Authorization"
        }
    }
}

/// Render projection for one choice entry.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderOption {
    pub name: String,
    pub label: String,
}

/// Choice entries for the webview. An empty collection projects to an
/// empty list, which the page renders as nothing.
pub fn options(providers: &[Provider]) -> Vec<ProviderOption> {
    providers
        .iter()
        .map(|p| ProviderOption {
            name: p.name.clone(),
            label: format!("{} ({})", p.name, p.status_label()),
        })
        .collect()
}

/// Name of the provider marked current, if any. Empty collections and
/// listings without a current entry are ordinary absent cases here, not
/// violated invariants.
pub fn current_name(providers: &[Provider]) -> Option<&str> {
    providers
        .iter()
        .find(|p| p.is_current)
        .map(|p| p.name.as_str())
}

/// New collection with `is_current` recomputed so it is true exactly for
/// `name`. Wholesale replacement keeps the at-most-one-current invariant
/// without mutating in place.
pub fn mark_current(providers: &[Provider], name: &str) -> Vec<Provider> {
    providers
        .iter()
        .map(|p| Provider {
            is_current: p.name == name,
            ..p.clone()
        })
        .collect()
}

//! The provider selection flow.
//!
//! One switch runs at a time, strictly in sequence: look the target up,
//! authorize through the popup if the backend holds no credentials for it,
//! ask the backend to activate it, and only then commit the new collection
//! and selection. Any failed step is terminal for that switch and leaves
//! every piece of state exactly as it was.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info};

use crate::error::PanelError;
use crate::popup::{wait_for_close, AuthPrompt, DEFAULT_POLL_INTERVAL};
use crate::providers::{current_name, mark_current, options, Provider, ProviderApi, ProviderOption};

/// Owns the provider collection and the tracked selection.
///
/// The collection is only ever replaced wholesale, never mutated in place,
/// so readers always observe a consistent snapshot with at most one
/// current provider.
pub struct ProviderPanel {
    api: ProviderApi,
    prompt: Arc<dyn AuthPrompt>,
    providers: RwLock<Vec<Provider>>,
    selected: RwLock<Option<String>>,
    // Serializes switches so a second selection made during a popup wait
    // queues behind the first instead of interleaving with it.
    switching: Mutex<()>,
    poll_interval: Duration,
}

impl ProviderPanel {
    pub fn new(api: ProviderApi, prompt: Arc<dyn AuthPrompt>) -> Self {
        Self {
            api,
            prompt,
            providers: RwLock::new(Vec::new()),
            selected: RwLock::new(None),
            switching: Mutex::new(()),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Override the popup close-poll cadence.
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Fetch the listing once and seed the selection from whichever
    /// provider the backend reports as current, if any.
    pub async fn load(&self) -> Result<Vec<Provider>, PanelError> {
        let listing = self.api.list().await?;
        info!(count = listing.len(), "loaded provider listing");

        *self.selected.write().await = current_name(&listing).map(str::to_string);
        *self.providers.write().await = listing.clone();
        Ok(listing)
    }

    /// Switch the active provider to `target`.
    ///
    /// An unauthorized target opens its authorization URL in a popup and
    /// waits for the user to close it; closing is the only signal, so the
    /// activation that follows is optimistic. A blocked popup aborts the
    /// switch before any activation request is made. On success the
    /// replaced collection is returned.
    pub async fn change_provider(&self, target: &str) -> Result<Vec<Provider>, PanelError> {
        let _switch = self.switching.lock().await;

        let provider = {
            let providers = self.providers.read().await;
            providers.iter().find(|p| p.name == target).cloned()
        };
        let provider = match provider {
            Some(provider) => provider,
            None => {
                error!(provider = %target, "provider not found");
                return Err(PanelError::ProviderNotFound {
                    name: target.to_string(),
                });
            }
        };

        if !provider.authorized {
            info!(provider = %target, "provider requires authorization, opening popup");
            let handle = self.prompt.open(&provider.authorization_url);
            wait_for_close(handle, self.poll_interval).await?;
            debug!(provider = %target, "authorization window closed, proceeding");
        }

        if let Err(e) = self.api.activate(target).await {
            error!(provider = %target, error = %e, "failed to start provider");
            return Err(e);
        }

        let updated = {
            let mut providers = self.providers.write().await;
            let next = mark_current(&providers, target);
            *providers = next.clone();
            next
        };
        *self.selected.write().await = Some(target.to_string());
        info!(provider = %target, "provider switched");
        Ok(updated)
    }

    /// Snapshot of the current collection.
    pub async fn providers(&self) -> Vec<Provider> {
        self.providers.read().await.clone()
    }

    /// Name of the provider the selector control should show as selected.
    pub async fn selected(&self) -> Option<String> {
        self.selected.read().await.clone()
    }

    /// Choice entries under the render contract.
    pub async fn options(&self) -> Vec<ProviderOption> {
        options(&self.providers.read().await)
    }
}

use std::sync::Arc;

// Export modules
pub mod config;
pub mod error;
pub mod feed;
pub mod popup;
pub mod providers;

pub use config::{PanelConfig, DEFAULT_API_BASE};
pub use error::PanelError;
pub use feed::ImageFeed;
pub use providers::{Provider, ProviderApi, ProviderPanel};

/// Main application state managed by Tauri.
pub struct PanelState {
    /// Provider collection and selection flow
    pub panel: Arc<ProviderPanel>,
    /// Live image feed
    pub feed: Arc<ImageFeed>,
}

impl PanelState {
    pub fn new(panel: Arc<ProviderPanel>, feed: Arc<ImageFeed>) -> Self {
        Self { panel, feed }
    }
}

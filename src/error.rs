use thiserror::Error;

/// Error taxonomy for the panel client.
///
/// Every failure here is terminal for the user action that triggered it;
/// nothing is retried automatically. Commands surface these to the webview
/// as plain strings, so the `Display` impls carry the full diagnostic.
#[derive(Error, Debug)]
pub enum PanelError {
    #[error("authorization popup was blocked or never opened")]
    PopupBlocked,

    #[error("provider '{name}' not found")]
    ProviderNotFound { name: String },

    #[error("failed to activate provider '{name}' (status {status}): {body}")]
    ActivationFailed {
        name: String,
        status: u16,
        body: String,
    },

    #[error("control API request failed: {0}")]
    Transport(#[from] anyhow::Error),

    #[error("invalid provider listing: {0}")]
    InvalidListing(#[from] serde_json::Error),

    #[error("image feed error: {0}")]
    Feed(#[from] tokio_tungstenite::tungstenite::Error),
}

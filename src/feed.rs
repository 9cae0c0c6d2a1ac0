//! Live image feed from the backend.
//!
//! The backend pushes raw URL strings over a WebSocket; each one replaces
//! the previously displayed image. There is no reconnection: if the
//! connection drops, the feed goes quiet and the last image stays up.

use std::sync::Arc;

use anyhow::anyhow;
use futures_util::StreamExt;
use tokio::sync::{broadcast, mpsc, RwLock};
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, error, info, warn};

use crate::error::PanelError;

/// Capacity of the URL broadcast channel. The feed ticks at human pace,
/// so a small buffer is plenty.
pub const FEED_CHANNEL_CAPACITY: usize = 16;

/// Client for the backend's image URL push channel.
pub struct ImageFeed {
    urls: broadcast::Sender<String>,
    last_url: Arc<RwLock<Option<String>>>,
    task: RwLock<Option<JoinHandle<()>>>,
    shutdown: RwLock<Option<mpsc::Sender<()>>>,
}

impl ImageFeed {
    pub fn new() -> Self {
        let (urls, _) = broadcast::channel(FEED_CHANNEL_CAPACITY);
        Self {
            urls,
            last_url: Arc::new(RwLock::new(None)),
            task: RwLock::new(None),
            shutdown: RwLock::new(None),
        }
    }

    /// Subscribe to image URLs as they arrive.
    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.urls.subscribe()
    }

    /// Most recent URL seen, for late subscribers catching up.
    pub async fn last_url(&self) -> Option<String> {
        self.last_url.read().await.clone()
    }

    /// Connect to the feed and start forwarding frames.
    pub async fn connect(&self, feed_url: &str) -> Result<(), PanelError> {
        if self.task.read().await.is_some() {
            return Err(PanelError::Transport(anyhow!(
                "image feed already connected"
            )));
        }

        let (ws_stream, _) = connect_async(feed_url).await?;
        info!(url = %feed_url, "image feed connected");

        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);
        *self.shutdown.write().await = Some(shutdown_tx);

        let urls = self.urls.clone();
        let last_url = self.last_url.clone();

        let handle = tokio::spawn(async move {
            let (_write, mut read) = ws_stream.split();
            loop {
                tokio::select! {
                    msg = read.next() => match msg {
                        Some(Ok(Message::Text(text))) => {
                            let url = text.to_string();
                            {
                                let mut last = last_url.write().await;
                                if last.as_deref() == Some(url.as_str()) {
                                    debug!(url = %url, "duplicate image url, skipping");
                                    continue;
                                }
                                *last = Some(url.clone());
                            }
                            debug!(url = %url, "image feed delivered new url");
                            // Send errors only mean nobody is listening right now;
                            // the URL is still retained for late subscribers.
                            let _ = urls.send(url);
                        }
                        Some(Ok(Message::Close(_))) => {
                            warn!("image feed closed by backend");
                            break;
                        }
                        Some(Ok(_)) => {}
                        Some(Err(e)) => {
                            error!(error = %e, "image feed stream error");
                            break;
                        }
                        None => {
                            warn!("image feed disconnected");
                            break;
                        }
                    },

                    _ = shutdown_rx.recv() => {
                        info!("image feed shutting down");
                        break;
                    }
                }
            }
        });

        *self.task.write().await = Some(handle);
        Ok(())
    }

    /// Stop the feed task, if it is running.
    pub async fn stop(&self) -> Result<(), PanelError> {
        if self.task.read().await.is_none() {
            return Err(PanelError::Transport(anyhow!("image feed not connected")));
        }

        if let Some(shutdown_tx) = self.shutdown.write().await.take() {
            let _ = shutdown_tx.send(()).await;
        }
        if let Some(handle) = self.task.write().await.take() {
            let _ = handle.await;
        }
        Ok(())
    }
}

impl Default for ImageFeed {
    fn default() -> Self {
        Self::new()
    }
}

//! Authorization popup handling.
//!
//! Switching to an unauthorized provider opens its authorization URL in a
//! separate webview window. The backend completes the consent flow out of
//! band; the only signal available to this client is the user closing the
//! window, so the waiter polls the window handle until it is gone.

use std::time::Duration;

use tauri::{AppHandle, Manager, Runtime, WebviewUrl, WebviewWindowBuilder};
use tracing::{debug, error};

use crate::error::PanelError;

/// Poll cadence for the close check when none is configured.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Window label used for the authorization popup. A single label means a
/// second open attempt while one popup is alive fails, which reads as
/// "blocked" to the caller and keeps one popup on screen at a time.
const AUTH_WINDOW_LABEL: &str = "provider-auth";

/// Handle to an open popup window that can be observed for closure.
pub trait PopupHandle: Send + Sync {
    fn closed(&self) -> bool;
}

/// Opens authorization popups. `None` models the blocked/unopened case.
pub trait AuthPrompt: Send + Sync {
    fn open(&self, url: &str) -> Option<Box<dyn PopupHandle>>;
}

/// Resolve once the popup window has been closed by the user (or by the
/// page it loaded).
///
/// A missing handle fails immediately with [`PanelError::PopupBlocked`],
/// before any timer exists. Otherwise the handle is polled at `poll`
/// cadence, unbounded; the owner cancels by dropping the future, which
/// tears down the interval with it.
pub async fn wait_for_close(
    handle: Option<Box<dyn PopupHandle>>,
    poll: Duration,
) -> Result<(), PanelError> {
    let handle = handle.ok_or(PanelError::PopupBlocked)?;

    let mut ticker = tokio::time::interval(poll);
    // The first tick of a tokio interval completes immediately; consume it
    // so the first close check happens one full period after opening.
    ticker.tick().await;
    loop {
        ticker.tick().await;
        if handle.closed() {
            debug!("authorization popup closed");
            return Ok(());
        }
    }
}

/// Popup handle backed by a Tauri webview window, identified by label.
/// The window registry dropping the label is the close signal.
pub struct AuthWindow<R: Runtime> {
    app: AppHandle<R>,
    label: String,
}

impl<R: Runtime> PopupHandle for AuthWindow<R> {
    fn closed(&self) -> bool {
        self.app.get_webview_window(&self.label).is_none()
    }
}

/// Production prompt that opens the authorization URL in a new window.
pub struct WindowPrompt<R: Runtime> {
    app: AppHandle<R>,
}

impl<R: Runtime> WindowPrompt<R> {
    pub fn new(app: AppHandle<R>) -> Self {
        Self { app }
    }
}

impl<R: Runtime> AuthPrompt for WindowPrompt<R> {
    fn open(&self, url: &str) -> Option<Box<dyn PopupHandle>> {
        let target = match url.parse::<tauri::Url>() {
            Ok(target) => target,
            Err(e) => {
                error!(error = %e, url = %url, "invalid authorization URL");
                return None;
            }
        };

        match WebviewWindowBuilder::new(&self.app, AUTH_WINDOW_LABEL, WebviewUrl::External(target))
            .title("Authorize provider")
            .inner_size(520.0, 720.0)
            .build()
        {
            Ok(_) => Some(Box::new(AuthWindow {
                app: self.app.clone(),
                label: AUTH_WINDOW_LABEL.to_string(),
            })),
            Err(e) => {
                error!(error = %e, "failed to open authorization window");
                None
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fake::ClosesAfter;
    use super::*;
    use std::sync::atomic::Ordering;

    #[tokio::test]
    async fn missing_handle_fails_immediately() {
        let start = std::time::Instant::now();
        let result = wait_for_close(None, Duration::from_secs(3600)).await;
        assert!(matches!(result, Err(PanelError::PopupBlocked)));
        // No interval was scheduled: an hour-long cadence returned at once.
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn resolves_on_first_closed_observation() {
        let (handle, polls) = ClosesAfter::new(3);
        wait_for_close(Some(Box::new(handle)), Duration::from_millis(1))
            .await
            .unwrap();
        assert_eq!(polls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn polls_at_least_once_for_already_closed_window() {
        let (handle, polls) = ClosesAfter::new(1);
        wait_for_close(Some(Box::new(handle)), Duration::from_millis(1))
            .await
            .unwrap();
        assert_eq!(polls.load(Ordering::SeqCst), 1);
    }
}

// Prevents additional console window on Windows in release, DO NOT REMOVE!!
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use std::sync::Arc;

use tauri::{Emitter, Manager};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{filter::EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use artpanel_lib::popup::{AuthPrompt, WindowPrompt};
use artpanel_lib::providers::commands;
use artpanel_lib::{ImageFeed, PanelConfig, PanelState, ProviderApi, ProviderPanel};

fn main() {
    // Load environment variables from .env file if it exists
    let env_file_path = dotenvy::dotenv().ok();

    // Initialize the tracing subscriber for structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            if cfg!(debug_assertions) {
                "artpanel_lib=debug,warn".into()
            } else {
                "artpanel_lib=info,warn".into()
            }
        }))
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    info!("Art panel starting");
    match env_file_path {
        Some(path) => info!("Loaded environment variables from {}", path.display()),
        None => debug!("No .env file found. Using existing environment variables."),
    };

    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .plugin(tauri_plugin_single_instance::init(|app, _args, _cwd| {
            let _ = app
                .get_webview_window("main")
                .expect("no main window")
                .set_focus();
        }))
        .setup(|app| {
            info!("Setting up panel application");

            let config = PanelConfig::from_env();
            info!(api_base = %config.api_base, "control API configured");

            let prompt: Arc<dyn AuthPrompt> = Arc::new(WindowPrompt::new(app.handle().clone()));
            let panel = Arc::new(ProviderPanel::new(ProviderApi::new(config.clone()), prompt));
            let feed = Arc::new(ImageFeed::new());

            // The page's mount-time `load_providers` invoke performs the
            // one startup listing fetch; setup does not fetch.

            // Connect the feed and forward every URL to the webview.
            let feed_clone = feed.clone();
            let app_handle = app.handle().clone();
            let feed_url = config.feed_url();
            tauri::async_runtime::spawn(async move {
                let mut urls = feed_clone.subscribe();
                if let Err(e) = feed_clone.connect(&feed_url).await {
                    error!(error = %e, url = %feed_url, "failed to connect image feed");
                    return;
                }
                loop {
                    match urls.recv().await {
                        Ok(url) => {
                            if let Err(e) = app_handle.emit("image-url", &url) {
                                error!(error = %e, "failed to forward image url to webview");
                            }
                        }
                        Err(RecvError::Lagged(skipped)) => {
                            warn!(skipped, "image url forwarder lagged behind the feed");
                        }
                        Err(RecvError::Closed) => break,
                    }
                }
            });

            app.manage(PanelState::new(panel, feed));

            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            commands::load_providers,
            commands::get_providers,
            commands::provider_options,
            commands::selected_provider,
            commands::select_provider,
            commands::last_image_url,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}

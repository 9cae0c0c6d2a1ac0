//! Typed calls against the backend's provider endpoints.

use std::sync::Arc;

use anyhow::anyhow;
use tracing::debug;

use crate::config::PanelConfig;
use crate::error::PanelError;
use crate::providers::http::{HttpClient, ReqwestHttpClient};
use crate::providers::Provider;

/// Thin typed layer over [`HttpClient`] for the two control endpoints.
pub struct ProviderApi {
    http: Arc<dyn HttpClient>,
    config: PanelConfig,
}

impl ProviderApi {
    pub fn new(config: PanelConfig) -> Self {
        Self::with_client(Arc::new(ReqwestHttpClient::new()), config)
    }

    /// Build against an injected client (used by tests).
    pub fn with_client(http: Arc<dyn HttpClient>, config: PanelConfig) -> Self {
        Self { http, config }
    }

    /// Fetch the provider listing.
    pub async fn list(&self) -> Result<Vec<Provider>, PanelError> {
        let url = self.config.providers_url();
        debug!(url = %url, "fetching provider listing");
        let response = self.http.get(&url).await?;
        if !response.is_success() {
            return Err(PanelError::Transport(anyhow!(
                "provider listing returned status {}",
                response.status()
            )));
        }
        Ok(serde_json::from_str(response.body())?)
    }

    /// Ask the backend to make `name` the active provider. Any OK-class
    /// status is success; on failure the response body is the diagnostic.
    pub async fn activate(&self, name: &str) -> Result<(), PanelError> {
        let url = self.config.activate_url(name);
        debug!(url = %url, "activating provider");
        let response = self.http.put(&url).await?;
        if response.is_success() {
            Ok(())
        } else {
            Err(PanelError::ActivationFailed {
                name: name.to_string(),
                status: response.status(),
                body: response.text(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn test_config(server: &mockito::Server) -> PanelConfig {
        PanelConfig::new(format!("{}/api", server.url()))
    }

    #[tokio::test]
    async fn list_decodes_backend_listing() {
        let mut server = mockito::Server::new_async().await;
        let listing = server
            .mock("GET", "/api/providers")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!([
                    {"name": "Spotify", "authorized": false,
                     "authorization_url": "https://accounts.example/authorize"},
                    {"name": "None", "authorized": true, "is_current": true}
                ])
                .to_string(),
            )
            .create_async()
            .await;

        let api = ProviderApi::new(test_config(&server));
        let providers = api.list().await.unwrap();

        listing.assert_async().await;
        assert_eq!(providers.len(), 2);
        assert_eq!(providers[0].name, "Spotify");
        assert!(!providers[0].authorized);
        assert!(providers[1].is_current);
    }

    #[tokio::test]
    async fn list_rejects_malformed_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/providers")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let api = ProviderApi::new(test_config(&server));
        assert!(matches!(
            api.list().await,
            Err(PanelError::InvalidListing(_))
        ));
    }

    #[tokio::test]
    async fn activate_treats_ok_status_as_success() {
        let mut server = mockito::Server::new_async().await;
        let start = server
            .mock("PUT", "/api/providers/start")
            .match_query(mockito::Matcher::UrlEncoded(
                "name".into(),
                "Spotify".into(),
            ))
            .with_status(204)
            .create_async()
            .await;

        let api = ProviderApi::new(test_config(&server));
        api.activate("Spotify").await.unwrap();
        start.assert_async().await;
    }

    #[tokio::test]
    async fn activate_carries_failure_body_as_diagnostic() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("PUT", "/api/providers/start")
            .match_query(mockito::Matcher::UrlEncoded(
                "name".into(),
                "Spotify".into(),
            ))
            .with_status(401)
            .with_body("provider not authorized")
            .create_async()
            .await;

        let api = ProviderApi::new(test_config(&server));
        match api.activate("Spotify").await {
            Err(PanelError::ActivationFailed { name, status, body }) => {
                assert_eq!(name, "Spotify");
                assert_eq!(status, 401);
                assert_eq!(body, "provider not authorized");
            }
            other => panic!("expected ActivationFailed, got {other:?}"),
        }
    }
}

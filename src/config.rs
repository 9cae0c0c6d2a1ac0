use tracing::{debug, warn};

/// Base address of the control API when `PANEL_API_BASE` is not set.
pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:9000/api";

/// Runtime configuration for the panel.
///
/// The backend address is the only external contract; everything else
/// (endpoints, the feed address) is derived from it.
#[derive(Debug, Clone)]
pub struct PanelConfig {
    /// Base URL of the control API, without a trailing slash.
    pub api_base: String,
}

impl PanelConfig {
    pub fn new(api_base: impl Into<String>) -> Self {
        let api_base = api_base.into().trim_end_matches('/').to_string();
        Self { api_base }
    }

    /// Read configuration from the environment (after dotenvy has run).
    pub fn from_env() -> Self {
        let api_base = match std::env::var("PANEL_API_BASE") {
            Ok(value) if !value.is_empty() => value,
            _ => {
                debug!("PANEL_API_BASE not set, using default control API address");
                DEFAULT_API_BASE.to_string()
            }
        };
        Self::new(api_base)
    }

    /// `GET` endpoint returning the provider listing.
    pub fn providers_url(&self) -> String {
        format!("{}/providers", self.api_base)
    }

    /// `PUT` endpoint that activates the named provider. The name is
    /// query-encoded so names with reserved characters survive the trip.
    pub fn activate_url(&self, name: &str) -> String {
        let endpoint = format!("{}/providers/start", self.api_base);
        match reqwest::Url::parse_with_params(&endpoint, &[("name", name)]) {
            Ok(url) => url.into(),
            Err(e) => {
                warn!(error = %e, "could not build activation URL, using raw name");
                format!("{endpoint}?name={name}")
            }
        }
    }

    /// WebSocket endpoint pushing image URLs, derived from the API base
    /// by scheme rewrite.
    pub fn feed_url(&self) -> String {
        let ws_base = if let Some(rest) = self.api_base.strip_prefix("https://") {
            format!("wss://{rest}")
        } else if let Some(rest) = self.api_base.strip_prefix("http://") {
            format!("ws://{rest}")
        } else {
            warn!(
                api_base = %self.api_base,
                "API base has no http(s) scheme, using it as the feed base unchanged"
            );
            self.api_base.clone()
        };
        format!("{ws_base}/imageURL")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_endpoints_from_base() {
        let config = PanelConfig::new("http://10.0.0.5:9000/api/");
        assert_eq!(config.api_base, "http://10.0.0.5:9000/api");
        assert_eq!(config.providers_url(), "http://10.0.0.5:9000/api/providers");
        assert_eq!(
            config.activate_url("Spotify"),
            "http://10.0.0.5:9000/api/providers/start?name=Spotify"
        );
        assert_eq!(config.feed_url(), "ws://10.0.0.5:9000/api/imageURL");
    }

    #[test]
    fn feed_url_uses_wss_for_https() {
        let config = PanelConfig::new("https://panel.example/api");
        assert_eq!(config.feed_url(), "wss://panel.example/api/imageURL");
    }

    #[test]
    fn feed_url_passes_scheme_less_base_through() {
        let config = PanelConfig::new("panel.example/api");
        assert_eq!(config.feed_url(), "panel.example/api/imageURL");
    }

    #[test]
    fn activate_url_encodes_reserved_characters_in_the_name() {
        let config = PanelConfig::new("http://10.0.0.5:9000/api");
        assert_eq!(
            config.activate_url("A&B C"),
            "http://10.0.0.5:9000/api/providers/start?name=A%26B+C"
        );
    }
}

use anyhow::Result;

/// HTTP method enum, covering the two verbs the control API uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Put,
}

/// A plain response value holding only what the panel inspects.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    status_code: u16,
    body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status_code: status,
            body: body.into(),
        }
    }

    /// Get the status code
    pub fn status(&self) -> u16 {
        self.status_code
    }

    /// Get a reference to the response body
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Get the body as text (consumes the response)
    pub fn text(self) -> String {
        self.body
    }

    /// Check if successful (2xx status)
    pub fn is_success(&self) -> bool {
        self.status_code >= 200 && self.status_code < 300
    }
}

/// Trait for HTTP client operations, allowing for mocking.
#[async_trait::async_trait]
pub trait HttpClient: Send + Sync {
    /// Perform an HTTP GET request.
    async fn get(&self, url: &str) -> Result<HttpResponse>;

    /// Perform an HTTP PUT request with an empty body.
    async fn put(&self, url: &str) -> Result<HttpResponse>;
}

/// Implementation of HttpClient using reqwest.
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Create a client with custom configuration.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get(&self, url: &str) -> Result<HttpResponse> {
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(HttpResponse::new(status, body))
    }

    async fn put(&self, url: &str) -> Result<HttpResponse> {
        let response = self.client.put(url).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(HttpResponse::new(status, body))
    }
}

/// Mock implementation of HttpClient for testing.
#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    /// A mock HTTP client that returns predefined responses and records
    /// every request it serves.
    pub struct MockHttpClient {
        responses: Arc<Mutex<HashMap<String, HttpResponse>>>,
        requests: Arc<Mutex<Vec<(String, HttpMethod)>>>,
    }

    impl MockHttpClient {
        pub fn new() -> Self {
            Self {
                responses: Arc::new(Mutex::new(HashMap::new())),
                requests: Arc::new(Mutex::new(Vec::new())),
            }
        }

        /// Register a mock response for a URL.
        pub fn mock_response(&self, url: impl Into<String>, status: u16, body: impl Into<String>) {
            self.responses
                .lock()
                .unwrap()
                .insert(url.into(), HttpResponse::new(status, body));
        }

        /// Register a successful JSON response for a URL.
        pub fn mock_json<T: serde::Serialize>(&self, url: impl Into<String>, data: &T) {
            let body = serde_json::to_string(data).unwrap();
            self.mock_response(url, 200, body);
        }

        /// Get the list of recorded requests.
        pub fn requests(&self) -> Vec<(String, HttpMethod)> {
            self.requests.lock().unwrap().clone()
        }

        fn record(&self, url: &str, method: HttpMethod) {
            self.requests
                .lock()
                .unwrap()
                .push((url.to_string(), method));
        }

        fn response_for(&self, url: &str) -> Result<HttpResponse> {
            self.responses
                .lock()
                .unwrap()
                .get(url)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("No mock response configured for URL: {}", url))
        }
    }

    #[async_trait::async_trait]
    impl HttpClient for MockHttpClient {
        async fn get(&self, url: &str) -> Result<HttpResponse> {
            self.record(url, HttpMethod::Get);
            self.response_for(url)
        }

        async fn put(&self, url: &str) -> Result<HttpResponse> {
            self.record(url, HttpMethod::Put);
            self.response_for(url)
        }
    }
}

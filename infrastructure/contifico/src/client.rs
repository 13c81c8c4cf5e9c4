use std::time::Duration;

use reqwest::{Client, Url};

/// Shared Contifico HTTP client configuration.
pub struct ContificoClient {
    pub client: Client,
    pub api_key: Option<String>,
    pub base_url: String,
}

impl ContificoClient {
    pub fn new(base_url: String, api_key: Option<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();

        Self {
            client,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Contifico expects the raw API key, without a scheme prefix.
    pub fn auth_header(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// Returns the product endpoint URL, `{base}/producto/{id}/`.
    pub fn product_url(&self, external_id: &str) -> Option<Url> {
        let mut url = Url::parse(&self.base_url).ok()?;
        url.path_segments_mut()
            .ok()?
            .pop_if_empty()
            .extend(&["producto", external_id, ""]);
        Some(url)
    }
}

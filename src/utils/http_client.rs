use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::config::ApiConfig;
use crate::errors::{AppError, AppResult, TransportError};
use crate::utils::url::UrlUtils;

/// Minimal HTTP capability the pipeline depends on
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// GET `url` and return the full body. Non-2xx statuses are errors.
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, TransportError>;
}

#[async_trait]
impl<'a, T: HttpClient + ?Sized> HttpClient for &'a T {
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        (**self).fetch_bytes(url).await
    }
}

/// reqwest-backed implementation
pub struct StandardHttpClient {
    client: Client,
}

impl StandardHttpClient {
    /// Build a client with the configured timeouts and user agent
    pub fn new(config: &ApiConfig) -> AppResult<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClient for StandardHttpClient {
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        let safe_url = UrlUtils::obfuscate_credentials(url);
        debug!("Fetching {}", safe_url);

        let response = self.client.get(url).send().await.map_err(|e| {
            TransportError::request(&safe_url, UrlUtils::obfuscate_credentials(&e.to_string()))
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::status(&safe_url, status.as_u16()));
        }

        let bytes = response.bytes().await.map_err(|e| {
            TransportError::request(
                &safe_url,
                format!(
                    "Failed to read response: {}",
                    UrlUtils::obfuscate_credentials(&e.to_string())
                ),
            )
        })?;

        debug!("Fetched {} bytes from {}", bytes.len(), safe_url);
        Ok(bytes.to_vec())
    }
}

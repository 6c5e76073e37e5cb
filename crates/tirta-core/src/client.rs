//! HTTP client for the sensor-data REST API.
//!
//! Thin transport collaborator: two JSON GET endpoints, a fixed request
//! timeout, and error mapping. Everything interesting happens downstream
//! in the pipeline.
//!
//! # Example
//!
//! ```no_run
//! use tirta_core::ApiClient;
//!
//! # async fn example() -> tirta_core::Result<()> {
//! let client = ApiClient::new("http://localhost:8080")?;
//! let reading = client.latest().await?;
//! println!("Suhu: {} °C", reading.temperature);
//! # Ok(())
//! # }
//! ```

use reqwest::Client;

use tirta_types::RawReading;

use crate::error::{Error, Result};
use crate::timestamp::now_ms;

/// Per-request timeout baked into the client.
pub const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

/// HTTP client for the sensor API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the sensor API (e.g. "http://localhost:8080")
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = normalize_base_url(base_url)?;
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { client, base_url })
    }

    /// Create a client with a custom reqwest Client.
    pub fn with_client(base_url: &str, client: Client) -> Result<Self> {
        let base_url = normalize_base_url(base_url)?;
        Ok(Self { client, base_url })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the latest reading.
    pub async fn latest(&self) -> Result<RawReading> {
        let url = format!("{}/api/sensor/latest", self.base_url);
        self.get(&url).await
    }

    /// Fetch the reading history, oldest ordering not guaranteed by the
    /// backend; callers sort by normalized timestamp.
    pub async fn history(&self) -> Result<Vec<RawReading>> {
        let url = format!("{}/api/sensor/history", self.base_url);
        self.get(&url).await
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        // Cache buster: some upstream proxies cache these endpoints
        // aggressively enough to freeze the dashboard.
        let response = self
            .client
            .get(url)
            .query(&[("t", now_ms().to_string())])
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(response.json().await?)
        } else {
            let message = response
                .json::<serde_json::Value>()
                .await
                .ok()
                .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
                .unwrap_or_else(|| status.to_string());

            Err(Error::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}

fn normalize_base_url(base_url: &str) -> Result<String> {
    let base_url = base_url.trim_end_matches('/').to_string();
    if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        return Err(Error::InvalidUrl(format!(
            "URL must start with http:// or https://, got: {}",
            base_url
        )));
    }
    Ok(base_url)
}

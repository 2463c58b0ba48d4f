//! Discord detectable-applications lookup.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::infrastructure::ports::{DetectError, DetectableGames};

/// Default base URL for the detectable-applications listing.
pub const DEFAULT_DETECT_BASE_URL: &str = "https://discord.com/api";

/// Client for Discord's public detectable-applications listing.
#[derive(Clone)]
pub struct DiscordDetectClient {
    client: Client,
    base_url: String,
}

impl DiscordDetectClient {
    pub fn new(base_url: &str) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl DetectableGames for DiscordDetectClient {
    async fn fetch_detectable(&self) -> Result<serde_json::Value, DetectError> {
        let response = self
            .client
            .get(format!("{}/applications/detectable", self.base_url))
            .send()
            .await
            .map_err(|e| DetectError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(DetectError::Status(response.status().as_u16()));
        }

        response
            .json()
            .await
            .map_err(|e| DetectError::RequestFailed(e.to_string()))
    }
}

//! OpenAI client configuration with sensible defaults.

use crate::config::OpenAISettings;
use crate::error::{Result, ScoutError};
use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Create an OpenAI client from settings, with the configured key and timeout.
pub fn create_client(settings: &OpenAISettings, api_key: &str) -> Result<Client<OpenAIConfig>> {
    create_client_with_timeout(
        api_key,
        settings.base_url.as_deref(),
        Duration::from_secs(settings.timeout_seconds),
    )
}

/// Create an OpenAI client with a custom timeout.
pub fn create_client_with_timeout(
    api_key: &str,
    base_url: Option<&str>,
    timeout: Duration,
) -> Result<Client<OpenAIConfig>> {
    let http_client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ScoutError::Config(format!("Failed to create HTTP client: {}", e)))?;

    let mut config = OpenAIConfig::new().with_api_key(api_key);
    if let Some(url) = base_url {
        config = config.with_api_base(url);
    }

    Ok(Client::with_config(config).with_http_client(http_client))
}

use std::time::Duration;

use async_trait::async_trait;

use super::core::{Completion, CompletionOptions, Message, completion, http_client};
use crate::ai::model::{ClientFactory, CompletionProvider};
use crate::core::{AppConfig, ConfigError, ProviderError};

/// A completion client bound to one sampling temperature.
pub struct OpenAiProvider {
    client: reqwest::Client,
    api_hostname: String,
    api_key: String,
    options: CompletionOptions,
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    async fn complete(&self, messages: &[Message]) -> Result<Completion, ProviderError> {
        completion(
            &self.client,
            messages,
            &self.api_hostname,
            &self.api_key,
            &self.options,
        )
        .await
    }
}

/// Builds `OpenAiProvider`s from the app configuration. The
/// credential is only ever handed to the HTTP client.
pub struct OpenAiClientFactory {
    api_hostname: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    timeout: Duration,
}

impl OpenAiClientFactory {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            api_hostname: config.api_hostname.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

impl ClientFactory for OpenAiClientFactory {
    fn build(&self, temperature: f64) -> Result<Box<dyn CompletionProvider>, ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::MissingVar("OPENROUTER_API_KEY".to_string()));
        }
        let client = http_client(self.timeout).map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        tracing::debug!(
            "Building completion client for model {} at temperature {}",
            self.model,
            temperature
        );

        Ok(Box::new(OpenAiProvider {
            client,
            api_hostname: self.api_hostname.clone(),
            api_key: self.api_key.clone(),
            options: CompletionOptions {
                model: self.model.clone(),
                temperature,
                max_tokens: self.max_tokens,
            },
        }))
    }
}

//! Holds the one live completion client of a session. Temperature is
//! fixed when a client is constructed, so a different temperature
//! means a new client; the same temperature reuses the current one.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::core::{ConfigError, ProviderError};
use crate::openai::{Completion, Message};

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, messages: &[Message]) -> Result<Completion, ProviderError>;
}

/// Constructs completion clients bound to a temperature. Failing to
/// construct one is a configuration problem and is never retried.
pub trait ClientFactory: Send + Sync {
    fn build(&self, temperature: f64) -> Result<Box<dyn CompletionProvider>, ConfigError>;
}

pub struct ModelHandle {
    pub id: Uuid,
    pub temperature: f64,
    provider: Box<dyn CompletionProvider>,
}

impl ModelHandle {
    pub async fn complete(&self, messages: &[Message]) -> Result<Completion, ProviderError> {
        self.provider.complete(messages).await
    }
}

pub struct ModelSelector {
    factory: Box<dyn ClientFactory>,
    current: Option<Arc<ModelHandle>>,
}

impl ModelSelector {
    pub fn new(factory: Box<dyn ClientFactory>) -> Self {
        Self {
            factory,
            current: None,
        }
    }

    /// Returns the held handle when it was built for exactly
    /// `temperature`, otherwise builds a new one and drops the old.
    /// On failure the previously held handle is kept.
    pub fn get_client(&mut self, temperature: f64) -> Result<Arc<ModelHandle>, ConfigError> {
        if let Some(handle) = &self.current
            && handle.temperature == temperature
        {
            return Ok(Arc::clone(handle));
        }

        let provider = self.factory.build(temperature)?;
        let handle = Arc::new(ModelHandle {
            id: Uuid::new_v4(),
            temperature,
            provider,
        });
        tracing::debug!(
            "Replaced model handle, now {} at temperature {}",
            handle.id,
            temperature
        );
        self.current = Some(Arc::clone(&handle));

        Ok(handle)
    }

    pub fn current(&self) -> Option<&Arc<ModelHandle>> {
        self.current.as_ref()
    }
}

use std::fmt;
use std::time::{Duration, Instant};

use serde::Serialize;

use super::models::{ChatTurn, Transcript};
use super::stats::{SessionStats, StatsSnapshot};
use crate::ai::cache::{CachedResponse, ResponseCache, fingerprint};
use crate::ai::faq::FaqTable;
use crate::ai::model::{ClientFactory, ModelSelector};
use crate::ai::prompt::system_prompt;
use crate::ai::urgency::{Urgency, UrgencyClassifier};
use crate::core::config::DEFAULT_HISTORY_WINDOW;
use crate::core::{ConfigError, SessionError, ValidationError};
use crate::openai::{Message, Role, TokenUsage};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CacheStatus {
    Hit,
    Miss,
}

impl fmt::Display for CacheStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CacheStatus::Hit => write!(f, "HIT"),
            CacheStatus::Miss => write!(f, "MISS"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    pub response: String,
    pub urgency: Urgency,
    pub temperature: f64,
    pub cache_status: CacheStatus,
    pub elapsed: Duration,
    /// Only reported for fresh completions
    pub usage: Option<TokenUsage>,
}

/// One conversation with the FAQ bot: urgency detection, response
/// caching, model selection, history and statistics.
///
/// Queries are processed strictly one at a time. A query either
/// completes and updates history, cache and statistics together, or
/// fails and leaves all three untouched.
///
/// Use `SessionBuilder` to construct a valid `ConversationSession`.
pub struct ConversationSession {
    classifier: UrgencyClassifier,
    models: ModelSelector,
    cache: ResponseCache,
    transcript: Transcript,
    stats: SessionStats,
    faq: FaqTable,
    system_prompt: String,
    history_window: usize,
}

impl ConversationSession {
    /// Answers a single question.
    pub async fn handle(&mut self, question: &str) -> Result<QueryResult, SessionError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(ValidationError::EmptyQuestion.into());
        }

        let verdict = self.classifier.classify(question);
        let model = self.models.get_client(verdict.temperature)?;

        // Client construction is not part of the answer latency
        let start = Instant::now();
        let history = self.transcript.window(self.history_window);
        let key = fingerprint(&self.system_prompt, history, question);

        let (response, urgency, temperature, cache_status, usage) = match self.cache.lookup(&key) {
            Some(cached) => {
                tracing::debug!("Cache hit for {}", key);
                (
                    cached.text,
                    cached.category,
                    cached.temperature,
                    CacheStatus::Hit,
                    None,
                )
            }
            None => {
                tracing::debug!("Cache miss for {}, calling model {}", key, model.id);
                let mut messages = Vec::with_capacity(history.len() + 2);
                messages.push(Message::new(Role::System, &self.system_prompt));
                messages.extend(history.iter().map(ChatTurn::to_message));
                messages.push(Message::new(Role::User, question));

                let completion = model.complete(&messages).await.inspect_err(|e| {
                    tracing::warn!("Completion failed for {} query: {}", verdict.category, e)
                })?;
                self.cache.store(
                    key,
                    CachedResponse {
                        text: completion.content.clone(),
                        category: verdict.category,
                        temperature: verdict.temperature,
                    },
                );
                (
                    completion.content,
                    verdict.category,
                    verdict.temperature,
                    CacheStatus::Miss,
                    completion.usage,
                )
            }
        };

        self.transcript.push(ChatTurn::new(Role::User, question));
        self.transcript.push(ChatTurn::new(Role::Assistant, &response));

        let result = QueryResult {
            response,
            urgency,
            temperature,
            cache_status,
            elapsed: start.elapsed(),
            usage,
        };
        self.stats.record(&result);

        tracing::info!(
            "Answered {} query (temp={}, cache={}) in {:.3}s",
            result.urgency,
            result.temperature,
            result.cache_status,
            result.elapsed.as_secs_f64()
        );

        Ok(result)
    }

    /// Forgets the conversation. Cached responses and statistics are
    /// kept.
    pub fn clear_history(&mut self) {
        self.transcript.clear();
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    pub fn topics(&self) -> Vec<String> {
        self.faq.topics()
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    pub fn models(&self) -> &ModelSelector {
        &self.models
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }
}

pub struct SessionBuilder {
    factory: Box<dyn ClientFactory>,
    classifier: UrgencyClassifier,
    faq: FaqTable,
    history_window: usize,
    cache_capacity: Option<usize>,
}

impl SessionBuilder {
    pub fn new(factory: Box<dyn ClientFactory>) -> Self {
        Self {
            factory,
            classifier: UrgencyClassifier::default(),
            faq: FaqTable::store_defaults(),
            history_window: DEFAULT_HISTORY_WINDOW,
            cache_capacity: None,
        }
    }

    pub fn build(self) -> Result<ConversationSession, ConfigError> {
        let system_prompt = system_prompt(&self.faq)?;

        Ok(ConversationSession {
            classifier: self.classifier,
            models: ModelSelector::new(self.factory),
            cache: ResponseCache::with_capacity(self.cache_capacity),
            transcript: Transcript::new(),
            stats: SessionStats::default(),
            faq: self.faq,
            system_prompt,
            history_window: self.history_window,
        })
    }

    pub fn faq(mut self, faq: FaqTable) -> Self {
        self.faq = faq;
        self
    }

    pub fn classifier(mut self, classifier: UrgencyClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Number of trailing turns included in each prompt.
    pub fn history_window(mut self, turns: usize) -> Self {
        self.history_window = turns;
        self
    }

    pub fn cache_capacity(mut self, capacity: Option<usize>) -> Self {
        self.cache_capacity = capacity;
        self
    }
}

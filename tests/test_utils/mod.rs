//! Test utilities for integration tests
use faqbot::ai::chat::{ConversationSession, SessionBuilder};
use faqbot::core::AppConfig;
use faqbot::openai::OpenAiClientFactory;

pub fn test_config(api_hostname: &str) -> AppConfig {
    AppConfig {
        api_hostname: api_hostname.to_string(),
        api_key: String::from("test-api-key"),
        model: String::from("openai/gpt-3.5-turbo"),
        max_tokens: 300,
        history_window: 10,
        timeout_secs: 5,
        cache_capacity: None,
    }
}

/// Creates a session that talks to the mock provider at
/// `api_hostname` using the real HTTP client.
pub fn test_session(api_hostname: &str) -> ConversationSession {
    let config = test_config(api_hostname);
    SessionBuilder::new(Box::new(OpenAiClientFactory::new(&config)))
        .history_window(config.history_window)
        .cache_capacity(config.cache_capacity)
        .build()
        .expect("Failed to build session")
}

/// A minimal chat completion response body.
pub fn completion_body(content: &str) -> String {
    serde_json::json!({
        "id": "chatcmpl-123",
        "object": "chat.completion",
        "created": 1694268190,
        "model": "openai/gpt-3.5-turbo",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 120, "completion_tokens": 12, "total_tokens": 132}
    })
    .to_string()
}

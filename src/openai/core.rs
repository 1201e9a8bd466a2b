use std::time::Duration;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::core::ProviderError;

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum Role {
    #[serde(rename = "system")]
    System,
    #[serde(rename = "assistant")]
    Assistant,
    #[serde(rename = "user")]
    User,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: &str) -> Self {
        Message {
            role,
            content: content.to_string(),
        }
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
pub struct TokenUsage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
}

/// The assistant text of a successful completion plus token usage
/// when the provider reports it.
#[derive(Clone, Debug, PartialEq)]
pub struct Completion {
    pub content: String,
    pub usage: Option<TokenUsage>,
}

#[derive(Clone, Debug)]
pub struct CompletionOptions {
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
}

pub fn completions_url(api_hostname: &str) -> String {
    format!("{}/v1/chat/completions", api_hostname.trim_end_matches("/"))
}

/// Sends a single, non-streaming chat completion request to an
/// OpenAI compatible API.
pub async fn completion(
    client: &reqwest::Client,
    messages: &[Message],
    api_hostname: &str,
    api_key: &str,
    options: &CompletionOptions,
) -> Result<Completion, ProviderError> {
    let payload = json!({
        "model": options.model,
        "messages": messages,
        "temperature": options.temperature,
        "max_tokens": options.max_tokens,
    });
    let response = client
        .post(completions_url(api_hostname))
        .bearer_auth(api_key)
        .header("Content-Type", "application/json")
        .json(&payload)
        .send()
        .await
        .map_err(|e| {
            if e.is_timeout() {
                ProviderError::Network("request timed out".to_string())
            } else {
                ProviderError::Network(e.to_string())
            }
        })?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| ProviderError::MalformedResponse(format!("failed to read body: {}", e)))?;

    if !status.is_success() {
        return Err(status_error(status, &body));
    }

    let resp: Value = serde_json::from_str(&body)
        .inspect_err(|e| tracing::error!("Parsing completion failed for {}\nError:{}", body, e))
        .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;

    parse_completion(&resp)
}

fn parse_completion(resp: &Value) -> Result<Completion, ProviderError> {
    let Some(content) = resp["choices"][0]["message"]["content"].as_str() else {
        // Some gateways answer 200 with an error object instead of choices
        let reason = provider_error_message(resp)
            .unwrap_or_else(|| "missing choices[0].message.content".to_string());
        return Err(ProviderError::MalformedResponse(reason));
    };
    let usage = serde_json::from_value::<TokenUsage>(resp["usage"].clone()).ok();

    Ok(Completion {
        content: content.to_string(),
        usage,
    })
}

fn status_error(status: StatusCode, body: &str) -> ProviderError {
    let detail = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| provider_error_message(&v));
    let reason = match detail {
        Some(message) => format!("status={} {}", status.as_u16(), message),
        None => format!("status={}", status.as_u16()),
    };

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderError::Auth(reason),
        StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimited(reason),
        _ => ProviderError::Network(reason),
    }
}

fn provider_error_message(resp: &Value) -> Option<String> {
    resp["error"]["message"].as_str().map(str::to_string)
}

pub fn http_client(timeout: Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder().timeout(timeout).build()
}

mod core;
mod provider;

pub use self::core::{
    Completion, CompletionOptions, Message, Role, TokenUsage, completion, completions_url,
    http_client,
};
pub use provider::{OpenAiClientFactory, OpenAiProvider};

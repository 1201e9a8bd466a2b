use thiserror::Error;

/// Rejected user input. Nothing in the session is touched when this
/// is returned.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("please enter a question")]
    EmptyQuestion,
}

/// Failure of a single call to the completion provider. The query is
/// treated as not completed and can be resubmitted as is.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("provider rejected credentials: {0}")]
    Auth(String),
    #[error("provider request failed: {0}")]
    Network(String),
    #[error("provider rate limit reached: {0}")]
    RateLimited(String),
    #[error("provider returned an invalid payload: {0}")]
    MalformedResponse(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required env var {0}")]
    MissingVar(String),
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
    #[error("failed to build provider http client: {0}")]
    HttpClient(String),
    #[error("failed to render prompt template: {0}")]
    Template(String),
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error(transparent)]
    Configuration(#[from] ConfigError),
}

impl SessionError {
    /// Only provider failures are transient; bad input or a broken
    /// configuration fail the same way on every attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SessionError::Provider(_))
    }
}

use std::env;
use std::fmt;
use std::str::FromStr;

use super::error::ConfigError;

pub const DEFAULT_API_HOSTNAME: &str = "https://openrouter.ai/api";
pub const DEFAULT_MODEL: &str = "openai/gpt-3.5-turbo";
pub const DEFAULT_MAX_TOKENS: u32 = 300;
pub const DEFAULT_HISTORY_WINDOW: usize = 10;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Clone)]
pub struct AppConfig {
    pub api_hostname: String,
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
    pub history_window: usize,
    pub timeout_secs: u64,
    pub cache_capacity: Option<usize>,
}

// The API key must never end up in logs
impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_hostname", &self.api_hostname)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("history_window", &self.history_window)
            .field("timeout_secs", &self.timeout_secs)
            .field("cache_capacity", &self.cache_capacity)
            .finish()
    }
}

impl AppConfig {
    /// Builds the config from the process environment. A `.env` file
    /// in the working directory is loaded first when present.
    pub fn from_env() -> Result<Self, ConfigError> {
        check_dotenv(dotenvy::dotenv())?;
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as `from_env` but reads variables through `lookup` so the
    /// parsing can be exercised without touching the real environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("OPENROUTER_API_KEY")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ConfigError::MissingVar("OPENROUTER_API_KEY".to_string()))?;
        let api_hostname = lookup("FAQBOT_API_HOSTNAME")
            .unwrap_or_else(|| DEFAULT_API_HOSTNAME.to_string());
        if !api_hostname.starts_with("http://") && !api_hostname.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                key: "FAQBOT_API_HOSTNAME".to_string(),
                value: api_hostname,
            });
        }
        let model = lookup("FAQBOT_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let max_tokens = parse_var(&lookup, "FAQBOT_MAX_TOKENS", DEFAULT_MAX_TOKENS)?;
        let history_window = parse_var(&lookup, "FAQBOT_HISTORY_WINDOW", DEFAULT_HISTORY_WINDOW)?;
        let timeout_secs = parse_var(&lookup, "FAQBOT_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        let cache_capacity = match lookup("FAQBOT_CACHE_CAPACITY") {
            Some(raw) => Some(parse_value("FAQBOT_CACHE_CAPACITY", &raw)?),
            None => None,
        };

        Ok(Self {
            api_hostname,
            api_key,
            model,
            max_tokens,
            history_window,
            timeout_secs,
            cache_capacity,
        })
    }
}

/// A missing `.env` is fine, one that fails to read or parse is not.
fn check_dotenv<T>(result: dotenvy::Result<T>) -> Result<(), ConfigError> {
    match result {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(ConfigError::InvalidValue {
            key: ".env".to_string(),
            value: e.to_string(),
        }),
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => parse_value(key, &raw),
        None => Ok(default),
    }
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse::<T>().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: raw.to_string(),
    })
}

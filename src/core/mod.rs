pub mod config;
pub mod error;

pub use config::AppConfig;
pub use error::{ConfigError, ProviderError, SessionError, ValidationError};

mod core;
mod models;
mod stats;

pub use self::core::{CacheStatus, ConversationSession, QueryResult, SessionBuilder};
pub use models::{ChatTurn, Transcript};
pub use stats::{SessionStats, StatsSnapshot};

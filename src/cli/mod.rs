use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod ask;
pub mod chat;
pub mod topics;

use crate::ai::chat::{CacheStatus, ConversationSession, QueryResult, SessionBuilder};
use crate::core::AppConfig;
use crate::openai::OpenAiClientFactory;

#[derive(Subcommand)]
enum Command {
    /// Start an interactive FAQ chat session
    Chat {},
    /// Answer a single question and exit
    Ask {
        question: String,
    },
    /// List the FAQ topics the bot knows about
    Topics {},
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Override the model from FAQBOT_MODEL
    #[arg(long, global = true)]
    model: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

pub async fn run() -> Result<()> {
    let args = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=warn", env!("CARGO_CRATE_NAME")).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Handle each sub command, an interactive chat is the default
    match args.command {
        Some(Command::Ask { question }) => {
            let mut session = session_from_env(args.model)?;
            ask::run(&mut session, &question).await?;
        }
        Some(Command::Topics {}) => {
            topics::run();
        }
        Some(Command::Chat {}) | None => {
            let mut session = session_from_env(args.model)?;
            chat::run(&mut session).await?;
        }
    }

    Ok(())
}

fn session_from_env(model: Option<String>) -> Result<ConversationSession> {
    let mut config = AppConfig::from_env()?;
    if let Some(model) = model {
        config.model = model;
    }
    tracing::debug!("Loaded config {:?}", config);

    let session = SessionBuilder::new(Box::new(OpenAiClientFactory::new(&config)))
        .history_window(config.history_window)
        .cache_capacity(config.cache_capacity)
        .build()?;

    Ok(session)
}

/// The status line printed above every answer e.g.
/// `[URGENT MODE (temp=0.1) | CACHED | 0.002s]`.
pub fn banner(result: &QueryResult) -> String {
    let cache = match result.cache_status {
        CacheStatus::Hit => "CACHED",
        CacheStatus::Miss => "API CALL",
    };
    format!(
        "[{} MODE (temp={}) | {} | {:.3}s]",
        result.urgency,
        result.temperature,
        cache,
        result.elapsed.as_secs_f64()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::urgency::Urgency;
    use std::time::Duration;

    #[test]
    fn test_banner() {
        let result = QueryResult {
            response: "ok".to_string(),
            urgency: Urgency::Urgent,
            temperature: 0.1,
            cache_status: CacheStatus::Hit,
            elapsed: Duration::from_millis(2),
            usage: None,
        };
        assert_eq!(banner(&result), "[URGENT MODE (temp=0.1) | CACHED | 0.002s]");

        let result = QueryResult {
            urgency: Urgency::Casual,
            temperature: 0.9,
            cache_status: CacheStatus::Miss,
            elapsed: Duration::from_millis(1250),
            ..result
        };
        assert_eq!(banner(&result), "[CASUAL MODE (temp=0.9) | API CALL | 1.250s]");
    }

    #[test]
    fn test_cli_parses_subcommands() {
        let cli = Cli::try_parse_from(["faqbot", "ask", "What are your hours?"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Ask { ref question }) if question == "What are your hours?"
        ));

        let cli = Cli::try_parse_from(["faqbot", "--model", "gpt-4.1-mini", "chat"]).unwrap();
        assert_eq!(cli.model.as_deref(), Some("gpt-4.1-mini"));
        assert!(matches!(cli.command, Some(Command::Chat {})));

        let cli = Cli::try_parse_from(["faqbot"]).unwrap();
        assert!(cli.command.is_none());
    }
}

use anyhow::Result;
use faqbot::cli;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run().await
}

use anyhow::Result;

use super::banner;
use crate::ai::chat::ConversationSession;

pub async fn run(session: &mut ConversationSession, question: &str) -> Result<()> {
    let result = session.handle(question).await?;
    println!("{}", banner(&result));
    println!("{}", result.response);
    Ok(())
}

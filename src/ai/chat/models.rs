//! The core models for managing a stateful chat with an LLM.
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::openai::{Message, Role};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChatTurn {
    pub role: Role,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatTurn {
    pub fn new(role: Role, text: &str) -> Self {
        Self {
            role,
            text: text.to_string(),
            timestamp: Utc::now(),
        }
    }

    pub fn to_message(&self) -> Message {
        Message::new(self.role, &self.text)
    }
}

/// Append-only list of completed turns. Only `clear` removes turns.
#[derive(Default, Debug)]
pub struct Transcript(Vec<ChatTurn>);

impl Transcript {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, turn: ChatTurn) {
        self.0.push(turn)
    }

    /// The trailing `size` turns, oldest first.
    pub fn window(&self, size: usize) -> &[ChatTurn] {
        let start = self.0.len().saturating_sub(size);
        &self.0[start..]
    }

    pub fn clear(&mut self) {
        self.0.clear()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ChatTurn> {
        self.0.iter()
    }
}

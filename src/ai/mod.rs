pub mod cache;
pub mod chat;
pub mod faq;
pub mod model;
pub mod prompt;
pub mod urgency;

//! Reusable prompts using Handlebars for templating. Strict mode is
//! on so a missing field fails loudly instead of rendering an empty
//! string into the prompt, and HTML escaping is off because the
//! output goes to a model, not a browser.

use std::fmt;

use handlebars::{Handlebars, handlebars_helper};
use serde_json::json;

use super::faq::FaqTable;
use crate::core::ConfigError;

// Renders FAQ topic keys as `TRACK_ORDER`
handlebars_helper!(upper: |v: str| v.to_uppercase());

#[derive(Debug)]
pub enum Prompt {
    SystemInstructions,
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

const SYSTEM_PROMPT: &str = r"You are a helpful and friendly customer support assistant.

FAQ KNOWLEDGE BASE:
{{#each entries}}
- {{upper topic}}: {{answer}}
{{/each}}

INSTRUCTIONS:
- Answer questions accurately using the FAQ knowledge above
- For urgent queries: Be direct, concise, and action-oriented
- For casual queries: Be friendly, conversational, and helpful
- If you don't know something, be honest and offer to connect them with support
- Always maintain a professional yet warm tone";

pub fn templates<'a>() -> Handlebars<'a> {
    let mut registry = Handlebars::new();
    registry.set_strict_mode(true);
    registry.register_escape_fn(handlebars::no_escape);
    registry.register_helper("upper", Box::new(upper));
    registry
        .register_template_string(&Prompt::SystemInstructions.to_string(), SYSTEM_PROMPT)
        .expect("Failed to register template");
    registry
}

/// Renders the fixed system instructions with the FAQ table embedded
/// verbatim.
pub fn system_prompt(faq: &FaqTable) -> Result<String, ConfigError> {
    templates()
        .render(
            &Prompt::SystemInstructions.to_string(),
            &json!({ "entries": faq.entries() }),
        )
        .map_err(|e| ConfigError::Template(e.to_string()))
}

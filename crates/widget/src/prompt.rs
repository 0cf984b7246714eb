//! Prompt assembly for one fetch cycle.
//!
//! Picks one prompt variant uniformly at random, prepends the fixed
//! initial-prompt prefix, and resolves templates in every message. The
//! configured messages are never touched — assembly builds fresh
//! [`ChatMessage`] values, so one cycle's resolution cannot leak into the
//! next.

use chatmirror_config::{PromptMessage, WidgetConfig};
use chatmirror_core::error::Error;
use chatmirror_core::ChatMessage;
use chrono::{DateTime, Local};
use rand::Rng;

use crate::template;

/// Assemble the message payload for one request.
///
/// Fails with a config error when no prompt variants are configured, and with
/// a template error when a message references an unknown variable; the fetch
/// cycle treats both as a malformed-config condition.
pub fn assemble(config: &WidgetConfig) -> Result<Vec<ChatMessage>, Error> {
    if config.prompts.is_empty() {
        return Err(Error::Config {
            message: "no prompt variants configured".into(),
        });
    }

    let index = rand::rng().random_range(0..config.prompts.len());
    assemble_variant(config, index)
}

/// Assemble the prefix plus the variant at `index`.
fn assemble_variant(config: &WidgetConfig, index: usize) -> Result<Vec<ChatMessage>, Error> {
    let now = Local::now();

    config
        .initial_prompt
        .iter()
        .chain(&config.prompts[index])
        .map(|msg| resolve_message(msg, &now))
        .collect()
}

fn resolve_message(msg: &PromptMessage, now: &DateTime<Local>) -> Result<ChatMessage, Error> {
    let content = template::resolve_at(&msg.content, now)?;
    Ok(ChatMessage {
        role: msg.role,
        content,
    })
}

//! Template resolution for prompt content.
//!
//! Expands `{{variable}}` markers against a closed, enumerated table of named
//! variables — there is deliberately no expression evaluator here. Markers do
//! not nest; anything between the braces other than a known variable name
//! fails the whole resolution, which the prompt assembler surfaces as a
//! malformed-config condition.
//!
//! Supported variables, resolved against the local clock at assembly time:
//! `now`, `date`, `time`, `weekday`, `day`, `month`, `year`.

use std::sync::LazyLock;

use chatmirror_core::error::TemplateError;
use chrono::{DateTime, Local};
use regex::Regex;

static MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([^{}]+)\}\}").expect("marker pattern is valid"));

/// Replace every `{{variable}}` marker in `input`, left to right.
pub fn resolve(input: &str) -> Result<String, TemplateError> {
    resolve_at(input, &Local::now())
}

/// Like [`resolve`], against an explicit clock reading.
pub fn resolve_at(input: &str, now: &DateTime<Local>) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(input.len());
    let mut last = 0;

    for m in MARKER.find_iter(input) {
        let name = input[m.start() + 2..m.end() - 2].trim();
        let value =
            lookup(name, now).ok_or_else(|| TemplateError::UnknownVariable(name.to_string()))?;
        out.push_str(&input[last..m.start()]);
        out.push_str(&value);
        last = m.end();
    }

    out.push_str(&input[last..]);
    Ok(out)
}

fn lookup(name: &str, now: &DateTime<Local>) -> Option<String> {
    let value = match name {
        "now" => now.format("%Y-%m-%d %H:%M").to_string(),
        "date" => now.format("%Y-%m-%d").to_string(),
        "time" => now.format("%H:%M").to_string(),
        "weekday" => now.format("%A").to_string(),
        "day" => now.format("%-d").to_string(),
        "month" => now.format("%B").to_string(),
        "year" => now.format("%Y").to_string(),
        _ => return None,
    };
    Some(value)
}

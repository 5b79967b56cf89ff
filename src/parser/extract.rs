//! Isolation of the `<wiki_structure>` fragment from a raw AI response.

use std::sync::LazyLock;

use log::{debug, error};
use regex::Regex;

use crate::context::Context;
use crate::error::{Error, Result};

/// Opening tag of a wiki structure fragment.
pub const START_MARKER: &str = "<wiki_structure>";

/// Closing tag of a wiki structure fragment.
pub const END_MARKER: &str = "</wiki_structure>";

/// Longest response prefix written to the debug log.
const DUMP_PREFIX_CHARS: usize = 500;

static RE_LEADING_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\A```(?:xml)?\s*").unwrap());

static RE_TRAILING_FENCE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"```\s*\z").unwrap());

static RE_FRAGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<wiki_structure>.*?</wiki_structure>").unwrap());

/// Extract the first wiki structure fragment from `response`.
///
/// A leading ```` ```xml ```` fence and a trailing ```` ``` ```` fence are
/// stripped first. The returned fragment includes both markers and has
/// control characters removed.
pub fn extract_structure(response: &str, ctx: &Context) -> Result<String> {
    if response.trim().is_empty() {
        error!(
            target: ctx.target(),
            "Wiki structure response is empty - this indicates an issue with the model call"
        );
        return Err(Error::EmptyInput);
    }

    let unfenced = strip_fences(response);

    let Some(found) = RE_FRAGMENT.find(&unfenced) else {
        error!(
            target: ctx.target(),
            "No valid XML structure found in AI response. Response length: {}",
            unfenced.len()
        );
        if ctx.dump_responses {
            dump_response(&unfenced, ctx);
        }
        return Err(Error::NoStructureFound {
            length: unfenced.len(),
        });
    };

    let fragment = remove_control_chars(found.as_str());
    debug!(
        target: ctx.target(),
        "Extracted wiki structure fragment ({} bytes)",
        fragment.len()
    );
    Ok(fragment)
}

fn strip_fences(text: &str) -> String {
    let text = RE_LEADING_FENCE.replace(text, "");
    RE_TRAILING_FENCE.replace(&text, "").into_owned()
}

/// Remove C0 controls other than tab, newline and carriage return, plus DEL.
fn remove_control_chars(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, '\u{00}'..='\u{08}' | '\u{0B}' | '\u{0C}' | '\u{0E}'..='\u{1F}' | '\u{7F}'))
        .collect()
}

fn dump_response(text: &str, ctx: &Context) {
    debug!(
        target: ctx.target(),
        "Full response for XML extraction check: {}",
        text
    );
    if text.chars().count() > DUMP_PREFIX_CHARS {
        let prefix: String = text.chars().take(DUMP_PREFIX_CHARS).collect();
        debug!(
            target: ctx.target(),
            "First {} chars of response: {}",
            DUMP_PREFIX_CHARS,
            prefix
        );
    }
}

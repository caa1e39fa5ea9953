//! Parser failures reported through a loader.
//!
//! ```text
//! Module build failed (from ./node_modules/babel-loader/lib/index.js):
//! SyntaxError: /app/src/index.js: Unexpected token (5:11)
//! ```
//!
//! becomes `Syntax Error: Unexpected token (5:11)` followed by the code frame,
//! with stack frames removed.

use std::sync::OnceLock;

use regex::Regex;

use crate::domain::{EnrichedError, RawError};
use crate::severity;
use crate::transform::Transformer;

pub const NAME: &str = "syntax-error";

static STACK_FRAME: OnceLock<Option<Regex>> = OnceLock::new();
fn stack_frame() -> Option<&'static Regex> {
    STACK_FRAME
        .get_or_init(|| Regex::new(r"(?m)^[ \t]*at[ \t].*:\d+:\d+[ \t)]*(?:\r?\n|$)").ok())
        .as_ref()
}

static BUILD_FAILED: OnceLock<Option<Regex>> = OnceLock::new();
fn build_failed() -> Option<&'static Regex> {
    BUILD_FAILED
        .get_or_init(|| Regex::new(r"^Module build failed[^\n]*?:(?:[ \t]*\r?\n|[ \t]+)").ok())
        .as_ref()
}

// Optional `<path>: ` after the marker; the path must contain a separator.
static SYNTAX_PREFIX: OnceLock<Option<Regex>> = OnceLock::new();
fn syntax_prefix() -> Option<&'static Regex> {
    SYNTAX_PREFIX
        .get_or_init(|| {
            Regex::new(r"(?m)^SyntaxError: (?:(?:[A-Za-z]:)?[^\n:]*[/\\][^\n:]*: )?").ok()
        })
        .as_ref()
}

// Parser failure marker at the start of a line, possibly after a loader wrapper.
static SYNTAX_MARKER: OnceLock<Option<Regex>> = OnceLock::new();
fn syntax_marker() -> Option<&'static Regex> {
    SYNTAX_MARKER
        .get_or_init(|| {
            Regex::new(r"(?m)^(?:Module build failed[^\n]*?:[ \t]+)?Syntax ?Error:").ok()
        })
        .as_ref()
}

/// Host error classes a parser failure can arrive under.
const SYNTAX_ERROR_CLASSES: [&str; 2] = ["ModuleBuildError", "SyntaxError"];

/// Recognizes `SyntaxError` / `Syntax Error` messages.
pub struct SyntaxErrorTransformer;

impl SyntaxErrorTransformer {
    fn matches(raw: &RawError) -> bool {
        if let Some(name) = raw.name.as_deref() {
            if !SYNTAX_ERROR_CLASSES.contains(&name) {
                return false;
            }
        }
        syntax_marker().is_some_and(|re| re.is_match(&raw.message))
    }
}

impl Transformer for SyntaxErrorTransformer {
    fn name(&self) -> &str {
        NAME
    }

    fn transform(&self, raw: &RawError) -> Option<EnrichedError> {
        if !Self::matches(raw) {
            return None;
        }
        let message = clean_message(&raw.message)?;
        Some(EnrichedError::new(NAME, message, severity::SYNTAX_ERROR).with_raw_context(raw))
    }
}

/// Strip stack frames and collapse the loader wrapper. `None` when nothing
/// meaningful is left.
pub fn clean_message(message: &str) -> Option<String> {
    let stack_frame = stack_frame()?;
    let build_failed = build_failed()?;
    let syntax_prefix = syntax_prefix()?;

    let without_stack = stack_frame.replace_all(message, "");
    let unwrapped = build_failed.replace(without_stack.trim_start(), "");
    let cleaned = syntax_prefix.replacen(&unwrapped, 1, "Syntax Error: ");
    let cleaned = cleaned.trim_end();

    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.to_string())
    }
}

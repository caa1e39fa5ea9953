//! Plain compiler-style rendering for anything without a dedicated formatter.

use crate::domain::{EnrichedError, Level};
use crate::format::{Formatter, TextBlock};

/// ` error  in ./src/index.js`, blank, message, origin trace, blank.
pub struct DefaultFormatter;

impl DefaultFormatter {
    /// Render a single record. Never fails.
    pub fn render_one(&self, error: &EnrichedError, level: Level) -> TextBlock {
        let heading = match error.file.as_deref() {
            Some(file) => format!(" {level}  in {file}"),
            None => format!(" {level} "),
        };

        let mut lines = vec![heading, String::new()];
        lines.extend(error.message.lines().map(str::to_string));
        if let Some(origin) = error.origin.as_deref() {
            lines.extend(origin.lines().map(str::to_string));
        }
        lines.push(String::new());
        lines
    }
}

impl Formatter for DefaultFormatter {
    fn name(&self) -> &str {
        "default"
    }

    fn accepts(&self, _error: &EnrichedError) -> bool {
        true
    }

    fn render(&self, errors: &[&EnrichedError], level: Level) -> TextBlock {
        errors
            .iter()
            .flat_map(|e| self.render_one(e, level))
            .collect()
    }
}

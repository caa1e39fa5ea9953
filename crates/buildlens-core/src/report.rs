//! Assembled reports: a title plus rendered blocks.

use serde::{Deserialize, Serialize};

use crate::config::CompilationSuccessInfo;
use crate::domain::Level;
use crate::format::TextBlock;
use crate::output::OutputSink;

/// Styling class of a title line.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TitleLevel {
    Success,
    Error,
    Warning,
    Info,
}

impl From<Level> for TitleLevel {
    fn from(level: Level) -> Self {
        match level {
            Level::Error => TitleLevel::Error,
            Level::Warning => TitleLevel::Warning,
        }
    }
}

/// `ERROR  Failed to compile with 3 errors`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Title {
    pub level: TitleLevel,
    pub label: String,
    pub subtitle: String,
}

impl Title {
    pub fn new(level: TitleLevel, label: impl Into<String>, subtitle: impl Into<String>) -> Self {
        Self {
            level,
            label: label.into(),
            subtitle: subtitle.into(),
        }
    }

    /// Title for `count` diagnostics surviving severity selection.
    pub fn diagnostics(level: Level, count: usize) -> Self {
        let subtitle = match level {
            Level::Error => format!("Failed to compile with {}", level.count(count)),
            Level::Warning => format!("Compiled with {}", level.count(count)),
        };
        Self::new(level.into(), level.label().to_uppercase(), subtitle)
    }

    pub fn success(elapsed_ms: u64) -> Self {
        Self::new(
            TitleLevel::Success,
            "DONE",
            format!("Compiled successfully in {elapsed_ms}ms"),
        )
    }

    pub fn compiling() -> Self {
        Self::new(TitleLevel::Info, "WAIT", "Compiling...")
    }

    /// Unstyled form: ` ERROR  Failed to compile with 3 errors`.
    pub fn plain(&self) -> String {
        format!(" {}  {}", self.label, self.subtitle)
    }
}

/// Unstyled info line.
pub fn plain_info(text: &str) -> String {
    format!(" I  {text}")
}

/// Unstyled note line.
pub fn plain_note(text: &str) -> String {
    format!(" N  {text}")
}

/// What one compilation event prints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Report {
    pub title: Title,

    /// Rendered diagnostics, in report order.
    pub blocks: Vec<TextBlock>,

    /// Success-only informational lines.
    pub infos: Vec<String>,

    /// Success-only notes, printed after a blank line.
    pub notes: Vec<String>,
}

impl Report {
    /// Error or warning report.
    pub fn diagnostics(level: Level, count: usize, blocks: Vec<TextBlock>) -> Self {
        Self {
            title: Title::diagnostics(level, count),
            blocks,
            infos: Vec::new(),
            notes: Vec::new(),
        }
    }

    pub fn success(elapsed_ms: u64, info: Option<&CompilationSuccessInfo>) -> Self {
        Self {
            title: Title::success(elapsed_ms),
            blocks: Vec::new(),
            infos: info.map(|i| i.messages.clone()).unwrap_or_default(),
            notes: info.map(|i| i.notes.clone()).unwrap_or_default(),
        }
    }

    /// The "compilation started" banner.
    pub fn compiling() -> Self {
        Self {
            title: Title::compiling(),
            blocks: Vec::new(),
            infos: Vec::new(),
            notes: Vec::new(),
        }
    }

    /// Unstyled lines, exactly as a [`crate::output::MemorySink`] captures them.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![self.title.plain(), String::new()];
        lines.extend(self.blocks.iter().flatten().cloned());
        lines.extend(self.infos.iter().map(|m| plain_info(m)));
        if !self.notes.is_empty() {
            lines.push(String::new());
            lines.extend(self.notes.iter().map(|n| plain_note(n)));
        }
        lines
    }

    /// Write through the sink's primitives.
    pub fn write_to(&self, sink: &mut dyn OutputSink) -> std::io::Result<()> {
        sink.title(&self.title)?;
        for line in self.blocks.iter().flatten() {
            sink.line(line)?;
        }
        for info in &self.infos {
            sink.info(info)?;
        }
        if !self.notes.is_empty() {
            sink.line("")?;
            for note in &self.notes {
                sink.note(note)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::MemorySink;

    #[test]
    fn test_error_title() {
        assert_eq!(
            Title::diagnostics(Level::Error, 3).plain(),
            " ERROR  Failed to compile with 3 errors"
        );
        assert_eq!(
            Title::diagnostics(Level::Error, 1).subtitle,
            "Failed to compile with 1 error"
        );
    }

    #[test]
    fn test_warning_title() {
        let title = Title::diagnostics(Level::Warning, 2);
        assert_eq!(title.level, TitleLevel::Warning);
        assert_eq!(title.plain(), " WARNING  Compiled with 2 warnings");
        assert_eq!(
            Title::diagnostics(Level::Warning, 1).subtitle,
            "Compiled with 1 warning"
        );
    }

    #[test]
    fn test_success_lines() {
        let info = CompilationSuccessInfo {
            messages: vec!["running at http://localhost:8080".to_string()],
            notes: vec!["hot reload enabled".to_string()],
        };
        let report = Report::success(42, Some(&info));
        assert_eq!(
            report.lines(),
            vec![
                " DONE  Compiled successfully in 42ms",
                "",
                " I  running at http://localhost:8080",
                "",
                " N  hot reload enabled",
            ]
        );
    }

    #[test]
    fn test_success_without_info() {
        assert_eq!(
            Report::success(0, None).lines(),
            vec![" DONE  Compiled successfully in 0ms", ""]
        );
    }

    #[test]
    fn test_write_to_matches_lines() {
        let info = CompilationSuccessInfo {
            messages: vec!["m".to_string()],
            notes: vec!["n1".to_string(), "n2".to_string()],
        };
        let reports = [
            Report::success(7, Some(&info)),
            Report::compiling(),
            Report::diagnostics(
                Level::Error,
                1,
                vec![vec![" error  in ./a.js".to_string(), String::new(), "boom".to_string()]],
            ),
        ];
        for report in &reports {
            let mut sink = MemorySink::default();
            report.write_to(&mut sink).expect("write");
            assert_eq!(sink.lines(), report.lines().as_slice());
        }
    }
}

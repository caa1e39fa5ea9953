//! Output sinks: where reports are written.
//!
//! [`ConsoleSink`] styles title labels for a terminal; [`MemorySink`]
//! captures unstyled lines for embedders and tests.

use std::io::{IsTerminal, Write};

use owo_colors::OwoColorize;

use crate::report::{plain_info, plain_note, Title, TitleLevel};

/// Console primitives a report is written through.
pub trait OutputSink {
    /// Clear the screen, when the sink supports it.
    fn clear(&mut self) -> std::io::Result<()>;

    /// Title line followed by a blank line.
    fn title(&mut self, title: &Title) -> std::io::Result<()>;

    fn line(&mut self, text: &str) -> std::io::Result<()>;

    /// Tagged informational line.
    fn info(&mut self, text: &str) -> std::io::Result<()>;

    /// Tagged note line.
    fn note(&mut self, text: &str) -> std::io::Result<()>;
}

#[cfg(windows)]
const CLEAR_SEQUENCE: &str = "\x1B[2J\x1B[0f";
#[cfg(not(windows))]
const CLEAR_SEQUENCE: &str = "\x1B[2J\x1B[3J\x1B[H";

const DEFAULT_WIDTH: usize = 80;

/// Upper bound on the terminal width used for timestamp padding.
const MAX_WIDTH: usize = 500;

/// Writes styled output to any [`Write`].
pub struct ConsoleSink<W: Write> {
    out: W,
    color: bool,
    clearable: bool,
    timestamp: bool,
    width: usize,
}

impl ConsoleSink<std::io::Stdout> {
    /// Stdout, with color and clearing enabled only on a terminal outside CI.
    pub fn stdout() -> Self {
        let stdout = std::io::stdout();
        let interactive = stdout.is_terminal() && std::env::var_os("CI").is_none();
        let width = std::env::var("COLUMNS")
            .ok()
            .and_then(|c| c.parse::<usize>().ok())
            .map_or(DEFAULT_WIDTH, |w| w.min(MAX_WIDTH));
        Self {
            out: stdout,
            color: interactive,
            clearable: interactive,
            timestamp: false,
            width,
        }
    }
}

impl<W: Write> ConsoleSink<W> {
    /// Plain sink over `out`: no color, no clearing, no timestamp.
    pub fn new(out: W) -> Self {
        Self {
            out,
            color: false,
            clearable: false,
            timestamp: false,
            width: DEFAULT_WIDTH,
        }
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn with_timestamp(mut self, timestamp: bool) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Terminal width, capped at 500 columns.
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width.min(MAX_WIDTH);
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn styled_title(&self, title: &Title) -> String {
        if !self.color {
            return title.plain();
        }
        let label = format!(" {} ", title.label);
        match title.level {
            TitleLevel::Success => format!(
                "{} {}",
                label.black().on_green(),
                title.subtitle.green()
            ),
            TitleLevel::Error => format!("{} {}", label.black().on_red(), title.subtitle.red()),
            TitleLevel::Warning => format!(
                "{} {}",
                label.black().on_yellow(),
                title.subtitle.yellow()
            ),
            TitleLevel::Info => format!("{} {}", label.black().on_cyan(), title.subtitle.cyan()),
        }
    }

    /// Pad so the timestamp ends at the terminal edge.
    fn with_time(&self, styled: String, visible_width: usize) -> String {
        let time = chrono::Local::now().format("%H:%M:%S").to_string();
        let space = self
            .width
            .checked_sub(visible_width + time.chars().count())
            .filter(|s| *s > 0)
            .unwrap_or(10);
        let time = if self.color {
            time.bright_black().to_string()
        } else {
            time
        };
        format!("{styled}{}{time}", " ".repeat(space))
    }
}

impl<W: Write> OutputSink for ConsoleSink<W> {
    fn clear(&mut self) -> std::io::Result<()> {
        if self.clearable {
            self.out.write_all(CLEAR_SEQUENCE.as_bytes())?;
            self.out.flush()?;
        }
        Ok(())
    }

    fn title(&mut self, title: &Title) -> std::io::Result<()> {
        let styled = self.styled_title(title);
        let line = if self.timestamp {
            self.with_time(styled, title.plain().chars().count())
        } else {
            styled
        };
        writeln!(self.out, "{line}")?;
        writeln!(self.out)
    }

    fn line(&mut self, text: &str) -> std::io::Result<()> {
        writeln!(self.out, "{text}")
    }

    fn info(&mut self, text: &str) -> std::io::Result<()> {
        if self.color {
            writeln!(self.out, "{} {text}", " I ".black().on_cyan())
        } else {
            writeln!(self.out, "{}", plain_info(text))
        }
    }

    fn note(&mut self, text: &str) -> std::io::Result<()> {
        if self.color {
            writeln!(self.out, "{} {text}", " N ".black().on_white())
        } else {
            writeln!(self.out, "{}", plain_note(text))
        }
    }
}

/// Captures unstyled lines in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemorySink {
    lines: Vec<String>,
    clears: usize,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written since creation or the last [`MemorySink::take`].
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of clear requests received.
    pub fn clears(&self) -> usize {
        self.clears
    }

    /// Drain the captured lines.
    pub fn take(&mut self) -> Vec<String> {
        std::mem::take(&mut self.lines)
    }
}

impl OutputSink for MemorySink {
    fn clear(&mut self) -> std::io::Result<()> {
        self.clears += 1;
        Ok(())
    }

    fn title(&mut self, title: &Title) -> std::io::Result<()> {
        self.lines.push(title.plain());
        self.lines.push(String::new());
        Ok(())
    }

    fn line(&mut self, text: &str) -> std::io::Result<()> {
        self.lines.push(text.to_string());
        Ok(())
    }

    fn info(&mut self, text: &str) -> std::io::Result<()> {
        self.lines.push(plain_info(text));
        Ok(())
    }

    fn note(&mut self, text: &str) -> std::io::Result<()> {
        self.lines.push(plain_note(text));
        Ok(())
    }
}

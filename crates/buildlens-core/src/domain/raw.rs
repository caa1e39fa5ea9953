//! Raw diagnostic records as produced by the host build tool.

use serde::{Deserialize, Serialize};

/// A `line:column` position in a source file.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourcePos {
    pub line: u32,
    pub column: u32,
}

/// Start/end span of a dependency reference inside its importing module.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceSpan {
    pub start: SourcePos,
    pub end: SourcePos,
}

impl std::fmt::Display for SourceSpan {
    /// `3:1-12` on a single line, `3:1-5:2` across lines.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}-", self.start.line, self.start.column)?;
        if self.start.line != self.end.line {
            write!(f, "{}:", self.end.line)?;
        }
        write!(f, "{}", self.end.column)
    }
}

/// A dependency request that led to the diagnostic.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DependencyRef {
    /// The specifier as written in the importing module.
    #[serde(default)]
    pub request: Option<String>,

    /// Location of the import statement, when known.
    #[serde(default)]
    pub loc: Option<SourceSpan>,
}

/// Which module pulled the failing module into the build.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct OriginTrace {
    /// Readable identifier of the originating module.
    pub module: String,

    /// Import sites inside `module`.
    #[serde(default)]
    pub dependency_spans: Vec<SourceSpan>,

    /// Issuer chain, nearest first.
    #[serde(default)]
    pub issuers: Vec<String>,
}

impl OriginTrace {
    /// Render as ` @ module 3:1-12` followed by one ` @ issuer` line each.
    ///
    /// Every segment starts with a newline so the result can be appended
    /// directly below a message.
    pub fn render(&self) -> String {
        let mut out = format!("\n @ {}", self.module);
        for span in &self.dependency_spans {
            out.push(' ');
            out.push_str(&span.to_string());
        }
        for issuer in &self.issuers {
            out.push_str("\n @ ");
            out.push_str(issuer);
        }
        out
    }
}

/// An unprocessed error or warning from a compilation pass.
///
/// Owned by the host; the pipeline only ever reads it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RawError {
    /// Free-form, possibly multi-line message text.
    pub message: String,

    /// Source path reported by the host.
    #[serde(default)]
    pub file: Option<String>,

    /// Host error class, e.g. `ModuleNotFoundError`.
    #[serde(default)]
    pub name: Option<String>,

    /// Readable module identifier, possibly prefixed by a `loader!` chain.
    #[serde(default)]
    pub module_identifier: Option<String>,

    #[serde(default)]
    pub origin: Option<OriginTrace>,

    #[serde(default)]
    pub dependencies: Vec<DependencyRef>,

    /// Loader that produced the diagnostic, when the host knows it.
    #[serde(default)]
    pub loader: Option<String>,

    #[serde(default)]
    pub stack: Option<String>,

    /// Anything else the host attached.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl RawError {
    /// Create a record carrying only a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }

    /// Set the reported file.
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Set the host error class.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the module identifier.
    pub fn with_module_identifier(mut self, id: impl Into<String>) -> Self {
        self.module_identifier = Some(id.into());
        self
    }

    /// Append a dependency request.
    pub fn with_dependency(mut self, request: impl Into<String>) -> Self {
        self.dependencies.push(DependencyRef {
            request: Some(request.into()),
            loc: None,
        });
        self
    }

    /// Set the origin trace.
    pub fn with_origin(mut self, origin: OriginTrace) -> Self {
        self.origin = Some(origin);
        self
    }

    /// Best-effort display path: `file`, else the module identifier, with
    /// any loader chain removed.
    pub fn display_file(&self) -> Option<String> {
        self.file
            .as_deref()
            .or(self.module_identifier.as_deref())
            .map(strip_loaders)
            .filter(|f| !f.is_empty())
            .map(str::to_string)
    }

    /// Text to show: the message, or the first non-blank stack line when
    /// the message is blank.
    pub fn display_message(&self) -> &str {
        if !self.message.trim().is_empty() {
            return &self.message;
        }
        self.stack
            .as_deref()
            .and_then(|stack| stack.lines().map(str::trim).find(|l| !l.is_empty()))
            .unwrap_or(&self.message)
    }

    /// Host error class equals `name`.
    pub fn is_named(&self, name: &str) -> bool {
        self.name.as_deref() == Some(name)
    }
}

/// `babel-loader!eslint-loader!./src/a.js` -> `./src/a.js`.
pub fn strip_loaders(identifier: &str) -> &str {
    identifier.rsplit('!').next().unwrap_or(identifier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_loaders() {
        assert_eq!(strip_loaders("./index.js"), "./index.js");
        assert_eq!(
            strip_loaders("/node_modules/babel-loader/lib/index.js!./src/a.js"),
            "./src/a.js"
        );
        assert_eq!(strip_loaders("a!b!c"), "c");
    }

    #[test]
    fn test_display_file_prefers_file() {
        let raw = RawError::new("boom")
            .with_file("./a.js")
            .with_module_identifier("loader!./b.js");
        assert_eq!(raw.display_file().as_deref(), Some("./a.js"));
    }

    #[test]
    fn test_display_file_falls_back_to_module_identifier() {
        let raw = RawError::new("boom").with_module_identifier("loader!./b.js");
        assert_eq!(raw.display_file().as_deref(), Some("./b.js"));
    }

    #[test]
    fn test_display_file_absent() {
        assert_eq!(RawError::new("boom").display_file(), None);
        assert_eq!(RawError::new("boom").with_file("").display_file(), None);
    }

    #[test]
    fn test_display_message_falls_back_to_stack() {
        let mut raw = RawError::new("  ");
        assert_eq!(raw.display_message(), "  ");

        raw.stack = Some("\n  Error: worker crashed\n    at run (/app/w.js:1:1)".to_string());
        assert_eq!(raw.display_message(), "Error: worker crashed");

        raw.message = "real message".to_string();
        assert_eq!(raw.display_message(), "real message");
    }

    #[test]
    fn test_source_span_display() {
        let single = SourceSpan {
            start: SourcePos { line: 3, column: 1 },
            end: SourcePos { line: 3, column: 12 },
        };
        assert_eq!(single.to_string(), "3:1-12");

        let multi = SourceSpan {
            start: SourcePos { line: 3, column: 1 },
            end: SourcePos { line: 5, column: 2 },
        };
        assert_eq!(multi.to_string(), "3:1-5:2");
    }

    #[test]
    fn test_origin_render() {
        let origin = OriginTrace {
            module: "./src/index.js".to_string(),
            dependency_spans: vec![SourceSpan {
                start: SourcePos { line: 1, column: 0 },
                end: SourcePos { line: 1, column: 24 },
            }],
            issuers: vec!["./src/main.js".to_string()],
        };
        assert_eq!(
            origin.render(),
            "\n @ ./src/index.js 1:0-24\n @ ./src/main.js"
        );
    }

    #[test]
    fn test_raw_error_deserialize_minimal() {
        let raw: RawError = serde_json::from_str(r#"{"message":"boom"}"#).expect("deserialize");
        assert_eq!(raw.message, "boom");
        assert!(raw.file.is_none());
        assert!(raw.dependencies.is_empty());
        assert!(raw.extra.is_empty());
    }

    #[test]
    fn test_raw_error_keeps_unknown_fields() {
        let raw: RawError =
            serde_json::from_str(r#"{"message":"boom","hideStack":true}"#).expect("deserialize");
        assert_eq!(raw.extra.get("hideStack"), Some(&serde_json::Value::Bool(true)));
    }
}

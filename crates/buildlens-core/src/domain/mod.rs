//! Domain types shared by every pipeline stage.

pub mod enriched;
pub mod error;
pub mod raw;
pub mod stats;

pub use enriched::{EnrichedError, ErrorDetail, Level, LintFile, LintReport, ModuleKind};
pub use error::{BuildlensError, Result};
pub use raw::{strip_loaders, DependencyRef, OriginTrace, RawError, SourcePos, SourceSpan};
pub use stats::{BuildOutcome, CompilationStats};

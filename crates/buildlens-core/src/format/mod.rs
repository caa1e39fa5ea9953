//! Rendering of classified diagnostics.
//!
//! Each record is claimed by the first [`Formatter`] whose
//! [`Formatter::accepts`] returns true (built-ins first, caller additions
//! after). A formatter then renders every record it claimed as one block, so
//! related records can be grouped. Unclaimed records go through
//! [`DefaultFormatter`], one block per record.
//!
//! Blocks come out in the order of each group's first record.

pub mod default;
pub mod lint;
pub mod module_not_found;

pub use default::DefaultFormatter;
pub use lint::LintFormatter;
pub use module_not_found::ModuleNotFoundFormatter;

use crate::config::PackageManager;
use crate::domain::{EnrichedError, Level};
use crate::fault::contain;
use crate::obs;

/// Rendered lines of one block, without trailing newlines.
pub type TextBlock = Vec<String>;

/// Renders one class of enriched diagnostic.
pub trait Formatter: Send + Sync {
    /// Identifier used in logs.
    fn name(&self) -> &str;

    /// Whether this formatter owns `error`.
    fn accepts(&self, error: &EnrichedError) -> bool;

    /// Render every record this formatter claimed, in report order.
    fn render(&self, errors: &[&EnrichedError], level: Level) -> TextBlock;
}

type AcceptFn = dyn Fn(&EnrichedError) -> bool + Send + Sync;
type RenderFn = dyn Fn(&[&EnrichedError], Level) -> TextBlock + Send + Sync;

/// A [`Formatter`] backed by closures.
pub struct FnFormatter {
    name: String,
    accepts: Box<AcceptFn>,
    render: Box<RenderFn>,
}

impl FnFormatter {
    pub fn new(
        name: impl Into<String>,
        accepts: impl Fn(&EnrichedError) -> bool + Send + Sync + 'static,
        render: impl Fn(&[&EnrichedError], Level) -> TextBlock + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            accepts: Box::new(accepts),
            render: Box::new(render),
        }
    }

    /// Formatter claiming every record whose class name is `class`.
    pub fn for_class(
        class: impl Into<String>,
        render: impl Fn(&[&EnrichedError], Level) -> TextBlock + Send + Sync + 'static,
    ) -> Self {
        let class = class.into();
        let matcher = class.clone();
        Self::new(class, move |e: &EnrichedError| e.name == matcher, render)
    }
}

impl Formatter for FnFormatter {
    fn name(&self) -> &str {
        &self.name
    }

    fn accepts(&self, error: &EnrichedError) -> bool {
        (self.accepts)(error)
    }

    fn render(&self, errors: &[&EnrichedError], level: Level) -> TextBlock {
        (self.render)(errors, level)
    }
}

/// The built-in formatters in claim order.
pub fn builtin_formatters(package_manager: PackageManager) -> Vec<Box<dyn Formatter>> {
    vec![
        Box::new(ModuleNotFoundFormatter::new(package_manager)),
        Box::new(LintFormatter),
    ]
}

/// Ordered, append-only list of formatters plus the default fallback.
pub struct FormatterChain {
    formatters: Vec<Box<dyn Formatter>>,
    fallback: DefaultFormatter,
}

impl Default for FormatterChain {
    fn default() -> Self {
        Self::builtin(PackageManager::default())
    }
}

/// Where a record's rendering comes from.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Claim {
    Formatter(usize),
    Fallback,
}

impl FormatterChain {
    pub fn builtin(package_manager: PackageManager) -> Self {
        Self {
            formatters: builtin_formatters(package_manager),
            fallback: DefaultFormatter,
        }
    }

    /// Chain where every record renders through the default formatter.
    pub fn empty() -> Self {
        Self {
            formatters: Vec::new(),
            fallback: DefaultFormatter,
        }
    }

    /// Append caller formatters after the existing ones.
    pub fn with_additional(mut self, additional: impl IntoIterator<Item = Box<dyn Formatter>>) -> Self {
        self.formatters.extend(additional);
        self
    }

    /// Formatter names in claim order, fallback excluded.
    pub fn names(&self) -> Vec<&str> {
        self.formatters.iter().map(|f| f.name()).collect()
    }

    fn claim(&self, error: &EnrichedError) -> Claim {
        for (index, formatter) in self.formatters.iter().enumerate() {
            match contain(|| formatter.accepts(error)) {
                Ok(true) => return Claim::Formatter(index),
                Ok(false) => continue,
                Err(panic) => {
                    obs::emit_formatter_fault(formatter.name(), &panic);
                    return Claim::Fallback;
                }
            }
        }
        Claim::Fallback
    }

    /// Render `records` into blocks ordered by first appearance.
    pub fn render(&self, records: &[EnrichedError], level: Level) -> Vec<TextBlock> {
        // (formatter index, positions of claimed records), in first-claim order.
        let mut groups: Vec<(usize, Vec<usize>)> = Vec::new();
        let mut blocks: Vec<(usize, TextBlock)> = Vec::new();

        for (position, record) in records.iter().enumerate() {
            match self.claim(record) {
                Claim::Formatter(index) => match groups.iter_mut().find(|(i, _)| *i == index) {
                    Some((_, members)) => members.push(position),
                    None => groups.push((index, vec![position])),
                },
                Claim::Fallback => blocks.push((position, self.fallback.render_one(record, level))),
            }
        }

        for (index, members) in groups {
            let formatter = &self.formatters[index];
            let claimed: Vec<&EnrichedError> = members.iter().map(|&p| &records[p]).collect();

            match contain(|| formatter.render(&claimed, level)) {
                Ok(block) if !block.is_empty() => blocks.push((members[0], block)),
                Ok(_) => {
                    obs::emit_formatter_fault(formatter.name(), "rendered no lines");
                    self.fall_back(&members, records, level, &mut blocks);
                }
                Err(panic) => {
                    obs::emit_formatter_fault(formatter.name(), &panic);
                    self.fall_back(&members, records, level, &mut blocks);
                }
            }
        }

        blocks.sort_by_key(|(position, _)| *position);
        blocks.into_iter().map(|(_, block)| block).collect()
    }

    fn fall_back(
        &self,
        members: &[usize],
        records: &[EnrichedError],
        level: Level,
        blocks: &mut Vec<(usize, TextBlock)>,
    ) {
        for &position in members {
            blocks.push((position, self.fallback.render_one(&records[position], level)));
        }
    }
}

//! Missing dependencies, grouped by specifier.

use crate::config::PackageManager;
use crate::domain::{EnrichedError, ErrorDetail, Level, ModuleKind};
use crate::format::{Formatter, TextBlock};
use crate::transform::module_not_found::NAME;

/// One missing specifier and every file that imports it.
#[derive(Debug, Clone, PartialEq, Eq)]
struct MissingModule {
    module: String,
    kind: ModuleKind,
    importers: Vec<String>,
}

impl MissingModule {
    /// `* lodash in ./a.js, ./b.js and 2 others`
    fn bullet(&self) -> String {
        format!("* {}{}", self.module, importer_list(&self.importers))
    }
}

fn importer_list(files: &[String]) -> String {
    match files {
        [] => String::new(),
        [a] => format!(" in {a}"),
        [a, b] => format!(" in {a}, {b}"),
        [a, b, rest @ ..] => {
            let others = if rest.len() == 1 { "other" } else { "others" };
            format!(" in {a}, {b} and {} {others}", rest.len())
        }
    }
}

/// Renders `module-not-found` records.
pub struct ModuleNotFoundFormatter {
    package_manager: PackageManager,
}

impl ModuleNotFoundFormatter {
    pub fn new(package_manager: PackageManager) -> Self {
        Self { package_manager }
    }

    fn group(errors: &[&EnrichedError]) -> Vec<MissingModule> {
        let mut groups: Vec<MissingModule> = Vec::new();
        for error in errors {
            let ErrorDetail::ModuleNotFound { module, kind } = &error.detail else {
                continue;
            };
            let index = match groups.iter().position(|g| &g.module == module) {
                Some(index) => index,
                None => {
                    groups.push(MissingModule {
                        module: module.clone(),
                        kind: *kind,
                        importers: Vec::new(),
                    });
                    groups.len() - 1
                }
            };
            if let Some(file) = &error.file {
                if !groups[index].importers.contains(file) {
                    groups[index].importers.push(file.clone());
                }
            }
        }
        groups
    }

    fn dependencies_not_found(&self, packages: &[&MissingModule]) -> TextBlock {
        let heading = if packages.len() == 1 {
            "This dependency was not found:"
        } else {
            "These dependencies were not found:"
        };
        let pronoun = if packages.len() == 1 { "it" } else { "them" };
        let names: Vec<&str> = packages.iter().map(|m| m.module.as_str()).collect();

        let mut lines = vec![heading.to_string(), String::new()];
        lines.extend(packages.iter().map(|m| m.bullet()));
        lines.push(String::new());
        lines.push(format!(
            "To install {pronoun}, you can run: {} {}",
            self.package_manager.install_command(),
            names.join(" ")
        ));
        lines
    }

    fn relative_modules_not_found(relatives: &[&MissingModule]) -> TextBlock {
        let heading = if relatives.len() == 1 {
            "This relative module was not found:"
        } else {
            "These relative modules were not found:"
        };
        let mut lines = vec![heading.to_string(), String::new()];
        lines.extend(relatives.iter().map(|m| m.bullet()));
        lines
    }
}

impl Formatter for ModuleNotFoundFormatter {
    fn name(&self) -> &str {
        NAME
    }

    fn accepts(&self, error: &EnrichedError) -> bool {
        error.name == NAME && matches!(error.detail, ErrorDetail::ModuleNotFound { .. })
    }

    fn render(&self, errors: &[&EnrichedError], _level: Level) -> TextBlock {
        let groups = Self::group(errors);
        let packages: Vec<&MissingModule> =
            groups.iter().filter(|g| g.kind == ModuleKind::Package).collect();
        let relatives: Vec<&MissingModule> =
            groups.iter().filter(|g| g.kind == ModuleKind::Relative).collect();

        let mut lines = Vec::new();
        if !packages.is_empty() {
            lines.extend(self.dependencies_not_found(&packages));
        }
        if !packages.is_empty() && !relatives.is_empty() {
            lines.push(String::new());
            lines.push(String::new());
        }
        if !relatives.is_empty() {
            lines.extend(Self::relative_modules_not_found(&relatives));
        }
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines
    }
}

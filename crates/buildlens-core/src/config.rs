//! Reporter configuration.
//!
//! Loaded from `buildlens.toml` or built in code:
//!
//! ```toml
//! clear_console = false
//! package_manager = "yarn"
//!
//! [compilation_success_info]
//! messages = ["Your application is running here http://localhost:8080"]
//! notes = ["Some additional notes to be displayed upon successful compilation"]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::{BuildlensError, Result};

/// Default config file name looked up by the CLI.
pub const CONFIG_FILE_NAME: &str = "buildlens.toml";

/// Extra lines printed after a successful build.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CompilationSuccessInfo {
    #[serde(default)]
    pub messages: Vec<String>,

    #[serde(default)]
    pub notes: Vec<String>,
}

/// Tool named in the install hint for missing packages.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    #[default]
    Npm,
    Yarn,
}

impl PackageManager {
    /// Command prefix; the missing specifiers are appended.
    pub fn install_command(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npm install --save",
            PackageManager::Yarn => "yarn add",
        }
    }

    /// Yarn when `yarn.lock` sits in `project_root`, npm otherwise.
    pub fn detect(project_root: &Path) -> Self {
        if project_root.join("yarn.lock").is_file() {
            PackageManager::Yarn
        } else {
            PackageManager::Npm
        }
    }
}

/// Configuration for a [`crate::reporter::FriendlyReporter`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ReporterConfig {
    /// Lines appended to the success report.
    pub compilation_success_info: Option<CompilationSuccessInfo>,

    /// Clear the terminal before each report.
    pub clear_console: bool,

    /// Install hint tool; detected from the project root when unset.
    pub package_manager: Option<PackageManager>,

    /// Right-align the local time on title lines.
    pub show_timestamp: bool,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            compilation_success_info: None,
            clear_console: true,
            package_manager: None,
            show_timestamp: false,
        }
    }
}

impl ReporterConfig {
    /// Parse a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Read and parse a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| BuildlensError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Configured package manager, else detection under `project_root`.
    pub fn resolved_package_manager(&self, project_root: &Path) -> PackageManager {
        self.package_manager
            .unwrap_or_else(|| PackageManager::detect(project_root))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ReporterConfig::default();
        assert!(config.clear_console);
        assert!(config.compilation_success_info.is_none());
        assert!(config.package_manager.is_none());
        assert!(!config.show_timestamp);
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = ReporterConfig::from_toml_str("").expect("parse");
        assert_eq!(config, ReporterConfig::default());
    }

    #[test]
    fn test_full_toml() {
        let config = ReporterConfig::from_toml_str(
            r#"
clear_console = false
package_manager = "yarn"
show_timestamp = true

[compilation_success_info]
messages = ["running at http://localhost:8080"]
notes = ["note one", "note two"]
"#,
        )
        .expect("parse");

        assert!(!config.clear_console);
        assert_eq!(config.package_manager, Some(PackageManager::Yarn));
        assert!(config.show_timestamp);
        let info = config.compilation_success_info.expect("info");
        assert_eq!(info.messages, vec!["running at http://localhost:8080"]);
        assert_eq!(info.notes.len(), 2);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = ReporterConfig::from_toml_str("clear_console = \"maybe\"").unwrap_err();
        assert!(matches!(err, BuildlensError::InvalidConfig(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "clear_console = false\n").expect("write");

        let config = ReporterConfig::load(&path).expect("load");
        assert!(!config.clear_console);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = ReporterConfig::load(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, BuildlensError::ConfigRead { .. }));
    }

    #[test]
    fn test_package_manager_detect() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert_eq!(PackageManager::detect(dir.path()), PackageManager::Npm);

        std::fs::write(dir.path().join("yarn.lock"), "").expect("write");
        assert_eq!(PackageManager::detect(dir.path()), PackageManager::Yarn);

        let pinned = ReporterConfig {
            package_manager: Some(PackageManager::Npm),
            ..Default::default()
        };
        assert_eq!(pinned.resolved_package_manager(dir.path()), PackageManager::Npm);
        assert_eq!(
            ReporterConfig::default().resolved_package_manager(dir.path()),
            PackageManager::Yarn
        );
    }

    #[test]
    fn test_install_commands() {
        assert_eq!(PackageManager::Npm.install_command(), "npm install --save");
        assert_eq!(PackageManager::Yarn.install_command(), "yarn add");
    }
}

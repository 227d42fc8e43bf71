//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.placetrack.toml` files.

use crate::analysis::ReferencePolicy;
use crate::cli::OutputFormat;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE: &str = ".placetrack.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Dashboard settings.
    #[serde(default)]
    pub dashboard: DashboardConfig,

    /// Record validation settings.
    #[serde(default)]
    pub validation: ValidationConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Report output path; empty writes to stdout.
    #[serde(default)]
    pub output: String,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,

    /// Report format.
    #[serde(default)]
    pub format: OutputFormat,

    /// Dataset file or directory; empty uses the built-in fixtures.
    #[serde(default)]
    pub data: String,
}

/// Dashboard settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Recent applications shown on the student view.
    #[serde(default = "default_student_recent")]
    pub student_recent: usize,

    /// Recent applications shown on the office view.
    #[serde(default = "default_office_recent")]
    pub office_recent: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            student_recent: default_student_recent(),
            office_recent: default_office_recent(),
        }
    }
}

fn default_student_recent() -> usize {
    3
}

fn default_office_recent() -> usize {
    5
}

/// Record validation settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// What to do with applications that reference unknown students.
    #[serde(default)]
    pub reference_policy: ReferencePolicy,
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Try to load configuration from a directory.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref output) = args.output {
            self.general.output = output.display().to_string();
        }
        if let Some(format) = args.format {
            self.general.format = format;
        }
        if let Some(ref data) = args.data {
            self.general.data = data.display().to_string();
        }

        // A single --recent applies to whichever view is rendered
        if let Some(recent) = args.recent {
            self.dashboard.student_recent = recent;
            self.dashboard.office_recent = recent;
        }

        if args.strict {
            self.validation.reference_policy = ReferencePolicy::Fail;
        } else if args.lenient {
            self.validation.reference_policy = ReferencePolicy::Skip;
        }

        // Flags always override
        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Report output path, or `None` for stdout.
    pub fn output_path(&self) -> Option<PathBuf> {
        if self.general.output.is_empty() {
            None
        } else {
            Some(PathBuf::from(&self.general.output))
        }
    }

    /// Dataset path, or `None` for the built-in fixtures.
    pub fn data_path(&self) -> Option<PathBuf> {
        if self.general.data.is_empty() {
            None
        } else {
            Some(PathBuf::from(&self.general.data))
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::tests::make_args;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.dashboard.student_recent, 3);
        assert_eq!(config.dashboard.office_recent, 5);
        assert_eq!(config.validation.reference_policy, ReferencePolicy::Fail);
        assert_eq!(config.general.format, OutputFormat::Markdown);
        assert_eq!(config.output_path(), None);
        assert_eq!(config.data_path(), None);
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
output = "dashboard.json"
verbose = true
format = "json"

[dashboard]
office_recent = 10

[validation]
reference_policy = "skip"
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.output_path(), Some(PathBuf::from("dashboard.json")));
        assert!(config.general.verbose);
        assert_eq!(config.general.format, OutputFormat::Json);
        assert_eq!(config.dashboard.office_recent, 10);
        assert_eq!(config.dashboard.student_recent, 3);
        assert_eq!(config.validation.reference_policy, ReferencePolicy::Skip);
    }

    #[test]
    fn test_reject_unknown_policy() {
        let toml_content = "[validation]\nreference_policy = \"ignore\"\n";
        assert!(toml::from_str::<Config>(toml_content).is_err());
    }

    #[test]
    fn test_merge_with_args() {
        let mut config = Config::default();
        config.validation.reference_policy = ReferencePolicy::Skip;
        config.dashboard.office_recent = 8;

        let mut args = make_args();
        args.recent = Some(2);
        args.strict = true;
        args.format = Some(OutputFormat::Json);
        config.merge_with_args(&args);

        assert_eq!(config.dashboard.student_recent, 2);
        assert_eq!(config.dashboard.office_recent, 2);
        assert_eq!(config.validation.reference_policy, ReferencePolicy::Fail);
        assert_eq!(config.general.format, OutputFormat::Json);

        // Unset arguments leave config values alone
        let mut config = Config::default();
        config.general.output = "report.md".to_string();
        config.merge_with_args(&make_args());
        assert_eq!(config.output_path(), Some(PathBuf::from("report.md")));
    }

    #[test]
    fn test_load_from_dir() {
        let dir = TempDir::new().unwrap();
        assert!(Config::load_from_dir(dir.path()).unwrap().is_none());

        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "[dashboard]\nstudent_recent = 1\n",
        )
        .unwrap();
        let config = Config::load_from_dir(dir.path()).unwrap().unwrap();
        assert_eq!(config.dashboard.student_recent, 1);

        std::fs::write(dir.path().join(CONFIG_FILE), "[dashboard\n").unwrap();
        assert!(Config::load_from_dir(dir.path()).is_err());
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(!toml_str.is_empty());
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[dashboard]"));
        assert!(toml_str.contains("reference_policy = \"fail\""));
    }
}

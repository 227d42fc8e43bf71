//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::models::{ApplicationStatus, Role};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Placetrack - placement statistics dashboards
///
/// Render the student or placement-office dashboard for a campus
/// placement dataset. Markdown/JSON reports.
///
/// Examples:
///   placetrack
///   placetrack --role student --student 1
///   placetrack --data ./records --format json -o dashboard.json
///   placetrack --status selected --search "computer"
///   placetrack --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Dashboard to render
    #[arg(long, default_value = "tpo", value_name = "ROLE")]
    pub role: Role,

    /// Student id whose dashboard to render (student role only)
    #[arg(short, long, value_name = "ID")]
    pub student: Option<String>,

    /// Dataset file or directory of JSON files
    ///
    /// Uses the built-in campus fixtures when omitted.
    #[arg(short, long, value_name = "PATH", env = "PLACETRACK_DATA")]
    pub data: Option<PathBuf>,

    /// Output file path for the report (stdout when omitted)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (markdown, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Number of entries in the recent applications list
    #[arg(long, value_name = "COUNT")]
    pub recent: Option<usize>,

    /// Only list applications with this status
    ///
    /// Values: applied, shortlisted, interview-scheduled, selected, rejected
    #[arg(long, value_name = "STATUS", value_parser = parse_status)]
    pub status: Option<ApplicationStatus>,

    /// Filter the students table (tpo) or company list (student)
    #[arg(long, value_name = "TERM")]
    pub search: Option<String>,

    /// Fail on applications that reference unknown students
    #[arg(long, conflicts_with = "lenient")]
    pub strict: bool,

    /// Skip applications that reference unknown students
    #[arg(long, conflicts_with = "strict")]
    pub lenient: bool,

    /// Path to configuration file
    ///
    /// If not specified, looks for .placetrack.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .placetrack.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

fn parse_status(s: &str) -> Result<ApplicationStatus, String> {
    s.parse::<ApplicationStatus>().map_err(|e| e.to_string())
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        match self.role {
            Role::Student if self.student.is_none() => {
                return Err("The student dashboard requires --student <ID>".to_string());
            }
            Role::Tpo if self.student.is_some() => {
                return Err("--student only applies to --role student".to_string());
            }
            _ => {}
        }

        if let Some(ref id) = self.student {
            if id.trim().is_empty() {
                return Err("Student id must not be empty".to_string());
            }
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(ref data) = self.data {
            if !data.exists() {
                return Err(format!("Dataset path does not exist: {}", data.display()));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    ///
    /// `config_verbose` is the config file's `verbose` setting; `--quiet`
    /// still wins over it.
    pub fn log_level(&self, config_verbose: bool) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose || config_verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

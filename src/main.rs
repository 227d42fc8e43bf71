//! Placetrack - placement statistics dashboards
//!
//! A CLI tool that loads campus placement records (students, their
//! applications and interviews, recruiting companies) and renders the
//! student or placement-office dashboard as Markdown or JSON.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (bad arguments, unreadable or invalid records, etc.)

mod analysis;
mod cli;
mod config;
mod error;
mod models;
mod report;
mod store;

use analysis::{check_references, Dashboard, OfficeOverview, StudentOverview, ViewOptions};
use anyhow::{Context, Result};
use chrono::Local;
use cli::{Args, OutputFormat};
use config::{Config, CONFIG_FILE};
use models::Role;
use report::ReportMetadata;
use store::{Dataset, RecordStore};
use tracing::{debug, error, info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn main() {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        if let Err(e) = handle_init_config() {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
        return;
    }

    // Config comes first so its `verbose` setting can raise the log level
    let (mut config, config_source) = match load_config(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };
    config.merge_with_args(&args);

    // Initialize logging
    init_logging(args.log_level(config.general.verbose));

    info!("Placetrack v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    debug!("Configuration: {}", config_source);

    if let Err(e) = run(args, config) {
        error!("Dashboard failed: {:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

/// Handle --init-config: generate a default .placetrack.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE);

    if path.exists() {
        anyhow::bail!("{} already exists. Remove it first or edit it manually.", CONFIG_FILE);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).with_context(|| format!("Failed to write {}", CONFIG_FILE))?;

    println!("Created {} with default settings.", CONFIG_FILE);
    Ok(())
}

/// Initialize logging at `level`, unless `RUST_LOG` gives its own filter.
///
/// Logs go to stderr so a report written to stdout stays clean.
fn init_logging(level: Level) {
    let filter = log_filter(level, std::env::var("RUST_LOG").ok().as_deref());

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// `RUST_LOG` directives when present, otherwise everything at `level`.
fn log_filter(level: Level, directives: Option<&str>) -> EnvFilter {
    match directives {
        Some(directives) if !directives.trim().is_empty() => EnvFilter::new(directives),
        _ => EnvFilter::new(level.to_string().to_lowercase()),
    }
}

/// Load records, build the requested dashboard and write the report.
fn run(args: Args, config: Config) -> Result<()> {
    let (dataset, source) = load_dataset(&config)?;
    info!(
        "Loaded {} students and {} companies from {}",
        dataset.students().len(),
        dataset.companies().len(),
        source
    );

    let dashboard = build_dashboard(&dataset, &args, &config)?;

    let output = match config.general.format {
        OutputFormat::Json => report::generate_json_report(&dashboard)?,
        OutputFormat::Markdown => {
            let metadata = ReportMetadata {
                source,
                generated_at: Local::now().naive_local(),
            };
            report::generate_markdown_report(&dashboard, &metadata)
        }
    };

    match config.output_path() {
        Some(path) => {
            std::fs::write(&path, &output)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            info!("Report saved to {}", path.display());
        }
        None => print!("{}", output),
    }

    Ok(())
}

/// Build the dashboard for the requested role.
fn build_dashboard(store: &impl RecordStore, args: &Args, config: &Config) -> Result<Dashboard> {
    let policy = config.validation.reference_policy;
    let students = check_references(store.students(), policy)
        .context("Placement records failed validation")?;

    let dashboard = match args.role {
        Role::Student => {
            let student_id = args.student.as_deref().unwrap_or_default();
            let options = view_options(args, config.dashboard.student_recent);
            Dashboard::Student(StudentOverview::build(
                &students,
                student_id,
                store.companies(),
                &options,
            )?)
        }
        Role::Tpo => {
            let options = view_options(args, config.dashboard.office_recent);
            Dashboard::Office(OfficeOverview::build(
                &students,
                store.companies(),
                &options,
            ))
        }
    };

    Ok(dashboard)
}

fn view_options(args: &Args, recent_limit: usize) -> ViewOptions {
    ViewOptions {
        recent_limit,
        status_filter: args.status,
        search: args.search.clone(),
    }
}

/// Load the dataset named in config, or the built-in fixtures.
fn load_dataset(config: &Config) -> Result<(Dataset, String)> {
    match config.data_path() {
        Some(path) => {
            info!("Loading records from: {}", path.display());
            let dataset = Dataset::load(&path)?;
            Ok((dataset, path.display().to_string()))
        }
        None => {
            debug!("No dataset given, using built-in campus fixtures");
            Ok((Dataset::fixtures()?, "built-in campus fixtures".to_string()))
        }
    }
}

/// Load configuration from file or use defaults.
///
/// Runs before logging is set up, so it returns a description of where
/// the settings came from instead of logging it.
fn load_config(args: &Args) -> Result<(Config, String)> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        let config = Config::load(config_path)?;
        return Ok((config, config_path.display().to_string()));
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => Ok((config, CONFIG_FILE.to_string())),
        Ok(None) => Ok((Config::default(), "defaults".to_string())),
        Err(e) => {
            eprintln!("Warning: failed to load config: {:#}", e);
            Ok((Config::default(), "defaults".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::ReferencePolicy;
    use crate::cli::tests::make_args;
    use crate::models::ApplicationStatus;

    #[test]
    fn test_log_filter_defaults_to_level() {
        assert_eq!(log_filter(Level::DEBUG, None).to_string(), "debug");
        assert_eq!(log_filter(Level::INFO, Some("  ")).to_string(), "info");
    }

    #[test]
    fn test_log_filter_prefers_rust_log() {
        let filter = log_filter(Level::ERROR, Some("placetrack=trace"));
        assert_eq!(filter.to_string(), "placetrack=trace");
    }

    #[test]
    fn test_build_office_dashboard_from_fixtures() {
        let dataset = Dataset::fixtures().unwrap();
        let dashboard = build_dashboard(&dataset, &make_args(), &Config::default()).unwrap();

        match dashboard {
            Dashboard::Office(view) => {
                assert_eq!(view.total_students, 3);
                assert_eq!(view.recent_applications.len(), 4);
                assert_eq!(view.placements_by_department.get("Computer Science"), Some(1));
            }
            Dashboard::Student(_) => panic!("expected office view"),
        }
    }

    #[test]
    fn test_build_student_dashboard_unknown_id() {
        let dataset = Dataset::fixtures().unwrap();
        let mut args = make_args();
        args.role = Role::Student;
        args.student = Some("42".to_string());

        let err = build_dashboard(&dataset, &args, &Config::default()).unwrap_err();
        assert!(err.to_string().contains("no student with id '42'"));
    }

    #[test]
    fn test_dangling_reference_policy() {
        let mut dataset = Dataset::fixtures().unwrap();
        dataset.students[1].applications[0].student_id = "404".to_string();

        let mut config = Config::default();
        let err = build_dashboard(&dataset, &make_args(), &config).unwrap_err();
        assert!(format!("{:#}", err).contains("unknown student '404'"));

        config.validation.reference_policy = ReferencePolicy::Skip;
        let dashboard = build_dashboard(&dataset, &make_args(), &config).unwrap();
        match dashboard {
            Dashboard::Office(view) => {
                assert_eq!(view.placed_students, 0);
                assert!(view.placements_by_department.is_empty());
            }
            Dashboard::Student(_) => panic!("expected office view"),
        }
    }

    #[test]
    fn test_status_filter_reaches_view() {
        let dataset = Dataset::fixtures().unwrap();
        let mut args = make_args();
        args.status = Some(ApplicationStatus::Selected);

        let dashboard = build_dashboard(&dataset, &args, &Config::default()).unwrap();
        match dashboard {
            Dashboard::Office(view) => {
                assert_eq!(view.applications.len(), 1);
                assert_eq!(view.applications[0].student_name, "Alice Smith");
            }
            Dashboard::Student(_) => panic!("expected office view"),
        }
    }
}

// tollgate/src/cli.rs
//
// Single source of truth for all CLI definitions (Clap structs).

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tollgate_core::domain::validation::RuleSeverity;

#[derive(Parser)]
#[command(name = "tollgate")]
#[command(about = "Data-quality gate for warehouse models", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Runs every validation suite of the project
    Run {
        /// Project directory
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        /// Run only one model (ex: "orders")
        #[arg(long, short)]
        select: Option<String>,

        /// Compile and resolve everything, execute nothing
        #[arg(long)]
        dry_run: bool,

        #[command(flatten)]
        verbose: Verbosity,
    },

    /// Runs a single validation rule against one model
    Validate(ValidateArgs),

    /// Runs the quality checks against one model
    Quality(QualityArgs),

    /// Prints the SQL generated for every validation, without executing it
    Compile {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        #[arg(long, short)]
        select: Option<String>,
    },

    /// Executes a raw SQL query (ad-hoc) with the project sources registered
    Query {
        sql: String,

        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        /// Maximum number of rows to print
        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// Cleans build artifacts (target/ folder)
    Clean {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,
    },
}

/// Overrides the environment-derived report verbosity.
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct Verbosity {
    /// Narrate every check
    #[arg(long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only the row count, failures and the summary
    #[arg(long)]
    pub quiet: bool,
}

impl Verbosity {
    pub fn resolve(self) -> Option<bool> {
        match (self.verbose, self.quiet) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

#[derive(Args, Debug)]
pub struct ValidateArgs {
    #[arg(long, default_value = ".")]
    pub project_dir: PathBuf,

    /// Model to validate: `table` or `schema.table`
    #[arg(long, short)]
    pub model: String,

    /// Validation type (not_null, unique, accepted_values, ...)
    #[arg(long = "type", short = 't')]
    pub rule_type: String,

    #[arg(long, short)]
    pub column: Option<String>,

    /// Rule parameter as key=value, the value is read as YAML (ex: values=[a, b])
    #[arg(long = "config", short = 'C', value_parser = parse_key_val)]
    pub config: Vec<(String, serde_yaml::Value)>,

    #[arg(long, default_value = "error", value_parser = parse_severity)]
    pub severity: RuleSeverity,

    /// Print the generated SQL and stop
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args, Debug)]
pub struct QualityArgs {
    #[arg(long, default_value = ".")]
    pub project_dir: PathBuf,

    #[arg(long, short)]
    pub model: String,

    /// Columns to check for nulls (comma separated or repeated)
    #[arg(long = "null-check", value_delimiter = ',')]
    pub null_checks: Vec<String>,

    #[arg(long)]
    pub duplicate_check: Option<String>,

    #[arg(long)]
    pub date_range_check: Option<String>,

    #[arg(long)]
    pub min_rows: Option<u64>,

    /// Null percentage at which a column fails
    #[arg(long, default_value = "5.0")]
    pub null_threshold: f64,

    #[command(flatten)]
    pub verbose: Verbosity,
}

fn parse_key_val(s: &str) -> Result<(String, serde_yaml::Value), String> {
    let (key, raw) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", s))?;
    let value = serde_yaml::from_str(raw).map_err(|e| format!("invalid value for '{}': {}", key, e))?;
    Ok((key.trim().to_string(), value))
}

fn parse_severity(s: &str) -> Result<RuleSeverity, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "error" => Ok(RuleSeverity::Error),
        "warn" | "warning" => Ok(RuleSeverity::Warn),
        other => Err(format!("unknown severity '{}', expected error or warn", other)),
    }
}

// tollgate/src/main.rs

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG=debug tollgate run ... for query timings
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            project_dir,
            select,
            dry_run,
            verbose,
        } => commands::run::execute(project_dir, select, dry_run, verbose).await,

        Commands::Validate(args) => commands::validate::execute(args).await,

        Commands::Quality(args) => commands::quality::execute(args).await,

        Commands::Compile {
            project_dir,
            select,
        } => commands::compile::execute(project_dir, select).await,

        Commands::Query {
            sql,
            project_dir,
            limit,
        } => commands::query::execute(project_dir, sql, limit).await,

        Commands::Clean { project_dir } => commands::clean::execute(project_dir),
    }
}

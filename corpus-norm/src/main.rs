//! corpus-norm - batch normalization of the CSJ and CWPC corpus tables
//!
//! Runs one job per invocation against the configured SQLite database and
//! prints a summary. Fatal errors exit non-zero with the cause.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use corpus_common::{ConfigSource, TomlConfig};
use corpus_norm::{BatchRunner, Job};
use std::path::PathBuf;
use tracing::{error, info};

/// Command-line arguments for corpus-norm
#[derive(Parser, Debug)]
#[command(name = "corpus-norm")]
#[command(about = "Speaker role resolution and attribute normalization for corpus tables")]
#[command(version)]
struct Args {
    /// TOML configuration file
    #[arg(short, long, env = "CORPUS_NORM_CONFIG")]
    config: Option<PathBuf>,

    /// SQLite database holding the corpus tables
    #[arg(short, long, env = "CORPUS_NORM_DATABASE")]
    database: Option<PathBuf>,

    /// Print the run report as JSON on stdout
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Command {
    /// Build CWPC utterances from verb context windows
    StitchUtterances,
    /// Assign CSJ speaker and interlocutor IDs from channel markers
    AssignSpeakerIds,
    /// Assign CSJ speaker and interlocutor demographics from channel markers
    ResolveChannelRoles,
    /// Assign CWPC interlocutors by elimination within two-person talks
    ResolveInterlocutors,
    /// Bucket CWPC raw ages into decade ranges
    AssignAgeRanges,
    /// Map CWPC occupations to category codes
    AssignOccupations,
    /// Create any missing corpus tables
    InitSchema,
}

impl Command {
    fn job(self) -> Option<Job> {
        match self {
            Command::StitchUtterances => Some(Job::StitchUtterances),
            Command::AssignSpeakerIds => Some(Job::AssignSpeakerIds),
            Command::ResolveChannelRoles => Some(Job::ResolveChannelRoles),
            Command::ResolveInterlocutors => Some(Job::ResolveInterlocutors),
            Command::AssignAgeRanges => Some(Job::AssignAgeRanges),
            Command::AssignOccupations => Some(Job::AssignOccupations),
            Command::InitSchema => None,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    let source = ConfigSource::locate(args.config.as_deref());
    let config = TomlConfig::from_source(&source);
    let level = config
        .as_ref()
        .map(|c| c.logging.level.clone())
        .unwrap_or_else(|_| "info".to_string());

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| level.as_str().into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e).context("Failed to load configuration");
        }
    };
    source.log();

    info!("Starting corpus-norm v{}", env!("CARGO_PKG_VERSION"));

    let db_path = config.database_path(args.database.as_deref());
    info!("Database path: {}", db_path.display());

    let Some(job) = args.command.job() else {
        let pool = corpus_common::db::connect_or_create(&db_path).await?;
        corpus_common::db::init_schema(&pool, &config.tables).await?;
        return Ok(());
    };

    let pool = match corpus_common::db::connect(&db_path).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(e.into());
        }
    };

    let runner = BatchRunner::new(pool, config.tables.clone());
    let report = match runner.run(job).await {
        Ok(report) => report,
        Err(e) => {
            error!(job = %job, "Job failed: {}", e);
            return Err(e).with_context(|| format!("{} aborted", job));
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}

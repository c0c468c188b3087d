mod bootstrap;
mod config;
mod paths;
mod services;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::bootstrap::bootstrap;
use crate::config::{AppConfig, CliOverrides};
use crate::services::content::LoopbackContentServer;

/// Folio daemon - background process for the Folio reading application
#[derive(Parser)]
#[command(name = "folio-server")]
#[command(about = "Folio daemon - background process for the Folio reading application")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// User-data directory override (overrides config)
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Storage adapter override (overrides config)
    #[arg(long)]
    adapter: Option<String>,

    /// Print effective configuration (JSON) and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the daemon
    Run,
    /// Validate configuration and the selected storage adapter, then exit
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(ref path) = cli.config {
        if !Path::new(path).is_file() {
            anyhow::bail!("config file does not exist: {}", path.display());
        }
    }

    // Layered config:
    // 1) defaults -> 2) YAML (if provided) -> 3) env (FOLIO__*) -> 4) CLI overrides
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&CliOverrides {
        data_dir: cli.data_dir.clone(),
        adapter: cli.adapter.clone(),
    });

    init_logging(&config, cli.verbose);
    tracing::info!("folio daemon starting");

    if cli.print_config {
        println!("{}", config.to_pretty()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_daemon(config).await,
        Commands::Check => check_config(config),
    }
}

/// `RUST_LOG` wins; otherwise `-v` count, otherwise the configured level,
/// otherwise warnings only.
fn init_logging(config: &AppConfig, verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(config.logging.level.as_deref().unwrap_or("warn"))
        }),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn check_config(config: AppConfig) -> Result<()> {
    // Selection is the fallible part: adapter names are validated against the
    // compiled-in registry without touching the filesystem.
    let registry = foliokit_store::AdapterRegistry::builtin();
    registry.select(config.adapter_name())?;

    println!("Configuration is valid");
    println!("{}", config.to_pretty()?);
    Ok(())
}

async fn run_daemon(config: AppConfig) -> Result<()> {
    let app = bootstrap(&config, Arc::new(LoopbackContentServer::default()))?;
    tracing::info!(
        bindings = app.container().len(),
        user_data_root = %app.paths().user_data_root.display(),
        "folio daemon ready"
    );

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutdown signal received");
    Ok(())
}

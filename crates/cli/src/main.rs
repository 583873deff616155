//! Async Race CLI - Main Entry Point
//!
//! Manage the garage, race cars and browse the winners table of an
//! Async Race backend from the terminal.

use std::path::PathBuf;

use anyhow::Context;
use async_race_client::{ApiClient, Garage};
use async_race_common::{config, Config};
use clap::{Parser, Subcommand};

use async_race_cli::commands::{config as config_cmd, engine, garage, race, shell, winners};
use async_race_cli::output::{self, print_error};

/// Async Race - garage, engines and winners from the terminal
#[derive(Parser)]
#[command(name = "async-race")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Backend address (overrides the config file)
    #[arg(long, env = "ASYNC_RACE_BASE_URL", global = true)]
    base_url: Option<String>,

    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: output::OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage cars in the garage
    #[command(subcommand)]
    Garage(garage::GarageCommands),

    /// Drive or stop a single car
    #[command(subcommand)]
    Engine(engine::EngineCommands),

    /// Race every car on a garage page
    Race(race::RaceArgs),

    /// Browse the winners table
    #[command(subcommand)]
    Winners(winners::WinnersCommands),

    /// Interactive session
    Shell(shell::ShellArgs),

    /// Check backend status
    Status,

    /// Show or create the configuration file
    #[command(subcommand)]
    Config(config_cmd::ConfigCommands),

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run(Cli::parse()).await {
        print_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .init();

    let config_path = cli.config.clone().unwrap_or_else(config::default_config_path);
    let mut config = Config::load(&config_path)
        .with_context(|| format!("Failed to load {}", config_path.display()))?;
    if let Some(base_url) = cli.base_url {
        config = config.with_base_url(base_url);
        config.validate()?;
    }

    match cli.command {
        Commands::Garage(cmd) => garage::execute(cmd, &mut connect(config)?, cli.format).await?,
        Commands::Engine(cmd) => engine::execute(cmd, &mut connect(config)?, cli.format).await?,
        Commands::Race(args) => race::execute(args, &mut connect(config)?, cli.format).await?,
        Commands::Winners(cmd) => winners::execute(cmd, &mut connect(config)?, cli.format).await?,
        Commands::Shell(args) => {
            let mut garage = connect(config)?;
            garage.refresh_garage().await?;
            shell::execute(args, &mut garage, cli.format).await?
        }
        Commands::Status => {
            let api = ApiClient::new(&config)?;
            if api.health_check().await {
                println!("✅ Backend is running at {}", api.base_url());
            } else {
                println!("❌ Backend is not responding at {}", api.base_url());
                std::process::exit(1);
            }
        }
        Commands::Config(cmd) => config_cmd::execute(cmd, &config, &config_path, cli.format)?,
        Commands::Version => {
            println!("Async Race CLI v{}", async_race_common::VERSION);
            println!("Backend: {}", config.base_url());
        }
    }

    Ok(())
}

fn connect(config: Config) -> anyhow::Result<Garage> {
    let api = ApiClient::new(&config)?;
    Ok(Garage::new(api, config))
}

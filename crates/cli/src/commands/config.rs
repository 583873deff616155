//! Config Commands

use std::path::Path;

use anyhow::{bail, Context, Result};
use async_race_common::Config;
use clap::Subcommand;

use crate::output::{print_success, print_value, OutputFormat};

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,

    /// Write a configuration file with default settings
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

pub fn execute(cmd: ConfigCommands, config: &Config, path: &Path, format: OutputFormat) -> Result<()> {
    match cmd {
        ConfigCommands::Show => {
            print_value(config, format, |config| {
                println!("# {}", path.display());
                match toml::to_string_pretty(config) {
                    Ok(text) => print!("{}", text),
                    Err(e) => crate::output::print_error(&format!("Failed to encode config: {}", e)),
                }
            });
        }

        ConfigCommands::Init { force } => {
            if path.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", path.display());
            }
            Config::default()
                .save(path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            print_success(&format!("Wrote default configuration to {}", path.display()));
        }
    }
    Ok(())
}

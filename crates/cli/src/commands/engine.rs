//! Engine Commands

use anyhow::Result;
use async_race_client::{Garage, RaceEvents};
use async_race_common::{millis_to_secs, CarId};
use clap::Subcommand;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::output::{print_success, print_value, print_warning, OutputFormat};

#[derive(Subcommand)]
pub enum EngineCommands {
    /// Start a car's engine and drive it down the track
    Start {
        /// Car ID
        id: u64,
    },

    /// Stop a car's engine and return it to the start
    Stop {
        /// Car ID
        id: u64,
    },
}

pub async fn execute(cmd: EngineCommands, garage: &mut Garage, format: OutputFormat) -> Result<()> {
    match cmd {
        EngineCommands::Start { id } => drive(garage, id, format).await?,
        EngineCommands::Stop { id } => {
            garage.stop_car(id, &RaceEvents::none()).await?;
            print_success(&format!("Engine of car {} stopped", id));
        }
    }
    Ok(())
}

/// Drive one car with a spinner while the backend decides the outcome
pub async fn drive(garage: &Garage, id: CarId, format: OutputFormat) -> Result<()> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!("car {} driving", id));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = garage.start_car(id, &RaceEvents::none()).await;
    spinner.finish_and_clear();

    let outcome = result?;
    print_value(&outcome, format, |outcome| {
        let secs = millis_to_secs(outcome.time_ms);
        if outcome.success {
            print_success(&format!("Car {} reached the finish in {}sec", outcome.id, secs));
        } else {
            print_warning(&format!("Car {} broke down on the way", outcome.id));
        }
    });
    Ok(())
}

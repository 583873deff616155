//! Garage Commands

use anyhow::Result;
use async_race_client::Garage;
use clap::Subcommand;
use indicatif::{ProgressBar, ProgressStyle};

use crate::output::{print_item, print_success, OutputFormat};
use crate::views::{render_garage, CarDisplay};

#[derive(Subcommand)]
pub enum GarageCommands {
    /// List one page of cars
    List {
        /// Page number (1-based)
        #[arg(short, long, default_value = "1")]
        page: u32,
    },

    /// Get car details
    Get {
        /// Car ID
        id: u64,
    },

    /// Add a car to the garage
    Create {
        /// Car name
        #[arg(short, long)]
        name: String,

        /// Car color (#rrggbb)
        #[arg(short, long, default_value = "#000000")]
        color: String,
    },

    /// Rename or repaint a car
    Update {
        /// Car ID
        id: u64,

        /// New name (keeps the current one when omitted)
        #[arg(short, long)]
        name: Option<String>,

        /// New color (keeps the current one when omitted)
        #[arg(short, long)]
        color: Option<String>,
    },

    /// Remove a car and its winners record
    Delete {
        /// Car ID
        id: u64,
    },

    /// Fill the garage with random cars
    Generate {
        /// Number of cars (defaults to the configured amount)
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },
}

pub async fn execute(cmd: GarageCommands, garage: &mut Garage, format: OutputFormat) -> Result<()> {
    match cmd {
        GarageCommands::List { page } => {
            garage.go_to(page).await?;
            render_garage(garage.session(), format);
        }

        GarageCommands::Get { id } => {
            let car = garage.select_car(id).await?;
            print_item(&CarDisplay::from(&car), format);
        }

        GarageCommands::Create { name, color } => {
            let car = garage.create_car(&name, &color).await?;
            print_success(&format!("Car '{}' created", car.name));
            print_item(&CarDisplay::from(&car), format);
        }

        GarageCommands::Update { id, name, color } => {
            let current = garage.select_car(id).await?;
            let name = name.unwrap_or(current.name);
            let color = color.unwrap_or(current.color);
            let car = garage.update_car(id, &name, &color).await?;
            print_success(&format!("Car {} updated", car.id));
            print_item(&CarDisplay::from(&car), format);
        }

        GarageCommands::Delete { id } => {
            garage.remove_car(id).await?;
            print_success(&format!("Car {} removed", id));
        }

        GarageCommands::Generate { count } => {
            let count = count.unwrap_or(garage.config().generate_count);
            let created = generate(garage, count).await?;
            print_success(&format!("Generated {} cars", created));
            render_garage(garage.session(), format);
        }
    }

    Ok(())
}

/// Generate random cars behind a progress bar; returns how many were created
pub async fn generate(garage: &mut Garage, count: usize) -> Result<usize> {
    let bar = ProgressBar::new(count as u64);
    bar.set_style(
        ProgressStyle::with_template("{spinner} generating [{bar:30}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );

    let result = garage
        .generate_cars(count, |car| {
            bar.set_message(car.name.clone());
            bar.inc(1);
        })
        .await;

    match result {
        Ok(cars) => {
            bar.finish_and_clear();
            Ok(cars.len())
        }
        Err(e) => {
            bar.abandon();
            Err(e.into())
        }
    }
}

//! Winners Commands

use anyhow::Result;
use async_race_client::Garage;
use async_race_common::{SortField, SortOrder, View, WinnersSort};
use clap::{Subcommand, ValueEnum};
use serde::Serialize;

use crate::output::{print_item, print_success, OutputFormat, TableDisplay};
use crate::views::render_winners;

/// Sort column as accepted on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortArg {
    Wins,
    Time,
}

impl From<SortArg> for SortField {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Wins => SortField::Wins,
            SortArg::Time => SortField::Time,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OrderArg {
    Asc,
    Desc,
}

impl From<OrderArg> for SortOrder {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::Asc => SortOrder::Asc,
            OrderArg::Desc => SortOrder::Desc,
        }
    }
}

#[derive(Subcommand)]
pub enum WinnersCommands {
    /// List one page of the winners table
    List {
        /// Page number (1-based)
        #[arg(short, long, default_value = "1")]
        page: u32,

        /// Sort column
        #[arg(short, long, value_enum, default_value = "time")]
        sort: SortArg,

        /// Sort direction
        #[arg(short, long, value_enum, default_value = "asc")]
        order: OrderArg,
    },

    /// Show the record of one car
    Get {
        /// Car ID
        id: u64,
    },

    /// Delete the record of one car
    Delete {
        /// Car ID
        id: u64,
    },
}

#[derive(Serialize)]
struct RecordDisplay {
    id: u64,
    wins: u32,
    time: f64,
}

impl TableDisplay for RecordDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["Car ID", "Wins", "Best time (sec)"]
    }

    fn row(&self) -> Vec<String> {
        vec![self.id.to_string(), self.wins.to_string(), format!("{:.2}", self.time)]
    }
}

pub async fn execute(cmd: WinnersCommands, garage: &mut Garage, format: OutputFormat) -> Result<()> {
    match cmd {
        WinnersCommands::List { page, sort, order } => {
            garage.set_sort(WinnersSort::new(sort.into(), order.into()));
            garage.show(View::Winners).await?;
            if page > 1 {
                garage.go_to(page).await?;
            }
            render_winners(garage.session(), format);
        }

        WinnersCommands::Get { id } => {
            let record = garage
                .api()
                .get_winner(id)
                .await?
                .ok_or_else(|| anyhow::anyhow!("Car {} has no wins yet", id))?;
            print_item(
                &RecordDisplay {
                    id: record.id,
                    wins: record.wins,
                    time: record.time,
                },
                format,
            );
        }

        WinnersCommands::Delete { id } => {
            garage.api().delete_winner(id).await?;
            print_success(&format!("Winners record for car {} deleted", id));
        }
    }

    Ok(())
}

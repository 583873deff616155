//! Race Commands

use anyhow::Result;
use async_race_client::{Garage, RaceError, RaceEvents};
use async_race_common::{RaceWinner, WinnerRecord};
use clap::Args;
use colored::Colorize;
use serde::Serialize;

use crate::board::RaceBoard;
use crate::output::{print_info, print_value, print_warning, OutputFormat};

#[derive(Args)]
pub struct RaceArgs {
    /// Garage page whose cars take part
    #[arg(short, long, default_value = "1")]
    pub page: u32,

    /// Leave engines running instead of stopping them after the race
    #[arg(long)]
    pub no_reset: bool,
}

#[derive(Serialize)]
struct RaceReport<'a> {
    winner: &'a RaceWinner,
    record: &'a WinnerRecord,
}

pub async fn execute(args: RaceArgs, garage: &mut Garage, format: OutputFormat) -> Result<()> {
    garage.go_to(args.page).await?;
    run(garage, format).await?;
    if !args.no_reset {
        garage.reset(&RaceEvents::none()).await?;
    }
    Ok(())
}

/// Race the current garage page, showing a live board for humans
pub async fn run(garage: &mut Garage, format: OutputFormat) -> Result<Option<RaceWinner>> {
    if garage.session().cars().is_empty() {
        print_warning("No cars in the garage to race");
        return Ok(None);
    }

    let (events, board) = match format {
        OutputFormat::Table | OutputFormat::Plain => {
            let (events, rx) = RaceEvents::channel();
            let board = RaceBoard::new(garage.session().cars());
            let progress = board.progress();
            (events, Some((progress, board.spawn(rx))))
        }
        OutputFormat::Json | OutputFormat::Yaml => (RaceEvents::none(), None),
    };

    let result = garage.race(events).await;
    let outcome = match &board {
        Some((progress, _)) => progress.suspend(|| report(result, format)),
        None => report(result, format),
    };

    // Losing cars are still on the track; let the board play out
    if let Some((_, handle)) = board {
        let _ = handle.await;
    }
    outcome
}

fn report(
    result: Result<(RaceWinner, WinnerRecord), RaceError>,
    format: OutputFormat,
) -> Result<Option<RaceWinner>> {
    match result {
        Ok((winner, record)) => {
            let report = RaceReport {
                winner: &winner,
                record: &record,
            };
            print_value(&report, format, |report| {
                println!(
                    "🏆 {}",
                    format!("winner: {} - {}sec", report.winner.car.name, report.winner.time_secs)
                        .green()
                        .bold()
                );
                print_info(&format!(
                    "{} now has {} win(s), best time {}sec",
                    report.winner.car.name, report.record.wins, report.record.time
                ));
            });
            Ok(Some(winner))
        }
        Err(RaceError::NoFinisher) => {
            print_warning("Every car broke down, nobody won");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

//! Winners table bookkeeping

use async_race_common::{RaceWinner, WinnerRecord};
use tracing::info;

use crate::api::ApiClient;
use crate::error::ClientResult;

/// Record a race result: a first win creates the row, later wins bump the
/// tally and keep the best time.
pub async fn save_winner(api: &ApiClient, winner: &RaceWinner) -> ClientResult<WinnerRecord> {
    let id = winner.car.id;
    let record = match api.get_winner(id).await? {
        None => {
            let record = WinnerRecord::first(id, winner.time_secs);
            api.create_winner(&record).await?;
            record
        }
        Some(existing) => {
            let record = existing.with_win(winner.time_secs);
            api.update_winner(&record).await?;
            record
        }
    };
    info!(id, wins = record.wins, best = record.time, "Saved winner '{}'", winner.car.name);
    Ok(record)
}

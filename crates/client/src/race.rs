//! Race orchestration
//!
//! Every car on the grid gets its own task that starts the engine and then
//! drives it. [`race_all`] waits on those tasks in completion order: a car
//! that breaks down is dropped from the race and the remaining cars keep
//! going, and the first car whose drive succeeds wins. Cars still on the
//! track when the winner is known are left to finish in the background, the
//! same way they keep moving on screen until the race is reset.

use std::sync::Arc;

use async_race_common::{Car, CarId, DriveOutcome, EngineParams, RaceWinner};
use async_trait::async_trait;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::api::ApiClient;
use crate::error::{ClientError, ClientResult, RaceError};

/// Engine endpoint operations the race needs
#[async_trait]
pub trait EngineControl: Send + Sync {
    async fn start_engine(&self, id: CarId) -> ClientResult<EngineParams>;

    /// `Ok(true)` when the car reached the finish line, `Ok(false)` when it broke down
    async fn drive(&self, id: CarId) -> ClientResult<bool>;

    async fn stop_engine(&self, id: CarId) -> ClientResult<EngineParams>;
}

#[async_trait]
impl EngineControl for ApiClient {
    async fn start_engine(&self, id: CarId) -> ClientResult<EngineParams> {
        ApiClient::start_engine(self, id).await
    }

    async fn drive(&self, id: CarId) -> ClientResult<bool> {
        ApiClient::drive(self, id).await
    }

    async fn stop_engine(&self, id: CarId) -> ClientResult<EngineParams> {
        ApiClient::stop_engine(self, id).await
    }
}

/// Progress of individual cars during a race
#[derive(Debug, Clone, PartialEq)]
pub enum RaceEvent {
    /// Engine is running; the car needs `time_ms` to cover the track
    Started { id: CarId, time_ms: u64 },
    BrokeDown { id: CarId },
    Finished { id: CarId },
    Stopped { id: CarId },
    /// The car could not take part (engine start or transport failure)
    Failed { id: CarId, reason: String },
}

impl RaceEvent {
    pub fn car_id(&self) -> CarId {
        match self {
            RaceEvent::Started { id, .. }
            | RaceEvent::BrokeDown { id }
            | RaceEvent::Finished { id }
            | RaceEvent::Stopped { id }
            | RaceEvent::Failed { id, .. } => *id,
        }
    }
}

/// Optional sink for [`RaceEvent`]s
#[derive(Debug, Clone, Default)]
pub struct RaceEvents {
    tx: Option<UnboundedSender<RaceEvent>>,
}

impl RaceEvents {
    /// Discard all events
    pub fn none() -> Self {
        Self::default()
    }

    pub fn channel() -> (Self, UnboundedReceiver<RaceEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx: Some(tx) }, rx)
    }

    fn emit(&self, event: RaceEvent) {
        if let Some(tx) = &self.tx {
            // Receiver may have gone away once the winner was shown
            let _ = tx.send(event);
        }
    }
}

/// Start one car's engine and drive it to the end of the track.
///
/// A breakdown is a normal outcome (`success == false`); errors are reserved
/// for the engine refusing to start or the backend being unreachable.
pub async fn start_driving<E: EngineControl + ?Sized>(
    engine: &E,
    id: CarId,
    events: &RaceEvents,
) -> ClientResult<DriveOutcome> {
    let params = engine.start_engine(id).await?;
    let time_ms = params.travel_time_ms().ok_or(ClientError::InvalidEngine {
        id,
        velocity: params.velocity,
        distance: params.distance,
    })?;
    events.emit(RaceEvent::Started { id, time_ms });
    debug!(id, time_ms, "Engine started");

    let success = engine.drive(id).await?;
    if success {
        events.emit(RaceEvent::Finished { id });
    } else {
        events.emit(RaceEvent::BrokeDown { id });
    }
    Ok(DriveOutcome { id, time_ms, success })
}

/// Stop a car's engine and return it to the start line
pub async fn stop_driving<E: EngineControl + ?Sized>(
    engine: &E,
    id: CarId,
    events: &RaceEvents,
) -> ClientResult<EngineParams> {
    let params = engine.stop_engine(id).await?;
    events.emit(RaceEvent::Stopped { id });
    debug!(id, "Engine stopped");
    Ok(params)
}

/// [`start_driving`] for a race entrant: any error takes the car out of the race
async fn drive_or_forfeit<E: EngineControl + ?Sized>(
    engine: &E,
    id: CarId,
    events: &RaceEvents,
) -> DriveOutcome {
    match start_driving(engine, id, events).await {
        Ok(outcome) => outcome,
        Err(e) => {
            warn!(id, "Car dropped out: {}", e);
            events.emit(RaceEvent::Failed {
                id,
                reason: e.to_string(),
            });
            DriveOutcome {
                id,
                time_ms: 0,
                success: false,
            }
        }
    }
}

/// Wait for the first successful drive among `drives`.
///
/// Failed drives are removed and the rest keep racing. Drives still in
/// flight once a winner is found are detached, not cancelled.
pub async fn race_all(mut drives: JoinSet<DriveOutcome>) -> Result<DriveOutcome, RaceError> {
    while let Some(joined) = drives.join_next().await {
        match joined {
            Ok(outcome) if outcome.success => {
                drives.detach_all();
                return Ok(outcome);
            }
            Ok(outcome) => {
                debug!(id = outcome.id, remaining = drives.len(), "Car out of the race");
            }
            Err(e) => {
                warn!(remaining = drives.len(), "Drive task failed: {}", e);
            }
        }
    }
    Err(RaceError::NoFinisher)
}

/// Race every car in `cars` and return the first to finish
pub async fn race<E>(engine: Arc<E>, cars: &[Car], events: RaceEvents) -> Result<RaceWinner, RaceError>
where
    E: EngineControl + ?Sized + 'static,
{
    info!("Starting race with {} cars", cars.len());

    let mut drives = JoinSet::new();
    for car in cars {
        let engine = Arc::clone(&engine);
        let events = events.clone();
        let id = car.id;
        drives.spawn(async move { drive_or_forfeit(engine.as_ref(), id, &events).await });
    }

    let outcome = race_all(drives).await?;
    let car = cars
        .iter()
        .find(|car| car.id == outcome.id)
        .cloned()
        .ok_or(RaceError::UnknownCar(outcome.id))?;

    let winner = RaceWinner::new(car, outcome.time_ms);
    info!(id = winner.car.id, "Winner: {} in {}s", winner.car.name, winner.time_secs);
    Ok(winner)
}

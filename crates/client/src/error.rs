//! Error types for the REST client and race orchestration

use async_race_common::CarId;
use thiserror::Error;

/// Errors talking to the garage/engine/winners backend
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Resource not found: {kind} with id {id}")]
    NotFound { kind: &'static str, id: CarId },

    #[error("Invalid engine parameters for car {id}: velocity {velocity}, distance {distance}")]
    InvalidEngine { id: CarId, velocity: f64, distance: f64 },

    #[error("Invalid X-Total-Count header: {0}")]
    InvalidTotal(String),

    #[error(transparent)]
    Common(#[from] async_race_common::Error),
}

impl ClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound { .. })
    }
}

/// Errors ending a race without a winner
#[derive(Error, Debug)]
pub enum RaceError {
    #[error("No car finished the race")]
    NoFinisher,

    #[error("Winning car {0} is not on the grid")]
    UnknownCar(CarId),

    #[error(transparent)]
    Client(#[from] ClientError),
}

pub type ClientResult<T> = Result<T, ClientError>;

//! Async Race Client
//!
//! REST client for the garage/engine/winners backend, race orchestration and
//! the [`Garage`] controller that ties both to the pagination state in
//! [`async_race_common::Session`].

pub mod api;
pub mod error;
pub mod garage;
pub mod race;
pub mod winners;

pub use api::ApiClient;
pub use error::{ClientError, ClientResult, RaceError};
pub use garage::Garage;
pub use race::{race, race_all, start_driving, stop_driving, EngineControl, RaceEvent, RaceEvents};
pub use winners::save_winner;

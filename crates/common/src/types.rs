//! Core types for Async Race

use serde::{Deserialize, Serialize};

/// Identifier assigned to a car by the garage backend
pub type CarId = u64;

/// A car stored in the garage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Car {
    pub id: CarId,
    pub name: String,
    pub color: String,
}

/// Body for creating or updating a car
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCar {
    pub name: String,
    pub color: String,
}

impl NewCar {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
        }
    }
}

impl From<Car> for NewCar {
    fn from(car: Car) -> Self {
        Self {
            name: car.name,
            color: car.color,
        }
    }
}

/// Engine parameters returned when an engine is started or stopped
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineParams {
    pub velocity: f64,
    pub distance: f64,
}

impl EngineParams {
    /// Nominal time to cover the track, in whole milliseconds.
    ///
    /// Returns `None` for a stopped engine (zero velocity) or nonsense values.
    pub fn travel_time_ms(&self) -> Option<u64> {
        if self.velocity.is_nan() || self.velocity <= 0.0 || !self.distance.is_finite() || self.distance < 0.0 {
            return None;
        }
        let time = (self.distance / self.velocity).round();
        time.is_finite().then_some(time as u64)
    }
}

/// Engine status values accepted by the engine endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineStatus {
    Started,
    Stopped,
    Drive,
}

/// Stored winners row, keyed by car id
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WinnerRecord {
    pub id: CarId,
    pub wins: u32,
    pub time: f64,
}

impl WinnerRecord {
    /// Record for a car's first win
    pub fn first(id: CarId, time: f64) -> Self {
        Self { id, wins: 1, time }
    }

    /// Record after one more win: the tally grows and the best time is kept
    pub fn with_win(self, time: f64) -> Self {
        Self {
            id: self.id,
            wins: self.wins + 1,
            time: if time < self.time { time } else { self.time },
        }
    }
}

/// A winners row joined with the car it belongs to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Winner {
    pub id: CarId,
    pub wins: u32,
    pub time: f64,
    /// `None` when the car has since been removed from the garage
    pub car: Option<Car>,
}

impl Winner {
    pub fn new(record: WinnerRecord, car: Option<Car>) -> Self {
        Self {
            id: record.id,
            wins: record.wins,
            time: record.time,
            car,
        }
    }
}

/// Column the winners table is sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Wins,
    #[default]
    Time,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Wins => "wins",
            SortField::Time => "time",
        }
    }
}

impl std::fmt::Display for SortField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SortField {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "wins" => Ok(SortField::Wins),
            "time" => Ok(SortField::Time),
            other => Err(crate::Error::Validation(format!("unknown sort field: {other}"))),
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SortOrder {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(crate::Error::Validation(format!("unknown sort order: {other}"))),
        }
    }
}

/// Sort applied to the winners listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WinnersSort {
    pub field: SortField,
    pub order: SortOrder,
}

impl WinnersSort {
    pub fn new(field: SortField, order: SortOrder) -> Self {
        Self { field, order }
    }
}

/// One page of a listing plus the total item count reported by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64) -> Self {
        Self { items, total }
    }
}

/// Result of driving a single car down the track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriveOutcome {
    pub id: CarId,
    pub time_ms: u64,
    pub success: bool,
}

/// The first car to finish a race
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceWinner {
    pub car: Car,
    /// Seconds, rounded to two decimals
    pub time_secs: f64,
}

impl RaceWinner {
    pub fn new(car: Car, time_ms: u64) -> Self {
        Self {
            car,
            time_secs: millis_to_secs(time_ms),
        }
    }
}

/// Convert milliseconds to seconds rounded to two decimals.
///
/// Halves round up on the hundredth (4565 ms is 4.57), where formatting the
/// float `4.565` directly would give 4.56.
pub fn millis_to_secs(ms: u64) -> f64 {
    (ms as f64 / 10.0).round() / 100.0
}

/// Which listing the session is looking at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    #[default]
    Garage,
    Winners,
}

impl std::fmt::Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            View::Garage => write!(f, "garage"),
            View::Winners => write!(f, "winners"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(500.0, 64.0, Some(8) ; "rounds up")]
    #[test_case(500.0, 60.0, Some(8) ; "rounds down")]
    #[test_case(500_000.0, 100.0, Some(5000) ; "exact")]
    #[test_case(500_000.0, 0.0, None ; "stopped engine")]
    #[test_case(f64::NAN, 50.0, None ; "nan distance")]
    fn test_travel_time(distance: f64, velocity: f64, expected: Option<u64>) {
        let params = EngineParams { velocity, distance };
        assert_eq!(params.travel_time_ms(), expected);
    }

    #[test]
    fn test_millis_to_secs_rounds_to_hundredths() {
        assert_eq!(millis_to_secs(4567), 4.57);
        assert_eq!(millis_to_secs(4564), 4.56);
        assert_eq!(millis_to_secs(4565), 4.57);
        assert_eq!(millis_to_secs(0), 0.0);
    }

    #[test]
    fn test_winner_record_keeps_best_time() {
        let record = WinnerRecord::first(3, 4.2);
        let slower = record.with_win(5.0);
        assert_eq!(slower.wins, 2);
        assert_eq!(slower.time, 4.2);

        let faster = slower.with_win(3.1);
        assert_eq!(faster.wins, 3);
        assert_eq!(faster.time, 3.1);
    }

    #[test]
    fn test_car_wire_format() {
        let car: Car = serde_json::from_str(r##"{"id":1,"name":"Tesla","color":"#e6e6fa"}"##).unwrap();
        assert_eq!(car.id, 1);
        assert_eq!(car.name, "Tesla");

        let body = serde_json::to_value(NewCar::from(car)).unwrap();
        assert_eq!(body, serde_json::json!({"name": "Tesla", "color": "#e6e6fa"}));
    }

    #[test]
    fn test_sort_parsing() {
        assert_eq!("WINS".parse::<SortField>().unwrap(), SortField::Wins);
        assert_eq!("desc".parse::<SortOrder>().unwrap(), SortOrder::Desc);
        assert!("speed".parse::<SortField>().is_err());
        assert_eq!(SortOrder::Asc.flipped(), SortOrder::Desc);
    }
}

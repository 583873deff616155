//! Live race board: one progress bar per car
//!
//! Bars advance on the nominal travel time reported when the engine starts,
//! then freeze on a breakdown or complete when the backend confirms the
//! finish.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_race_client::RaceEvent;
use async_race_common::{Car, CarId};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;

const TICK: Duration = Duration::from_millis(50);

/// Track length in bar units
const TRACK: u64 = 1000;

struct Lane {
    bar: ProgressBar,
    started: Option<(Instant, u64)>,
    done: bool,
}

impl Lane {
    fn position(&self) -> u64 {
        match self.started {
            Some((at, time_ms)) if time_ms > 0 => {
                let elapsed = at.elapsed().as_millis() as u64;
                (elapsed.saturating_mul(TRACK) / time_ms).min(TRACK - 1)
            }
            _ => 0,
        }
    }
}

/// Progress bars for every car on the grid
pub struct RaceBoard {
    multi: MultiProgress,
    lanes: HashMap<CarId, Lane>,
}

impl RaceBoard {
    pub fn new(cars: &[Car]) -> Self {
        let multi = MultiProgress::new();
        let style = ProgressStyle::with_template("{prefix:>24} |{bar:50}| {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉ ");
        let width = cars.iter().map(|car| car.name.chars().count()).max().unwrap_or(0).min(24);

        let lanes = cars
            .iter()
            .map(|car| {
                let bar = multi.add(ProgressBar::new(TRACK));
                bar.set_style(style.clone());
                let name: String = car.name.chars().take(width).collect();
                bar.set_prefix(name);
                bar.set_message("waiting");
                (
                    car.id,
                    Lane {
                        bar,
                        started: None,
                        done: false,
                    },
                )
            })
            .collect();

        Self { multi, lanes }
    }

    /// Handle for printing above the bars while they are drawn
    pub fn progress(&self) -> MultiProgress {
        self.multi.clone()
    }

    /// Whether every car has either finished, broken down or dropped out
    pub fn settled(&self) -> bool {
        self.lanes.values().all(|lane| lane.done)
    }

    pub fn apply(&mut self, event: &RaceEvent) {
        let Some(lane) = self.lanes.get_mut(&event.car_id()) else {
            return;
        };
        match event {
            RaceEvent::Started { time_ms, .. } => {
                lane.started = Some((Instant::now(), *time_ms));
                lane.bar.set_message(format!("{:.2}s", *time_ms as f64 / 1000.0));
            }
            RaceEvent::Finished { .. } => {
                lane.done = true;
                lane.bar.set_position(TRACK);
                lane.bar.finish_with_message("🏁 finished");
            }
            RaceEvent::BrokeDown { .. } => {
                lane.done = true;
                lane.bar.set_position(lane.position());
                lane.bar.abandon_with_message("💥 engine broke down");
            }
            RaceEvent::Failed { reason, .. } => {
                lane.done = true;
                lane.bar.abandon_with_message(format!("❌ {}", reason));
            }
            RaceEvent::Stopped { .. } => {
                lane.done = true;
                lane.started = None;
                lane.bar.set_position(0);
                lane.bar.abandon_with_message("stopped");
            }
        }
    }

    fn tick(&self) {
        for lane in self.lanes.values().filter(|lane| !lane.done) {
            lane.bar.set_position(lane.position());
        }
    }

    /// Drive the board from `events` until every car is settled or the
    /// senders are gone
    pub fn spawn(mut self, mut events: UnboundedReceiver<RaceEvent>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(TICK);
            while !self.settled() {
                tokio::select! {
                    event = events.recv() => match event {
                        Some(event) => self.apply(&event),
                        None => break,
                    },
                    _ = ticker.tick() => self.tick(),
                }
            }
            for lane in self.lanes.values().filter(|lane| !lane.done) {
                lane.bar.abandon();
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cars() -> Vec<Car> {
        vec![
            Car {
                id: 1,
                name: "BMW XT6".to_string(),
                color: "#ffffff".to_string(),
            },
            Car {
                id: 2,
                name: "Audi 94".to_string(),
                color: "#000000".to_string(),
            },
        ]
    }

    #[test]
    fn test_board_settles_when_every_car_resolves() {
        let mut board = RaceBoard::new(&cars());
        assert!(!board.settled());

        board.apply(&RaceEvent::Started { id: 1, time_ms: 1000 });
        board.apply(&RaceEvent::Finished { id: 1 });
        assert!(!board.settled());

        board.apply(&RaceEvent::BrokeDown { id: 2 });
        assert!(board.settled());
    }

    #[test]
    fn test_unknown_car_is_ignored() {
        let mut board = RaceBoard::new(&cars());
        board.apply(&RaceEvent::Finished { id: 99 });
        assert!(!board.settled());
    }

    #[tokio::test]
    async fn test_board_stops_when_senders_drop() {
        let (events, rx) = async_race_client::RaceEvents::channel();
        let board = RaceBoard::new(&cars());
        let handle = board.spawn(rx);
        drop(events);
        handle.await.unwrap();
    }
}

//! Garage controller
//!
//! Glues the REST client to the session state: every action that changes the
//! backend refetches the page it affects, and navigation only fetches when the
//! page actually moved.

use std::sync::Arc;

use async_race_common::{
    generator, Car, CarId, Config, DriveOutcome, NewCar, RaceWinner, Session, SortField, View,
    WinnerRecord, WinnersSort,
};
use futures::future::join_all;
use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use crate::api::ApiClient;
use crate::error::{ClientError, ClientResult, RaceError};
use crate::race::{self, RaceEvents};
use crate::winners::save_winner;

/// Concurrent create requests while generating cars
const GENERATE_CONCURRENCY: usize = 16;

/// Stateful front end over the backend: current view, pages and sort
pub struct Garage {
    api: Arc<ApiClient>,
    session: Session,
    config: Config,
}

impl Garage {
    pub fn new(api: ApiClient, config: Config) -> Self {
        Self {
            api: Arc::new(api),
            session: Session::new(&config),
            config,
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Fetch the current garage page, stepping back once if it vanished
    pub async fn refresh_garage(&mut self) -> ClientResult<()> {
        let page = self
            .api
            .get_cars(self.session.garage_page(), self.session.garage_limit())
            .await?;
        if self.session.apply_garage(page) {
            debug!(page = self.session.garage_page(), "Garage page moved back");
            let page = self
                .api
                .get_cars(self.session.garage_page(), self.session.garage_limit())
                .await?;
            self.session.apply_garage(page);
        }
        Ok(())
    }

    /// Fetch the current winners page with the current sort
    pub async fn refresh_winners(&mut self) -> ClientResult<()> {
        let page = self
            .api
            .get_winners(
                self.session.winners_page(),
                self.session.winners_limit(),
                Some(self.session.sort()),
            )
            .await?;
        if self.session.apply_winners(page) {
            debug!(page = self.session.winners_page(), "Winners page moved back");
            let page = self
                .api
                .get_winners(
                    self.session.winners_page(),
                    self.session.winners_limit(),
                    Some(self.session.sort()),
                )
                .await?;
            self.session.apply_winners(page);
        }
        Ok(())
    }

    async fn refresh_current(&mut self) -> ClientResult<()> {
        match self.session.view() {
            View::Garage => self.refresh_garage().await,
            View::Winners => self.refresh_winners().await,
        }
    }

    /// Next page of the current view; `false` when already on the last page
    pub async fn next(&mut self) -> ClientResult<bool> {
        if !self.session.next_page() {
            return Ok(false);
        }
        self.refresh_current().await?;
        Ok(true)
    }

    /// Previous page of the current view; `false` when already on the first page
    pub async fn prev(&mut self) -> ClientResult<bool> {
        if !self.session.prev_page() {
            return Ok(false);
        }
        self.refresh_current().await?;
        Ok(true)
    }

    /// Jump to a page of the current view
    pub async fn go_to(&mut self, page: u32) -> ClientResult<u32> {
        // Counts may be stale; fetch first so clamping sees the real total
        self.refresh_current().await?;
        let before = self.session.page(self.session.view());
        let page = self.session.go_to_page(page);
        if page != before {
            self.refresh_current().await?;
        }
        Ok(page)
    }

    /// Switch views; the winners table is refetched every time it is shown
    pub async fn show(&mut self, view: View) -> ClientResult<()> {
        self.session.switch_view(view);
        if view == View::Winners {
            self.refresh_winners().await?;
        }
        Ok(())
    }

    /// Set the winners sort without fetching
    pub fn set_sort(&mut self, sort: WinnersSort) {
        self.session.set_sort(sort);
    }

    /// Sort the winners table by `field`, flipping the order
    pub async fn sort_by(&mut self, field: SortField) -> ClientResult<()> {
        self.session.toggle_sort(field);
        self.refresh_winners().await
    }

    pub async fn create_car(&mut self, name: &str, color: &str) -> ClientResult<Car> {
        let name = name.trim();
        if name.is_empty() {
            return Err(async_race_common::Error::Validation("enter car name".to_string()).into());
        }
        let car = self.api.create_car(&NewCar::new(name, color)).await?;
        info!(id = car.id, "Created car '{}'", car.name);
        self.refresh_garage().await?;
        Ok(car)
    }

    /// Load a car for editing
    pub async fn select_car(&self, id: CarId) -> ClientResult<Car> {
        self.api.get_car(id).await
    }

    pub async fn update_car(&mut self, id: CarId, name: &str, color: &str) -> ClientResult<Car> {
        let name = name.trim();
        if name.is_empty() {
            return Err(async_race_common::Error::Validation("enter car name".to_string()).into());
        }
        let car = self.api.update_car(id, &NewCar::new(name, color)).await?;
        info!(id, "Updated car '{}'", car.name);
        self.refresh_garage().await?;
        Ok(car)
    }

    /// Remove a car together with its winners row
    pub async fn remove_car(&mut self, id: CarId) -> ClientResult<()> {
        self.api.delete_car(id).await?;
        match self.api.delete_winner(id).await {
            Ok(()) => debug!(id, "Removed winners row"),
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e),
        }
        info!(id, "Removed car");
        self.refresh_garage().await
    }

    /// Create `count` random cars, calling `on_created` as each one lands
    pub async fn generate_cars<F>(&mut self, count: usize, mut on_created: F) -> ClientResult<Vec<Car>>
    where
        F: FnMut(&Car),
    {
        let api = Arc::clone(&self.api);
        let mut pending = stream::iter(generator::generate_cars(count))
            .map(|car| {
                let api = Arc::clone(&api);
                async move { api.create_car(&car).await }
            })
            .buffer_unordered(GENERATE_CONCURRENCY);

        let mut created = Vec::with_capacity(count);
        while let Some(result) = pending.next().await {
            let car = result?;
            on_created(&car);
            created.push(car);
        }
        info!("Generated {} cars", created.len());
        self.refresh_garage().await?;
        Ok(created)
    }

    /// Race the cars on the current garage page and record the winner
    pub async fn race(&mut self, events: RaceEvents) -> Result<(RaceWinner, WinnerRecord), RaceError> {
        let cars = self.session.cars().to_vec();
        let winner = race::race(Arc::clone(&self.api), &cars, events).await?;
        let record = save_winner(&self.api, &winner).await?;
        self.refresh_winners().await?;
        Ok((winner, record))
    }

    /// Stop every engine on the current garage page
    pub async fn reset(&self, events: &RaceEvents) -> ClientResult<()> {
        let api = self.api.as_ref();
        let results = join_all(
            self.session
                .cars()
                .iter()
                .map(|car| race::stop_driving(api, car.id, events)),
        )
        .await;

        let mut first_error: Option<ClientError> = None;
        for result in results {
            if let Err(e) = result {
                warn!("Failed to stop engine: {}", e);
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Drive a single car
    pub async fn start_car(&self, id: CarId, events: &RaceEvents) -> ClientResult<DriveOutcome> {
        race::start_driving(self.api.as_ref(), id, events).await
    }

    /// Stop a single car
    pub async fn stop_car(&self, id: CarId, events: &RaceEvents) -> ClientResult<()> {
        race::stop_driving(self.api.as_ref(), id, events).await?;
        Ok(())
    }
}

//! REST client for the garage, engine and winners endpoints

use std::time::Duration;

use async_race_common::{
    Car, CarId, Config, EngineParams, EngineStatus, NewCar, Page, Winner, WinnerRecord, WinnersSort,
};
use futures::future::try_join_all;
use reqwest::{Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ClientError, ClientResult};

const TOTAL_COUNT_HEADER: &str = "X-Total-Count";

/// Pagination and sort query (`_page`, `_limit`, `_sort`, `_order`)
#[derive(Serialize)]
struct ListQuery {
    #[serde(rename = "_page", skip_serializing_if = "Option::is_none")]
    page: Option<u32>,
    #[serde(rename = "_limit")]
    limit: u32,
    #[serde(rename = "_sort", skip_serializing_if = "Option::is_none")]
    sort: Option<&'static str>,
    #[serde(rename = "_order", skip_serializing_if = "Option::is_none")]
    order: Option<&'static str>,
}

impl ListQuery {
    fn page(page: u32, limit: u32) -> Self {
        Self {
            page: Some(page),
            limit,
            sort: None,
            order: None,
        }
    }

    fn sorted(mut self, sort: Option<WinnersSort>) -> Self {
        if let Some(sort) = sort {
            self.sort = Some(sort.field.as_str());
            self.order = Some(sort.order.as_str());
        }
        self
    }
}

#[derive(Serialize)]
struct EngineQuery {
    id: CarId,
    status: EngineStatus,
}

#[derive(Deserialize)]
struct DriveResponse {
    #[serde(default = "default_success")]
    success: bool,
}

fn default_success() -> bool {
    true
}

/// Client for the Async Race backend
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client from configuration
    pub fn new(config: &Config) -> ClientResult<Self> {
        config.validate()?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url().to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn garage_url(&self) -> String {
        format!("{}/garage", self.base_url)
    }

    fn car_url(&self, id: CarId) -> String {
        format!("{}/garage/{}", self.base_url, id)
    }

    fn engine_url(&self) -> String {
        format!("{}/engine", self.base_url)
    }

    fn winners_url(&self) -> String {
        format!("{}/winners", self.base_url)
    }

    fn winner_url(&self, id: CarId) -> String {
        format!("{}/winners/{}", self.base_url, id)
    }

    /// Check that the backend answers
    pub async fn health_check(&self) -> bool {
        let request = self
            .http
            .get(self.garage_url())
            .query(&[("_limit", 1)])
            .send()
            .await;
        match request {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!("Health check failed: {}", e);
                false
            }
        }
    }

    // Garage operations

    /// Fetch one page of cars
    pub async fn get_cars(&self, page: u32, limit: u32) -> ClientResult<Page<Car>> {
        let response = self
            .http
            .get(self.garage_url())
            .query(&ListQuery::page(page, limit))
            .send()
            .await?;
        let response = expect_success(response)?;
        let total = total_count(&response)?;
        let items: Vec<Car> = response.json().await?;
        debug!(page, limit, total, "Fetched {} cars", items.len());
        Ok(Page::new(items, total))
    }

    /// Get a car by ID
    pub async fn get_car(&self, id: CarId) -> ClientResult<Car> {
        self.find_car(id)
            .await?
            .ok_or(ClientError::NotFound { kind: "car", id })
    }

    /// Get a car by ID, `None` when it does not exist
    pub async fn find_car(&self, id: CarId) -> ClientResult<Option<Car>> {
        let response = self.http.get(self.car_url(id)).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let car = expect_success(response)?.json().await?;
        Ok(Some(car))
    }

    /// Create a car
    pub async fn create_car(&self, car: &NewCar) -> ClientResult<Car> {
        let response = self.http.post(self.garage_url()).json(car).send().await?;
        let created: Car = expect_success(response)?.json().await?;
        debug!(id = created.id, "Created car '{}'", created.name);
        Ok(created)
    }

    /// Replace a car's name and color
    pub async fn update_car(&self, id: CarId, car: &NewCar) -> ClientResult<Car> {
        let response = self.http.put(self.car_url(id)).json(car).send().await?;
        let response = not_found_as(response, "car", id)?;
        Ok(response.json().await?)
    }

    /// Delete a car
    pub async fn delete_car(&self, id: CarId) -> ClientResult<()> {
        let response = self.http.delete(self.car_url(id)).send().await?;
        not_found_as(response, "car", id)?;
        Ok(())
    }

    // Winners operations

    /// Fetch one page of winners, each joined with its car
    pub async fn get_winners(
        &self,
        page: u32,
        limit: u32,
        sort: Option<WinnersSort>,
    ) -> ClientResult<Page<Winner>> {
        let response = self
            .http
            .get(self.winners_url())
            .query(&ListQuery::page(page, limit).sorted(sort))
            .send()
            .await?;
        let response = expect_success(response)?;
        let total = total_count(&response)?;
        let records: Vec<WinnerRecord> = response.json().await?;

        let cars = try_join_all(records.iter().map(|record| self.find_car(record.id))).await?;
        let items = records
            .into_iter()
            .zip(cars)
            .map(|(record, car)| {
                if car.is_none() {
                    warn!(id = record.id, "Winner refers to a car that no longer exists");
                }
                Winner::new(record, car)
            })
            .collect();
        Ok(Page::new(items, total))
    }

    /// Get the winners row of a car, `None` when the car has never won
    pub async fn get_winner(&self, id: CarId) -> ClientResult<Option<WinnerRecord>> {
        let response = self.http.get(self.winner_url(id)).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let record = expect_success(response)?.json().await?;
        Ok(Some(record))
    }

    /// Insert a winners row
    pub async fn create_winner(&self, record: &WinnerRecord) -> ClientResult<()> {
        let response = self.http.post(self.winners_url()).json(record).send().await?;
        expect_success(response)?;
        Ok(())
    }

    /// Replace a winners row
    pub async fn update_winner(&self, record: &WinnerRecord) -> ClientResult<()> {
        let response = self
            .http
            .put(self.winner_url(record.id))
            .json(record)
            .send()
            .await?;
        not_found_as(response, "winner", record.id)?;
        Ok(())
    }

    /// Delete a winners row
    pub async fn delete_winner(&self, id: CarId) -> ClientResult<()> {
        let response = self.http.delete(self.winner_url(id)).send().await?;
        not_found_as(response, "winner", id)?;
        Ok(())
    }

    // Engine operations

    async fn patch_engine(&self, id: CarId, status: EngineStatus) -> ClientResult<Response> {
        let response = self
            .http
            .patch(self.engine_url())
            .query(&EngineQuery { id, status })
            .send()
            .await?;
        Ok(response)
    }

    /// Start a car's engine
    pub async fn start_engine(&self, id: CarId) -> ClientResult<EngineParams> {
        let response = self.patch_engine(id, EngineStatus::Started).await?;
        let response = not_found_as(response, "car", id)?;
        Ok(response.json().await?)
    }

    /// Stop a car's engine
    pub async fn stop_engine(&self, id: CarId) -> ClientResult<EngineParams> {
        let response = self.patch_engine(id, EngineStatus::Stopped).await?;
        let response = not_found_as(response, "car", id)?;
        Ok(response.json().await?)
    }

    /// Switch a started engine to drive mode.
    ///
    /// Resolves once the car crosses the finish line (`true`) or stops
    /// (`false`): 500 means the engine broke down, 404 and 429 mean the car
    /// was not in a drivable state.
    pub async fn drive(&self, id: CarId) -> ClientResult<bool> {
        let response = self.patch_engine(id, EngineStatus::Drive).await?;
        match response.status() {
            StatusCode::OK => match response.json::<DriveResponse>().await {
                Ok(body) => Ok(body.success),
                Err(e) => {
                    debug!(id, "Drive answered 200 without a usable body: {}", e);
                    Ok(true)
                }
            },
            StatusCode::INTERNAL_SERVER_ERROR => {
                debug!(id, "Engine broke down");
                Ok(false)
            }
            status => {
                warn!(id, status = status.as_u16(), "Drive rejected");
                Ok(false)
            }
        }
    }
}

/// Turn a non-2xx response into an error
fn expect_success(response: Response) -> ClientResult<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ClientError::Status {
            status: status.as_u16(),
            url: response.url().to_string(),
        })
    }
}

/// Like [`expect_success`], mapping 404 to a typed not-found error
fn not_found_as(response: Response, kind: &'static str, id: CarId) -> ClientResult<Response> {
    if response.status() == StatusCode::NOT_FOUND {
        return Err(ClientError::NotFound { kind, id });
    }
    expect_success(response)
}

/// Total item count from the `X-Total-Count` header; a missing header counts as zero
fn total_count(response: &Response) -> ClientResult<u64> {
    match response.headers().get(TOTAL_COUNT_HEADER) {
        None => Ok(0),
        Some(value) => {
            let text = value
                .to_str()
                .map_err(|e| ClientError::InvalidTotal(e.to_string()))?;
            text.trim()
                .parse()
                .map_err(|_| ClientError::InvalidTotal(text.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_query_sort_suffix() {
        let plain = serde_json::to_value(ListQuery::page(2, 7)).unwrap();
        assert_eq!(plain, serde_json::json!({"_page": 2, "_limit": 7}));

        let sorted = ListQuery::page(1, 10).sorted(Some(WinnersSort::new(
            async_race_common::SortField::Wins,
            async_race_common::SortOrder::Desc,
        )));
        let sorted = serde_json::to_value(sorted).unwrap();
        assert_eq!(sorted["_sort"], "wins");
        assert_eq!(sorted["_order"], "desc");
    }

    #[test]
    fn test_engine_query_status() {
        let query = serde_json::to_value(EngineQuery {
            id: 4,
            status: EngineStatus::Drive,
        })
        .unwrap();
        assert_eq!(query, serde_json::json!({"id": 4, "status": "drive"}));
    }

    #[test]
    fn test_client_rejects_invalid_config() {
        let config = Config::default().with_base_url("localhost:3000");
        assert!(matches!(ApiClient::new(&config), Err(ClientError::Common(_))));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let config = Config::default().with_base_url("http://127.0.0.1:3000/");
        let client = ApiClient::new(&config).unwrap();
        assert_eq!(client.car_url(3), "http://127.0.0.1:3000/garage/3");
    }
}

//! Garage controller flows against a mocked backend

use async_race_client::{ApiClient, ClientError, Garage, RaceEvents};
use async_race_common::{Config, SortField, SortOrder, View};
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn garage(server: &MockServer) -> Garage {
    let config = Config::default().with_base_url(server.uri());
    Garage::new(ApiClient::new(&config).unwrap(), config)
}

fn cars_json(ids: std::ops::RangeInclusive<u64>) -> serde_json::Value {
    json!(ids
        .map(|id| json!({"id": id, "name": format!("Car {}", id), "color": "#abcdef"}))
        .collect::<Vec<_>>())
}

fn garage_page(page: u32, total: u64, body: serde_json::Value) -> Mock {
    Mock::given(method("GET"))
        .and(path("/garage"))
        .and(query_param("_page", page.to_string()))
        .and(query_param("_limit", "7"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-Total-Count", total.to_string())
                .set_body_json(body),
        )
}

#[tokio::test]
async fn paging_through_the_garage() {
    let server = MockServer::start().await;
    garage_page(1, 10, cars_json(1..=7)).mount(&server).await;
    garage_page(2, 10, cars_json(8..=10)).expect(1).mount(&server).await;

    let mut garage = garage(&server);
    garage.refresh_garage().await.unwrap();
    assert_eq!(garage.session().total_pages(View::Garage), 2);
    assert!(!garage.prev().await.unwrap());

    assert!(garage.next().await.unwrap());
    assert_eq!(garage.session().garage_page(), 2);
    assert_eq!(garage.session().cars().len(), 3);

    // Already on the last page: no request is made
    assert!(!garage.next().await.unwrap());
}

#[tokio::test]
async fn removing_last_car_on_page_steps_back() {
    let server = MockServer::start().await;
    garage_page(1, 8, cars_json(1..=7)).up_to_n_times(1).mount(&server).await;
    garage_page(2, 8, cars_json(8..=8)).up_to_n_times(1).mount(&server).await;
    garage_page(2, 7, json!([])).mount(&server).await;
    garage_page(1, 7, cars_json(1..=7)).mount(&server).await;
    Mock::given(method("DELETE"))
        .and(path("/garage/8"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/winners/8"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let mut garage = garage(&server);
    garage.refresh_garage().await.unwrap();
    garage.next().await.unwrap();
    assert_eq!(garage.session().garage_page(), 2);

    garage.remove_car(8).await.unwrap();
    assert_eq!(garage.session().garage_page(), 1);
    assert_eq!(garage.session().cars_count(), 7);
    assert_eq!(garage.session().cars().len(), 7);
}

fn winners_page(page: u32, total: u64, ids: std::ops::RangeInclusive<u64>) -> Mock {
    let rows: Vec<_> = ids.map(|id| json!({"id": id, "wins": 1, "time": 4.2})).collect();
    Mock::given(method("GET"))
        .and(path("/winners"))
        .and(query_param("_page", page.to_string()))
        .and(query_param("_limit", "10"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-Total-Count", total.to_string())
                .set_body_json(json!(rows)),
        )
}

#[tokio::test]
async fn vanished_winners_page_steps_back() {
    let server = MockServer::start().await;
    winners_page(1, 11, 1..=10).up_to_n_times(1).mount(&server).await;
    winners_page(2, 11, 11..=11).up_to_n_times(1).mount(&server).await;
    winners_page(2, 10, 1..=0).expect(1).mount(&server).await;
    winners_page(1, 10, 1..=10).expect(1).mount(&server).await;
    // Cars behind the rows are gone; rows stay with an empty car
    Mock::given(method("GET"))
        .and(wiremock::matchers::path_regex(r"^/garage/\d+$"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({})))
        .mount(&server)
        .await;

    let mut garage = garage(&server);
    garage.show(View::Winners).await.unwrap();
    assert!(garage.next().await.unwrap());
    assert_eq!(garage.session().winners_page(), 2);
    assert_eq!(garage.session().winners().len(), 1);

    // Another client removed the last record on page 2
    garage.refresh_winners().await.unwrap();
    assert_eq!(garage.session().winners_page(), 1);
    assert_eq!(garage.session().winners_count(), 10);
    assert_eq!(garage.session().winners().len(), 10);
    assert!(garage.session().winners().iter().all(|winner| winner.car.is_none()));
}

#[tokio::test]
async fn create_requires_a_name() {
    let server = MockServer::start().await;
    let mut garage = garage(&server);

    let err = garage.create_car("   ", "#000000").await.unwrap_err();
    assert!(matches!(err, ClientError::Common(async_race_common::Error::Validation(_))));
}

#[tokio::test]
async fn create_refreshes_the_garage() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/garage"))
        .and(body_json(json!({"name": "Tesla", "color": "#e6e6fa"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 1, "name": "Tesla", "color": "#e6e6fa"})))
        .expect(1)
        .mount(&server)
        .await;
    garage_page(1, 1, json!([{"id": 1, "name": "Tesla", "color": "#e6e6fa"}]))
        .mount(&server)
        .await;

    let mut garage = garage(&server);
    let car = garage.create_car(" Tesla ", "#e6e6fa").await.unwrap();
    assert_eq!(car.id, 1);
    assert_eq!(garage.session().cars_count(), 1);
}

#[tokio::test]
async fn sorting_winners_flips_order() {
    let server = MockServer::start().await;
    for (sort, order) in [("time", "asc"), ("wins", "desc"), ("time", "asc")] {
        Mock::given(method("GET"))
            .and(path("/winners"))
            .and(query_param("_sort", sort))
            .and(query_param("_order", order))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("X-Total-Count", "0")
                    .set_body_json(json!([])),
            )
            .mount(&server)
            .await;
    }

    let mut garage = garage(&server);
    garage.show(View::Winners).await.unwrap();
    assert_eq!(garage.session().view(), View::Winners);

    garage.sort_by(SortField::Wins).await.unwrap();
    assert_eq!(garage.session().sort().order, SortOrder::Desc);

    garage.sort_by(SortField::Time).await.unwrap();
    assert_eq!(garage.session().sort().field, SortField::Time);
    assert_eq!(garage.session().sort().order, SortOrder::Asc);
}

#[tokio::test]
async fn race_saves_winner_and_reset_stops_engines() {
    let server = MockServer::start().await;
    garage_page(1, 2, cars_json(1..=2)).mount(&server).await;
    for (id, velocity, status) in [(1u64, 100.0, 500u16), (2, 250.0, 200)] {
        Mock::given(method("PATCH"))
            .and(path("/engine"))
            .and(query_param("id", id.to_string()))
            .and(query_param("status", "started"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"velocity": velocity, "distance": 500000})))
            .mount(&server)
            .await;
        let mut drive = ResponseTemplate::new(status);
        if status == 200 {
            drive = drive.set_body_json(json!({"success": true}));
        }
        Mock::given(method("PATCH"))
            .and(path("/engine"))
            .and(query_param("id", id.to_string()))
            .and(query_param("status", "drive"))
            .respond_with(drive)
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/engine"))
            .and(query_param("id", id.to_string()))
            .and(query_param("status", "stopped"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"velocity": 0, "distance": 500000})))
            .expect(1)
            .mount(&server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path("/winners/2"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/winners"))
        .and(body_json(json!({"id": 2, "wins": 1, "time": 2.0})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 2, "wins": 1, "time": 2.0})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/winners"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-Total-Count", "1")
                .set_body_json(json!([{"id": 2, "wins": 1, "time": 2.0}])),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/garage/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 2, "name": "Car 2", "color": "#abcdef"})))
        .mount(&server)
        .await;

    let mut garage = garage(&server);
    garage.refresh_garage().await.unwrap();

    let (winner, record) = garage.race(RaceEvents::none()).await.unwrap();
    assert_eq!(winner.car.id, 2);
    assert_eq!(winner.time_secs, 2.0);
    assert_eq!(record.wins, 1);
    assert_eq!(garage.session().winners_count(), 1);

    garage.reset(&RaceEvents::none()).await.unwrap();
}

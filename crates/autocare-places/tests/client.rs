//! Integration tests for `PlacesClient` using wiremock HTTP mocks.

use std::time::Duration;

use autocare_core::{Coordinates, PlaceQuery, PlaceSearch, PlaceSearchError};
use autocare_places::{PlacesClient, PlacesError};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> PlacesClient {
    PlacesClient::with_base_url("test-key", 30, base_url)
        .expect("client construction should not fail")
        .with_page_delay(Duration::ZERO)
}

fn query(text: Option<&str>, max_results: usize) -> PlaceQuery {
    PlaceQuery {
        origin: Coordinates::new(40.7128, -74.006),
        text: text.map(ToOwned::to_owned),
        radius_m: 5000,
        max_results,
    }
}

fn place(id: &str, lat: f64) -> serde_json::Value {
    serde_json::json!({
        "place_id": id,
        "name": format!("Garage {id}"),
        "vicinity": format!("{id} Main St"),
        "geometry": { "location": { "lat": lat, "lng": -74.006 } },
        "rating": 4.0,
        "user_ratings_total": 12
    })
}

#[tokio::test]
async fn nearby_search_returns_parsed_places() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/nearbysearch/json"))
        .and(query_param("key", "test-key"))
        .and(query_param("location", "40.7128,-74.006"))
        .and(query_param("radius", "5000"))
        .and(query_param("type", "car_repair"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "OK",
            "results": [place("a", 40.72), place("b", 40.73)]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let records = client
        .search_places(&query(None, 60))
        .await
        .expect("should parse places");

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].place_id, "a");
    assert_eq!(records[0].name, "Garage a");
    assert_eq!(records[0].address, "a Main St");
    assert_eq!(records[1].location.lat, 40.73);
}

#[tokio::test]
async fn text_search_sends_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/textsearch/json"))
        .and(query_param("query", "brake repair"))
        .and(query_param("location", "40.7128,-74.006"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "OK",
            "results": [{
                "place_id": "t1",
                "name": "Brake Masters",
                "formatted_address": "9 Oak Ave, New York, NY",
                "geometry": { "location": { "lat": 40.71, "lng": -74.0 } }
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let records = client
        .search_places(&query(Some("brake repair"), 60))
        .await
        .expect("should parse places");

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].address, "9 Oak Ave, New York, NY");
}

#[tokio::test]
async fn follows_page_tokens() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/nearbysearch/json"))
        .and(query_param("location", "40.7128,-74.006"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "OK",
            "results": [place("p1", 40.72)],
            "next_page_token": "tok-2"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/nearbysearch/json"))
        .and(query_param("pagetoken", "tok-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "OK",
            "results": [place("p2", 40.73)]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let records = client
        .search_places(&query(None, 60))
        .await
        .expect("should follow token");

    let ids: Vec<&str> = records.iter().map(|r| r.place_id.as_str()).collect();
    assert_eq!(ids, vec!["p1", "p2"]);
}

#[tokio::test]
async fn stops_at_max_results_without_fetching_more_pages() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/nearbysearch/json"))
        .and(query_param("location", "40.7128,-74.006"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "OK",
            "results": [place("p1", 40.72), place("p2", 40.73), place("p3", 40.74)],
            "next_page_token": "tok-2"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(query_param("pagetoken", "tok-2"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let records = client
        .search_places(&query(None, 2))
        .await
        .expect("should truncate");

    assert_eq!(records.len(), 2);
}

#[tokio::test]
async fn stops_after_three_pages() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/nearbysearch/json"))
        .and(query_param("location", "40.7128,-74.006"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "OK",
            "results": [place("p1", 40.72)],
            "next_page_token": "again"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(query_param("pagetoken", "again"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "OK",
            "results": [place("pn", 40.75)],
            "next_page_token": "again"
        })))
        .expect(2)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let records = client
        .search_places(&query(None, 60))
        .await
        .expect("should stop after page cap");

    assert_eq!(records.len(), 3);
}

#[tokio::test]
async fn zero_results_is_empty_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "ZERO_RESULTS",
            "results": []
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let records = client
        .search_places(&query(None, 60))
        .await
        .expect("zero results is not an error");
    assert!(records.is_empty());
}

#[tokio::test]
async fn denied_status_surfaces_as_provider_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "REQUEST_DENIED",
            "error_message": "The provided API key is invalid.",
            "results": []
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.search_places(&query(None, 60)).await.unwrap_err();
    assert!(
        matches!(err, PlacesError::Api { ref status, .. } if status == "REQUEST_DENIED"),
        "got {err:?}"
    );

    let err = client.search(&query(None, 60)).await.unwrap_err();
    assert_eq!(err.code(), "REQUEST_DENIED");
}

#[tokio::test]
async fn http_failure_maps_to_transport_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.search(&query(None, 60)).await.unwrap_err();
    assert!(matches!(err, PlaceSearchError::Transport(_)));
    assert_eq!(err.code(), "http_error");
}

#[tokio::test]
async fn malformed_body_is_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.search_places(&query(None, 60)).await.unwrap_err();
    assert!(matches!(err, PlacesError::Deserialize { .. }));
}

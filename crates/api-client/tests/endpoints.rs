//! Integration tests for the Overpass and IP lookup endpoints.
//!
//! Uses `wiremock` to stand up a local HTTP server for each test so no
//! real network traffic is made.

use std::time::Duration;

use dropoff_api_client::endpoints::ElementKind;
use dropoff_api_client::{ApiError, ClientConfig, DropoffClient};
use dropoff_geo::Coordinate;
use serde_json::json;
use wiremock::matchers::{body_string_contains, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(server: &MockServer) -> DropoffClient {
    let config = ClientConfig::default()
        .with_overpass_url(format!("{}/api/interpreter", server.uri()))
        .with_ip_lookup_url(format!("{}/json/", server.uri()))
        .with_timeout(Duration::from_secs(5));
    DropoffClient::with_config(config).expect("failed to build test client")
}

const BRATISLAVA: Coordinate = Coordinate {
    latitude: 48.1486,
    longitude: 17.1077,
};

// ---------------------------------------------------------------------------
// Overpass
// ---------------------------------------------------------------------------

#[tokio::test]
async fn overpass_search_posts_query_and_parses_elements() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/interpreter"))
        .and(header_exists("X-Request-ID"))
        .and(body_string_contains("(around:20000,48.1486,17.1077)"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "elements": [
                {"type": "node", "id": 101, "lat": 48.15, "lon": 17.11,
                 "tags": {"amenity": "recycling", "recycling:clothes": "yes"}},
                {"type": "way", "id": 202, "center": {"lat": 48.20, "lon": 17.20},
                 "tags": {"amenity": "recycling", "recycling_type": "centre",
                          "recycling:shoes": "yes"}}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let elements = test_client(&server)
        .overpass()
        .search(BRATISLAVA, 20_000.0)
        .await
        .expect("search should succeed");

    assert_eq!(elements.len(), 2);
    assert_eq!(elements[0].kind, ElementKind::Node);
    assert_eq!(elements[1].kind, ElementKind::Way);
    assert_eq!(elements[1].position(), Some(Coordinate::new(48.20, 17.20)));
}

#[tokio::test]
async fn overpass_search_empty_result() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/interpreter"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"elements": []})))
        .mount(&server)
        .await;

    let elements = test_client(&server)
        .overpass()
        .search(BRATISLAVA, 20_000.0)
        .await
        .unwrap();
    assert!(elements.is_empty());
}

#[tokio::test]
async fn overpass_body_without_elements_is_json_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/interpreter"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let err = test_client(&server)
        .overpass()
        .search(BRATISLAVA, 20_000.0)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Json(_)), "unexpected error: {err:?}");
}

#[tokio::test]
async fn overpass_runtime_error_remark_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/interpreter"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "remark": "runtime error: Query timed out in \"query\" at line 3 after 26 seconds.",
            "elements": []
        })))
        .mount(&server)
        .await;

    let err = test_client(&server)
        .overpass()
        .search(BRATISLAVA, 20_000.0)
        .await
        .unwrap_err();
    match err {
        ApiError::Backend(remark) => assert!(remark.starts_with("runtime error: Query timed out")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn overpass_server_error_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/interpreter"))
        .respond_with(ResponseTemplate::new(504).set_body_string("Gateway Timeout"))
        .mount(&server)
        .await;

    let err = test_client(&server)
        .overpass()
        .search(BRATISLAVA, 20_000.0)
        .await
        .unwrap_err();

    assert!(err.is_server_error(), "expected 5xx, got: {err:?}");
}

#[tokio::test]
async fn overpass_malformed_body_is_json_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/interpreter"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>rate limited</html>"))
        .mount(&server)
        .await;

    let err = test_client(&server)
        .overpass()
        .search(BRATISLAVA, 20_000.0)
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Json(_)), "expected Json, got: {err:?}");
}

// ---------------------------------------------------------------------------
// IP lookup
// ---------------------------------------------------------------------------

#[tokio::test]
async fn ip_lookup_returns_coordinate() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/json/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"latitude": 40.7, "longitude": -74.0})),
        )
        .mount(&server)
        .await;

    let coord = test_client(&server).ip_lookup().locate().await.unwrap();
    assert_eq!(coord, Coordinate::new(40.7, -74.0));
}

#[tokio::test]
async fn ip_lookup_refusal_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/json/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"error": true, "reason": "RateLimited"})),
        )
        .mount(&server)
        .await;

    let err = test_client(&server).ip_lookup().locate().await.unwrap_err();
    assert!(
        matches!(err, ApiError::ApiResponse { ref message, .. } if message == "RateLimited"),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn ip_lookup_missing_fields() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/json/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"city": "Nowhere"})))
        .mount(&server)
        .await;

    let err = test_client(&server).ip_lookup().locate().await.unwrap_err();
    assert!(matches!(err, ApiError::MissingField("latitude")));
}

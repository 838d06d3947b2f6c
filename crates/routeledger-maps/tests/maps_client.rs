//! Integration tests for `MapsClient` and `compute_route` using wiremock HTTP mocks.

use routeledger_core::MapsConfig;
use routeledger_maps::{compute_route, Coordinate, MapsClient, MapsError, UNKNOWN_PLACE};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GEOCODE: &str = "/maps/api/geocode/json";
const MATRIX: &str = "/distanceMatrix/v2:computeRouteMatrix";

fn test_client(base_url: &str) -> MapsClient {
    MapsClient::new(&MapsConfig {
        api_key: "test-key".to_string(),
        geocode_base_url: base_url.to_string(),
        routes_base_url: base_url.to_string(),
        timeout_secs: 30,
        user_agent: "routeledger-test".to_string(),
    })
    .expect("client construction should not fail")
}

fn geocode_hit(lat: f64, lng: f64) -> serde_json::Value {
    json!({
        "status": "OK",
        "results": [
            { "geometry": { "location": { "lat": lat, "lng": lng } }, "address_components": [] },
            { "geometry": { "location": { "lat": 0.0, "lng": 0.0 } }, "address_components": [] }
        ]
    })
}

async fn mount_geocode(server: &MockServer, address: &str, lat: f64, lng: f64) {
    Mock::given(method("GET"))
        .and(path(GEOCODE))
        .and(query_param("address", address))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(geocode_hit(lat, lng)))
        .mount(server)
        .await;
}

async fn mount_segment_once(server: &MockServer, meters: u64) {
    Mock::given(method("POST"))
        .and(path(MATRIX))
        .and(header("X-Goog-Api-Key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "originIndex": 0, "destinationIndex": 0, "distanceMeters": meters, "status": {} }
        ])))
        .up_to_n_times(1)
        .mount(server)
        .await;
}

fn route(addresses: &[&str]) -> Vec<String> {
    addresses.iter().map(|a| (*a).to_string()).collect()
}

#[tokio::test]
async fn resolve_coordinates_uses_first_result() {
    let server = MockServer::start().await;
    mount_geocode(&server, "Market Place, Chippenham", 51.458, -2.116).await;

    let client = test_client(&server.uri());
    let coordinate = client
        .resolve_coordinates("Market Place, Chippenham")
        .await
        .expect("request should succeed")
        .expect("address should resolve");

    assert_eq!(
        coordinate,
        Coordinate {
            latitude: 51.458,
            longitude: -2.116
        }
    );
}

#[tokio::test]
async fn resolve_coordinates_zero_results_is_unresolved_not_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(GEOCODE))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "status": "ZERO_RESULTS", "results": [] })),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.resolve_coordinates("nowhere at all").await;
    assert!(matches!(result, Ok(None)), "got {result:?}");
}

#[tokio::test]
async fn resolve_coordinates_surfaces_rejected_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(GEOCODE))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "REQUEST_DENIED",
            "error_message": "The provided API key is invalid.",
            "results": []
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.resolve_coordinates("x").await.unwrap_err();
    assert!(matches!(err, MapsError::GeocodeStatus { ref status, .. } if status == "REQUEST_DENIED"));
}

#[tokio::test]
async fn resolve_place_name_prefers_first_locality_component() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(GEOCODE))
        .and(query_param("latlng", "51.5,-2.1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "results": [{
                "address_components": [
                    { "long_name": "12", "types": ["street_number"] },
                    { "long_name": "Sutton Benger", "types": ["locality", "political"] },
                    { "long_name": "Chippenham", "types": ["postal_town"] }
                ]
            }]
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let place = client
        .resolve_place_name(Coordinate {
            latitude: 51.5,
            longitude: -2.1,
        })
        .await
        .expect("reverse geocode");
    assert_eq!(place, "Sutton Benger");
}

#[tokio::test]
async fn resolve_place_name_falls_back_to_unknown() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(GEOCODE))
        .and(query_param("latlng", "1,2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "results": [{ "address_components": [{ "long_name": "Wiltshire", "types": ["administrative_area_level_2"] }] }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(GEOCODE))
        .and(query_param("latlng", "3,4"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "status": "ZERO_RESULTS", "results": [] })),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let no_component = client
        .resolve_place_name(Coordinate {
            latitude: 1.0,
            longitude: 2.0,
        })
        .await
        .unwrap();
    let no_result = client
        .resolve_place_name(Coordinate {
            latitude: 3.0,
            longitude: 4.0,
        })
        .await
        .unwrap();
    assert_eq!(no_component, UNKNOWN_PLACE);
    assert_eq!(no_result, UNKNOWN_PLACE);
}

#[tokio::test]
async fn compute_route_issues_one_query_per_consecutive_pair() {
    let server = MockServer::start().await;
    mount_geocode(&server, "Depot", 51.46, -2.12).await;
    mount_geocode(&server, "Stop A", 51.49, -2.17).await;
    mount_geocode(&server, "Stop B", 51.51, -2.05).await;
    mount_geocode(&server, "Home", 51.45, -2.10).await;
    mount_segment_once(&server, 6_404).await;
    mount_segment_once(&server, 7_356).await;
    mount_segment_once(&server, 5_000).await;

    let client = test_client(&server.uri());
    let summary = compute_route(&client, &route(&["Depot", "Stop A", "Stop B", "Home"]))
        .await
        .expect("route should compute");

    assert_eq!(summary.segments.len(), 3);
    assert_eq!(summary.segment_distances(), vec![6.4, 7.36, 5.0]);
    assert_eq!(summary.segments[2].from_index, 2);
    assert_eq!(summary.segments[2].to_index, 3);
    assert!((summary.total_distance_km - 18.76).abs() < 1e-9);

    let matrix_calls = server
        .received_requests()
        .await
        .expect("recording enabled")
        .into_iter()
        .filter(|r| r.url.path() == MATRIX)
        .count();
    assert_eq!(matrix_calls, 3);
}

#[tokio::test]
async fn compute_route_sends_consecutive_coordinates() {
    let server = MockServer::start().await;
    mount_geocode(&server, "From", 10.0, 20.0).await;
    mount_geocode(&server, "To", 30.0, 40.0).await;
    mount_segment_once(&server, 1_000).await;

    let client = test_client(&server.uri());
    compute_route(&client, &route(&["From", "To"]))
        .await
        .expect("route");

    let requests = server.received_requests().await.unwrap();
    let matrix = requests
        .iter()
        .find(|r| r.url.path() == MATRIX)
        .expect("matrix request");
    let body: serde_json::Value = serde_json::from_slice(&matrix.body).unwrap();
    assert_eq!(
        body["origins"][0]["waypoint"]["location"]["latLng"],
        json!({ "latitude": 10.0, "longitude": 20.0 })
    );
    assert_eq!(
        body["destinations"][0]["waypoint"]["location"]["latLng"],
        json!({ "latitude": 30.0, "longitude": 40.0 })
    );
    assert_eq!(body["travelMode"], "DRIVE");
}

#[tokio::test]
async fn compute_route_stops_at_first_unresolved_address() {
    let server = MockServer::start().await;
    mount_geocode(&server, "Depot", 51.46, -2.12).await;
    mount_geocode(&server, "Stop A", 51.49, -2.17).await;
    Mock::given(method("GET"))
        .and(path(GEOCODE))
        .and(query_param("address", "Nowhere Lane"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "status": "ZERO_RESULTS", "results": [] })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(GEOCODE))
        .and(query_param("address", "Home"))
        .respond_with(ResponseTemplate::new(200).set_body_json(geocode_hit(51.45, -2.10)))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(MATRIX))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "distanceMeters": 1 }])))
        .expect(0)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = compute_route(&client, &route(&["Depot", "Stop A", "Nowhere Lane", "Home"]))
        .await
        .unwrap_err();

    assert!(
        matches!(err, MapsError::UnresolvedLocation { ref address } if address == "Nowhere Lane"),
        "got {err:?}"
    );
}

#[tokio::test]
async fn compute_route_reports_failing_segment_with_payload() {
    let server = MockServer::start().await;
    mount_geocode(&server, "A", 1.0, 1.0).await;
    mount_geocode(&server, "B", 2.0, 2.0).await;
    mount_geocode(&server, "C", 3.0, 3.0).await;
    mount_geocode(&server, "D", 4.0, 4.0).await;
    mount_segment_once(&server, 2_000).await;
    Mock::given(method("POST"))
        .and(path(MATRIX))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "originIndex": 0, "destinationIndex": 0, "status": { "code": 5, "message": "ROUTE_NOT_FOUND" } }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = compute_route(&client, &route(&["A", "B", "C", "D"]))
        .await
        .unwrap_err();

    match err {
        MapsError::SegmentDistance {
            from_index,
            to_index,
            ref payload,
        } => {
            assert_eq!((from_index, to_index), (1, 2));
            assert_eq!(payload[0]["status"]["message"], "ROUTE_NOT_FOUND");
        }
        other => panic!("expected SegmentDistance, got {other:?}"),
    }
    assert!(err.payload().is_some());
}

#[tokio::test]
async fn compute_route_treats_provider_error_body_as_segment_failure() {
    let server = MockServer::start().await;
    mount_geocode(&server, "A", 1.0, 1.0).await;
    mount_geocode(&server, "B", 2.0, 2.0).await;
    Mock::given(method("POST"))
        .and(path(MATRIX))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": { "code": 403, "message": "API key not valid", "status": "PERMISSION_DENIED" }
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = compute_route(&client, &route(&["A", "B"])).await.unwrap_err();
    let payload = err.payload().expect("payload attached");
    assert_eq!(payload["error"]["status"], "PERMISSION_DENIED");
}

#[tokio::test]
async fn compute_route_requires_two_waypoints() {
    let server = MockServer::start().await;
    let client = test_client(&server.uri());
    let err = compute_route(&client, &route(&["Only"])).await.unwrap_err();
    assert!(matches!(err, MapsError::TooFewWaypoints(1)));
}

#[tokio::test]
async fn resolve_place_name_rejected_request_falls_back_to_unknown() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(GEOCODE))
        .and(query_param("latlng", "5,6"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "REQUEST_DENIED",
            "error_message": "The provided API key is invalid.",
            "results": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let place = client
        .resolve_place_name(Coordinate {
            latitude: 5.0,
            longitude: 6.0,
        })
        .await
        .expect("rejection falls back rather than failing");

    assert_eq!(place, UNKNOWN_PLACE);
}

//! Integration tests for `SheetsClient` using wiremock HTTP mocks.

use routeledger_core::SheetsConfig;
use routeledger_sheets::{RowSink, SheetsClient, SheetsError};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const VALUES: &str = "/v4/spreadsheets/sheet-1/values/Sheet1";
const APPEND: &str = "/v4/spreadsheets/sheet-1/values/Sheet1:append";

fn test_client(base_url: &str) -> SheetsClient {
    SheetsClient::new(&SheetsConfig {
        base_url: base_url.to_string(),
        spreadsheet_id: "sheet-1".to_string(),
        access_token: "test-token".to_string(),
        range: "Sheet1".to_string(),
        timeout_secs: 30,
        user_agent: "routeledger-test".to_string(),
    })
    .expect("client construction should not fail")
}

#[tokio::test]
async fn ensure_header_writes_when_sheet_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(VALUES))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "range": "Sheet1!A1:Z1000", "majorDimension": "ROWS" })),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(APPEND))
        .and(query_param("valueInputOption", "RAW"))
        .and(body_json(json!({ "values": [["ID", "Timestamp"]] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let wrote = client
        .ensure_header(&["ID", "Timestamp"])
        .await
        .expect("header check");
    assert!(wrote);
}

#[tokio::test]
async fn ensure_header_skips_when_sheet_has_rows() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(VALUES))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "range": "Sheet1!A1:Q2",
            "values": [["ID", "Timestamp"], [1, "2025-03-14 09:30:00"]]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(APPEND))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    assert!(!client.ensure_header(&["ID"]).await.expect("header check"));
}

#[tokio::test]
async fn append_row_posts_single_row() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(APPEND))
        .and(body_json(json!({ "values": [[7, "Depot", 12.5]] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "updates": {} })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    client
        .append_row(&[json!(7), json!("Depot"), json!(12.5)])
        .await
        .expect("append");
}

#[tokio::test]
async fn append_row_surfaces_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(APPEND))
        .respond_with(ResponseTemplate::new(401).set_body_string("UNAUTHENTICATED"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.append_row(&[json!(1)]).await.unwrap_err();
    assert!(
        matches!(err, SheetsError::UnexpectedStatus { status: 401, ref body } if body == "UNAUTHENTICATED"),
        "got {err:?}"
    );
}

#[tokio::test]
async fn append_row_stores_text_cells_unparsed() {
    let server = MockServer::start().await;
    let cells = [
        json!(3),
        json!("2025-03-14 09:30:00"),
        json!("=HYPERLINK(\"http://example.test\")"),
        json!("6.4,6.35"),
    ];
    Mock::given(method("POST"))
        .and(path(APPEND))
        .and(query_param("valueInputOption", "RAW"))
        .and(query_param("insertDataOption", "INSERT_ROWS"))
        .and(body_json(json!({ "values": [cells.clone()] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "updates": {} })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    client.append_row(&cells).await.expect("append");
}

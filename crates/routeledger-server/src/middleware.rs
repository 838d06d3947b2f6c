use std::time::Instant;

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Instrument;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest caller-supplied id that is echoed back.
const MAX_REQUEST_ID_LEN: usize = 128;

/// Request correlation id, stored as a request extension for handlers to put
/// in the response envelope.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Accepts a caller's id only when it is short printable ASCII; anything
/// else gets a fresh `UUIDv4`.
fn resolve_request_id(incoming: Option<&HeaderValue>) -> String {
    incoming
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|id| {
            !id.is_empty()
                && id.len() <= MAX_REQUEST_ID_LEN
                && id.bytes().all(|b| b.is_ascii_graphic())
        })
        .map_or_else(|| Uuid::new_v4().to_string(), ToOwned::to_owned)
}

/// Tags each request with an id, runs it inside a span carrying that id, and
/// echoes the id on the response.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = resolve_request_id(req.headers().get(REQUEST_ID_HEADER));
    let span = tracing::info_span!(
        "request",
        request_id = %id,
        method = %req.method(),
        path = %req.uri().path(),
    );

    req.extensions_mut().insert(RequestId(id.clone()));

    let started = Instant::now();
    let mut res = next.run(req).instrument(span.clone()).await;

    span.in_scope(|| {
        tracing::debug!(
            status = res.status().as_u16(),
            elapsed_ms = started.elapsed().as_millis(),
            "request finished"
        );
    });

    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert(REQUEST_ID_HEADER, val);
    }

    res
}

#[cfg(test)]
mod tests {
    use axum::{body::Body, routing::get, Extension, Router};
    use tower::ServiceExt;

    use super::*;

    #[test]
    fn keeps_well_formed_caller_id() {
        let header = HeaderValue::from_static("route-42");
        assert_eq!(resolve_request_id(Some(&header)), "route-42");
    }

    #[test]
    fn replaces_blank_or_spaced_ids() {
        for raw in ["   ", "two words"] {
            let header = HeaderValue::from_static(raw);
            let id = resolve_request_id(Some(&header));
            assert!(Uuid::parse_str(&id).is_ok(), "{raw:?} should be replaced, got {id}");
        }
    }

    #[test]
    fn replaces_overlong_ids() {
        let long = "a".repeat(MAX_REQUEST_ID_LEN + 1);
        let header = HeaderValue::from_str(&long).unwrap();
        let id = resolve_request_id(Some(&header));
        assert!(Uuid::parse_str(&id).is_ok());
    }

    #[tokio::test]
    async fn handler_sees_the_id_echoed_on_the_response() {
        let app = Router::new()
            .route(
                "/",
                get(|Extension(id): Extension<RequestId>| async move { id.0 }),
            )
            .layer(axum::middleware::from_fn(request_id));

        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/")
                    .header(REQUEST_ID_HEADER, "abc-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.headers()[REQUEST_ID_HEADER], "abc-123");
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"abc-123");
    }
}

mod deliveries;
mod exports;

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{delete, get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use routeledger_core::EarningTiers;
use routeledger_ledger::LedgerError;
use routeledger_maps::MapsClient;
use routeledger_sheets::SheetsClient;

use crate::middleware::{request_id, RequestId, REQUEST_ID_HEADER};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub maps: Arc<MapsClient>,
    pub tiers: Arc<EarningTiers>,
    /// `None` when no spreadsheet is configured; exports are rejected.
    pub sheets: Option<Arc<SheetsClient>>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    /// Raw provider payload for upstream failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    database: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub(super) fn new(request_id: String, data: T) -> Self {
        Self {
            data,
            meta: ResponseMeta::new(request_id),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
                details: None,
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }

    #[must_use]
    pub fn with_details(mut self, details: Option<serde_json::Value>) -> Self {
        self.error.details = details;
        self
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "validation_error" | "unresolved_location" => StatusCode::BAD_REQUEST,
            "provider_response_error" => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn map_db_error(request_id: String, error: &routeledger_db::DbError) -> ApiError {
    if matches!(error, routeledger_db::DbError::NotFound) {
        return ApiError::new(request_id, "not_found", "delivery not found");
    }
    tracing::error!(error = %error, "database query failed");
    ApiError::new(request_id, "persistence_error", "database query failed")
}

pub(super) fn map_ledger_error(request_id: String, error: &LedgerError) -> ApiError {
    match error {
        LedgerError::Persistence(db) => map_db_error(request_id, db),
        LedgerError::Validation(_) | LedgerError::ExportNotConfigured => {
            ApiError::new(request_id, error.kind(), error.to_string())
        }
        _ => {
            tracing::warn!(error = %error, kind = error.kind(), "ledger operation failed");
            ApiError::new(request_id, error.kind(), error.to_string())
                .with_details(error.details().cloned())
        }
    }
}

/// Turns a body that is not valid JSON into the usual validation envelope.
pub(super) fn map_json_rejection(request_id: String, rejection: &JsonRejection) -> ApiError {
    ApiError::new(
        request_id,
        "validation_error",
        format!("invalid request body: {}", rejection.body_text()),
    )
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
        .expose_headers([HeaderName::from_static(REQUEST_ID_HEADER)])
}

fn delivery_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/v1/deliveries",
            get(deliveries::list_deliveries)
                .post(deliveries::create_delivery)
                .delete(deliveries::clear_deliveries),
        )
        .route(
            "/api/v1/deliveries/totals",
            get(deliveries::delivery_totals),
        )
        .route(
            "/api/v1/deliveries/{id}",
            delete(deliveries::delete_delivery),
        )
        .route("/api/v1/exports", post(exports::run_export))
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health))
        .merge(delivery_routes())
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let meta = ResponseMeta::new(req_id.0);

    match routeledger_db::health_check(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse {
                data: HealthData {
                    status: "ok",
                    database: "ok",
                },
                meta,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: database unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse {
                    data: HealthData {
                        status: "degraded",
                        database: "unavailable",
                    },
                    meta,
                }),
            )
        }
    }
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;

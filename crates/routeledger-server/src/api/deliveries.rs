//! Delivery handlers: submit, list, totals, delete, clear.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Serialize;

use routeledger_core::{split_segment_distances, DeliveryRecord, DeliverySubmission};
use routeledger_db::DeliveryTotals;

use crate::middleware::RequestId;

use super::{map_db_error, map_json_rejection, map_ledger_error, ApiError, ApiResponse, AppState};

#[derive(Debug, Serialize)]
pub(in crate::api) struct CreatedDelivery {
    pub id: i64,
    pub distance: Option<f64>,
    pub segment_distances: Vec<f64>,
    pub earnings: Option<f64>,
}

#[derive(Debug, Serialize)]
pub(in crate::api) struct ClearedDeliveries {
    pub deleted: u64,
}

/// POST /api/v1/deliveries: validate, price and store one delivery.
pub(in crate::api) async fn create_delivery(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<DeliverySubmission>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<CreatedDelivery>>), ApiError> {
    let Json(submission) = body.map_err(|e| map_json_rejection(req_id.0.clone(), &e))?;

    let row = routeledger_ledger::submit_delivery(&state.pool, &state.maps, &state.tiers, submission)
        .await
        .map_err(|e| map_ledger_error(req_id.0.clone(), &e))?;

    let created = CreatedDelivery {
        id: row.id,
        distance: row.distance,
        segment_distances: split_segment_distances(row.segment_distances.as_deref())
            .unwrap_or_default(),
        earnings: row.earnings,
    };
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(req_id.0, created)),
    ))
}

/// GET /api/v1/deliveries: every stored delivery in id order.
pub(in crate::api) async fn list_deliveries(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<DeliveryRecord>>>, ApiError> {
    let rows = routeledger_db::list_deliveries(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let records = rows.into_iter().map(DeliveryRecord::from).collect();
    Ok(Json(ApiResponse::new(req_id.0, records)))
}

/// GET /api/v1/deliveries/totals
pub(in crate::api) async fn delivery_totals(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<DeliveryTotals>>, ApiError> {
    let totals = routeledger_db::delivery_totals(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse::new(req_id.0, totals)))
}

/// DELETE /api/v1/deliveries/:id
pub(in crate::api) async fn delete_delivery(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    routeledger_db::delete_delivery(&state.pool, id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    tracing::info!(id, "delivery deleted");
    Ok(Json(ApiResponse::new(
        req_id.0,
        serde_json::json!({ "id": id, "deleted": true }),
    )))
}

/// DELETE /api/v1/deliveries: remove every delivery.
pub(in crate::api) async fn clear_deliveries(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<ClearedDeliveries>>, ApiError> {
    let deleted = routeledger_db::clear_deliveries(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    tracing::info!(deleted, "all deliveries cleared");
    Ok(Json(ApiResponse::new(req_id.0, ClearedDeliveries { deleted })))
}

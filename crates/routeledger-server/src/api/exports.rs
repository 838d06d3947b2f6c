use axum::{extract::State, Extension, Json};

use routeledger_ledger::{reconcile_unexported, LedgerError, ReconcileReport};

use crate::middleware::RequestId;

use super::{map_ledger_error, ApiError, ApiResponse, AppState};

/// POST /api/v1/exports: push every unexported delivery to the spreadsheet.
pub(in crate::api) async fn run_export(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<ReconcileReport>>, ApiError> {
    let Some(sheets) = state.sheets.as_deref() else {
        return Err(map_ledger_error(
            req_id.0,
            &LedgerError::ExportNotConfigured,
        ));
    };

    let report = reconcile_unexported(&state.pool, sheets)
        .await
        .map_err(|e| map_ledger_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse::new(req_id.0, report)))
}

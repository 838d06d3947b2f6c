use routeledger_core::CoreError;
use routeledger_db::DbError;
use routeledger_maps::MapsError;
use routeledger_sheets::SheetsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error(transparent)]
    Validation(#[from] CoreError),

    #[error("route computation failed: {0}")]
    Route(#[source] MapsError),

    #[error("failed to geocode stop: {address}")]
    UnresolvedStop { address: String },

    #[error("stop earnings lookup failed: {0}")]
    StopEarnings(#[source] MapsError),

    #[error("persistence failed: {0}")]
    Persistence(#[from] DbError),

    #[error("spreadsheet export is not configured")]
    ExportNotConfigured,

    #[error("export sink failed after {rows_emitted} row(s): {source}")]
    ExportSink {
        rows_emitted: usize,
        #[source]
        source: SheetsError,
    },
}

impl LedgerError {
    /// Stable machine-readable category for callers.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            LedgerError::Validation(_) | LedgerError::ExportNotConfigured => "validation_error",
            LedgerError::Route(e) | LedgerError::StopEarnings(e) => match e {
                MapsError::UnresolvedLocation { .. } => "unresolved_location",
                MapsError::TooFewWaypoints(_) => "validation_error",
                _ => "provider_response_error",
            },
            LedgerError::UnresolvedStop { .. } => "unresolved_location",
            LedgerError::Persistence(_) => "persistence_error",
            LedgerError::ExportSink { .. } => "export_sink_error",
        }
    }

    /// Raw provider payload, when the failure carries one.
    #[must_use]
    pub fn details(&self) -> Option<&serde_json::Value> {
        match self {
            LedgerError::Route(e) | LedgerError::StopEarnings(e) => e.payload(),
            _ => None,
        }
    }
}

//! Emits unexported deliveries to a row sink, flagging each after it lands.
//!
//! A row is flagged only once its append succeeded, so a sink failure part
//! way through a batch leaves the remaining rows unexported for the next run.
//! A failure to flag after a successful append can duplicate that one row on
//! retry; it can never lose one.

use serde::Serialize;
use sqlx::PgPool;

use routeledger_core::{build_export_rows, DeliveryRecord, EXPORT_HEADERS};
use routeledger_db::{list_unexported_deliveries, mark_delivery_exported};
use routeledger_sheets::RowSink;

use crate::error::LedgerError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    pub rows_emitted: usize,
    pub header_written: bool,
}

/// Exports every delivery not yet flagged as exported, oldest first.
///
/// The header row is written first when the sink is empty. Derived columns
/// are computed from the whole unexported batch, so the average-price
/// fallback only sees rows in this batch.
///
/// # Errors
///
/// - [`LedgerError::ExportSink`] when the sink rejects the header or a row;
///   rows emitted before the failure stay flagged.
/// - [`LedgerError::Persistence`] if the batch cannot be read or a flag
///   cannot be written.
pub async fn reconcile_unexported<S>(pool: &PgPool, sink: &S) -> Result<ReconcileReport, LedgerError>
where
    S: RowSink + Sync,
{
    let header_written = sink
        .ensure_header(&EXPORT_HEADERS)
        .await
        .map_err(|source| LedgerError::ExportSink {
            rows_emitted: 0,
            source,
        })?;

    let records: Vec<DeliveryRecord> = list_unexported_deliveries(pool)
        .await?
        .into_iter()
        .map(DeliveryRecord::from)
        .collect();
    let rows = build_export_rows(&records);

    let mut report = ReconcileReport {
        rows_emitted: 0,
        header_written,
    };

    for row in &rows {
        if let Err(source) = sink.append_row(&row.cells()).await {
            tracing::error!(
                id = row.id,
                rows_emitted = report.rows_emitted,
                error = %source,
                "export sink rejected row; stopping batch"
            );
            return Err(LedgerError::ExportSink {
                rows_emitted: report.rows_emitted,
                source,
            });
        }
        report.rows_emitted += 1;

        if !mark_delivery_exported(pool, row.id).await? {
            tracing::warn!(id = row.id, "delivery vanished before it could be flagged");
        }
        tracing::debug!(id = row.id, "delivery exported");
    }

    tracing::info!(
        rows_emitted = report.rows_emitted,
        header_written = report.header_written,
        "export reconciled"
    );
    Ok(report)
}

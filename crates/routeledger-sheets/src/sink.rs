use std::future::Future;

use serde_json::Value;

use crate::error::SheetsError;

/// Destination for exported rows.
///
/// Appends are not transactional: a row that was appended stays appended even
/// if a later append in the same batch fails.
pub trait RowSink {
    /// Writes `header` as the first row if the sheet has no rows yet.
    /// Returns `true` when the header was written.
    fn ensure_header(
        &self,
        header: &[&str],
    ) -> impl Future<Output = Result<bool, SheetsError>> + Send;

    /// Appends one row after the last non-empty row.
    fn append_row(&self, cells: &[Value]) -> impl Future<Output = Result<(), SheetsError>> + Send;
}

//! Delivery aggregation and export reconciliation.
//!
//! [`aggregator`] turns a submission into a persisted delivery with route
//! distance and per-stop earnings. [`reconciler`] emits unexported deliveries
//! to a [`routeledger_sheets::RowSink`] and flags each one after it is written.

pub mod aggregator;
pub mod error;
pub mod reconciler;

pub use aggregator::{build_delivery, earnings_for_stops, submit_delivery};
pub use error::LedgerError;
pub use reconciler::{reconcile_unexported, ReconcileReport};

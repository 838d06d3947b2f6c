//! Spreadsheet sink for exported delivery rows.

pub mod client;
pub mod error;
pub mod sink;

pub use client::SheetsClient;
pub use error::SheetsError;
pub use sink::RowSink;

pub mod app_config;
pub mod config;
pub mod delivery;
pub mod earnings;
pub mod export;
pub mod rounding;

pub use app_config::{AppConfig, Environment, MapsConfig, SheetsConfig};
pub use config::{load_app_config, load_app_config_from_env};
pub use delivery::{
    join_segment_distances, join_stops, split_segment_distances, split_stops, DeliveryRecord,
    DeliveryRequest, DeliverySubmission, NewDelivery, STOP_DELIMITER,
};
pub use earnings::{load_earning_tiers, parse_earning_tiers, EarningTier, EarningTiers};
pub use export::{
    average_price_per_liter, build_export_row, build_export_rows, net_earnings,
    recomputed_distance, stop_slots, ExportRow, EXPORT_HEADERS, EXPORT_STOP_SLOTS, KM_PER_LITER,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read earning tiers file {path}: {source}")]
    TiersFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse earning tiers file: {0}")]
    TiersFileParse(#[from] serde_yaml::Error),

    #[error("earning tiers validation failed: {0}")]
    Validation(String),
}

/// Errors raised while validating a delivery submission.
#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("invalid value for {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

const DEFAULT_GEOCODE_BASE_URL: &str = "https://maps.googleapis.com";
const DEFAULT_ROUTES_BASE_URL: &str = "https://routes.googleapis.com";
const DEFAULT_SHEETS_BASE_URL: &str = "https://sheets.googleapis.com";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var).ok().filter(|v| !v.trim().is_empty())
    };

    let or_default = |var: &str, default: &str| -> String {
        optional(var).unwrap_or_else(|| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let database_url = require("DATABASE_URL")?;
    let google_maps_api_key = optional("GOOGLE_MAPS_API_KEY");

    let env = parse_environment(&or_default("ROUTELEDGER_ENV", "development"));
    let bind_addr = parse_addr("ROUTELEDGER_BIND_ADDR", "0.0.0.0:5000")?;
    let log_level = or_default("ROUTELEDGER_LOG_LEVEL", "info");

    let geocode_base_url = or_default("ROUTELEDGER_GEOCODE_BASE_URL", DEFAULT_GEOCODE_BASE_URL);
    let routes_base_url = or_default("ROUTELEDGER_ROUTES_BASE_URL", DEFAULT_ROUTES_BASE_URL);
    let sheets_base_url = or_default("ROUTELEDGER_SHEETS_BASE_URL", DEFAULT_SHEETS_BASE_URL);
    let sheets_spreadsheet_id = optional("SHEETS_SPREADSHEET_ID");
    let sheets_access_token = optional("SHEETS_ACCESS_TOKEN");
    let sheet_range = or_default("ROUTELEDGER_SHEET_RANGE", "Sheet1");
    let earning_tiers_path = optional("ROUTELEDGER_EARNING_TIERS_PATH").map(PathBuf::from);

    let db_max_connections = parse_u32("ROUTELEDGER_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("ROUTELEDGER_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("ROUTELEDGER_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let http_timeout_secs = parse_u64("ROUTELEDGER_HTTP_TIMEOUT_SECS", "30")?;
    let http_user_agent = or_default("ROUTELEDGER_HTTP_USER_AGENT", "routeledger/0.1");

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        google_maps_api_key,
        geocode_base_url,
        routes_base_url,
        sheets_base_url,
        sheets_spreadsheet_id,
        sheets_access_token,
        sheet_range,
        earning_tiers_path,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        http_timeout_secs,
        http_user_agent,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

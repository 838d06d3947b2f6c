use std::net::SocketAddr;
use std::path::PathBuf;

use crate::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub google_maps_api_key: Option<String>,
    pub geocode_base_url: String,
    pub routes_base_url: String,
    pub sheets_base_url: String,
    pub sheets_spreadsheet_id: Option<String>,
    pub sheets_access_token: Option<String>,
    pub sheet_range: String,
    pub earning_tiers_path: Option<PathBuf>,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub http_timeout_secs: u64,
    pub http_user_agent: String,
}

/// Credentials and endpoints handed to the maps client at construction.
#[derive(Clone)]
pub struct MapsConfig {
    pub api_key: String,
    pub geocode_base_url: String,
    pub routes_base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

/// Credentials and target sheet handed to the sheets client at construction.
#[derive(Clone)]
pub struct SheetsConfig {
    pub base_url: String,
    pub spreadsheet_id: String,
    pub access_token: String,
    pub range: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl AppConfig {
    /// Returns the maps settings. The key is only demanded here, so commands
    /// that never geocode run without it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] when `GOOGLE_MAPS_API_KEY` is unset.
    pub fn maps_config(&self) -> Result<MapsConfig, ConfigError> {
        let api_key = self
            .google_maps_api_key
            .clone()
            .ok_or_else(|| ConfigError::MissingEnvVar("GOOGLE_MAPS_API_KEY".to_string()))?;
        Ok(MapsConfig {
            api_key,
            geocode_base_url: self.geocode_base_url.clone(),
            routes_base_url: self.routes_base_url.clone(),
            timeout_secs: self.http_timeout_secs,
            user_agent: self.http_user_agent.clone(),
        })
    }

    /// Returns the sheets settings, or `None` when the spreadsheet id or
    /// access token is not configured.
    #[must_use]
    pub fn sheets_config(&self) -> Option<SheetsConfig> {
        let spreadsheet_id = self.sheets_spreadsheet_id.clone()?;
        let access_token = self.sheets_access_token.clone()?;
        Some(SheetsConfig {
            base_url: self.sheets_base_url.clone(),
            spreadsheet_id,
            access_token,
            range: self.sheet_range.clone(),
            timeout_secs: self.http_timeout_secs,
            user_agent: self.http_user_agent.clone(),
        })
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field(
                "google_maps_api_key",
                &self.google_maps_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("geocode_base_url", &self.geocode_base_url)
            .field("routes_base_url", &self.routes_base_url)
            .field("sheets_base_url", &self.sheets_base_url)
            .field("sheets_spreadsheet_id", &self.sheets_spreadsheet_id)
            .field(
                "sheets_access_token",
                &self.sheets_access_token.as_ref().map(|_| "[redacted]"),
            )
            .field("sheet_range", &self.sheet_range)
            .field("earning_tiers_path", &self.earning_tiers_path)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("http_user_agent", &self.http_user_agent)
            .finish()
    }
}

impl std::fmt::Debug for MapsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapsConfig")
            .field("api_key", &"[redacted]")
            .field("geocode_base_url", &self.geocode_base_url)
            .field("routes_base_url", &self.routes_base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish_non_exhaustive()
    }
}

impl std::fmt::Debug for SheetsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetsConfig")
            .field("base_url", &self.base_url)
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("access_token", &"[redacted]")
            .field("range", &self.range)
            .finish_non_exhaustive()
    }
}

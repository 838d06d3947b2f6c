mod api;
mod middleware;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use routeledger_maps::MapsClient;
use routeledger_sheets::SheetsClient;

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = routeledger_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = routeledger_db::PoolConfig::from_app_config(&config);
    let pool = routeledger_db::connect_pool(&config.database_url, pool_config).await?;
    let applied = routeledger_db::run_migrations(&pool).await?;
    tracing::info!(applied, "migrations up to date");

    let tiers = match &config.earning_tiers_path {
        Some(path) => routeledger_core::load_earning_tiers(path)?,
        None => routeledger_core::EarningTiers::default(),
    };
    let maps = MapsClient::new(&config.maps_config()?)?;
    let sheets = match config.sheets_config() {
        Some(sheets_config) => Some(Arc::new(SheetsClient::new(&sheets_config)?)),
        None => {
            tracing::warn!("spreadsheet export not configured; export endpoint will reject requests");
            None
        }
    };

    let state = AppState {
        pool,
        maps: Arc::new(maps),
        tiers: Arc::new(tiers),
        sheets,
    };
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = %config.env, "routeledger server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}

mod deliveries;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "routeledger-cli")]
#[command(about = "Delivery ledger command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Apply pending database migrations.
    Migrate,
    /// Compute distance and earnings for a delivery and store it.
    Submit {
        #[arg(long)]
        origin: String,
        #[arg(long)]
        destination: String,
        /// Intermediate stop, in route order. Repeat for several stops.
        #[arg(long = "stop")]
        stops: Vec<String>,
        #[arg(long)]
        fuel_cost: f64,
        #[arg(long = "fuel-liters")]
        fuel_in_liters: f64,
        #[arg(long)]
        price_per_liter: f64,
    },
    /// List every stored delivery.
    List,
    /// Show aggregate distance, earnings and fuel figures.
    Totals,
    /// Delete one delivery by id.
    Delete { id: i64 },
    /// Delete every delivery.
    Clear {
        /// Confirm the deletion.
        #[arg(long)]
        yes: bool,
    },
    /// Append unexported deliveries to the configured spreadsheet.
    Export,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = routeledger_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let pool_config = routeledger_db::PoolConfig::from_app_config(&config);
    let pool = routeledger_db::connect_pool(&config.database_url, pool_config).await?;

    match cli.command {
        Commands::Migrate => {
            let applied = routeledger_db::run_migrations(&pool).await?;
            deliveries::print_json(&serde_json::json!({ "applied": applied }))?;
        }
        Commands::Submit {
            origin,
            destination,
            stops,
            fuel_cost,
            fuel_in_liters,
            price_per_liter,
        } => {
            let submission = routeledger_core::DeliverySubmission {
                origin: Some(origin),
                destination: Some(destination),
                stops: Some(stops),
                fuel_cost: Some(fuel_cost),
                fuel_in_liters: Some(fuel_in_liters),
                price_per_liter: Some(price_per_liter),
            };
            deliveries::run_submit(&pool, &config, submission).await?;
        }
        Commands::List => deliveries::run_list(&pool).await?,
        Commands::Totals => deliveries::run_totals(&pool).await?,
        Commands::Delete { id } => deliveries::run_delete(&pool, id).await?,
        Commands::Clear { yes } => deliveries::run_clear(&pool, yes).await?,
        Commands::Export => deliveries::run_export(&pool, &config).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests;

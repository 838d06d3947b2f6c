//! Delivery command handlers for the CLI.
//!
//! Each handler prints its result to stdout as pretty JSON; logs go to stderr.

use serde::Serialize;

use routeledger_core::{AppConfig, DeliveryRecord, DeliverySubmission, EarningTiers};
use routeledger_ledger::LedgerError;
use routeledger_maps::MapsClient;
use routeledger_sheets::SheetsClient;

pub(crate) fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Logs the failure kind and any provider payload before handing the error back.
fn report(error: LedgerError) -> anyhow::Error {
    match error.details() {
        Some(details) => tracing::error!(kind = error.kind(), %details, "{error}"),
        None => tracing::error!(kind = error.kind(), "{error}"),
    }
    error.into()
}

fn load_tiers(config: &AppConfig) -> anyhow::Result<EarningTiers> {
    Ok(match &config.earning_tiers_path {
        Some(path) => routeledger_core::load_earning_tiers(path)?,
        None => EarningTiers::default(),
    })
}

/// Validate, price and store one delivery.
///
/// # Errors
///
/// Returns an error if the tiers file cannot be loaded, `GOOGLE_MAPS_API_KEY`
/// is unset, or the submission fails at any stage.
pub(crate) async fn run_submit(
    pool: &sqlx::PgPool,
    config: &AppConfig,
    submission: DeliverySubmission,
) -> anyhow::Result<()> {
    let tiers = load_tiers(config)?;
    let maps = MapsClient::new(&config.maps_config()?)?;

    let row = routeledger_ledger::submit_delivery(pool, &maps, &tiers, submission)
        .await
        .map_err(report)?;

    print_json(&DeliveryRecord::from(row))
}

pub(crate) async fn run_list(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let records: Vec<DeliveryRecord> = routeledger_db::list_deliveries(pool)
        .await?
        .into_iter()
        .map(DeliveryRecord::from)
        .collect();
    print_json(&records)
}

pub(crate) async fn run_totals(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let totals = routeledger_db::delivery_totals(pool).await?;
    print_json(&totals)
}

pub(crate) async fn run_delete(pool: &sqlx::PgPool, id: i64) -> anyhow::Result<()> {
    match routeledger_db::delete_delivery(pool, id).await {
        Ok(()) => print_json(&serde_json::json!({ "id": id, "deleted": true })),
        Err(routeledger_db::DbError::NotFound) => anyhow::bail!("delivery {id} not found"),
        Err(e) => Err(e.into()),
    }
}

/// Delete every delivery. Refuses to run without explicit confirmation.
pub(crate) async fn run_clear(pool: &sqlx::PgPool, confirmed: bool) -> anyhow::Result<()> {
    if !confirmed {
        anyhow::bail!("refusing to delete every delivery without --yes");
    }
    let deleted = routeledger_db::clear_deliveries(pool).await?;
    tracing::info!(deleted, "all deliveries cleared");
    print_json(&serde_json::json!({ "deleted": deleted }))
}

/// Push unexported deliveries to the configured spreadsheet.
///
/// # Errors
///
/// Returns an error if no spreadsheet is configured, the sheets client cannot
/// be built, or the reconciler fails part way through.
pub(crate) async fn run_export(pool: &sqlx::PgPool, config: &AppConfig) -> anyhow::Result<()> {
    let sheets_config = config
        .sheets_config()
        .ok_or_else(|| report(LedgerError::ExportNotConfigured))?;
    let sheets = SheetsClient::new(&sheets_config)?;

    let report_data = routeledger_ledger::reconcile_unexported(pool, &sheets)
        .await
        .map_err(report)?;
    print_json(&report_data)
}

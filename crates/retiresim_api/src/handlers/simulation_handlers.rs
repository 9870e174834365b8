use axum::Json;
use retiresim_core::config::SimulationConfig;
use retiresim_core::model::CombinedReport;
use retiresim_core::simulation::{
    self, AccumulationReport, CancellationToken, WithdrawalReport, run_accumulation, run_combined, run_withdrawal,
};

use crate::error::ApiResult;

/// `POST /api/simulate/withdrawal` — runs one or more withdrawal strategies
/// against the given config and returns per-strategy trial reports plus the
/// aggregate summary.
pub async fn simulate_withdrawal(Json(config): Json<SimulationConfig>) -> ApiResult<Json<WithdrawalReport>> {
    let report = tokio::task::spawn_blocking(move || run_withdrawal(&config, &CancellationToken::new())).await??;
    Ok(Json(report))
}

/// `POST /api/simulate/accumulation`.
pub async fn simulate_accumulation(Json(config): Json<SimulationConfig>) -> ApiResult<Json<AccumulationReport>> {
    let report = tokio::task::spawn_blocking(move || run_accumulation(&config, &CancellationToken::new())).await??;
    Ok(Json(report))
}

/// `POST /api/simulate/combined` — accumulation followed by withdrawal, one
/// continuous market scenario per trial.
pub async fn simulate_combined(Json(config): Json<SimulationConfig>) -> ApiResult<Json<CombinedReport>> {
    let report = tokio::task::spawn_blocking(move || run_combined(&config, &CancellationToken::new())).await??;
    Ok(Json(report))
}

/// `POST /api/validate` — validates without running a single trial.
pub async fn validate_config(Json(config): Json<SimulationConfig>) -> ApiResult<Json<SimulationConfig>> {
    let config = tokio::task::spawn_blocking(move || simulation::validate(&config)).await??;
    Ok(Json(config))
}

/// `GET /api/tax-regions` — map of country to the list of regions it has a
/// tax schedule for.
pub async fn tax_regions() -> Json<std::collections::HashMap<String, Vec<String>>> {
    Json(simulation::tax_regions())
}

/// `GET /api/countries` — map of country to its historical series coverage.
pub async fn countries() -> Json<std::collections::HashMap<String, retiresim_core::reference_data::CountryInfo>> {
    Json(simulation::countries())
}

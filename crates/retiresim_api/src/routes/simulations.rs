use axum::{Router, routing::{get, post}};

use crate::handlers;

pub fn simulation_routes() -> Router {
    Router::new()
        .route("/api/simulate/withdrawal", post(handlers::simulate_withdrawal))
        .route("/api/simulate/accumulation", post(handlers::simulate_accumulation))
        .route("/api/simulate/combined", post(handlers::simulate_combined))
        .route("/api/validate", post(handlers::validate_config))
        .route("/api/tax-regions", get(handlers::tax_regions))
        .route("/api/countries", get(handlers::countries))
}

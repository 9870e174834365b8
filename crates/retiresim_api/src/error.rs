use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use retiresim_core::error::{ConfigErrorReason, EngineError};
use serde_json::json;

/// Errors surfaced over HTTP. Every kernel `EngineError` maps onto one of
/// these; `JoinError` covers the `spawn_blocking` task itself panicking.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Config(#[from] retiresim_core::error::ConfigError),

    #[error("simulation was cancelled")]
    Cancelled,

    #[error("reference data missing: {0}")]
    ReferenceDataMissing(String),

    #[error("internal server error")]
    InternalError,
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Config(e) => ApiError::Config(e),
            EngineError::Cancelled => ApiError::Cancelled,
            EngineError::ReferenceDataMissing(what) => ApiError::ReferenceDataMissing(what),
            EngineError::WorkerPanic => {
                tracing::error!("worker thread panicked during simulation");
                ApiError::InternalError
            }
        }
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        tracing::error!(%err, "simulation task panicked");
        ApiError::InternalError
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Config(_) => StatusCode::BAD_REQUEST,
            ApiError::Cancelled => StatusCode::CONFLICT,
            ApiError::ReferenceDataMissing(_) => StatusCode::NOT_FOUND,
            ApiError::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let path = match &self {
            ApiError::Config(e) => Some(e.path.clone()),
            _ => None,
        };
        let reason = match &self {
            ApiError::Config(e) => Some(config_error_reason_code(&e.reason)),
            _ => None,
        };

        let body = Json(json!({
            "error": self.to_string(),
            "path": path,
            "reason": reason,
        }));

        (status, body).into_response()
    }
}

/// A stable, machine-matchable code per [`ConfigErrorReason`] variant, so
/// callers can branch on the failure kind without parsing the message.
fn config_error_reason_code(reason: &ConfigErrorReason) -> &'static str {
    match reason {
        ConfigErrorReason::UnknownCountry(_) => "unknown_country",
        ConfigErrorReason::UnknownRegion { .. } => "unknown_region",
        ConfigErrorReason::AllocationNotNormalized(_) => "allocation_not_normalized",
        ConfigErrorReason::NegativeStdDev(_) => "negative_std_dev",
        ConfigErrorReason::ChunkYearsExceedsSeriesLength { .. } => "chunk_years_exceeds_series_length",
        ConfigErrorReason::EmptyStrategyList => "empty_strategy_list",
        ConfigErrorReason::NonPositiveSimulationYears(_) => "non_positive_simulation_years",
        ConfigErrorReason::NonPositiveScenarioYears(_) => "non_positive_scenario_years",
        ConfigErrorReason::NonPositiveNumSimulations(_) => "non_positive_num_simulations",
        ConfigErrorReason::InvalidRate(_) => "invalid_rate",
    }
}

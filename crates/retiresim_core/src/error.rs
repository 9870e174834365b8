//! Kernel-level error types.
//!
//! The kernel surfaces exactly three error kinds to callers, per the external
//! contract: configuration problems detected before any trial runs, an
//! explicit cancellation, and reference data that the build does not ship.
//! Trial-level outcomes (depletion, target miss) are never errors — they are
//! recorded on the trial report and handled by the aggregator.

use std::fmt;

pub type Result<T> = std::result::Result<T, EngineError>;

/// A configuration problem detected during validation, tagged with the
/// dotted path of the offending field so callers can point a user at it.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigError {
    pub path: String,
    pub reason: ConfigErrorReason,
}

impl ConfigError {
    pub fn new(path: impl Into<String>, reason: ConfigErrorReason) -> Self {
        Self {
            path: path.into(),
            reason,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigErrorReason {
    UnknownCountry(String),
    UnknownRegion { country: String, region: String },
    AllocationNotNormalized(f64),
    NegativeStdDev(f64),
    ChunkYearsExceedsSeriesLength { chunk_years: usize, available: usize },
    EmptyStrategyList,
    NonPositiveSimulationYears(i64),
    NonPositiveScenarioYears(i64),
    NonPositiveNumSimulations(i64),
    InvalidRate(f64),
}

impl fmt::Display for ConfigErrorReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigErrorReason::UnknownCountry(c) => write!(f, "unknown country '{c}'"),
            ConfigErrorReason::UnknownRegion { country, region } => {
                write!(f, "unknown region '{region}' for country '{country}'")
            }
            ConfigErrorReason::AllocationNotNormalized(sum) => {
                write!(f, "allocation fractions sum to {sum}, expected 1.0")
            }
            ConfigErrorReason::NegativeStdDev(v) => write!(f, "standard deviation {v} is negative"),
            ConfigErrorReason::ChunkYearsExceedsSeriesLength {
                chunk_years,
                available,
            } => write!(
                f,
                "chunk_years {chunk_years} exceeds historical series length {available}"
            ),
            ConfigErrorReason::EmptyStrategyList => write!(f, "strategy list must not be empty"),
            ConfigErrorReason::NonPositiveSimulationYears(v) => {
                write!(f, "simulation_years must be positive, got {v}")
            }
            ConfigErrorReason::NonPositiveScenarioYears(v) => {
                write!(f, "scenario_years must be positive, got {v}")
            }
            ConfigErrorReason::NonPositiveNumSimulations(v) => {
                write!(f, "num_simulations must be positive, got {v}")
            }
            ConfigErrorReason::InvalidRate(v) => write!(f, "rate {v} is not finite or is negative"),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.reason)
    }
}

impl std::error::Error for ConfigError {}

/// Errors surfaced by the kernel's blocking entry points.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    Config(ConfigError),
    ReferenceDataMissing(String),
    Cancelled,
    WorkerPanic,
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Config(e) => write!(f, "{e}"),
            EngineError::ReferenceDataMissing(what) => write!(f, "reference data missing: {what}"),
            EngineError::Cancelled => write!(f, "simulation was cancelled"),
            EngineError::WorkerPanic => write!(f, "a worker thread panicked during trial execution"),
        }
    }
}

impl std::error::Error for EngineError {}

impl From<ConfigError> for EngineError {
    fn from(err: ConfigError) -> Self {
        EngineError::Config(err)
    }
}

//! Retirement planning Monte Carlo kernel
//!
//! This crate provides a Monte Carlo simulation engine for accumulation and
//! withdrawal retirement planning. It supports:
//! - Historical bootstrap and Monte Carlo normal-distribution market scenarios
//! - A closed sum type of withdrawal strategies (fixed SWR, constant dollar,
//!   Hebeler Autopilot II, cash buffer)
//! - Progressive income and wealth tax brackets, inflation-indexed
//! - Combined accumulation-then-withdrawal runs over one continuous scenario
//! - Percentile bands and fixed-width histograms over a batch of trials
//!
//! # Example
//!
//! ```ignore
//! use retiresim_core::config::{InitialPortfolioConfig, ScenarioConfig, SimulationConfig, StrategyConfig, TaxConfig};
//! use retiresim_core::model::Allocation;
//! use retiresim_core::simulation::{run_withdrawal, CancellationToken};
//!
//! let config = SimulationConfig {
//!     initial_portfolio: InitialPortfolioConfig { value: 1_000_000.0, allocation: Allocation::new(0.6, 0.3, 0.1) },
//!     scenario_config: ScenarioConfig::Historical {
//!         country: "US".to_string(), chunk_years: None, shuffle: true, randomize_start: true, cash_return: 0.01,
//!     },
//!     strategy_config: Some(StrategyConfig::FixedSwr { withdrawal_rate: 0.04, minimum_withdrawal: 0.0, maximum_withdrawal: None }),
//!     ..Default::default()
//! };
//! let report = run_withdrawal(&config, &CancellationToken::new())?;
//! # Ok::<(), retiresim_core::error::EngineError>(())
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod aggregate;
pub mod error;
pub mod reference_data;
pub mod scenario;
pub mod simulation;
pub mod strategy;
pub mod taxes;
pub mod trial;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod config;
pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use config::SimulationConfig;
pub use error::{EngineError, Result};
pub use simulation::{
    AccumulationReport, CancellationToken, WithdrawalReport, countries, run_accumulation, run_combined,
    run_withdrawal, tax_regions, validate,
};

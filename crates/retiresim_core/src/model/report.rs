use serde::{Deserialize, Serialize};

use super::YearRecord;
use crate::aggregate::Histogram;

/// Outcome of one trial: one full pass through `simulation_years`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationReport {
    pub goal_achieved: bool,
    pub final_portfolio_value: f64,
    pub final_real_portfolio_value: f64,
    /// Year-to-target, set only when the trial hit its accumulation target
    /// before running out of years.
    pub time_to_target: Option<u32>,
    pub years: Vec<YearRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Percentiles {
    pub p10: f64,
    pub p25: f64,
    pub median: f64,
    pub p75: f64,
    pub p90: f64,
}

/// Per-year percentile bands across all trials, nominal and real.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentileBand {
    pub year: u32,
    pub portfolio_value: Percentiles,
    pub real_portfolio_value: Percentiles,
    pub income: Percentiles,
    pub real_income: Percentiles,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategySummary {
    pub label: String,
    pub success_rate: f64,
    pub count: usize,
}

/// Cross-trial statistics for one run of the kernel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateSummary {
    pub num_simulations: usize,
    pub success_rate: f64,
    pub simulation_years: u32,
    pub median_time_to_target: Option<f64>,
    pub strategy_summaries: Option<Vec<StrategySummary>>,
    pub percentile_bands: Vec<PercentileBand>,
    pub final_portfolio_histogram: Histogram,
    pub income_histogram: Histogram,
    pub failure_year_histogram: Histogram,
}

/// Summary of a combined accumulation-then-withdrawal run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombinedReport {
    pub accumulation_years: u32,
    pub retirement_years: u32,
    pub accumulation_summary: AggregateSummary,
    pub withdrawal_summary: AggregateSummary,
}

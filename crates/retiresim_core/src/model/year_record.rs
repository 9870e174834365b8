use serde::{Deserialize, Serialize};

use super::{Allocation, YearMarket};

/// Immutable record of one simulated year.
///
/// Invariants (checked by kernel tests, not at construction, since some
/// fields are derived from others in ways that are awkward to assert in a
/// constructor without duplicating the trial runner's arithmetic):
/// - `net_cash_flow == gross_cash_flow - capital_gains_tax - wealth_tax` in the
///   withdrawal phase.
/// - every `real_*` field equals the corresponding nominal field divided by
///   `cumulative_inflation`.
/// - `allocation.is_normalized()`.
/// - `portfolio_value >= 0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearRecord {
    /// 1-based year index within the trial.
    pub year: u32,
    pub portfolio_value: f64,
    pub allocation: Allocation,
    pub market: YearMarket,
    /// Allocation-weighted nominal return realized this year.
    pub combined_return: f64,
    /// Cumulative inflation factor from year 0 (1.0) through this year.
    pub cumulative_inflation: f64,
    /// Contribution made this year (accumulation phase only, 0 otherwise).
    pub contribution: f64,
    /// Gross cash flow withdrawn this year (withdrawal phase only, 0 otherwise).
    pub gross_cash_flow: f64,
    pub capital_gains_tax: f64,
    pub wealth_tax: f64,
    /// `gross_cash_flow - capital_gains_tax - wealth_tax` (withdrawal phase).
    pub net_cash_flow: f64,
    pub real_portfolio_value: f64,
    pub real_contribution: f64,
    pub real_gross_cash_flow: f64,
    pub real_net_cash_flow: f64,
    /// True iff the portfolio remained solvent through this year, and — in
    /// accumulation — the target has not yet been hit or has already been hit.
    pub goal_achieved: bool,
}

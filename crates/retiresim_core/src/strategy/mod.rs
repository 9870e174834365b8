//! Withdrawal strategies: a closed sum type, each variant owning its own
//! per-trial mutable state and dispatched on by the trial runner. Avoids
//! virtual dispatch in the hot loop and makes the match exhaustive at
//! compile time.

mod cash_buffer;
mod constant_dollar;
mod contribution;
mod fixed_swr;
mod hebeler;

pub use cash_buffer::CashBuffer;
pub use constant_dollar::ConstantDollar;
pub use contribution::accumulation_contribution;
pub use fixed_swr::FixedSwr;
pub use hebeler::HebelerAutopilotII;

use crate::taxes::TaxEngine;

/// Everything a withdrawal strategy needs to decide this year's target net
/// income. `prev_year_combined_return` is `0.0` in year one (no prior year).
pub struct WithdrawalContext<'a> {
    pub portfolio_value: f64,
    pub year: u32,
    pub cumulative_inflation: f64,
    pub cumulative_inflation_prev_year: f64,
    pub prev_year_combined_return: f64,
    pub tax: &'a TaxEngine,
}

#[derive(Debug, Clone)]
pub enum Strategy {
    FixedSwr(FixedSwr),
    ConstantDollar(ConstantDollar),
    HebelerAutopilotII(HebelerAutopilotII),
    CashBuffer(CashBuffer),
}

impl Strategy {
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Strategy::FixedSwr(_) => "fixed_swr",
            Strategy::ConstantDollar(_) => "constant_dollar",
            Strategy::HebelerAutopilotII(_) => "hebeler_autopilot_ii",
            Strategy::CashBuffer(_) => "cash_buffer",
        }
    }

    /// Gross withdrawal for this year, already capped at `portfolio_value`.
    pub fn withdraw(&mut self, ctx: &WithdrawalContext) -> f64 {
        let gross = match self {
            Strategy::FixedSwr(s) => s.withdraw(ctx),
            Strategy::ConstantDollar(s) => s.withdraw(ctx),
            Strategy::HebelerAutopilotII(s) => s.withdraw(ctx),
            Strategy::CashBuffer(s) => s.withdraw(ctx),
        };
        gross.min(ctx.portfolio_value.max(0.0))
    }
}

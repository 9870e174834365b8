use super::WithdrawalContext;

/// Fixed safe-withdrawal-rate: target net is a constant fraction of the
/// current portfolio value, clamped to a floor and (optionally) a ceiling.
/// Stateless across years.
#[derive(Debug, Clone, Copy)]
pub struct FixedSwr {
    pub withdrawal_rate: f64,
    pub minimum_withdrawal: f64,
    pub maximum_withdrawal: f64,
}

impl FixedSwr {
    #[must_use]
    pub fn new(withdrawal_rate: f64, minimum_withdrawal: f64, maximum_withdrawal: Option<f64>) -> Self {
        Self {
            withdrawal_rate,
            minimum_withdrawal,
            maximum_withdrawal: maximum_withdrawal.unwrap_or(f64::INFINITY),
        }
    }

    pub(super) fn withdraw(&mut self, ctx: &WithdrawalContext) -> f64 {
        let target_net = (self.withdrawal_rate * ctx.portfolio_value)
            .clamp(self.minimum_withdrawal, self.maximum_withdrawal);
        ctx.tax.gross_from_net(target_net.max(0.0), ctx.portfolio_value, ctx.cumulative_inflation_prev_year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxes::TaxEngine;

    #[test]
    fn s1_four_percent_of_a_million_no_tax() {
        let mut swr = FixedSwr::new(0.04, 0.0, None);
        let tax = TaxEngine::new("none", "", false).unwrap();
        let ctx = WithdrawalContext {
            portfolio_value: 1_000_000.0,
            year: 1,
            cumulative_inflation: 1.0,
            cumulative_inflation_prev_year: 1.0,
            prev_year_combined_return: 0.0,
            tax: &tax,
        };
        let gross = swr.withdraw(&ctx);
        assert!((gross - 40_000.0).abs() < 1e-9);
    }

    #[test]
    fn clamps_to_minimum_and_maximum() {
        let mut swr = FixedSwr::new(0.04, 50_000.0, Some(60_000.0));
        let tax = TaxEngine::new("none", "", false).unwrap();
        let ctx = WithdrawalContext {
            portfolio_value: 100_000.0,
            year: 1,
            cumulative_inflation: 1.0,
            cumulative_inflation_prev_year: 1.0,
            prev_year_combined_return: 0.0,
            tax: &tax,
        };
        assert!((swr.withdraw(&ctx) - 50_000.0).abs() < 1e-9);

        let ctx_hi = WithdrawalContext {
            portfolio_value: 10_000_000.0,
            ..ctx
        };
        assert!((swr.withdraw(&ctx_hi) - 60_000.0).abs() < 1e-9);
    }
}

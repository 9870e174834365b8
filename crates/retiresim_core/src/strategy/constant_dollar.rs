use super::WithdrawalContext;

/// Target net income grows with inflation so that real spending power stays
/// constant. Stateless across years beyond the cumulative inflation index.
#[derive(Debug, Clone, Copy)]
pub struct ConstantDollar {
    pub withdrawal_amount: f64,
}

impl ConstantDollar {
    #[must_use]
    pub fn new(withdrawal_amount: f64) -> Self {
        Self { withdrawal_amount }
    }

    pub(super) fn withdraw(&mut self, ctx: &WithdrawalContext) -> f64 {
        let target_net = self.withdrawal_amount * ctx.cumulative_inflation;
        ctx.tax.gross_from_net(target_net.max(0.0), ctx.portfolio_value, ctx.cumulative_inflation_prev_year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxes::TaxEngine;

    #[test]
    fn target_scales_with_cumulative_inflation() {
        let mut strategy = ConstantDollar::new(40_000.0);
        let tax = TaxEngine::new("none", "", false).unwrap();
        let ctx = WithdrawalContext {
            portfolio_value: 1_000_000.0,
            year: 3,
            cumulative_inflation: 1.21,
            cumulative_inflation_prev_year: 1.1,
            prev_year_combined_return: 0.0,
            tax: &tax,
        };
        let gross = strategy.withdraw(&ctx);
        assert!((gross - 48_400.0).abs() < 1e-6);
    }
}

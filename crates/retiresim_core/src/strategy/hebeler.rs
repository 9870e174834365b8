use super::WithdrawalContext;

/// Hebeler Autopilot II: blends last year's withdrawal with a
/// remaining-horizon annuitization of the current balance, floored at a
/// minimum real withdrawal. State is the previous year's net withdrawal.
#[derive(Debug, Clone, Copy)]
pub struct HebelerAutopilotII {
    pub initial_withdrawal_rate: f64,
    pub previous_withdrawal_weight: f64,
    pub payout_horizon: u32,
    pub minimum_withdrawal: f64,
    initial_portfolio_value: f64,
    previous_withdrawal: Option<f64>,
}

impl HebelerAutopilotII {
    #[must_use]
    pub fn new(
        initial_withdrawal_rate: f64,
        previous_withdrawal_weight: f64,
        payout_horizon: u32,
        minimum_withdrawal: f64,
        initial_portfolio_value: f64,
    ) -> Self {
        Self {
            initial_withdrawal_rate,
            previous_withdrawal_weight,
            payout_horizon,
            minimum_withdrawal,
            initial_portfolio_value,
            previous_withdrawal: None,
        }
    }

    pub(super) fn withdraw(&mut self, ctx: &WithdrawalContext) -> f64 {
        let raw = match self.previous_withdrawal {
            None => self.initial_withdrawal_rate * self.initial_portfolio_value,
            Some(p) => {
                let remaining = (self.payout_horizon as i64 - ctx.year as i64 + 1).max(1) as f64;
                self.previous_withdrawal_weight * p
                    + (1.0 - self.previous_withdrawal_weight) * (ctx.portfolio_value / remaining)
            }
        };
        let target_net = raw.max(self.minimum_withdrawal * ctx.cumulative_inflation);
        self.previous_withdrawal = Some(target_net);
        ctx.tax.gross_from_net(target_net.max(0.0), ctx.portfolio_value, ctx.cumulative_inflation_prev_year)
    }
}

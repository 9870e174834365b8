use super::WithdrawalContext;

/// Cash-buffer bucket strategy: draws down a subsistence amount during a
/// down year if the buffer isn't built up, banks surplus from good years
/// into the buffer, and otherwise withdraws a standard real amount.
///
/// The "good year" trigger is `prev_year_combined_return >= withdrawal_rate_buffer`,
/// i.e. the reference rate is `0.0` and the comparison uses the *previous*
/// year's return (there is no well-defined "this year's return" at the
/// point a withdrawal decision with no look-ahead would be made).
#[derive(Debug, Clone, Copy)]
pub struct CashBuffer {
    pub withdrawal_rate_buffer: f64,
    pub subsistence_withdrawal: f64,
    pub standard_withdrawal: f64,
    pub maximum_withdrawal: f64,
    pub buffer_target: f64,
    cash_buffer: f64,
}

impl CashBuffer {
    #[must_use]
    pub fn new(
        withdrawal_rate_buffer: f64,
        subsistence_withdrawal: f64,
        standard_withdrawal: f64,
        maximum_withdrawal: f64,
        buffer_target: f64,
    ) -> Self {
        Self {
            withdrawal_rate_buffer,
            subsistence_withdrawal,
            standard_withdrawal,
            maximum_withdrawal,
            buffer_target,
            cash_buffer: 0.0,
        }
    }

    pub(super) fn withdraw(&mut self, ctx: &WithdrawalContext) -> f64 {
        let standard = self.standard_withdrawal * ctx.cumulative_inflation;
        let target_net = if ctx.prev_year_combined_return < 0.0 && self.cash_buffer < self.buffer_target {
            self.subsistence_withdrawal * ctx.cumulative_inflation
        } else if ctx.prev_year_combined_return >= self.withdrawal_rate_buffer {
            let target = self.maximum_withdrawal.min(ctx.portfolio_value);
            let surplus = (target - standard).max(0.0);
            self.cash_buffer = (self.cash_buffer + surplus).min(self.buffer_target);
            target
        } else {
            standard
        };
        ctx.tax.gross_from_net(target_net.max(0.0), ctx.portfolio_value, ctx.cumulative_inflation_prev_year)
    }
}

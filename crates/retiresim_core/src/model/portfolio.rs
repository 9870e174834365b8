use super::{Allocation, YearMarket};

/// Cash flow applied to the portfolio in a given year.
///
/// A positive `Contribution` adds to cash; a `Withdrawal` removes a gross
/// amount from cash, overflowing into bonds then stocks if cash is
/// insufficient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CashFlow {
    Contribution(f64),
    Withdrawal(f64),
}

/// Value held in each of the three asset buckets, plus the target
/// allocation used for optional rebalancing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Portfolio {
    pub stocks: f64,
    pub bonds: f64,
    pub cash: f64,
    pub target_allocation: Allocation,
    pub rebalance: bool,
}

impl Portfolio {
    #[must_use]
    pub fn new(value: f64, allocation: Allocation, rebalance: bool) -> Self {
        Self {
            stocks: value * allocation.stocks,
            bonds: value * allocation.bonds,
            cash: value * allocation.cash,
            target_allocation: allocation,
            rebalance,
        }
    }

    #[must_use]
    pub fn total(&self) -> f64 {
        self.stocks + self.bonds + self.cash
    }

    /// Current allocation as fractions of total value. Falls back to the
    /// target allocation once the portfolio is fully depleted, since 0/0
    /// fractions are undefined.
    #[must_use]
    pub fn current_allocation(&self) -> Allocation {
        let total = self.total();
        if total <= 0.0 {
            return self.target_allocation;
        }
        Allocation::new(self.stocks / total, self.bonds / total, self.cash / total)
    }

    /// Step 1: apply per-asset market returns in place. Returns the
    /// allocation-weighted combined return realized this year, computed
    /// against the allocation held *before* returns are applied.
    pub fn apply_returns(&mut self, market: &YearMarket) -> f64 {
        let combined = self
            .current_allocation()
            .combined_return(market.stock_return, market.bond_return, market.cash_return);
        self.stocks *= 1.0 + market.stock_return;
        self.bonds *= 1.0 + market.bond_return;
        self.cash *= 1.0 + market.cash_return;
        combined
    }

    /// Debit `amount` from cash first, overflowing pro-rata into bonds then
    /// stocks if cash is insufficient. Never lets the portfolio go negative:
    /// if `amount` exceeds total value, every bucket is drained to zero.
    /// Returns the amount actually debited.
    fn debit(&mut self, amount: f64) -> f64 {
        if amount <= 0.0 {
            return 0.0;
        }
        let available = self.total();
        let actual = amount.min(available);
        let mut remaining = actual;

        let from_cash = remaining.min(self.cash);
        self.cash -= from_cash;
        remaining -= from_cash;

        let from_bonds = remaining.min(self.bonds);
        self.bonds -= from_bonds;
        remaining -= from_bonds;

        let from_stocks = remaining.min(self.stocks);
        self.stocks -= from_stocks;
        remaining -= from_stocks;

        // Guard against floating-point residue pushing a bucket fractionally
        // negative; clamp everything to zero in that case.
        if remaining > 0.0 {
            self.cash = self.cash.max(0.0);
            self.bonds = self.bonds.max(0.0);
            self.stocks = self.stocks.max(0.0);
        }

        actual
    }

    fn credit_cash(&mut self, amount: f64) {
        if amount > 0.0 {
            self.cash += amount;
        }
    }

    /// Step 2: apply the year's cash flow. Returns the actual amount moved
    /// (for a withdrawal, this may be less than requested if the portfolio
    /// cannot cover it).
    pub fn apply_cash_flow(&mut self, flow: CashFlow) -> f64 {
        match flow {
            CashFlow::Contribution(amount) => {
                self.credit_cash(amount);
                amount
            }
            CashFlow::Withdrawal(amount) => self.debit(amount),
        }
    }

    /// Step 3: pay taxes from cash, overflowing the same way a withdrawal does.
    pub fn pay_taxes(&mut self, total_tax: f64) -> f64 {
        self.debit(total_tax)
    }

    /// Step 4: if rebalancing is enabled, reset bucket values to
    /// `total * target_allocation`.
    pub fn rebalance_if_needed(&mut self) {
        if !self.rebalance {
            return;
        }
        let total = self.total();
        self.stocks = total * self.target_allocation.stocks;
        self.bonds = total * self.target_allocation.bonds;
        self.cash = total * self.target_allocation.cash;
    }

    /// Clamp every bucket to zero; used after a year that drove the
    /// portfolio to depletion so downstream arithmetic never sees negative
    /// residue from floating-point error.
    pub fn clamp_to_zero_if_depleted(&mut self) {
        if self.total() < 0.0 {
            self.stocks = 0.0;
            self.bonds = 0.0;
            self.cash = 0.0;
        }
    }
}

use serde::{Deserialize, Serialize};

/// Fraction of the portfolio held in each of the three asset buckets.
///
/// Fractions must sum to 1 within `TOLERANCE`; this is checked at
/// construction boundaries (config validation), not on every read.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    pub stocks: f64,
    pub bonds: f64,
    pub cash: f64,
}

impl Allocation {
    pub const TOLERANCE: f64 = 1e-9;

    #[must_use]
    pub fn new(stocks: f64, bonds: f64, cash: f64) -> Self {
        Self { stocks, bonds, cash }
    }

    #[must_use]
    pub fn sum(&self) -> f64 {
        self.stocks + self.bonds + self.cash
    }

    #[must_use]
    pub fn is_normalized(&self) -> bool {
        (self.sum() - 1.0).abs() <= Self::TOLERANCE
    }

    /// Allocation-weighted nominal return for one year, given the three
    /// per-asset returns for that year.
    #[must_use]
    pub fn combined_return(&self, stock_return: f64, bond_return: f64, cash_return: f64) -> f64 {
        self.stocks * stock_return + self.bonds * bond_return + self.cash * cash_return
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_allocation_sums_to_one() {
        let a = Allocation::new(0.6, 0.3, 0.1);
        assert!(a.is_normalized());
    }

    #[test]
    fn slightly_off_allocation_within_tolerance() {
        let a = Allocation::new(0.6, 0.3, 0.1 + 1e-12);
        assert!(a.is_normalized());
    }

    #[test]
    fn combined_return_is_weighted_average() {
        let a = Allocation::new(0.5, 0.5, 0.0);
        let r = a.combined_return(0.10, -0.02, 0.0);
        assert!((r - 0.04).abs() < 1e-12);
    }
}

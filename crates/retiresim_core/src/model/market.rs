use serde::{Deserialize, Serialize};

/// The four market numbers realized in a single simulated year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearMarket {
    pub stock_return: f64,
    pub bond_return: f64,
    pub cash_return: f64,
    pub inflation: f64,
}

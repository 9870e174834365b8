//! Monte Carlo scenario: independent per-year normal draws for stock, bond,
//! and inflation. No cross-asset correlation; returns are arithmetic, not
//! log-normal.

use rand::rngs::SmallRng;
use rand_distr::{Distribution, Normal};

use crate::error::{ConfigError, ConfigErrorReason};
use crate::model::YearMarket;

/// A single-year return below this floor would drive a portfolio bucket
/// negative; clamp rather than let the simulation produce a meaningless
/// sub-(-100%) return. See the open question on Monte Carlo clipping.
const MIN_ASSET_RETURN: f64 = -0.999;

#[derive(Debug, Clone, Copy)]
pub struct MonteCarloParams {
    pub stock_mean: f64,
    pub stock_std: f64,
    pub bond_mean: f64,
    pub bond_std: f64,
    pub inflation_mean: f64,
    pub inflation_std: f64,
    pub cash_return: f64,
}

#[derive(Debug)]
pub struct MonteCarloScenario {
    rng: SmallRng,
    cash_return: f64,
    stock_dist: Normal<f64>,
    bond_dist: Normal<f64>,
    inflation_dist: Normal<f64>,
    remaining: usize,
}

impl MonteCarloScenario {
    pub fn new(rng: SmallRng, params: MonteCarloParams, scenario_years: usize) -> Result<Self, ConfigError> {
        if params.stock_std < 0.0 {
            return Err(ConfigError::new(
                "scenario_config.stock_std",
                ConfigErrorReason::NegativeStdDev(params.stock_std),
            ));
        }
        if params.bond_std < 0.0 {
            return Err(ConfigError::new(
                "scenario_config.bond_std",
                ConfigErrorReason::NegativeStdDev(params.bond_std),
            ));
        }
        if params.inflation_std < 0.0 {
            return Err(ConfigError::new(
                "scenario_config.inflation_std",
                ConfigErrorReason::NegativeStdDev(params.inflation_std),
            ));
        }

        let stock_dist = Normal::new(params.stock_mean, params.stock_std).map_err(|_| {
            ConfigError::new("scenario_config.stock_std", ConfigErrorReason::NegativeStdDev(params.stock_std))
        })?;
        let bond_dist = Normal::new(params.bond_mean, params.bond_std).map_err(|_| {
            ConfigError::new("scenario_config.bond_std", ConfigErrorReason::NegativeStdDev(params.bond_std))
        })?;
        let inflation_dist = Normal::new(params.inflation_mean, params.inflation_std).map_err(|_| {
            ConfigError::new(
                "scenario_config.inflation_std",
                ConfigErrorReason::NegativeStdDev(params.inflation_std),
            )
        })?;

        Ok(Self {
            rng,
            cash_return: params.cash_return,
            stock_dist,
            bond_dist,
            inflation_dist,
            remaining: scenario_years,
        })
    }
}

impl Iterator for MonteCarloScenario {
    type Item = YearMarket;

    fn next(&mut self) -> Option<YearMarket> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let stock_return = self.stock_dist.sample(&mut self.rng).max(MIN_ASSET_RETURN);
        let bond_return = self.bond_dist.sample(&mut self.rng).max(MIN_ASSET_RETURN);
        let inflation = self.inflation_dist.sample(&mut self.rng);

        Some(YearMarket {
            stock_return,
            bond_return,
            cash_return: self.cash_return,
            inflation,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn zero_params() -> MonteCarloParams {
        MonteCarloParams {
            stock_mean: 0.0,
            stock_std: 0.0,
            bond_mean: 0.0,
            bond_std: 0.0,
            inflation_mean: 0.0,
            inflation_std: 0.0,
            cash_return: 0.0,
        }
    }

    #[test]
    fn s1_zero_variance_is_deterministic_zero() {
        let rng = SmallRng::seed_from_u64(1);
        let scenario = MonteCarloScenario::new(rng, zero_params(), 25).unwrap();
        for year in scenario {
            assert_eq!(year.stock_return, 0.0);
            assert_eq!(year.bond_return, 0.0);
            assert_eq!(year.inflation, 0.0);
            assert_eq!(year.cash_return, 0.0);
        }
    }

    #[test]
    fn negative_std_dev_is_config_error() {
        let rng = SmallRng::seed_from_u64(1);
        let mut params = zero_params();
        params.stock_std = -0.1;
        let err = MonteCarloScenario::new(rng, params, 10).unwrap_err();
        assert_eq!(err.path, "scenario_config.stock_std");
    }

    #[test]
    fn yields_exactly_scenario_years_entries() {
        let rng = SmallRng::seed_from_u64(1);
        let scenario = MonteCarloScenario::new(rng, zero_params(), 7).unwrap();
        assert_eq!(scenario.count(), 7);
    }

    #[test]
    fn extreme_negative_draws_are_clamped() {
        let rng = SmallRng::seed_from_u64(1);
        let mut params = zero_params();
        params.stock_mean = -10.0;
        params.stock_std = 0.001;
        let scenario = MonteCarloScenario::new(rng, params, 50).unwrap();
        for year in scenario {
            assert!(year.stock_return >= MIN_ASSET_RETURN);
        }
    }

    #[test]
    fn same_seed_is_bit_identical() {
        let a: Vec<YearMarket> = MonteCarloScenario::new(
            SmallRng::seed_from_u64(42),
            MonteCarloParams {
                stock_mean: 0.07,
                stock_std: 0.15,
                bond_mean: 0.03,
                bond_std: 0.05,
                inflation_mean: 0.02,
                inflation_std: 0.01,
                cash_return: 0.01,
            },
            30,
        )
        .unwrap()
        .collect();
        let b: Vec<YearMarket> = MonteCarloScenario::new(
            SmallRng::seed_from_u64(42),
            MonteCarloParams {
                stock_mean: 0.07,
                stock_std: 0.15,
                bond_mean: 0.03,
                bond_std: 0.05,
                inflation_mean: 0.02,
                inflation_std: 0.01,
                cash_return: 0.01,
            },
            30,
        )
        .unwrap()
        .collect();
        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x.stock_return, y.stock_return);
            assert_eq!(x.bond_return, y.bond_return);
            assert_eq!(x.inflation, y.inflation);
        }
    }
}

//! Run configuration: the one object every kernel entry point accepts,
//! validated up front so `run_*` and the standalone `validate` operation
//! share exactly one code path.

mod scenario_config;
mod strategy_config;
mod tax_config;

pub use scenario_config::ScenarioConfig;
pub use strategy_config::StrategyConfig;
pub use tax_config::TaxConfig;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigErrorReason};
use crate::model::Allocation;
use crate::reference_data::historical_series;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct InitialPortfolioConfig {
    pub value: f64,
    pub allocation: Allocation,
}

fn default_simulation_years() -> u32 {
    30
}

fn default_num_simulations() -> u32 {
    1_000
}

/// Everything a run needs: the starting portfolio, the scenario and tax
/// regimes, one or more withdrawal strategies, and the accumulation-only
/// knobs used by `run_accumulation`/`run_combined`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub initial_portfolio: InitialPortfolioConfig,
    #[serde(default)]
    pub rebalance: bool,
    pub scenario_config: ScenarioConfig,
    #[serde(default = "default_simulation_years")]
    pub scenario_years: u32,
    #[serde(default)]
    pub strategy_config: Option<StrategyConfig>,
    #[serde(default)]
    pub strategy_configs: Option<Vec<StrategyConfig>>,
    #[serde(default)]
    pub tax_config: TaxConfig,
    #[serde(default = "default_simulation_years")]
    pub simulation_years: u32,
    #[serde(default = "default_num_simulations")]
    pub num_simulations: u32,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub monthly_savings: Option<f64>,
    #[serde(default)]
    pub annual_increase: Option<f64>,
    #[serde(default)]
    pub target_value: Option<f64>,
    /// Retirement-phase duration for `run_combined`, defaulting to
    /// `simulation_years` (the accumulation-phase duration) when unset.
    #[serde(default)]
    pub retirement_years: Option<u32>,
    #[serde(default)]
    pub num_threads: Option<usize>,
}

impl SimulationConfig {
    /// Validate without running a single trial. `run_*` calls this first and
    /// surfaces the same error the standalone `validate` operation would.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.initial_portfolio.allocation.is_normalized() {
            return Err(ConfigError::new(
                "initial_portfolio.allocation",
                ConfigErrorReason::AllocationNotNormalized(self.initial_portfolio.allocation.sum()),
            ));
        }
        if self.simulation_years == 0 {
            return Err(ConfigError::new(
                "simulation_years",
                ConfigErrorReason::NonPositiveSimulationYears(0),
            ));
        }
        if self.scenario_years == 0 {
            return Err(ConfigError::new(
                "scenario_years",
                ConfigErrorReason::NonPositiveScenarioYears(0),
            ));
        }
        if self.num_simulations == 0 {
            return Err(ConfigError::new(
                "num_simulations",
                ConfigErrorReason::NonPositiveNumSimulations(0),
            ));
        }
        self.validate_scenario_config()?;
        self.tax_config.build()?;
        self.validate_strategy_configs()?;
        Ok(())
    }

    fn validate_strategy_configs(&self) -> Result<(), ConfigError> {
        let strategies = self.strategy_configs()?;
        let indexed = self.strategy_configs.is_some();
        for (i, strategy) in strategies.iter().enumerate() {
            let path = if indexed {
                format!("strategy_configs[{i}]")
            } else {
                "strategy_config".to_string()
            };
            strategy.validate(&path)?;
        }
        Ok(())
    }

    fn validate_scenario_config(&self) -> Result<(), ConfigError> {
        match &self.scenario_config {
            ScenarioConfig::Historical { country, chunk_years, .. } => {
                let series = historical_series(country).ok_or_else(|| {
                    ConfigError::new(
                        "scenario_config.country",
                        ConfigErrorReason::UnknownCountry(country.clone()),
                    )
                })?;
                if let Some(chunk) = chunk_years {
                    if *chunk > series.len() {
                        return Err(ConfigError::new(
                            "scenario_config.chunk_years",
                            ConfigErrorReason::ChunkYearsExceedsSeriesLength {
                                chunk_years: *chunk,
                                available: series.len(),
                            },
                        ));
                    }
                }
                Ok(())
            }
            ScenarioConfig::MonteCarlo {
                stock_std,
                bond_std,
                inflation_std,
                ..
            } => {
                for (path, std) in [
                    ("scenario_config.stock_std", stock_std),
                    ("scenario_config.bond_std", bond_std),
                    ("scenario_config.inflation_std", inflation_std),
                ] {
                    if *std < 0.0 {
                        return Err(ConfigError::new(path, ConfigErrorReason::NegativeStdDev(*std)));
                    }
                }
                Ok(())
            }
        }
    }

    /// The strategy list this run compares — either the single
    /// `strategy_config` or the multi-strategy `strategy_configs`.
    pub fn strategy_configs(&self) -> Result<Vec<&StrategyConfig>, ConfigError> {
        match (&self.strategy_config, &self.strategy_configs) {
            (_, Some(list)) if !list.is_empty() => Ok(list.iter().collect()),
            (_, Some(_)) => Err(ConfigError::new(
                "strategy_configs",
                ConfigErrorReason::EmptyStrategyList,
            )),
            (Some(single), None) => Ok(vec![single]),
            (None, None) => Err(ConfigError::new(
                "strategy_config",
                ConfigErrorReason::EmptyStrategyList,
            )),
        }
    }

    /// The effective number of historical/Monte Carlo years to materialize
    /// per trial — at least `simulation_years`, so the scenario never runs
    /// dry mid-trial regardless of what `scenario_years` was set to.
    #[must_use]
    pub fn effective_scenario_years(&self) -> usize {
        self.scenario_years.max(self.simulation_years) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> SimulationConfig {
        SimulationConfig {
            initial_portfolio: InitialPortfolioConfig {
                value: 1_000_000.0,
                allocation: Allocation::new(0.6, 0.3, 0.1),
            },
            rebalance: true,
            scenario_config: ScenarioConfig::MonteCarlo {
                stock_mean: 0.07,
                stock_std: 0.15,
                bond_mean: 0.03,
                bond_std: 0.05,
                inflation_mean: 0.02,
                inflation_std: 0.01,
                cash_return: 0.01,
            },
            scenario_years: 30,
            strategy_config: Some(StrategyConfig::FixedSwr {
                withdrawal_rate: 0.04,
                minimum_withdrawal: 0.0,
                maximum_withdrawal: None,
            }),
            strategy_configs: None,
            tax_config: TaxConfig::default(),
            simulation_years: 30,
            num_simulations: 100,
            seed: Some(1),
            monthly_savings: None,
            annual_increase: None,
            target_value: None,
            retirement_years: None,
            num_threads: None,
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn unnormalized_allocation_is_rejected() {
        let mut cfg = base_config();
        cfg.initial_portfolio.allocation = Allocation::new(0.5, 0.5, 0.5);
        let err = cfg.validate().unwrap_err();
        assert_eq!(err.path, "initial_portfolio.allocation");
    }

    #[test]
    fn zero_simulation_years_is_rejected() {
        let mut cfg = base_config();
        cfg.simulation_years = 0;
        let err = cfg.validate().unwrap_err();
        assert_eq!(err.path, "simulation_years");
    }

    #[test]
    fn missing_strategy_is_rejected() {
        let mut cfg = base_config();
        cfg.strategy_config = None;
        let err = cfg.validate().unwrap_err();
        assert_eq!(err.path, "strategy_config");
    }

    #[test]
    fn empty_strategy_list_is_rejected() {
        let mut cfg = base_config();
        cfg.strategy_configs = Some(Vec::new());
        let err = cfg.validate().unwrap_err();
        assert_eq!(err.path, "strategy_configs");
    }

    #[test]
    fn negative_withdrawal_rate_is_rejected() {
        let mut cfg = base_config();
        cfg.strategy_config = Some(StrategyConfig::FixedSwr {
            withdrawal_rate: -0.04,
            minimum_withdrawal: 0.0,
            maximum_withdrawal: None,
        });
        let err = cfg.validate().unwrap_err();
        assert_eq!(err.path, "strategy_config.withdrawal_rate");
    }

    #[test]
    fn non_finite_rate_in_strategy_list_is_rejected() {
        let mut cfg = base_config();
        cfg.strategy_config = None;
        cfg.strategy_configs = Some(vec![StrategyConfig::HebelerAutopilotIi {
            initial_withdrawal_rate: f64::NAN,
            previous_withdrawal_weight: 0.5,
            payout_horizon: 20,
            minimum_withdrawal: 0.0,
        }]);
        let err = cfg.validate().unwrap_err();
        assert_eq!(err.path, "strategy_configs[0].initial_withdrawal_rate");
    }

    #[test]
    fn multi_strategy_list_takes_precedence() {
        let mut cfg = base_config();
        cfg.strategy_configs = Some(vec![
            StrategyConfig::ConstantDollar { withdrawal_amount: 40_000.0 },
            StrategyConfig::ConstantDollar { withdrawal_amount: 50_000.0 },
        ]);
        assert_eq!(cfg.strategy_configs().unwrap().len(), 2);
    }
}

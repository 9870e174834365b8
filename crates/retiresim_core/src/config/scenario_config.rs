use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigErrorReason};
use crate::reference_data::historical_series;
use crate::scenario::{HistoricalBootstrap, MonteCarloParams, MonteCarloScenario, Scenario};

/// Which scenario engine a run uses, tagged by `kind` in the wire format.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScenarioConfig {
    Historical {
        country: String,
        #[serde(default)]
        chunk_years: Option<usize>,
        #[serde(default)]
        shuffle: bool,
        #[serde(default)]
        randomize_start: bool,
        #[serde(default)]
        cash_return: f64,
    },
    MonteCarlo {
        stock_mean: f64,
        stock_std: f64,
        bond_mean: f64,
        bond_std: f64,
        inflation_mean: f64,
        inflation_std: f64,
        #[serde(default)]
        cash_return: f64,
    },
}

impl ScenarioConfig {
    pub fn build(&self, rng: SmallRng, scenario_years: usize) -> Result<Scenario, ConfigError> {
        match self {
            ScenarioConfig::Historical {
                country,
                chunk_years,
                shuffle,
                randomize_start,
                cash_return,
            } => {
                let series = historical_series(country).ok_or_else(|| {
                    ConfigError::new(
                        "scenario_config.country",
                        ConfigErrorReason::UnknownCountry(country.clone()),
                    )
                })?;
                let mut rng = rng;
                let bootstrap = HistoricalBootstrap::new(
                    &mut rng,
                    series,
                    *chunk_years,
                    *shuffle,
                    *randomize_start,
                    *cash_return,
                    scenario_years,
                )?;
                Ok(Scenario::Historical(bootstrap))
            }
            ScenarioConfig::MonteCarlo {
                stock_mean,
                stock_std,
                bond_mean,
                bond_std,
                inflation_mean,
                inflation_std,
                cash_return,
            } => {
                let params = MonteCarloParams {
                    stock_mean: *stock_mean,
                    stock_std: *stock_std,
                    bond_mean: *bond_mean,
                    bond_std: *bond_std,
                    inflation_mean: *inflation_mean,
                    inflation_std: *inflation_std,
                    cash_return: *cash_return,
                };
                Ok(Scenario::MonteCarlo(MonteCarloScenario::new(rng, params, scenario_years)?))
            }
        }
    }
}

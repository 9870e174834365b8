use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigErrorReason};
use crate::strategy::{CashBuffer, ConstantDollar, FixedSwr, HebelerAutopilotII, Strategy};

/// Which withdrawal strategy a run uses, tagged by `kind` in the wire format.
/// `initial_portfolio_value` for Hebeler Autopilot II is not a config field —
/// it is threaded in from the run's `initial_portfolio.value` at build time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StrategyConfig {
    FixedSwr {
        withdrawal_rate: f64,
        #[serde(default)]
        minimum_withdrawal: f64,
        #[serde(default)]
        maximum_withdrawal: Option<f64>,
    },
    ConstantDollar {
        withdrawal_amount: f64,
    },
    HebelerAutopilotIi {
        initial_withdrawal_rate: f64,
        previous_withdrawal_weight: f64,
        payout_horizon: u32,
        #[serde(default)]
        minimum_withdrawal: f64,
    },
    CashBuffer {
        withdrawal_rate_buffer: f64,
        subsistence_withdrawal: f64,
        standard_withdrawal: f64,
        maximum_withdrawal: f64,
        buffer_target: f64,
    },
}

impl StrategyConfig {
    #[must_use]
    pub fn build(&self, initial_portfolio_value: f64) -> Strategy {
        match self {
            StrategyConfig::FixedSwr {
                withdrawal_rate,
                minimum_withdrawal,
                maximum_withdrawal,
            } => Strategy::FixedSwr(FixedSwr::new(*withdrawal_rate, *minimum_withdrawal, *maximum_withdrawal)),
            StrategyConfig::ConstantDollar { withdrawal_amount } => {
                Strategy::ConstantDollar(ConstantDollar::new(*withdrawal_amount))
            }
            StrategyConfig::HebelerAutopilotIi {
                initial_withdrawal_rate,
                previous_withdrawal_weight,
                payout_horizon,
                minimum_withdrawal,
            } => Strategy::HebelerAutopilotII(HebelerAutopilotII::new(
                *initial_withdrawal_rate,
                *previous_withdrawal_weight,
                *payout_horizon,
                *minimum_withdrawal,
                initial_portfolio_value,
            )),
            StrategyConfig::CashBuffer {
                withdrawal_rate_buffer,
                subsistence_withdrawal,
                standard_withdrawal,
                maximum_withdrawal,
                buffer_target,
            } => Strategy::CashBuffer(CashBuffer::new(
                *withdrawal_rate_buffer,
                *subsistence_withdrawal,
                *standard_withdrawal,
                *maximum_withdrawal,
                *buffer_target,
            )),
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            StrategyConfig::FixedSwr { .. } => "fixed_swr",
            StrategyConfig::ConstantDollar { .. } => "constant_dollar",
            StrategyConfig::HebelerAutopilotIi { .. } => "hebeler_autopilot_ii",
            StrategyConfig::CashBuffer { .. } => "cash_buffer",
        }
    }

    /// Reject negative or non-finite rate fields. `path` is the dotted
    /// location of this strategy within the run config (`strategy_config` or
    /// `strategy_configs[i]`), used as the prefix for any reported field.
    pub fn validate(&self, path: &str) -> Result<(), ConfigError> {
        let rates: &[(&str, f64)] = match self {
            StrategyConfig::FixedSwr { withdrawal_rate, .. } => &[("withdrawal_rate", *withdrawal_rate)],
            StrategyConfig::ConstantDollar { .. } => &[],
            StrategyConfig::HebelerAutopilotIi {
                initial_withdrawal_rate,
                previous_withdrawal_weight,
                ..
            } => &[
                ("initial_withdrawal_rate", *initial_withdrawal_rate),
                ("previous_withdrawal_weight", *previous_withdrawal_weight),
            ],
            StrategyConfig::CashBuffer {
                withdrawal_rate_buffer, ..
            } => &[("withdrawal_rate_buffer", *withdrawal_rate_buffer)],
        };
        for (field, rate) in rates {
            if !rate.is_finite() || *rate < 0.0 {
                return Err(ConfigError::new(format!("{path}.{field}"), ConfigErrorReason::InvalidRate(*rate)));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hebeler_receives_initial_portfolio_value_at_build_time() {
        let cfg = StrategyConfig::HebelerAutopilotIi {
            initial_withdrawal_rate: 0.05,
            previous_withdrawal_weight: 0.5,
            payout_horizon: 30,
            minimum_withdrawal: 0.0,
        };
        let strategy = cfg.build(500_000.0);
        assert_eq!(strategy.label(), "hebeler_autopilot_ii");
    }

    #[test]
    fn labels_match_strategy_variants() {
        assert_eq!(StrategyConfig::ConstantDollar { withdrawal_amount: 1.0 }.label(), "constant_dollar");
    }
}

//! Per-trial market scenarios: a finite lazy sequence of [`YearMarket`],
//! produced independently per trial from a deterministically derived seed.

mod historical;
mod monte_carlo;
mod seed;

pub use historical::HistoricalBootstrap;
pub use monte_carlo::{MonteCarloParams, MonteCarloScenario};
pub use seed::derive_trial_seed;

use crate::model::YearMarket;

/// The two scenario variants, unified behind one `Iterator`.
#[derive(Debug)]
pub enum Scenario {
    Historical(HistoricalBootstrap),
    MonteCarlo(MonteCarloScenario),
}

impl Iterator for Scenario {
    type Item = YearMarket;

    fn next(&mut self) -> Option<YearMarket> {
        match self {
            Scenario::Historical(s) => s.next(),
            Scenario::MonteCarlo(s) => s.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Scenario::Historical(s) => s.size_hint(),
            Scenario::MonteCarlo(s) => s.size_hint(),
        }
    }
}

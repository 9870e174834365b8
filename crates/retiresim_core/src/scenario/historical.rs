//! Historical bootstrap scenario: block or i.i.d. resampling of a country's
//! joint (stock, bond, inflation) series, with a fixed cash return.

use rand::Rng;
use rand::rngs::SmallRng;

use crate::error::{ConfigError, ConfigErrorReason};
use crate::model::YearMarket;
use crate::reference_data::HistoricalSeries;

/// A finite sequence of historical years, materialized once at trial start.
#[derive(Debug, Clone)]
pub struct HistoricalBootstrap {
    years: Vec<YearMarket>,
    cursor: usize,
}

impl HistoricalBootstrap {
    /// `chunk_years`: `None` or `Some(1)` is i.i.d. year sampling; `Some(n>=2)`
    /// is block bootstrap. `shuffle` draws blocks uniformly with replacement
    /// from every possible (overlapping) block start; otherwise blocks are
    /// walked in series order, wrapping circularly at the end.
    pub fn new(
        rng: &mut SmallRng,
        series: &HistoricalSeries,
        chunk_years: Option<usize>,
        shuffle: bool,
        randomize_start: bool,
        cash_return: f64,
        scenario_years: usize,
    ) -> Result<Self, ConfigError> {
        let len = series.len();
        let chunk = chunk_years.unwrap_or(1).max(1);
        if chunk > len {
            return Err(ConfigError::new(
                "scenario_config.chunk_years",
                ConfigErrorReason::ChunkYearsExceedsSeriesLength {
                    chunk_years: chunk,
                    available: len,
                },
            ));
        }

        let indices = build_indices(rng, len, chunk, shuffle, randomize_start, scenario_years);
        let years = indices
            .into_iter()
            .map(|idx| YearMarket {
                stock_return: series.stock[idx],
                bond_return: series.bond[idx],
                cash_return,
                inflation: series.inflation[idx],
            })
            .collect();

        Ok(Self { years, cursor: 0 })
    }
}

fn build_indices(
    rng: &mut SmallRng,
    len: usize,
    chunk: usize,
    shuffle: bool,
    randomize_start: bool,
    target_len: usize,
) -> Vec<usize> {
    let mut indices = Vec::with_capacity(target_len);
    if shuffle {
        while indices.len() < target_len {
            let block_start = rng.random_range(0..len);
            for i in 0..chunk {
                if indices.len() >= target_len {
                    break;
                }
                indices.push((block_start + i) % len);
            }
        }
    } else {
        let mut block_start = if randomize_start { rng.random_range(0..len) } else { 0 };
        while indices.len() < target_len {
            for i in 0..chunk {
                if indices.len() >= target_len {
                    break;
                }
                indices.push((block_start + i) % len);
            }
            block_start = (block_start + chunk) % len;
        }
    }
    indices
}

impl Iterator for HistoricalBootstrap {
    type Item = YearMarket;

    fn next(&mut self) -> Option<YearMarket> {
        let year = self.years.get(self.cursor).copied()?;
        self.cursor += 1;
        Some(year)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.years.len().saturating_sub(self.cursor);
        (remaining, Some(remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn series(len: usize) -> HistoricalSeries {
        let stock: &'static [f64] = Box::leak((0..len).map(|i| i as f64 / 10.0).collect::<Vec<_>>().into_boxed_slice());
        let bond: &'static [f64] = Box::leak(vec![0.0; len].into_boxed_slice());
        let inflation: &'static [f64] = Box::leak(vec![0.0; len].into_boxed_slice());
        HistoricalSeries {
            country: "TEST",
            start_year: 1970,
            stock,
            bond,
            inflation,
        }
    }

    #[test]
    fn s4_block_bootstrap_wraps_in_series_order() {
        let s = series(10);
        let mut rng = SmallRng::seed_from_u64(0);
        let bootstrap = HistoricalBootstrap::new(&mut rng, &s, Some(3), false, false, 0.0, 12).unwrap();
        let stocks: Vec<f64> = bootstrap.map(|y| y.stock_return).collect();
        let expected = [
            0.0, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 0.0, 0.1,
        ];
        for (a, b) in stocks.iter().zip(expected.iter()) {
            assert!((a - b).abs() < 1e-9, "got {stocks:?}");
        }
    }

    #[test]
    fn iid_sampling_is_chunk_of_one() {
        let s = series(5);
        let mut rng = SmallRng::seed_from_u64(0);
        let bootstrap = HistoricalBootstrap::new(&mut rng, &s, None, false, false, 0.0, 7).unwrap();
        let stocks: Vec<f64> = bootstrap.map(|y| y.stock_return).collect();
        assert_eq!(stocks.len(), 7);
        // wraps: 0,1,2,3,4,0,1
        assert!((stocks[5] - 0.0).abs() < 1e-9);
        assert!((stocks[6] - 0.1).abs() < 1e-9);
    }

    #[test]
    fn chunk_exceeding_series_length_is_config_error() {
        let s = series(3);
        let mut rng = SmallRng::seed_from_u64(0);
        let err = HistoricalBootstrap::new(&mut rng, &s, Some(5), false, false, 0.0, 10).unwrap_err();
        assert_eq!(err.path, "scenario_config.chunk_years");
    }

    #[test]
    fn cash_return_is_constant_every_year() {
        let s = series(4);
        let mut rng = SmallRng::seed_from_u64(0);
        let bootstrap = HistoricalBootstrap::new(&mut rng, &s, Some(2), true, true, 0.03, 20).unwrap();
        assert!(bootstrap.map(|y| y.cash_return).all(|c| (c - 0.03).abs() < 1e-12));
    }

    #[test]
    fn truncates_to_exactly_scenario_years() {
        let s = series(4);
        let mut rng = SmallRng::seed_from_u64(1);
        let bootstrap = HistoricalBootstrap::new(&mut rng, &s, Some(3), true, false, 0.0, 13).unwrap();
        assert_eq!(bootstrap.count(), 13);
    }
}

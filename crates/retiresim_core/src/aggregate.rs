//! Cross-trial aggregation: nearest-rank percentiles, fixed-width
//! histograms, and the summary statistics that fold a batch of
//! [`crate::model::SimulationReport`]s into one [`crate::model::AggregateSummary`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::{PercentileBand, Percentiles, StrategySummary, YearRecord};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistogramBin {
    pub label: String,
    pub count: usize,
}

/// A fixed-width frequency histogram with an explicit overflow bin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Histogram {
    pub bins: Vec<HistogramBin>,
}

impl Histogram {
    fn fixed_width(values: &[f64], bin_width: f64, num_bins: usize, overflow_label: &str) -> Self {
        let mut counts = vec![0usize; num_bins + 1];
        for &v in values {
            let idx = if v <= 0.0 { 0 } else { (v / bin_width).floor() as usize };
            if idx >= num_bins {
                counts[num_bins] += 1;
            } else {
                counts[idx] += 1;
            }
        }
        let mut bins: Vec<HistogramBin> = (0..num_bins)
            .map(|i| {
                let lo = i as f64 * bin_width;
                let hi = (i + 1) as f64 * bin_width;
                HistogramBin {
                    label: format!("{}-{}", lo as i64, hi as i64),
                    count: counts[i],
                }
            })
            .collect();
        bins.push(HistogramBin {
            label: overflow_label.to_string(),
            count: counts[num_bins],
        });
        Histogram { bins }
    }

    /// €250k-wide bins up to €10M, with a `>10M` overflow bin.
    #[must_use]
    pub fn portfolio_value(values: &[f64]) -> Self {
        Self::fixed_width(values, 250_000.0, 40, ">10M")
    }

    /// €5k-wide bins up to €100k, with a `>100k` overflow bin.
    #[must_use]
    pub fn income(values: &[f64]) -> Self {
        Self::fixed_width(values, 5_000.0, 20, ">100k")
    }

    /// One bin per simulated year; counts trials that first depleted in
    /// that year. Trials that never depleted are not represented.
    #[must_use]
    pub fn failure_years(failure_years: &[u32], simulation_years: u32) -> Self {
        let mut counts = vec![0usize; simulation_years as usize];
        for &year in failure_years {
            if year >= 1 && year <= simulation_years {
                counts[(year - 1) as usize] += 1;
            }
        }
        let bins = counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| HistogramBin {
                label: (i as u32 + 1).to_string(),
                count,
            })
            .collect();
        Histogram { bins }
    }
}

/// Nearest-rank percentile: `idx = max(0, ceil(p * n) - 1)` into a
/// value slice already sorted ascending.
#[must_use]
pub fn percentile(sorted_ascending: &[f64], p: f64) -> f64 {
    if sorted_ascending.is_empty() {
        return 0.0;
    }
    let n = sorted_ascending.len();
    let rank = (p * n as f64).ceil() as isize;
    let idx = (rank - 1).max(0) as usize;
    sorted_ascending[idx.min(n - 1)]
}

/// Sorts `values` in place and reads off the standard five-point summary.
#[must_use]
pub fn percentiles_of(values: &mut [f64]) -> Percentiles {
    values.sort_by(|a, b| a.partial_cmp(b).unwrap());
    Percentiles {
        p10: percentile(values, 0.10),
        p25: percentile(values, 0.25),
        median: percentile(values, 0.50),
        p75: percentile(values, 0.75),
        p90: percentile(values, 0.90),
    }
}

#[must_use]
pub fn success_rate(outcomes: &[bool]) -> f64 {
    if outcomes.is_empty() {
        return 0.0;
    }
    outcomes.iter().filter(|&&ok| ok).count() as f64 / outcomes.len() as f64
}

#[must_use]
pub fn median_time_to_target(times: &[u32]) -> Option<f64> {
    if times.is_empty() {
        return None;
    }
    let mut values: Vec<f64> = times.iter().map(|&t| t as f64).collect();
    values.sort_by(|a, b| a.partial_cmp(b).unwrap());
    Some(percentile(&values, 0.50))
}

/// One [`PercentileBand`] per simulated year, across all trials. Every
/// trial's year vector must be the same length.
#[must_use]
pub fn percentile_bands(trials: &[Vec<YearRecord>]) -> Vec<PercentileBand> {
    let Some(first) = trials.first() else {
        return Vec::new();
    };
    let num_years = first.len();
    (0..num_years)
        .map(|year_idx| {
            let mut portfolio_value: Vec<f64> = trials.iter().map(|t| t[year_idx].portfolio_value).collect();
            let mut real_portfolio_value: Vec<f64> =
                trials.iter().map(|t| t[year_idx].real_portfolio_value).collect();
            let mut income: Vec<f64> = trials.iter().map(|t| t[year_idx].gross_cash_flow).collect();
            let mut real_income: Vec<f64> = trials.iter().map(|t| t[year_idx].real_gross_cash_flow).collect();
            PercentileBand {
                year: first[year_idx].year,
                portfolio_value: percentiles_of(&mut portfolio_value),
                real_portfolio_value: percentiles_of(&mut real_portfolio_value),
                income: percentiles_of(&mut income),
                real_income: percentiles_of(&mut real_income),
            }
        })
        .collect()
}

/// Per-strategy success rate, preserving first-seen label order.
#[must_use]
pub fn strategy_summaries(labels: &[String], outcomes: &[bool]) -> Vec<StrategySummary> {
    let mut order: Vec<String> = Vec::new();
    let mut stats: HashMap<String, (usize, usize)> = HashMap::new();
    for (label, &ok) in labels.iter().zip(outcomes.iter()) {
        let entry = stats.entry(label.clone()).or_insert_with(|| {
            order.push(label.clone());
            (0, 0)
        });
        entry.1 += 1;
        if ok {
            entry.0 += 1;
        }
    }
    order
        .into_iter()
        .map(|label| {
            let (successes, count) = stats[&label];
            StrategySummary {
                success_rate: successes as f64 / count as f64,
                count,
                label,
            }
        })
        .collect()
}

//! Country-keyed historical market series.
//!
//! Each series pairs stock, bond, and inflation annual figures by index so a
//! sampled year always yields the triple that actually co-occurred, which is
//! what preserves cross-asset correlation under bootstrap resampling.

use std::collections::HashMap;
use std::sync::OnceLock;

use super::historical_data as data;

/// One country's joint annual market history.
#[derive(Debug, Clone, Copy)]
pub struct HistoricalSeries {
    pub country: &'static str,
    pub start_year: i32,
    pub stock: &'static [f64],
    pub bond: &'static [f64],
    pub inflation: &'static [f64],
}

impl HistoricalSeries {
    #[must_use]
    pub fn len(&self) -> usize {
        self.stock.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stock.is_empty()
    }

    #[must_use]
    pub fn end_year(&self) -> i32 {
        self.start_year + self.len() as i32 - 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct CountryInfo {
    pub start_year: i32,
    pub end_year: i32,
    pub num_years: usize,
}

const SERIES: &[HistoricalSeries] = &[
    HistoricalSeries {
        country: "US",
        start_year: 1984,
        stock: data::US_STOCK_ANNUAL_RETURNS,
        bond: data::US_BOND_ANNUAL_RETURNS,
        inflation: data::US_INFLATION_ANNUAL_RATES,
    },
    HistoricalSeries {
        country: "DE",
        start_year: 1994,
        stock: data::DE_STOCK_ANNUAL_RETURNS,
        bond: data::DE_BOND_ANNUAL_RETURNS,
        inflation: data::DE_INFLATION_ANNUAL_RATES,
    },
    HistoricalSeries {
        country: "JP",
        start_year: 1994,
        stock: data::JP_STOCK_ANNUAL_RETURNS,
        bond: data::JP_BOND_ANNUAL_RETURNS,
        inflation: data::JP_INFLATION_ANNUAL_RATES,
    },
];

fn registry() -> &'static HashMap<&'static str, HistoricalSeries> {
    static REGISTRY: OnceLock<HashMap<&'static str, HistoricalSeries>> = OnceLock::new();
    REGISTRY.get_or_init(|| SERIES.iter().map(|s| (s.country, *s)).collect())
}

/// Look up the historical series for a country code (case-sensitive, e.g. `"US"`).
#[must_use]
pub fn historical_series(country: &str) -> Option<&'static HistoricalSeries> {
    registry().get(country)
}

/// `list_countries` operation (§6): summary of every embedded series.
#[must_use]
pub fn list_countries() -> HashMap<String, CountryInfo> {
    registry()
        .values()
        .map(|s| {
            (
                s.country.to_string(),
                CountryInfo {
                    start_year: s.start_year,
                    end_year: s.end_year(),
                    num_years: s.len(),
                },
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_country_resolves() {
        assert!(historical_series("US").is_some());
    }

    #[test]
    fn unknown_country_is_none() {
        assert!(historical_series("ZZ").is_none());
    }

    #[test]
    fn series_lengths_agree_across_assets() {
        for s in SERIES {
            assert_eq!(s.stock.len(), s.bond.len());
            assert_eq!(s.stock.len(), s.inflation.len());
        }
    }

    #[test]
    fn list_countries_reports_correct_ranges() {
        let countries = list_countries();
        let us = countries.get("US").unwrap();
        assert_eq!(us.start_year, 1984);
        assert_eq!(us.num_years, data::US_STOCK_ANNUAL_RETURNS.len());
        assert_eq!(us.end_year, us.start_year + us.num_years as i32 - 1);
    }
}

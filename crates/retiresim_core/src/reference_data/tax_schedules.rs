//! Region-keyed progressive tax schedules.
//!
//! A schedule carries both an income-tax bracket ladder (applied to gross
//! withdrawal income) and a wealth-tax bracket ladder (applied to end-of-year
//! portfolio value), plus the base year thresholds are quoted in so they can
//! be indexed forward by cumulative inflation.

use std::collections::HashMap;
use std::sync::OnceLock;

/// One (threshold, marginal rate) step in a progressive schedule.
/// `rate` applies to the slice of value between this threshold and the next.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaxBracket {
    pub threshold: f64,
    pub rate: f64,
}

#[derive(Debug, Clone)]
pub struct TaxSchedule {
    pub country: &'static str,
    pub region: &'static str,
    pub base_year: i32,
    pub income_brackets: &'static [TaxBracket],
    pub wealth_brackets: &'static [TaxBracket],
}

const US_FEDERAL_INCOME: &[TaxBracket] = &[
    TaxBracket { threshold: 0.0, rate: 0.10 },
    TaxBracket { threshold: 11_600.0, rate: 0.12 },
    TaxBracket { threshold: 47_150.0, rate: 0.22 },
    TaxBracket { threshold: 100_525.0, rate: 0.24 },
    TaxBracket { threshold: 191_950.0, rate: 0.32 },
    TaxBracket { threshold: 243_725.0, rate: 0.35 },
    TaxBracket { threshold: 609_350.0, rate: 0.37 },
];
const US_FEDERAL_WEALTH: &[TaxBracket] = &[];

const DE_STANDARD_INCOME: &[TaxBracket] = &[
    TaxBracket { threshold: 0.0, rate: 0.0 },
    TaxBracket { threshold: 11_604.0, rate: 0.14 },
    TaxBracket { threshold: 66_760.0, rate: 0.42 },
    TaxBracket { threshold: 277_825.0, rate: 0.45 },
];
const DE_STANDARD_WEALTH: &[TaxBracket] = &[
    TaxBracket { threshold: 0.0, rate: 0.0 },
    TaxBracket { threshold: 1_000_000.0, rate: 0.0075 },
];

const JP_STANDARD_INCOME: &[TaxBracket] = &[
    TaxBracket { threshold: 0.0, rate: 0.05 },
    TaxBracket { threshold: 1_950_000.0, rate: 0.10 },
    TaxBracket { threshold: 3_300_000.0, rate: 0.20 },
    TaxBracket { threshold: 6_950_000.0, rate: 0.23 },
    TaxBracket { threshold: 9_000_000.0, rate: 0.33 },
];
const JP_STANDARD_WEALTH: &[TaxBracket] = &[];

const SCHEDULES: &[TaxSchedule] = &[
    TaxSchedule {
        country: "US",
        region: "federal",
        base_year: 2024,
        income_brackets: US_FEDERAL_INCOME,
        wealth_brackets: US_FEDERAL_WEALTH,
    },
    TaxSchedule {
        country: "DE",
        region: "standard",
        base_year: 2024,
        income_brackets: DE_STANDARD_INCOME,
        wealth_brackets: DE_STANDARD_WEALTH,
    },
    TaxSchedule {
        country: "JP",
        region: "standard",
        base_year: 2024,
        income_brackets: JP_STANDARD_INCOME,
        wealth_brackets: JP_STANDARD_WEALTH,
    },
];

fn registry() -> &'static HashMap<(&'static str, &'static str), TaxSchedule> {
    static REGISTRY: OnceLock<HashMap<(&'static str, &'static str), TaxSchedule>> =
        OnceLock::new();
    REGISTRY.get_or_init(|| {
        SCHEDULES
            .iter()
            .map(|s| ((s.country, s.region), s.clone()))
            .collect()
    })
}

/// Look up a tax schedule. `country == "none"` is handled by the tax engine
/// itself (zero tax, no lookup needed) rather than by this registry.
#[must_use]
pub fn tax_schedule(country: &str, region: &str) -> Option<&'static TaxSchedule> {
    registry()
        .iter()
        .find(|((c, r), _)| *c == country && *r == region)
        .map(|(_, schedule)| schedule)
}

/// `list_tax_regions` operation (§6): every region available per country.
#[must_use]
pub fn list_tax_regions() -> HashMap<String, Vec<String>> {
    let mut out: HashMap<String, Vec<String>> = HashMap::new();
    for s in SCHEDULES {
        out.entry(s.country.to_string())
            .or_default()
            .push(s.region.to_string());
    }
    out
}

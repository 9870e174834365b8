//! Shared, process-wide, immutable reference data: historical market series
//! and tax schedules. Built once behind `OnceLock`s and never mutated after.

mod historical;
mod historical_data;
mod tax_schedules;

pub use historical::{CountryInfo, HistoricalSeries, historical_series, list_countries};
pub use tax_schedules::{TaxBracket, TaxSchedule, list_tax_regions, tax_schedule};

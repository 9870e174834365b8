mod allocation;
mod market;
mod portfolio;
mod report;
mod year_record;

pub use allocation::Allocation;
pub use market::YearMarket;
pub use portfolio::{CashFlow, Portfolio};
pub use report::{
    AggregateSummary, CombinedReport, PercentileBand, Percentiles, SimulationReport,
    StrategySummary,
};
pub use year_record::YearRecord;

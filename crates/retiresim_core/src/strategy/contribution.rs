/// Accumulation-phase contribution: a monthly amount growing nominally at
/// `annual_increase` per year. Independent of which withdrawal strategy (if
/// any) follows in a combined run.
#[must_use]
pub fn accumulation_contribution(monthly_savings: f64, annual_increase: f64, year: u32) -> f64 {
    12.0 * monthly_savings * (1.0 + annual_increase).powi(year as i32 - 1)
}

//! Progressive tax evaluation, inflation-indexed brackets, and the
//! closed-form net→gross inverse solver.
//!
//! `country == "none"` is handled entirely inside [`TaxEngine`] (zero tax,
//! no reference-data lookup); every other country/region pair must resolve
//! via [`crate::reference_data::tax_schedule`] or validation fails first.

use crate::error::{ConfigError, ConfigErrorReason};
use crate::reference_data::{TaxBracket, TaxSchedule, tax_schedule};

/// Evaluate the progressive tax on `value` given ascending brackets.
/// Value below the first bracket's threshold is untaxed.
#[must_use]
pub fn progressive_tax(value: f64, brackets: &[TaxBracket]) -> f64 {
    if value <= 0.0 || brackets.is_empty() {
        return 0.0;
    }
    let mut tax = 0.0;
    for (i, bracket) in brackets.iter().enumerate() {
        if value <= bracket.threshold {
            break;
        }
        let next_threshold = brackets.get(i + 1).map(|b| b.threshold).unwrap_or(f64::INFINITY);
        let taxable_in_bracket = (value.min(next_threshold) - bracket.threshold).max(0.0);
        tax += taxable_in_bracket * bracket.rate;
    }
    tax
}

/// Marginal rate applying to the bracket containing `value`. Zero below the
/// first bracket's threshold.
#[must_use]
pub fn marginal_rate(value: f64, brackets: &[TaxBracket]) -> f64 {
    let mut rate = 0.0;
    for bracket in brackets {
        if value >= bracket.threshold {
            rate = bracket.rate;
        } else {
            break;
        }
    }
    rate
}

/// Scale bracket thresholds by `inflation_factor`, keeping rates unchanged.
fn scale_thresholds(brackets: &[TaxBracket], inflation_factor: f64) -> Vec<TaxBracket> {
    brackets
        .iter()
        .map(|b| TaxBracket {
            threshold: b.threshold * inflation_factor,
            rate: b.rate,
        })
        .collect()
}

/// Closed-form inverse: find gross `G` such that
/// `G - incomeTax(G) = target`, where `target = net + wealth_tax`.
/// `net(G)` is piecewise linear and non-decreasing in `G` (assuming every
/// marginal rate is below 100%), so the containing bracket is found by
/// walking breakpoints rather than iterating.
///
/// Returns `f64::INFINITY` only if the top bracket's marginal rate is 100%
/// or more and `target` lies beyond every finite breakpoint; callers must
/// clamp the result to available wealth regardless.
fn gross_for_target_net(target: f64, brackets: &[TaxBracket]) -> f64 {
    if target <= 0.0 {
        return 0.0;
    }
    if brackets.is_empty() {
        return target;
    }

    let t0 = brackets[0].threshold;
    if target <= t0 {
        // Below the first bracket, gross and net coincide 1:1.
        return target;
    }

    let mut prev_threshold = t0;
    let mut net_at_prev = t0;

    for (i, bracket) in brackets.iter().enumerate() {
        let next_threshold = brackets.get(i + 1).map(|b| b.threshold).unwrap_or(f64::INFINITY);
        let slope = 1.0 - bracket.rate;

        if next_threshold.is_finite() {
            let net_at_next = net_at_prev + slope * (next_threshold - prev_threshold);
            if target <= net_at_next {
                if slope <= 0.0 {
                    return next_threshold;
                }
                return prev_threshold + (target - net_at_prev) / slope;
            }
            prev_threshold = next_threshold;
            net_at_prev = net_at_next;
        } else if slope <= 0.0 {
            return f64::INFINITY;
        } else {
            return prev_threshold + (target - net_at_prev) / slope;
        }
    }

    unreachable!("bracket walk always returns from within the loop")
}

/// Progressive income tax plus wealth tax for one region, indexed by
/// inflation year over year as `adjust_brackets_with_inflation` dictates.
#[derive(Debug, Clone)]
pub struct TaxEngine {
    schedule: Option<TaxSchedule>,
    adjust_brackets_with_inflation: bool,
}

impl TaxEngine {
    pub fn new(country: &str, region: &str, adjust_brackets_with_inflation: bool) -> Result<Self, ConfigError> {
        if country == "none" {
            return Ok(Self {
                schedule: None,
                adjust_brackets_with_inflation,
            });
        }
        let schedule = tax_schedule(country, region).ok_or_else(|| {
            ConfigError::new(
                "tax_config.region",
                ConfigErrorReason::UnknownRegion {
                    country: country.to_string(),
                    region: region.to_string(),
                },
            )
        })?;
        Ok(Self {
            schedule: Some(schedule.clone()),
            adjust_brackets_with_inflation,
        })
    }

    fn effective_income_brackets(&self, cumulative_inflation_prev_year: f64) -> Vec<TaxBracket> {
        match &self.schedule {
            None => Vec::new(),
            Some(s) => {
                if self.adjust_brackets_with_inflation {
                    scale_thresholds(s.income_brackets, cumulative_inflation_prev_year)
                } else {
                    s.income_brackets.to_vec()
                }
            }
        }
    }

    fn effective_wealth_brackets(&self, cumulative_inflation_prev_year: f64) -> Vec<TaxBracket> {
        match &self.schedule {
            None => Vec::new(),
            Some(s) => {
                if self.adjust_brackets_with_inflation {
                    scale_thresholds(s.wealth_brackets, cumulative_inflation_prev_year)
                } else {
                    s.wealth_brackets.to_vec()
                }
            }
        }
    }

    /// Capital-gains tax on gross income realized this year.
    #[must_use]
    pub fn income_tax(&self, gross: f64, cumulative_inflation_prev_year: f64) -> f64 {
        if self.schedule.is_none() || gross <= 0.0 {
            return 0.0;
        }
        let brackets = self.effective_income_brackets(cumulative_inflation_prev_year);
        progressive_tax(gross, &brackets)
    }

    /// Wealth tax on end-of-year portfolio value.
    #[must_use]
    pub fn wealth_tax(&self, wealth: f64, cumulative_inflation_prev_year: f64) -> f64 {
        if self.schedule.is_none() || wealth <= 0.0 {
            return 0.0;
        }
        let brackets = self.effective_wealth_brackets(cumulative_inflation_prev_year);
        progressive_tax(wealth, &brackets)
    }

    /// Solve for gross `G >= 0` such that
    /// `G - incomeTax(G) - wealthTax(W) = net`, clamped to `wealth` when no
    /// feasible `G <= wealth` satisfies the equation.
    #[must_use]
    pub fn gross_from_net(&self, net: f64, wealth: f64, cumulative_inflation_prev_year: f64) -> f64 {
        if net <= 0.0 {
            return 0.0;
        }
        let wealth_tax = self.wealth_tax(wealth, cumulative_inflation_prev_year);
        let target = net + wealth_tax;
        let brackets = self.effective_income_brackets(cumulative_inflation_prev_year);
        let gross = gross_for_target_net(target, &brackets);
        gross.min(wealth.max(0.0))
    }
}

//! The per-trial state machine: one full pass through `simulation_years`,
//! composing the scenario, a strategy (or plain contribution schedule), the
//! tax engine, and the portfolio's per-year update in the order §4.4 fixes.

use crate::model::{CashFlow, Portfolio, SimulationReport, YearRecord};
use crate::scenario::Scenario;
use crate::strategy::{Strategy, WithdrawalContext, accumulation_contribution};
use crate::taxes::TaxEngine;

fn zero_year_record(year: u32, allocation: crate::model::Allocation, market: crate::model::YearMarket, cumulative_inflation: f64) -> YearRecord {
    YearRecord {
        year,
        portfolio_value: 0.0,
        allocation,
        market,
        combined_return: 0.0,
        cumulative_inflation,
        contribution: 0.0,
        gross_cash_flow: 0.0,
        capital_gains_tax: 0.0,
        wealth_tax: 0.0,
        net_cash_flow: 0.0,
        real_portfolio_value: 0.0,
        real_contribution: 0.0,
        real_gross_cash_flow: 0.0,
        real_net_cash_flow: 0.0,
        goal_achieved: false,
    }
}

/// Run one withdrawal-phase trial to completion. `scenario` is taken by
/// reference so a combined run can keep pulling years from the same
/// continuous sequence after an accumulation phase.
pub fn run_withdrawal_trial(
    mut portfolio: Portfolio,
    scenario: &mut Scenario,
    mut strategy: Strategy,
    tax: &TaxEngine,
    simulation_years: u32,
) -> SimulationReport {
    let mut years = Vec::with_capacity(simulation_years as usize);
    let mut cumulative_inflation = 1.0_f64;
    let mut prev_year_combined_return = 0.0_f64;
    let mut failed = false;

    for year in 1..=simulation_years {
        let cumulative_inflation_prev_year = cumulative_inflation;
        let market = scenario
            .next()
            .expect("scenario must yield at least simulation_years entries");
        cumulative_inflation *= 1.0 + market.inflation;

        if failed {
            years.push(zero_year_record(
                year,
                portfolio.target_allocation,
                market,
                cumulative_inflation,
            ));
            continue;
        }

        let combined_return = portfolio.apply_returns(&market);
        let wealth_before_withdrawal = portfolio.total();

        let ctx = WithdrawalContext {
            portfolio_value: wealth_before_withdrawal,
            year,
            cumulative_inflation,
            cumulative_inflation_prev_year,
            prev_year_combined_return,
            tax,
        };
        let gross = strategy.withdraw(&ctx);
        let wealth_tax = tax.wealth_tax(wealth_before_withdrawal, cumulative_inflation_prev_year);
        let capital_gains_tax = tax.income_tax(gross, cumulative_inflation_prev_year);
        let total_tax = wealth_tax + capital_gains_tax;
        let net_cash_flow = gross - total_tax;

        portfolio.apply_cash_flow(CashFlow::Withdrawal(gross));
        portfolio.pay_taxes(total_tax);
        portfolio.rebalance_if_needed();
        portfolio.clamp_to_zero_if_depleted();

        let portfolio_value = portfolio.total();
        let allocation = portfolio.current_allocation();
        let goal_achieved = portfolio_value >= 1.0;

        years.push(YearRecord {
            year,
            portfolio_value,
            allocation,
            market,
            combined_return,
            cumulative_inflation,
            contribution: 0.0,
            gross_cash_flow: gross,
            capital_gains_tax,
            wealth_tax,
            net_cash_flow,
            real_portfolio_value: portfolio_value / cumulative_inflation,
            real_contribution: 0.0,
            real_gross_cash_flow: gross / cumulative_inflation,
            real_net_cash_flow: net_cash_flow / cumulative_inflation,
            goal_achieved,
        });

        prev_year_combined_return = combined_return;
        if portfolio_value < 1.0 {
            failed = true;
        }
    }

    finish_report(years, None)
}

/// Run one accumulation-phase trial to completion. `scenario` is taken by
/// reference for the same reason as [`run_withdrawal_trial`].
pub fn run_accumulation_trial(
    mut portfolio: Portfolio,
    scenario: &mut Scenario,
    tax: &TaxEngine,
    simulation_years: u32,
    monthly_savings: f64,
    annual_increase: f64,
    target_value: Option<f64>,
) -> SimulationReport {
    let mut years = Vec::with_capacity(simulation_years as usize);
    let mut cumulative_inflation = 1.0_f64;
    let mut time_to_target: Option<u32> = None;
    let mut failed = false;

    for year in 1..=simulation_years {
        let cumulative_inflation_prev_year = cumulative_inflation;
        let market = scenario
            .next()
            .expect("scenario must yield at least simulation_years entries");
        cumulative_inflation *= 1.0 + market.inflation;

        if failed {
            years.push(zero_year_record(
                year,
                portfolio.target_allocation,
                market,
                cumulative_inflation,
            ));
            continue;
        }

        let combined_return = portfolio.apply_returns(&market);
        let contribution = accumulation_contribution(monthly_savings, annual_increase, year);
        portfolio.apply_cash_flow(CashFlow::Contribution(contribution));

        // Accumulation realizes no capital gains; only wealth tax applies.
        let wealth_tax = tax.wealth_tax(portfolio.total(), cumulative_inflation_prev_year);
        portfolio.pay_taxes(wealth_tax);
        portfolio.rebalance_if_needed();
        portfolio.clamp_to_zero_if_depleted();

        let portfolio_value = portfolio.total();
        let allocation = portfolio.current_allocation();

        if time_to_target.is_none() {
            if let Some(target) = target_value {
                if portfolio_value >= target {
                    time_to_target = Some(year);
                }
            }
        }
        let target_satisfied = target_value.is_none() || time_to_target.is_some();
        let goal_achieved = portfolio_value >= 1.0 && target_satisfied;

        years.push(YearRecord {
            year,
            portfolio_value,
            allocation,
            market,
            combined_return,
            cumulative_inflation,
            contribution,
            gross_cash_flow: 0.0,
            capital_gains_tax: 0.0,
            wealth_tax,
            net_cash_flow: 0.0,
            real_portfolio_value: portfolio_value / cumulative_inflation,
            real_contribution: contribution / cumulative_inflation,
            real_gross_cash_flow: 0.0,
            real_net_cash_flow: 0.0,
            goal_achieved,
        });

        if portfolio_value < 1.0 {
            failed = true;
        }
    }

    finish_report(years, time_to_target)
}

fn finish_report(years: Vec<YearRecord>, time_to_target: Option<u32>) -> SimulationReport {
    let last = years.last().expect("simulation_years is validated positive");
    SimulationReport {
        goal_achieved: last.goal_achieved,
        final_portfolio_value: last.portfolio_value,
        final_real_portfolio_value: last.real_portfolio_value,
        time_to_target,
        years,
    }
}

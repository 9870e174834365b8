use crate::config::{InitialPortfolioConfig, ScenarioConfig, SimulationConfig, StrategyConfig, TaxConfig};
use crate::model::Allocation;
use crate::simulation::{CancellationToken, run_combined};

fn config() -> SimulationConfig {
    SimulationConfig {
        initial_portfolio: InitialPortfolioConfig {
            value: 0.0,
            allocation: Allocation::new(0.8, 0.2, 0.0),
        },
        rebalance: true,
        scenario_config: ScenarioConfig::MonteCarlo {
            stock_mean: 0.06,
            stock_std: 0.12,
            bond_mean: 0.02,
            bond_std: 0.04,
            inflation_mean: 0.02,
            inflation_std: 0.01,
            cash_return: 0.0,
        },
        scenario_years: 20,
        strategy_config: Some(StrategyConfig::FixedSwr {
            withdrawal_rate: 0.04,
            minimum_withdrawal: 0.0,
            maximum_withdrawal: None,
        }),
        strategy_configs: None,
        tax_config: TaxConfig::default(),
        simulation_years: 10,
        num_simulations: 20,
        seed: Some(11),
        monthly_savings: Some(2_000.0),
        annual_increase: Some(0.02),
        target_value: None,
        retirement_years: Some(10),
        num_threads: None,
    }
}

#[test]
fn combined_run_reports_both_phase_durations() {
    let cancel = CancellationToken::new();
    let report = run_combined(&config(), &cancel).unwrap();
    assert_eq!(report.accumulation_years, 10);
    assert_eq!(report.retirement_years, 10);
    assert_eq!(report.accumulation_summary.percentile_bands.len(), 10);
    assert_eq!(report.withdrawal_summary.percentile_bands.len(), 10);
}

#[test]
fn combined_run_defaults_retirement_years_to_accumulation_years() {
    let mut cfg = config();
    cfg.retirement_years = None;
    let cancel = CancellationToken::new();
    let report = run_combined(&cfg, &cancel).unwrap();
    assert_eq!(report.retirement_years, report.accumulation_years);
}

#[test]
fn combined_run_num_simulations_matches_request() {
    let cancel = CancellationToken::new();
    let report = run_combined(&config(), &cancel).unwrap();
    assert_eq!(report.accumulation_summary.num_simulations, 20);
    assert_eq!(report.withdrawal_summary.num_simulations, 20);
}

//! Criterion benchmarks for the retirement Monte Carlo kernel
//!
//! Run with: cargo bench -p retiresim_core

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use retiresim_core::config::{InitialPortfolioConfig, ScenarioConfig, SimulationConfig, StrategyConfig, TaxConfig};
use retiresim_core::model::Allocation;
use retiresim_core::simulation::{CancellationToken, run_withdrawal};

fn base_config(num_simulations: u32) -> SimulationConfig {
    SimulationConfig {
        initial_portfolio: InitialPortfolioConfig {
            value: 1_000_000.0,
            allocation: Allocation::new(0.6, 0.3, 0.1),
        },
        rebalance: true,
        scenario_config: ScenarioConfig::MonteCarlo {
            stock_mean: 0.07,
            stock_std: 0.15,
            bond_mean: 0.03,
            bond_std: 0.05,
            inflation_mean: 0.02,
            inflation_std: 0.01,
            cash_return: 0.01,
        },
        scenario_years: 30,
        strategy_config: Some(StrategyConfig::FixedSwr {
            withdrawal_rate: 0.04,
            minimum_withdrawal: 0.0,
            maximum_withdrawal: None,
        }),
        strategy_configs: None,
        tax_config: TaxConfig {
            country: "US".to_string(),
            region: "federal".to_string(),
            adjust_brackets_with_inflation: true,
        },
        simulation_years: 30,
        num_simulations,
        seed: Some(42),
        monthly_savings: None,
        annual_increase: None,
        target_value: None,
        retirement_years: None,
        num_threads: None,
    }
}

fn bench_single_strategy(c: &mut Criterion) {
    let config = base_config(1_000);

    c.bench_function("withdrawal_30yr_1000_trials", |b| {
        b.iter(|| run_withdrawal(black_box(&config), black_box(&CancellationToken::new())))
    });
}

fn bench_scaling_with_num_simulations(c: &mut Criterion) {
    let mut group = c.benchmark_group("withdrawal_num_simulations");

    for iterations in [100, 1_000, 5_000].iter() {
        let config = base_config(*iterations);
        group.bench_with_input(BenchmarkId::new("num_simulations", iterations), iterations, |b, _| {
            b.iter(|| run_withdrawal(black_box(&config), black_box(&CancellationToken::new())))
        });
    }

    group.finish();
}

fn bench_strategy_comparison(c: &mut Criterion) {
    let mut config = base_config(500);
    config.strategy_config = None;
    config.strategy_configs = Some(vec![
        StrategyConfig::FixedSwr {
            withdrawal_rate: 0.04,
            minimum_withdrawal: 0.0,
            maximum_withdrawal: None,
        },
        StrategyConfig::ConstantDollar { withdrawal_amount: 40_000.0 },
        StrategyConfig::HebelerAutopilotIi {
            initial_withdrawal_rate: 0.05,
            previous_withdrawal_weight: 0.5,
            payout_horizon: 30,
            minimum_withdrawal: 0.0,
        },
    ]);

    c.bench_function("withdrawal_three_strategy_comparison", |b| {
        b.iter(|| run_withdrawal(black_box(&config), black_box(&CancellationToken::new())))
    });
}

criterion_group!(
    benches,
    bench_single_strategy,
    bench_scaling_with_num_simulations,
    bench_strategy_comparison,
);
criterion_main!(benches);

//! Walk-forward + statistics end-to-end: the allocator's value history feeds
//! the statistics engine, and the annualization paths agree with closed-form
//! expectations.

use chrono::NaiveDate;
use std::collections::HashMap;

use quantlab_core::domain::{PortfolioAllocation, PriceTable};
use quantlab_core::engine::{
    FittingWindow, TradingFrequency, WalkForwardBacktest, WalkForwardConfig, WindowUnit,
};
use quantlab_core::strategy::{Capabilities, EqualWeight, Strategy, StrategyError};
use quantlab_runner::stats::{summarize, Frequency, StatsError};

/// Allocation strategy that always returns the same fixed weights.
struct Fixed(PortfolioAllocation);

impl Strategy for Fixed {
    fn name(&self) -> &str {
        "fixed"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::ALLOCATION_ONLY
    }

    fn generate_portfolio(
        &self,
        _window: &PriceTable,
    ) -> Result<PortfolioAllocation, StrategyError> {
        Ok(self.0.clone())
    }
}

fn daily_table(columns: Vec<(&str, Vec<f64>)>) -> PriceTable {
    let n = columns[0].1.len();
    let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let dates = (0..n)
        .map(|i| base + chrono::Duration::days(i as i64))
        .collect();
    let symbols: Vec<String> = columns.iter().map(|(s, _)| s.to_string()).collect();
    let prices = columns
        .into_iter()
        .map(|(s, col)| (s.to_string(), col))
        .collect();
    PriceTable::new(dates, symbols, prices).unwrap()
}

fn config(days: u32) -> WalkForwardConfig {
    WalkForwardConfig {
        frequency: TradingFrequency::Daily,
        window: FittingWindow::new(days, WindowUnit::Days),
        starting_cash: 10_000.0,
    }
}

#[test]
fn constant_daily_growth_annualizes_exactly() {
    // 1% per day, fully allocated: every period return is exactly 0.01, so
    // annual_return must equal 1.01^252 - 1 with no drift.
    let r: f64 = 0.01;
    let n = 40;
    let prices: Vec<f64> = (0..n).map(|i| 100.0 * (1.0 + r).powi(i)).collect();
    let table = daily_table(vec![("SPY", prices)]);

    let backtest = WalkForwardBacktest::new(config(2));
    let report = backtest
        .run(&table, &Fixed(PortfolioAllocation::from_weights([("SPY", 1.0)])))
        .unwrap();

    for period_return in &report.returns {
        assert!((period_return - r).abs() < 1e-10);
    }

    let summary = summarize(&report.values, &report.returns, &[0.05], Frequency::Daily).unwrap();
    assert!((summary.average_return - r).abs() < 1e-10);
    assert!((summary.annual_return - ((1.0 + r).powi(252) - 1.0)).abs() < 1e-6);
    // Constant returns: volatility collapses to rounding noise and the
    // Sharpe ratio explodes (±∞ when the noise is exactly zero).
    assert!(summary.annual_volatility < 1e-9);
    assert!(summary.sharpe_ratio > 1e6);
}

#[test]
fn empty_allocation_statistics_are_degenerate() {
    // An always-empty allocator produces all-zero returns; statistics on it
    // are degenerate, not silently zero.
    let prices: Vec<f64> = (0..10).map(|i| 100.0 + i as f64).collect();
    let table = daily_table(vec![("SPY", prices)]);

    let backtest = WalkForwardBacktest::new(config(1));
    let report = backtest
        .run(&table, &Fixed(PortfolioAllocation::empty()))
        .unwrap();

    assert!(report.returns.iter().all(|r| *r == 0.0));
    assert!(report.values.iter().all(|p| p.value == 10_000.0));

    let result = summarize(&report.values, &report.returns, &[], Frequency::Daily);
    assert_eq!(result.unwrap_err(), StatsError::DegenerateStatistic);
}

#[test]
fn equal_weight_full_pipeline() {
    // Two assets drifting apart; the 50/50 book averages their paths.
    let n = 60;
    let spy: Vec<f64> = (0..n).map(|i| 100.0 * (1.002_f64).powi(i)).collect();
    let qqq: Vec<f64> = (0..n).map(|i| 200.0 * (0.999_f64).powi(i)).collect();
    let table = daily_table(vec![("SPY", spy), ("QQQ", qqq)]);

    let backtest = WalkForwardBacktest::new(config(5));
    let report = backtest.run(&table, &EqualWeight).unwrap();

    let expected_return = 0.5 * 0.002 + 0.5 * (-0.001);
    for period_return in &report.returns {
        assert!((period_return - expected_return).abs() < 1e-9);
    }

    let summary = summarize(&report.values, &report.returns, &[], Frequency::Daily).unwrap();
    assert!(summary.annual_return > 0.0);
    assert!((summary.total_return - (report.final_value() / 10_000.0 - 1.0)).abs() < 1e-9);
}

#[test]
fn signal_only_strategy_cannot_allocate() {
    let prices: Vec<f64> = (0..10).map(|i| 100.0 + i as f64).collect();
    let table = daily_table(vec![("SPY", prices)]);

    let backtest = WalkForwardBacktest::new(config(1));
    let smac = quantlab_core::strategy::Smac::new(2, 5, false);
    assert!(!smac.capabilities().allocation);

    let result = backtest.run(&table, &smac);
    assert!(result.is_err());
}

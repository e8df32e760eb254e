//! Basket trade simulator — the single-asset transition rules generalized
//! across a weighted basket sharing one cash balance.
//!
//! Within a bar, assets are processed in the price table's symbol order.
//! Entry sizing uses a cash snapshot taken at the start of the bar, scaled by
//! the asset's weight; closing an opposite position refreshes the snapshot
//! from live cash before the re-entry is sized. Both rules make the
//! processing order a real source of path dependence, which is why the order
//! is part of the input rather than a container artifact.

use std::collections::HashMap;

use crate::domain::{PriceTable, SignalPlan};
use crate::strategy::Strategy;

use super::state::SimulationState;
use super::transition::apply_signal;
use super::{SimulationError, SimulationReport, SimulatorConfig};

/// Bar-by-bar simulator for a weighted basket of assets.
#[derive(Debug, Clone, Default)]
pub struct BasketSimulator {
    config: SimulatorConfig,
}

impl BasketSimulator {
    pub fn new(config: SimulatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Run the strategy's signal plan over the table and return the
    /// value/return history.
    pub fn run(
        &self,
        table: &PriceTable,
        strategy: &dyn Strategy,
    ) -> Result<SimulationReport, SimulationError> {
        let plan = strategy.generate_signal_table(table)?;
        self.run_with_plan(table, &plan)
    }

    /// Run against a precomputed signal plan (equal-shaped with the table).
    pub fn run_with_plan(
        &self,
        table: &PriceTable,
        plan: &SignalPlan,
    ) -> Result<SimulationReport, SimulationError> {
        validate_plan(table, plan)?;

        let n_rows = table.n_rows();
        let mut state = SimulationState::new(self.config.starting_cash);
        let daily_borrow = self.config.daily_borrow_rate();
        let fee = self.config.transaction_fee;
        let mut bar_prices: HashMap<String, f64> = HashMap::with_capacity(table.symbols().len());

        for bar in 0..n_rows {
            let date = table.dates()[bar];
            // Sizing snapshot for this bar; refreshed only after a close.
            let mut total_cash = state.cash;

            for symbol in table.symbols() {
                let price = table.column(symbol)?[bar];
                let signal = plan.signals[symbol][bar];
                let weight = plan.weights[symbol][bar];

                let shares = state.positions.entry(symbol.clone()).or_insert(0.0);
                apply_signal(
                    &mut state.cash,
                    shares,
                    signal,
                    price,
                    fee,
                    daily_borrow,
                    |live_cash, closed| {
                        if closed {
                            total_cash = live_cash;
                        }
                        total_cash * weight
                    },
                );

                bar_prices.insert(symbol.clone(), price);
            }

            state.record_value(date, &bar_prices);
        }

        Ok(SimulationReport::from_values(state.value_history))
    }
}

fn validate_plan(table: &PriceTable, plan: &SignalPlan) -> Result<(), SimulationError> {
    for symbol in table.symbols() {
        let signals = plan
            .signals
            .get(symbol)
            .ok_or_else(|| SimulationError::MissingPlanSymbol {
                symbol: symbol.clone(),
            })?;
        let weights = plan
            .weights
            .get(symbol)
            .ok_or_else(|| SimulationError::MissingPlanSymbol {
                symbol: symbol.clone(),
            })?;
        if signals.len() != table.n_rows() || weights.len() != table.n_rows() {
            return Err(SimulationError::SignalTableMismatch {
                symbol: symbol.clone(),
                signals: signals.len().min(weights.len()),
                bars: table.n_rows(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Signal;
    use chrono::NaiveDate;

    fn table(columns: Vec<(&str, Vec<f64>)>) -> PriceTable {
        let n = columns[0].1.len();
        let base = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
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

    fn plan(entries: Vec<(&str, Vec<Signal>, f64)>) -> SignalPlan {
        let mut signals = HashMap::new();
        let mut weights = HashMap::new();
        for (symbol, sigs, weight) in entries {
            let n = sigs.len();
            signals.insert(symbol.to_string(), sigs);
            weights.insert(symbol.to_string(), vec![weight; n]);
        }
        SignalPlan::new(signals, weights)
    }

    fn feeless(starting_cash: f64) -> BasketSimulator {
        BasketSimulator::new(SimulatorConfig {
            starting_cash,
            transaction_fee: 0.0,
            borrow_rate: 0.0,
        })
    }

    #[test]
    fn weights_split_the_budget() {
        let sim = feeless(1_000.0);
        let t = table(vec![
            ("AAA", vec![10.0, 10.0]),
            ("BBB", vec![10.0, 10.0]),
        ]);
        let p = plan(vec![
            ("AAA", vec![Signal::Long, Signal::Hold], 0.5),
            ("BBB", vec![Signal::Long, Signal::Hold], 0.5),
        ]);
        let report = sim.run_with_plan(&t, &p).unwrap();

        // Each asset sizes against 500: 50 shares apiece, fully invested.
        assert_eq!(report.values[0].value, 1_000.0);
        assert_eq!(report.final_value(), 1_000.0);
    }

    #[test]
    fn sizing_uses_bar_start_snapshot() {
        // Both assets size against the bar-start cash, so the second asset's
        // budget ignores the first asset's buy.
        let sim = feeless(1_000.0);
        let t = table(vec![
            ("AAA", vec![10.0]),
            ("BBB", vec![10.0]),
        ]);
        let p = plan(vec![
            ("AAA", vec![Signal::Long], 1.0),
            ("BBB", vec![Signal::Long], 1.0),
        ]);
        let report = sim.run_with_plan(&t, &p).unwrap();

        // AAA buys 100 shares (all cash). BBB sizes against the stale
        // snapshot of 1000 and buys 100 more, driving cash to -1000.
        // Value stays 1000: -1000 cash + 200 shares * 10.
        assert_eq!(report.final_value(), 1_000.0);
    }

    #[test]
    fn exit_does_not_refresh_snapshot() {
        let sim = feeless(1_000.0);
        // Bar 0: AAA long 50 @ 10 (weight 0.5), BBB holds.
        // Bar 1: AAA exits @ 20; an exit never refreshes the snapshot, so
        // BBB's short still sizes against the bar-start cash of 500.
        let t = table(vec![
            ("AAA", vec![10.0, 20.0]),
            ("BBB", vec![10.0, 10.0]),
        ]);
        let p = SignalPlan::new(
            [
                ("AAA".to_string(), vec![Signal::Long, Signal::Exit]),
                ("BBB".to_string(), vec![Signal::Hold, Signal::Short]),
            ]
            .into_iter()
            .collect(),
            [
                ("AAA".to_string(), vec![0.5, 0.5]),
                ("BBB".to_string(), vec![1.0, 1.0]),
            ]
            .into_iter()
            .collect(),
        );
        let report = sim.run_with_plan(&t, &p).unwrap();

        // Bar 0: AAA buys 50 @ 10 → cash 500, value 1000.
        // Bar 1 snapshot = 500. AAA exit → cash 1500. BBB shorts
        // floor(500 * 1.0 / 10) = 50 shares → cash 2000, shares -50.
        // Value: 2000 - 50*10 = 1500.
        assert_eq!(report.values[0].value, 1_000.0);
        assert_eq!(report.final_value(), 1_500.0);
    }

    #[test]
    fn flip_refreshes_snapshot_before_reentry() {
        let sim = feeless(1_000.0);
        // Single asset flips long → short in one bar. Closing the long
        // refreshes the snapshot, so the short sizes against the proceeds.
        let t = table(vec![("AAA", vec![10.0, 20.0])]);
        let p = plan(vec![("AAA", vec![Signal::Long, Signal::Short], 1.0)]);
        let report = sim.run_with_plan(&t, &p).unwrap();

        // Bar 0: long 100 @ 10, cash 0. Bar 1: sell 100 @ 20 → cash 2000
        // (refresh), short floor(2000/20) = 100 → cash 4000, shares -100.
        // Value: 4000 - 100*20 = 2000.
        assert_eq!(report.final_value(), 2_000.0);
    }

    #[test]
    fn missing_plan_symbol_rejected() {
        let sim = feeless(1_000.0);
        let t = table(vec![("AAA", vec![10.0]), ("BBB", vec![10.0])]);
        let p = plan(vec![("AAA", vec![Signal::Hold], 1.0)]);
        assert!(matches!(
            sim.run_with_plan(&t, &p),
            Err(SimulationError::MissingPlanSymbol { .. })
        ));
    }

    #[test]
    fn value_identity_holds_with_mixed_positions() {
        let sim = BasketSimulator::new(SimulatorConfig {
            starting_cash: 10_000.0,
            transaction_fee: 10.0,
            borrow_rate: 0.02,
        });
        let t = table(vec![
            ("AAA", vec![50.0, 55.0, 45.0, 60.0]),
            ("BBB", vec![20.0, 18.0, 22.0, 19.0]),
        ]);
        let p = plan(vec![
            (
                "AAA",
                vec![Signal::Long, Signal::Hold, Signal::Exit, Signal::Long],
                0.6,
            ),
            (
                "BBB",
                vec![Signal::Short, Signal::Hold, Signal::Long, Signal::Exit],
                0.4,
            ),
        ]);
        let report = sim.run_with_plan(&t, &p).unwrap();
        assert_eq!(report.values.len(), 4);
        assert_eq!(report.returns.len(), 3);
        for point in &report.values {
            assert!(point.value.is_finite());
        }
    }
}

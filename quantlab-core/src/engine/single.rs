//! Single-asset trade simulator.
//!
//! Walks one price series chronologically, converting the strategy's per-bar
//! signals into cash/position transitions with flat transaction fees and
//! short borrow costs, and records the portfolio value at every bar.

use std::collections::HashMap;

use crate::domain::{PriceSeries, Signal};
use crate::strategy::Strategy;

use super::state::SimulationState;
use super::transition::apply_signal;
use super::{SimulationError, SimulationReport, SimulatorConfig};

/// Bar-by-bar simulator for one asset.
#[derive(Debug, Clone, Default)]
pub struct TradeSimulator {
    config: SimulatorConfig,
}

impl TradeSimulator {
    pub fn new(config: SimulatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Run the strategy over the series and return the value/return history.
    ///
    /// New entries are sized against live cash: `floor((cash - fee) / price)`
    /// shares. See [`super::transition`] for the full transition rules.
    pub fn run(
        &self,
        series: &PriceSeries,
        strategy: &dyn Strategy,
    ) -> Result<SimulationReport, SimulationError> {
        let signals = strategy.generate_signals(series)?;
        self.run_with_signals(series, &signals)
    }

    /// Run against a precomputed signal sequence (1:1 with the series).
    pub fn run_with_signals(
        &self,
        series: &PriceSeries,
        signals: &[Signal],
    ) -> Result<SimulationReport, SimulationError> {
        if signals.len() != series.len() {
            return Err(SimulationError::SignalMismatch {
                signals: signals.len(),
                bars: series.len(),
            });
        }

        let mut state = SimulationState::new(self.config.starting_cash);
        let symbol = series.symbol().to_string();
        let daily_borrow = self.config.daily_borrow_rate();
        let mut bar_prices = HashMap::with_capacity(1);

        for ((&date, &price), &signal) in series.dates().iter().zip(series.prices()).zip(signals) {
            let shares = state.positions.entry(symbol.clone()).or_insert(0.0);
            apply_signal(
                &mut state.cash,
                shares,
                signal,
                price,
                self.config.transaction_fee,
                daily_borrow,
                |live_cash, _closed| live_cash,
            );

            bar_prices.insert(symbol.clone(), price);
            state.record_value(date, &bar_prices);
        }

        Ok(SimulationReport::from_values(state.value_history))
    }
}

//! Mutable simulation state and per-bar value recording.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One point on the portfolio value curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValuePoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Mutable state that evolves bar-by-bar during a simulation.
///
/// Created fresh at the start of every run — including every bootstrap
/// resample — mutated in place by exactly one simulator invocation, and
/// discarded once the value/return history is extracted.
///
/// The accounting identity must hold at every recorded bar:
/// `value == cash + sum(positions[a] * price[a])`. [`record_value`]
/// recomputes the identity from scratch and debug-asserts it against the
/// incrementally maintained books.
///
/// [`record_value`]: SimulationState::record_value
#[derive(Debug, Clone)]
pub struct SimulationState {
    pub cash: f64,
    /// Signed share count per symbol (negative = short).
    pub positions: HashMap<String, f64>,
    pub value_history: Vec<ValuePoint>,
}

impl SimulationState {
    pub fn new(starting_cash: f64) -> Self {
        Self {
            cash: starting_cash,
            positions: HashMap::new(),
            value_history: Vec::new(),
        }
    }

    pub fn shares(&self, symbol: &str) -> f64 {
        self.positions.get(symbol).copied().unwrap_or(0.0)
    }

    /// Mark the portfolio to market and append to the value history.
    ///
    /// `prices` must cover every symbol with a non-zero position.
    /// Returns the recorded value.
    pub fn record_value(&mut self, date: NaiveDate, prices: &HashMap<String, f64>) -> f64 {
        debug_assert!(
            self.positions
                .iter()
                .all(|(symbol, shares)| *shares == 0.0 || prices.contains_key(symbol)),
            "open position without a price at {date}"
        );

        let position_value: f64 = self
            .positions
            .iter()
            .map(|(symbol, shares)| shares * prices.get(symbol).copied().unwrap_or(0.0))
            .sum();
        let value = self.cash + position_value;
        self.value_history.push(ValuePoint { date, value });
        value
    }
}

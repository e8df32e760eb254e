//! Simulation engine — bar-by-bar trade simulators and the walk-forward
//! portfolio allocator.
//!
//! Every simulation is a strict sequential walk over time: each bar's state
//! depends on the prior bar's cash and positions, so no bar is ever evaluated
//! out of order. A run owns its [`SimulationState`] exclusively; nothing is
//! shared across runs, which is what makes bootstrap resamples safe to
//! execute in parallel.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::series::InputError;
use crate::strategy::StrategyError;

pub mod basket;
pub mod single;
pub mod state;
mod transition;
pub mod walk_forward;

pub use basket::BasketSimulator;
pub use single::TradeSimulator;
pub use state::{SimulationState, ValuePoint};
pub use transition::DAILY_BORROW_PERIODS;
pub use walk_forward::{
    FittingWindow, TradingFrequency, WalkForwardBacktest, WalkForwardConfig, WalkForwardError,
    WalkForwardReport, WindowUnit,
};

/// Shared configuration for the trade simulators.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulatorConfig {
    /// Cash at the start of the run.
    pub starting_cash: f64,
    /// Flat fee per executed trade.
    pub transaction_fee: f64,
    /// Annual borrow rate for short positions, accrued per bar at
    /// `rate / 252` (see [`DAILY_BORROW_PERIODS`]).
    pub borrow_rate: f64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            starting_cash: 10_000.0,
            transaction_fee: 10.0,
            borrow_rate: 0.02,
        }
    }
}

impl SimulatorConfig {
    pub(crate) fn daily_borrow_rate(&self) -> f64 {
        self.borrow_rate / DAILY_BORROW_PERIODS
    }
}

/// Output of a simulation run: the full per-bar value history and the
/// derived simple-return series (first bar dropped — it has no prior).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationReport {
    pub values: Vec<ValuePoint>,
    pub returns: Vec<f64>,
}

impl SimulationReport {
    pub(crate) fn from_values(values: Vec<ValuePoint>) -> Self {
        let returns = values
            .windows(2)
            .map(|w| (w[1].value - w[0].value) / w[0].value)
            .collect();
        Self { values, returns }
    }

    pub fn final_value(&self) -> f64 {
        self.values.last().map(|p| p.value).unwrap_or(0.0)
    }

    /// Value curve without dates, oldest first.
    pub fn value_curve(&self) -> Vec<f64> {
        self.values.iter().map(|p| p.value).collect()
    }
}

/// Errors from the trade simulators.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Strategy(#[from] StrategyError),
    #[error("signal series misaligned: {signals} signals for {bars} bars")]
    SignalMismatch { signals: usize, bars: usize },
    #[error("signal table misaligned for '{symbol}': {signals} signals for {bars} bars")]
    SignalTableMismatch {
        symbol: String,
        signals: usize,
        bars: usize,
    },
    #[error("signal plan has no entry for '{symbol}'")]
    MissingPlanSymbol { symbol: String },
}

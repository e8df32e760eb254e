//! Strategy contract — the capability-tagged interface every strategy
//! implements.
//!
//! A strategy supports one or both of two forms:
//! - **allocation**: turn a fitting window into a static target allocation
//!   (consumed by the walk-forward allocator);
//! - **signals**: turn a price history into per-bar trading signals
//!   (consumed by the trade simulators).
//!
//! Callers check [`Strategy::capabilities`] before invoking a form; invoking
//! an unsupported form is a caller bug surfaced as
//! [`StrategyError::Unsupported`], not a control-flow mechanism.
//!
//! Strategies must be deterministic and side-effect free: the bootstrap
//! re-runs them on synthetic histories and relies on identical input
//! producing identical output.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

use crate::domain::{PortfolioAllocation, PriceSeries, PriceTable, Signal, SignalPlan};

mod equal_weight;
mod ewmac;
mod scripted;
mod smac;

pub use equal_weight::EqualWeight;
pub use ewmac::Ewmac;
pub use scripted::ScriptedSignals;
pub use smac::Smac;

/// Which forms a strategy supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub allocation: bool,
    pub signals: bool,
}

impl Capabilities {
    pub const ALLOCATION_ONLY: Capabilities = Capabilities {
        allocation: true,
        signals: false,
    };
    pub const SIGNALS_ONLY: Capabilities = Capabilities {
        allocation: false,
        signals: true,
    };
}

/// The form a caller asked for when it hit an unsupported strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Allocation,
    Signals,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::Allocation => write!(f, "portfolio allocation"),
            Capability::Signals => write!(f, "signal generation"),
        }
    }
}

/// Errors from strategy invocation.
#[derive(Debug, Error)]
pub enum StrategyError {
    #[error("strategy '{strategy}' does not support {capability}")]
    Unsupported {
        strategy: String,
        capability: Capability,
    },
}

impl StrategyError {
    fn unsupported(strategy: &str, capability: Capability) -> Self {
        StrategyError::Unsupported {
            strategy: strategy.to_string(),
            capability,
        }
    }
}

/// A trading or allocation strategy.
///
/// Default method bodies return [`StrategyError::Unsupported`]; an
/// implementation overrides exactly the forms its [`Capabilities`] advertise.
pub trait Strategy: Send + Sync {
    /// Short human-readable name (e.g. "smac").
    fn name(&self) -> &str;

    fn capabilities(&self) -> Capabilities;

    /// Produce a static target allocation from a fitting window ending at the
    /// decision date. Held unchanged until the next decision date.
    fn generate_portfolio(
        &self,
        window: &PriceTable,
    ) -> Result<PortfolioAllocation, StrategyError> {
        let _ = window;
        Err(StrategyError::unsupported(
            self.name(),
            Capability::Allocation,
        ))
    }

    /// Produce one signal per bar, aligned 1:1 with `series.dates()`.
    fn generate_signals(&self, series: &PriceSeries) -> Result<Vec<Signal>, StrategyError> {
        let _ = series;
        Err(StrategyError::unsupported(self.name(), Capability::Signals))
    }

    /// Produce equal-shaped signal and weight tables for a basket.
    ///
    /// The default lifts [`Strategy::generate_signals`] over each column with
    /// equal weights `1/n` — how a per-series strategy trades a basket.
    fn generate_signal_table(&self, table: &PriceTable) -> Result<SignalPlan, StrategyError> {
        let n = table.symbols().len() as f64;
        let equal_weight = 1.0 / n;
        let mut signals = HashMap::new();
        let mut weights = HashMap::new();
        for symbol in table.symbols() {
            let series = table
                .series(symbol)
                .expect("table symbols are validated at construction");
            signals.insert(symbol.clone(), self.generate_signals(&series)?);
            weights.insert(symbol.clone(), vec![equal_weight; table.n_rows()]);
        }
        Ok(SignalPlan::new(signals, weights))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    struct AllocationOnly;

    impl Strategy for AllocationOnly {
        fn name(&self) -> &str {
            "allocation_only"
        }

        fn capabilities(&self) -> Capabilities {
            Capabilities::ALLOCATION_ONLY
        }

        fn generate_portfolio(
            &self,
            _window: &PriceTable,
        ) -> Result<PortfolioAllocation, StrategyError> {
            Ok(PortfolioAllocation::from_weights([("SPY", 1.0)]))
        }
    }

    fn sample_series() -> PriceSeries {
        let base = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let dates = (0..3).map(|i| base + chrono::Duration::days(i)).collect();
        PriceSeries::new("SPY", dates, vec![100.0, 101.0, 102.0]).unwrap()
    }

    #[test]
    fn wrong_capability_is_unsupported() {
        let strategy = AllocationOnly;
        assert!(!strategy.capabilities().signals);
        let err = strategy.generate_signals(&sample_series()).unwrap_err();
        assert!(matches!(
            err,
            StrategyError::Unsupported {
                capability: Capability::Signals,
                ..
            }
        ));
    }

    #[test]
    fn default_signal_table_lifts_per_column() {
        let strategy = ScriptedSignals::new(vec![Signal::Long, Signal::Hold, Signal::Exit]);
        let table = PriceTable::from_series(&sample_series());
        let plan = strategy.generate_signal_table(&table).unwrap();
        assert_eq!(plan.signals["SPY"].len(), 3);
        assert!((plan.weights["SPY"][0] - 1.0).abs() < 1e-12);
    }
}

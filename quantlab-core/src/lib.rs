//! QuantLab Core — domain types, trade simulators, walk-forward allocator,
//! strategy contract.
//!
//! This crate contains the heart of the backtesting toolkit:
//! - Validated price data (single series and aligned multi-asset tables)
//! - The capability-tagged `Strategy` contract plus bundled reference
//!   strategies (SMA/EWMA crossover, equal weight, scripted playback)
//! - Bar-by-bar trade simulators (single asset and weighted basket) with
//!   flat fees and short borrow costs
//! - The walk-forward refit-and-hold portfolio allocator
//! - A deterministic, order-independent RNG seed hierarchy

pub mod domain;
pub mod engine;
pub mod rng;
pub mod strategy;

pub use domain::{InputError, PortfolioAllocation, PriceSeries, PriceTable, Signal, SignalPlan};
pub use engine::{
    BasketSimulator, SimulationError, SimulationReport, SimulatorConfig, TradeSimulator,
    ValuePoint, WalkForwardBacktest, WalkForwardConfig, WalkForwardReport,
};
pub use strategy::{Capabilities, Strategy, StrategyError};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: core types are Send + Sync, so simulations can be
    /// fanned out across worker threads without retrofits.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<PriceSeries>();
        require_sync::<PriceSeries>();
        require_send::<PriceTable>();
        require_sync::<PriceTable>();
        require_send::<Signal>();
        require_sync::<Signal>();
        require_send::<SignalPlan>();
        require_sync::<SignalPlan>();
        require_send::<PortfolioAllocation>();
        require_sync::<PortfolioAllocation>();

        require_send::<SimulatorConfig>();
        require_sync::<SimulatorConfig>();
        require_send::<SimulationReport>();
        require_sync::<SimulationReport>();
        require_send::<TradeSimulator>();
        require_sync::<TradeSimulator>();
        require_send::<BasketSimulator>();
        require_sync::<BasketSimulator>();
        require_send::<WalkForwardReport>();
        require_sync::<WalkForwardReport>();

        require_send::<rng::SeedHierarchy>();
        require_sync::<rng::SeedHierarchy>();

        require_send::<strategy::Smac>();
        require_sync::<strategy::Smac>();
        require_send::<strategy::Ewmac>();
        require_sync::<strategy::Ewmac>();
        require_send::<strategy::EqualWeight>();
        require_sync::<strategy::EqualWeight>();
        require_send::<strategy::ScriptedSignals>();
        require_sync::<strategy::ScriptedSignals>();
    }

    /// Architecture contract: `Strategy` is object-safe — the simulators take
    /// `&dyn Strategy`, so a strategy added downstream needs no engine change.
    #[test]
    fn strategy_trait_is_object_safe() {
        fn _takes_dyn(strategy: &dyn Strategy) -> &str {
            strategy.name()
        }
    }
}

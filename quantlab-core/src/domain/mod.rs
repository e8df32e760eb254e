//! Domain types: price data, signals, allocations.

pub mod allocation;
pub mod series;
pub mod signal;

pub use allocation::PortfolioAllocation;
pub use series::{InputError, PriceSeries, PriceTable};
pub use signal::{Signal, SignalPlan};

//! QuantLab Runner — orchestration on top of `quantlab-core`.
//!
//! This crate provides:
//! - Performance statistics (geometric-mean returns, annualization, Sharpe)
//! - The stationary block bootstrap for confidence intervals, parallel over
//!   resamples
//! - Serializable TOML run configuration with content-hash run ids
//! - CSV price loading and result export

pub mod bootstrap;
pub mod config;
pub mod data_loader;
pub mod export;
pub mod stats;

pub use bootstrap::{
    run_bootstrap, BootstrapConfig, BootstrapError, BootstrapReport, StatisticDistribution,
};
pub use config::{BacktestConfig, ConfigError, RunId, WalkForwardSettings};
pub use data_loader::{load_price_series, load_price_table, read_price_table, LoadError};
pub use export::{write_bootstrap_csv, write_value_history_csv};
pub use stats::{summarize, Frequency, PerformanceSummary, StatsError};

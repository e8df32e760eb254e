//! Serializable backtest configuration.
//!
//! Captures everything needed to reproduce a run: simulator parameters,
//! statistics frequency, the walk-forward schedule, and bootstrap settings.
//! The BLAKE3 content hash doubles as a run identifier — two identical
//! configurations share an id and can share cached results.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use quantlab_core::engine::{FittingWindow, SimulatorConfig, TradingFrequency};

use crate::bootstrap::BootstrapConfig;
use crate::stats::Frequency;

/// Unique identifier for a backtest run (content-addressable hash).
pub type RunId = String;

/// Serializable configuration for a single backtest run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestConfig {
    /// Universe of symbols to trade.
    pub symbols: Vec<String>,

    /// Simulator parameters (cash, fee, borrow rate).
    #[serde(default)]
    pub simulator: SimulatorConfig,

    /// Sampling frequency of the data, for annualization.
    pub frequency: Frequency,

    /// Walk-forward schedule; absent for pure signal backtests.
    #[serde(default)]
    pub walk_forward: Option<WalkForwardSettings>,

    /// Bootstrap settings; absent to skip robustness analysis.
    #[serde(default)]
    pub bootstrap: Option<BootstrapConfig>,
}

/// Walk-forward schedule: rebalance frequency plus the trailing fit window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WalkForwardSettings {
    pub frequency: TradingFrequency,
    pub window: FittingWindow,
}

/// Errors from configuration parsing and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {reason}")]
    Invalid { reason: String },
}

impl BacktestConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: BacktestConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.symbols.is_empty() {
            return Err(ConfigError::Invalid {
                reason: "at least one symbol is required".into(),
            });
        }
        if self.simulator.starting_cash <= 0.0 {
            return Err(ConfigError::Invalid {
                reason: format!(
                    "starting_cash must be positive, got {}",
                    self.simulator.starting_cash
                ),
            });
        }
        if self.simulator.transaction_fee < 0.0 {
            return Err(ConfigError::Invalid {
                reason: format!(
                    "transaction_fee must be non-negative, got {}",
                    self.simulator.transaction_fee
                ),
            });
        }
        if let Some(bootstrap) = &self.bootstrap {
            if bootstrap.iterations == 0 {
                return Err(ConfigError::Invalid {
                    reason: "bootstrap iterations must be positive".into(),
                });
            }
            if bootstrap.mean_block_length == 0 {
                return Err(ConfigError::Invalid {
                    reason: "bootstrap mean_block_length must be positive".into(),
                });
            }
        }
        Ok(())
    }

    /// Deterministic content hash of this configuration.
    pub fn run_id(&self) -> RunId {
        let json = serde_json::to_string(self).expect("BacktestConfig serialization failed");
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}

//! Trading signals — per-bar directional requests.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-bar trading signal for one asset.
///
/// `Long`, `Short`, and `Exit` request a position change; `Hold` is a no-op
/// that preserves the current position. A request that matches the current
/// position (e.g. `Long` while already long) is also a no-op — the simulator
/// never re-trades a position already at target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    Long,
    Short,
    Exit,
    Hold,
}

/// Per-asset signal and weight tables for a basket, equal-shaped with the
/// price table they were generated from.
///
/// Weights scale each asset's sizing budget: an entry of `w` lets the asset
/// deploy `total_cash * w` when opening a position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalPlan {
    pub signals: HashMap<String, Vec<Signal>>,
    pub weights: HashMap<String, Vec<f64>>,
}

impl SignalPlan {
    pub fn new(signals: HashMap<String, Vec<Signal>>, weights: HashMap<String, Vec<f64>>) -> Self {
        Self { signals, weights }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signal_serialization() {
        let json = serde_json::to_string(&Signal::Long).unwrap();
        assert_eq!(json, "\"long\"");
        let back: Signal = serde_json::from_str("\"hold\"").unwrap();
        assert_eq!(back, Signal::Hold);
    }
}

//! Portfolio allocations — target capital weights per asset.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Target allocation: asset identifier → fraction of capital.
///
/// Entries with non-positive weight are dropped at construction; weights need
/// not sum to 1 — any unallocated residual stays in cash. Backed by a
/// `BTreeMap` so iteration order is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioAllocation {
    weights: BTreeMap<String, f64>,
}

impl PortfolioAllocation {
    /// Empty allocation (all cash).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from (symbol, weight) pairs, dropping non-positive weights.
    pub fn from_weights<I, S>(weights: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let weights = weights
            .into_iter()
            .filter(|(_, w)| *w > 0.0)
            .map(|(s, w)| (s.into(), w))
            .collect();
        Self { weights }
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn weight(&self, symbol: &str) -> Option<f64> {
        self.weights.get(symbol).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.weights.iter().map(|(s, w)| (s.as_str(), *w))
    }

    /// Sum of all weights (≤ 1 means a cash residual remains).
    pub fn total_weight(&self) -> f64 {
        self.weights.values().sum()
    }
}

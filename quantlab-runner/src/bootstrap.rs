//! Stationary block bootstrap — sampling distributions for performance
//! statistics under serial dependence.
//!
//! Resamples the historical return series in geometric-length blocks
//! (Politis & Romano, 1994), rebuilds a synthetic price path from the real
//! initial price, re-runs the full simulator on it, and aggregates the
//! per-resample statistics into mean / median / std / [2.5, 97.5] percentile
//! intervals.
//!
//! Key design choices:
//! - Expected block length of 10 bars; each step continues the current block
//!   with probability `1 - 1/L`, else jumps to a fresh uniform start.
//! - Per-iteration RNGs come from the order-independent seed hierarchy, so a
//!   run is reproducible regardless of thread count.
//! - Iterations are mutually independent and run on the rayon pool; results
//!   merge only at the final aggregation.

use rand::rngs::StdRng;
use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use quantlab_core::domain::PriceSeries;
use quantlab_core::engine::{SimulationError, TradeSimulator};
use quantlab_core::rng::SeedHierarchy;
use quantlab_core::strategy::Strategy;

use crate::stats::{summarize, Frequency, PerformanceSummary, StatsError};

// ─── Configuration ───────────────────────────────────────────────────

/// Configuration for the block bootstrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootstrapConfig {
    /// Number of resamples (default 1000).
    pub iterations: usize,
    /// Expected block length in bars (default 10).
    pub mean_block_length: usize,
    /// Master seed for reproducibility.
    pub seed: u64,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            iterations: 1000,
            mean_block_length: 10,
            seed: 42,
        }
    }
}

// ─── Result types ────────────────────────────────────────────────────

/// Sampling distribution of one statistic across all kept resamples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatisticDistribution {
    pub mean: f64,
    pub median: f64,
    pub std: f64,
    /// 2.5th percentile.
    pub ci_lower: f64,
    /// 97.5th percentile.
    pub ci_upper: f64,
}

/// Aggregated bootstrap distributions, one per statistic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootstrapReport {
    pub average_return: StatisticDistribution,
    pub annual_return: StatisticDistribution,
    pub annual_volatility: StatisticDistribution,
    pub sharpe_ratio: StatisticDistribution,
    pub total_return: StatisticDistribution,
    pub final_value: StatisticDistribution,
    /// Resamples whose statistics entered the aggregation.
    pub iterations_used: usize,
    /// Resamples dropped for degenerate statistics (e.g. zero volatility).
    pub iterations_degenerate: usize,
}

/// Errors from the bootstrap.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("price series too short to resample: {bars} bars (need at least 2)")]
    InsufficientData { bars: usize },
    #[error("simulation failed on resample {iteration}: {source}")]
    Simulation {
        iteration: usize,
        #[source]
        source: SimulationError,
    },
    #[error("all {iterations} resamples produced degenerate statistics")]
    AllDegenerate { iterations: usize },
}

// ─── Bootstrap ───────────────────────────────────────────────────────

/// Run the stationary block bootstrap: resample, re-simulate, aggregate.
///
/// The strategy is re-run in full on every synthetic path, so it must be
/// deterministic and side-effect free.
pub fn run_bootstrap(
    series: &PriceSeries,
    strategy: &dyn Strategy,
    simulator: &TradeSimulator,
    risk_free: &[f64],
    frequency: Frequency,
    config: &BootstrapConfig,
) -> Result<BootstrapReport, BootstrapError> {
    let returns = series.pct_change();
    if returns.is_empty() {
        return Err(BootstrapError::InsufficientData {
            bars: series.len(),
        });
    }

    let seeds = SeedHierarchy::new(config.seed);
    let p = 1.0 / config.mean_block_length.max(1) as f64;

    let summaries: Vec<Option<PerformanceSummary>> = (0..config.iterations)
        .into_par_iter()
        .map(|iteration| {
            let mut rng = seeds.rng_for("bootstrap", iteration as u64);
            let sampled = resample_stationary_block(&returns, returns.len(), p, &mut rng);
            let synthetic = reconstruct_price_path(series, &sampled);

            let report = simulator
                .run(&synthetic, strategy)
                .map_err(|source| BootstrapError::Simulation { iteration, source })?;

            match summarize(&report.values, &report.returns, risk_free, frequency) {
                Ok(summary) => Ok(Some(summary)),
                // A degenerate resample (e.g. the strategy never trades) is
                // dropped, not fatal. NotRun cannot occur — the resample
                // preserves the series length — but dropping is still the
                // right response.
                Err(StatsError::DegenerateStatistic) | Err(StatsError::NotRun) => Ok(None),
            }
        })
        .collect::<Result<_, BootstrapError>>()?;

    let kept: Vec<PerformanceSummary> = summaries.into_iter().flatten().collect();
    if kept.is_empty() {
        return Err(BootstrapError::AllDegenerate {
            iterations: config.iterations,
        });
    }
    let degenerate = config.iterations - kept.len();

    Ok(BootstrapReport {
        average_return: aggregate(kept.iter().map(|s| s.average_return)),
        annual_return: aggregate(kept.iter().map(|s| s.annual_return)),
        annual_volatility: aggregate(kept.iter().map(|s| s.annual_volatility)),
        sharpe_ratio: aggregate(kept.iter().map(|s| s.sharpe_ratio)),
        total_return: aggregate(kept.iter().map(|s| s.total_return)),
        final_value: aggregate(kept.iter().map(|s| s.final_value)),
        iterations_used: kept.len(),
        iterations_degenerate: degenerate,
    })
}

/// One stationary block resample of `target_len` values.
///
/// Starts at a uniform random index; each step appends the current value,
/// then with probability `p` jumps to a new uniform index (fresh block) or
/// otherwise advances to `(i + 1) mod n` (block continues, wrapping).
pub fn resample_stationary_block(
    returns: &[f64],
    target_len: usize,
    p: f64,
    rng: &mut StdRng,
) -> Vec<f64> {
    let n = returns.len();
    let mut resampled = Vec::with_capacity(target_len);
    let mut pos = rng.gen_range(0..n);

    for _ in 0..target_len {
        resampled.push(returns[pos]);
        if rng.gen::<f64>() < p {
            pos = rng.gen_range(0..n);
        } else {
            pos = (pos + 1) % n;
        }
    }

    resampled
}

/// Rebuild a synthetic price path by compounding the sampled returns from
/// the real initial price, reusing the real dates.
///
/// Real prices are strictly positive, so every sampled growth factor
/// `1 + r` is too — the synthetic path is always a valid series.
pub fn reconstruct_price_path(series: &PriceSeries, sampled_returns: &[f64]) -> PriceSeries {
    let mut prices = Vec::with_capacity(sampled_returns.len() + 1);
    prices.push(series.first_price());
    for &r in sampled_returns {
        let prev = *prices.last().expect("path starts non-empty");
        prices.push(prev * (1.0 + r));
    }
    PriceSeries::new(series.symbol(), series.dates().to_vec(), prices)
        .expect("compounded path from a valid series is valid")
}

/// Aggregate one statistic across resamples, dropping non-finite values
/// (infinite Sharpe from a zero-volatility resample).
fn aggregate(values: impl Iterator<Item = f64>) -> StatisticDistribution {
    let mut finite: Vec<f64> = values.filter(|v| v.is_finite()).collect();
    finite.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mean = crate::stats::mean(&finite);
    let std = crate::stats::population_std_dev(&finite);

    StatisticDistribution {
        mean,
        median: percentile_sorted(&finite, 50.0),
        std,
        ci_lower: percentile_sorted(&finite, 2.5),
        ci_upper: percentile_sorted(&finite, 97.5),
    }
}

/// Percentile of a sorted slice using linear interpolation.
fn percentile_sorted(sorted: &[f64], percentile: f64) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return 0.0;
    }
    if n == 1 {
        return sorted[0];
    }
    let rank = (percentile / 100.0) * (n - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = (lo + 1).min(n - 1);
    let frac = rank - lo as f64;
    sorted[lo] * (1.0 - frac) + sorted[hi] * frac
}

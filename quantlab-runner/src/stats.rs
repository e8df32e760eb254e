//! Performance statistics — pure functions that turn a value/return history
//! into risk-adjusted performance numbers.
//!
//! Average return uses geometric-mean compounding; annualization scales by a
//! frequency-dependent period count (252 / 52 / 12). Volatility is the
//! population standard deviation of per-period returns.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use quantlab_core::engine::ValuePoint;

// ─── Frequency ───────────────────────────────────────────────────────

/// Sampling frequency of a return series, for annualization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    /// No annualization: annual figures equal per-period figures.
    Other,
}

impl Frequency {
    /// Periods per year, or `None` for [`Frequency::Other`].
    pub fn periods_per_year(&self) -> Option<f64> {
        match self {
            Frequency::Daily => Some(252.0),
            Frequency::Weekly => Some(52.0),
            Frequency::Monthly => Some(12.0),
            Frequency::Other => None,
        }
    }
}

// ─── Summary ─────────────────────────────────────────────────────────

/// Aggregate performance statistics for one simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSummary {
    /// Geometric mean per-period return.
    pub average_return: f64,
    pub annual_return: f64,
    pub annual_volatility: f64,
    /// May be ±∞ when volatility is zero but excess return is not; a fully
    /// degenerate zero-over-zero fails with
    /// [`StatsError::DegenerateStatistic`] instead.
    pub sharpe_ratio: f64,
    pub total_return: f64,
    pub final_value: f64,
}

/// Errors from statistics computation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StatsError {
    #[error("no completed simulation steps to summarize")]
    NotRun,
    #[error("zero volatility and zero excess return: Sharpe ratio is undefined")]
    DegenerateStatistic,
}

/// Summarize a simulation's value and return history.
///
/// `risk_free` is a series of per-period risk-free rates; its mean is the
/// Sharpe hurdle. An empty slice means a zero risk-free rate.
pub fn summarize(
    values: &[ValuePoint],
    returns: &[f64],
    risk_free: &[f64],
    frequency: Frequency,
) -> Result<PerformanceSummary, StatsError> {
    if values.is_empty() || returns.is_empty() {
        return Err(StatsError::NotRun);
    }

    let average_return = geometric_mean_return(returns);
    let (annual_return, annual_volatility) = match frequency.periods_per_year() {
        Some(periods) => (
            (1.0 + average_return).powf(periods) - 1.0,
            population_std_dev(returns) * periods.sqrt(),
        ),
        None => (average_return, population_std_dev(returns)),
    };

    let excess = annual_return - mean(risk_free);
    let sharpe_ratio = if annual_volatility == 0.0 {
        if excess == 0.0 {
            return Err(StatsError::DegenerateStatistic);
        }
        excess.signum() * f64::INFINITY
    } else {
        excess / annual_volatility
    };

    let initial = values[0].value;
    let final_value = values[values.len() - 1].value;
    let total_return = (final_value - initial) / initial;

    Ok(PerformanceSummary {
        average_return,
        annual_return,
        annual_volatility,
        sharpe_ratio,
        total_return,
        final_value,
    })
}

// ─── Helpers ────────────────────────────────────────────────────────

/// Geometric mean of `(1 + r)` minus one.
///
/// NaN if any return is at or below -100% (the growth factor log is
/// undefined there).
pub fn geometric_mean_return(returns: &[f64]) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }
    let log_sum: f64 = returns.iter().map(|r| (1.0 + r).ln()).sum();
    (log_sum / returns.len() as f64).exp() - 1.0
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divisor n, not n-1).
pub(crate) fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

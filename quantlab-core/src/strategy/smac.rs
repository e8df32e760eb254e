//! Simple moving average crossover strategy.
//!
//! Long while the short-window SMA sits above the long-window SMA; short (or
//! exit, when shorting is disabled) while it sits below. Emits `Hold` during
//! warmup and at exact equality.

use crate::domain::{PriceSeries, Signal};

use super::{Capabilities, Strategy, StrategyError};

#[derive(Debug, Clone)]
pub struct Smac {
    short_window: usize,
    long_window: usize,
    enable_shorting: bool,
}

impl Smac {
    pub fn new(short_window: usize, long_window: usize, enable_shorting: bool) -> Self {
        assert!(short_window >= 1, "short_window must be >= 1");
        assert!(
            long_window > short_window,
            "long_window must be > short_window"
        );
        Self {
            short_window,
            long_window,
            enable_shorting,
        }
    }
}

/// Rolling mean over `period` values; NaN until the window fills.
pub(crate) fn rolling_mean(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];
    if n < period {
        return result;
    }

    let mut sum: f64 = values.iter().take(period).sum();
    result[period - 1] = sum / period as f64;
    for i in period..n {
        sum += values[i] - values[i - period];
        result[i] = sum / period as f64;
    }
    result
}

impl Strategy for Smac {
    fn name(&self) -> &str {
        "smac"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::SIGNALS_ONLY
    }

    fn generate_signals(&self, series: &PriceSeries) -> Result<Vec<Signal>, StrategyError> {
        let short_sma = rolling_mean(series.prices(), self.short_window);
        let long_sma = rolling_mean(series.prices(), self.long_window);

        let signals = short_sma
            .iter()
            .zip(&long_sma)
            .map(|(&short, &long)| {
                if short.is_nan() || long.is_nan() {
                    Signal::Hold
                } else if short > long {
                    Signal::Long
                } else if short < long {
                    if self.enable_shorting {
                        Signal::Short
                    } else {
                        Signal::Exit
                    }
                } else {
                    Signal::Hold
                }
            })
            .collect();

        Ok(signals)
    }
}

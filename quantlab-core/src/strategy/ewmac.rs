//! Exponentially weighted moving average crossover strategy.
//!
//! Same crossover logic as [`Smac`](super::Smac) with span-based exponential
//! smoothing instead of a flat window, weighting recent observations more
//! heavily.

use crate::domain::{PriceSeries, Signal};

use super::{Capabilities, Strategy, StrategyError};

#[derive(Debug, Clone)]
pub struct Ewmac {
    short_span: usize,
    long_span: usize,
    enable_shorting: bool,
}

impl Ewmac {
    pub fn new(short_span: usize, long_span: usize, enable_shorting: bool) -> Self {
        assert!(short_span >= 1, "short_span must be >= 1");
        assert!(long_span > short_span, "long_span must be > short_span");
        Self {
            short_span,
            long_span,
            enable_shorting,
        }
    }
}

/// Span-based EWMA, seeded with the first observation:
/// `ewma[0] = x[0]`, `ewma[t] = alpha * x[t] + (1 - alpha) * ewma[t-1]`
/// with `alpha = 2 / (span + 1)`.
pub(crate) fn ewma(values: &[f64], span: usize) -> Vec<f64> {
    let alpha = 2.0 / (span as f64 + 1.0);
    let mut result = Vec::with_capacity(values.len());
    let mut prev = match values.first() {
        Some(&first) => first,
        None => return result,
    };
    result.push(prev);
    for &value in &values[1..] {
        prev = alpha * value + (1.0 - alpha) * prev;
        result.push(prev);
    }
    result
}

impl Strategy for Ewmac {
    fn name(&self) -> &str {
        "ewmac"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::SIGNALS_ONLY
    }

    fn generate_signals(&self, series: &PriceSeries) -> Result<Vec<Signal>, StrategyError> {
        let short_ewma = ewma(series.prices(), self.short_span);
        let long_ewma = ewma(series.prices(), self.long_span);

        let signals = short_ewma
            .iter()
            .zip(&long_ewma)
            .map(|(&short, &long)| {
                if short > long {
                    Signal::Long
                } else if short < long {
                    if self.enable_shorting {
                        Signal::Short
                    } else {
                        Signal::Exit
                    }
                } else {
                    // Both averages start at the first observation, so the
                    // first bar always lands here.
                    Signal::Hold
                }
            })
            .collect();

        Ok(signals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn series(prices: Vec<f64>) -> PriceSeries {
        let base = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let dates = (0..prices.len())
            .map(|i| base + chrono::Duration::days(i as i64))
            .collect();
        PriceSeries::new("SPY", dates, prices).unwrap()
    }

    #[test]
    fn ewma_seeds_with_first_value() {
        let e = ewma(&[10.0, 12.0], 3);
        assert_eq!(e[0], 10.0);
        // alpha = 0.5: 0.5 * 12 + 0.5 * 10 = 11
        assert!((e[1] - 11.0).abs() < 1e-12);
    }

    #[test]
    fn first_bar_holds() {
        let strategy = Ewmac::new(2, 5, false);
        let signals = strategy
            .generate_signals(&series(vec![100.0, 102.0, 104.0]))
            .unwrap();
        assert_eq!(signals[0], Signal::Hold);
    }

    #[test]
    fn uptrend_goes_long() {
        let strategy = Ewmac::new(2, 5, false);
        let signals = strategy
            .generate_signals(&series(vec![100.0, 102.0, 104.0, 106.0]))
            .unwrap();
        // Short span reacts faster to the rise.
        assert_eq!(signals[1], Signal::Long);
        assert_eq!(signals[3], Signal::Long);
    }

    #[test]
    fn downtrend_shorts_when_enabled() {
        let strategy = Ewmac::new(2, 5, true);
        let signals = strategy
            .generate_signals(&series(vec![106.0, 104.0, 102.0, 100.0]))
            .unwrap();
        assert_eq!(signals[3], Signal::Short);
    }
}

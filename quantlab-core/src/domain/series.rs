//! Price series and aligned price tables — the fundamental market data units.
//!
//! Both types validate on construction: strictly increasing dates, equal
//! column lengths, and strictly positive prices. A zero or negative price is
//! a data-quality fault upstream, never a valid input, so it is rejected here
//! rather than tolerated downstream.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Errors from constructing or indexing price data.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("empty price series for '{symbol}'")]
    EmptySeries { symbol: String },
    #[error("non-positive price {price} for '{symbol}' at {date}")]
    NonPositivePrice {
        symbol: String,
        date: NaiveDate,
        price: f64,
    },
    #[error("dates not strictly increasing for '{symbol}' at index {index}")]
    NonMonotonicDates { symbol: String, index: usize },
    #[error("length mismatch for '{symbol}': {dates} dates vs {prices} prices")]
    LengthMismatch {
        symbol: String,
        dates: usize,
        prices: usize,
    },
    #[error("unknown symbol '{symbol}'")]
    UnknownSymbol { symbol: String },
}

/// Ordered (date, price) history for a single asset.
///
/// Guaranteed non-empty, strictly increasing dates, all prices > 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSeries {
    symbol: String,
    dates: Vec<NaiveDate>,
    prices: Vec<f64>,
}

impl PriceSeries {
    pub fn new(
        symbol: impl Into<String>,
        dates: Vec<NaiveDate>,
        prices: Vec<f64>,
    ) -> Result<Self, InputError> {
        let symbol = symbol.into();
        validate_column(&symbol, &dates, &prices)?;
        validate_dates(&symbol, &dates)?;
        Ok(Self {
            symbol,
            dates,
            prices,
        })
    }

    /// Constructor for data already validated elsewhere (e.g. a table column).
    pub(crate) fn from_validated(symbol: String, dates: Vec<NaiveDate>, prices: Vec<f64>) -> Self {
        Self {
            symbol,
            dates,
            prices,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn prices(&self) -> &[f64] {
        &self.prices
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn first_price(&self) -> f64 {
        self.prices[0]
    }

    /// Bar-over-bar simple returns; one element shorter than the series
    /// (the first bar has no prior).
    pub fn pct_change(&self) -> Vec<f64> {
        self.prices
            .windows(2)
            .map(|w| (w[1] - w[0]) / w[0])
            .collect()
    }
}

/// Date-aligned prices for a basket of assets.
///
/// `symbols` fixes the processing order for the basket simulator: within a
/// bar, assets are visited in this order, and cash effects of earlier assets
/// are visible to later ones. The order is part of the input, not a container
/// artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceTable {
    dates: Vec<NaiveDate>,
    symbols: Vec<String>,
    prices: HashMap<String, Vec<f64>>,
}

impl PriceTable {
    pub fn new(
        dates: Vec<NaiveDate>,
        symbols: Vec<String>,
        prices: HashMap<String, Vec<f64>>,
    ) -> Result<Self, InputError> {
        if dates.is_empty() || symbols.is_empty() {
            return Err(InputError::EmptySeries {
                symbol: symbols.first().cloned().unwrap_or_else(|| "<table>".into()),
            });
        }
        validate_dates("<table>", &dates)?;
        for symbol in &symbols {
            let column = prices.get(symbol).ok_or_else(|| InputError::UnknownSymbol {
                symbol: symbol.clone(),
            })?;
            validate_column(symbol, &dates, column)?;
        }
        Ok(Self {
            dates,
            symbols,
            prices,
        })
    }

    /// Single-asset convenience: a one-column table.
    pub fn from_series(series: &PriceSeries) -> Self {
        let mut prices = HashMap::new();
        prices.insert(series.symbol().to_string(), series.prices().to_vec());
        Self {
            dates: series.dates().to_vec(),
            symbols: vec![series.symbol().to_string()],
            prices,
        }
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn n_rows(&self) -> usize {
        self.dates.len()
    }

    pub fn column(&self, symbol: &str) -> Result<&[f64], InputError> {
        self.prices
            .get(symbol)
            .map(Vec::as_slice)
            .ok_or_else(|| InputError::UnknownSymbol {
                symbol: symbol.to_string(),
            })
    }

    /// Extract one column as an owned `PriceSeries`.
    pub fn series(&self, symbol: &str) -> Result<PriceSeries, InputError> {
        let column = self.column(symbol)?;
        Ok(PriceSeries::from_validated(
            symbol.to_string(),
            self.dates.clone(),
            column.to_vec(),
        ))
    }

    /// Index of the first row on or after `date`, if any.
    pub fn first_row_at_or_after(&self, date: NaiveDate) -> Option<usize> {
        let idx = self.dates.partition_point(|d| *d < date);
        (idx < self.dates.len()).then_some(idx)
    }

    /// Index of the last row on or before `date`, if any.
    pub fn last_row_at_or_before(&self, date: NaiveDate) -> Option<usize> {
        let idx = self.dates.partition_point(|d| *d <= date);
        (idx > 0).then(|| idx - 1)
    }

    /// Rows `[start, end)`, clamped to the available range.
    pub fn slice_rows(&self, start: usize, end: usize) -> PriceTable {
        let end = end.min(self.dates.len());
        let start = start.min(end);
        let prices = self
            .prices
            .iter()
            .map(|(sym, col)| (sym.clone(), col[start..end].to_vec()))
            .collect();
        PriceTable {
            dates: self.dates[start..end].to_vec(),
            symbols: self.symbols.clone(),
            prices,
        }
    }
}

fn validate_column(symbol: &str, dates: &[NaiveDate], prices: &[f64]) -> Result<(), InputError> {
    if dates.is_empty() {
        return Err(InputError::EmptySeries {
            symbol: symbol.to_string(),
        });
    }
    if dates.len() != prices.len() {
        return Err(InputError::LengthMismatch {
            symbol: symbol.to_string(),
            dates: dates.len(),
            prices: prices.len(),
        });
    }
    for (date, price) in dates.iter().zip(prices) {
        if !(*price > 0.0) {
            return Err(InputError::NonPositivePrice {
                symbol: symbol.to_string(),
                date: *date,
                price: *price,
            });
        }
    }
    Ok(())
}

fn validate_dates(symbol: &str, dates: &[NaiveDate]) -> Result<(), InputError> {
    for (index, pair) in dates.windows(2).enumerate() {
        if pair[1] <= pair[0] {
            return Err(InputError::NonMonotonicDates {
                symbol: symbol.to_string(),
                index: index + 1,
            });
        }
    }
    Ok(())
}

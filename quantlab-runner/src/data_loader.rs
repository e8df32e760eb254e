//! CSV price loading — turns a wide CSV file into a validated price table.
//!
//! Expected layout: a `date` column (ISO `YYYY-MM-DD`) followed by one price
//! column per symbol:
//!
//! ```csv
//! date,SPY,QQQ
//! 2024-01-02,472.65,402.44
//! 2024-01-03,469.20,398.73
//! ```
//!
//! The column order of the header becomes the basket processing order.
//! Acquisition (downloads, caching) lives upstream; by the time data reaches
//! this loader it is expected to be complete, and any remaining defect —
//! bad dates, non-positive prices, unparseable numbers — fails the load.

use std::fs::File;
use std::path::Path;

use chrono::NaiveDate;
use thiserror::Error;

use quantlab_core::domain::{InputError, PriceSeries, PriceTable};

/// Errors from the CSV loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open '{path}': {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("header must start with a 'date' column followed by one column per symbol")]
    MissingHeader,
    #[error("bad date '{value}' on line {line}")]
    BadDate { value: String, line: usize },
    #[error("bad price '{value}' for '{symbol}' on line {line}")]
    BadPrice {
        value: String,
        symbol: String,
        line: usize,
    },
    #[error(transparent)]
    Input(#[from] InputError),
}

/// Load a wide CSV file into a price table.
pub fn load_price_table(path: &Path) -> Result<PriceTable, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.display().to_string(),
        source,
    })?;
    read_price_table(file)
}

/// Load one symbol's column from a wide CSV file.
pub fn load_price_series(path: &Path, symbol: &str) -> Result<PriceSeries, LoadError> {
    let table = load_price_table(path)?;
    Ok(table.series(symbol)?)
}

/// Parse a wide CSV document from any reader.
pub fn read_price_table<R: std::io::Read>(reader: R) -> Result<PriceTable, LoadError> {
    let mut csv_reader = csv::Reader::from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let mut fields = headers.iter();
    match fields.next() {
        Some(first) if first.eq_ignore_ascii_case("date") => {}
        _ => return Err(LoadError::MissingHeader),
    }
    let symbols: Vec<String> = fields.map(str::to_string).collect();
    if symbols.is_empty() {
        return Err(LoadError::MissingHeader);
    }

    let mut dates = Vec::new();
    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); symbols.len()];

    for (row_index, record) in csv_reader.records().enumerate() {
        // The reader rejects ragged rows itself, so each record has
        // exactly one date plus one price per symbol.
        let record = record?;
        let line = row_index + 2; // header is line 1

        let date_field = &record[0];
        let date = NaiveDate::parse_from_str(date_field, "%Y-%m-%d").map_err(|_| {
            LoadError::BadDate {
                value: date_field.to_string(),
                line,
            }
        })?;
        dates.push(date);

        for (k, symbol) in symbols.iter().enumerate() {
            let field = &record[k + 1];
            let price: f64 = field.parse().map_err(|_| LoadError::BadPrice {
                value: field.to_string(),
                symbol: symbol.clone(),
                line,
            })?;
            columns[k].push(price);
        }
    }

    let prices = symbols.iter().cloned().zip(columns).collect();
    Ok(PriceTable::new(dates, symbols, prices)?)
}

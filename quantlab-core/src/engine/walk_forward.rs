//! Walk-forward portfolio allocator — periodic refit over a trailing window,
//! then mark-to-market of the held allocation until the next refit date.
//!
//! The allocator steps a fixed grid of decision dates: at each grid date
//! (except the last, which only closes the final holding period) it fits the
//! strategy on the trailing window, asks for a target allocation, and holds
//! it unchanged until the following grid date. Fitting always ends at the
//! decision date, so no future bar can leak into a fit.
//!
//! Holding-period returns use only the endpoint prices of the window;
//! dividends and splits are out of scope.

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::series::InputError;
use crate::domain::{PortfolioAllocation, PriceTable};
use crate::strategy::{Strategy, StrategyError};

use super::state::ValuePoint;

// ─── Configuration ───────────────────────────────────────────────────

/// Spacing of the rebalance grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradingFrequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl TradingFrequency {
    fn advance(&self, date: NaiveDate) -> NaiveDate {
        match self {
            TradingFrequency::Daily => date + Days::new(1),
            TradingFrequency::Weekly => date + Days::new(7),
            TradingFrequency::Monthly => date + Months::new(1),
            TradingFrequency::Yearly => date + Months::new(12),
        }
    }
}

/// Unit for the trailing fitting window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowUnit {
    Days,
    Months,
    Years,
}

/// Length of the trailing window the strategy is fit on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FittingWindow {
    pub amount: u32,
    pub unit: WindowUnit,
}

impl FittingWindow {
    pub fn new(amount: u32, unit: WindowUnit) -> Self {
        Self { amount, unit }
    }

    fn add_to(&self, date: NaiveDate) -> NaiveDate {
        match self.unit {
            WindowUnit::Days => date + Days::new(self.amount as u64),
            WindowUnit::Months => date + Months::new(self.amount),
            WindowUnit::Years => date + Months::new(self.amount * 12),
        }
    }

    fn subtract_from(&self, date: NaiveDate) -> NaiveDate {
        match self.unit {
            WindowUnit::Days => date - Days::new(self.amount as u64),
            WindowUnit::Months => date - Months::new(self.amount),
            WindowUnit::Years => date - Months::new(self.amount * 12),
        }
    }
}

/// Configuration for a walk-forward run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WalkForwardConfig {
    pub frequency: TradingFrequency,
    pub window: FittingWindow,
    pub starting_cash: f64,
}

impl WalkForwardConfig {
    pub fn new(frequency: TradingFrequency, window: FittingWindow) -> Self {
        Self {
            frequency,
            window,
            starting_cash: 10_000.0,
        }
    }
}

// ─── Result types ────────────────────────────────────────────────────

/// One refit-and-hold period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoldingPeriod {
    /// Decision date: fit window ends here, entry prices are taken at the
    /// first row on or after it.
    pub purchase_date: NaiveDate,
    /// Next grid date: exit prices are taken at the last row on or before it.
    pub valuation_date: NaiveDate,
    pub allocation: PortfolioAllocation,
    /// Weighted holding-period return (0.0 for an empty allocation).
    pub period_return: f64,
}

/// Complete walk-forward history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalkForwardReport {
    pub periods: Vec<HoldingPeriod>,
    /// Compounded portfolio value, one point per grid date (the first point
    /// is the starting cash).
    pub values: Vec<ValuePoint>,
    /// One weighted return per holding period.
    pub returns: Vec<f64>,
}

impl WalkForwardReport {
    pub fn final_value(&self) -> f64 {
        self.values.last().map(|p| p.value).unwrap_or(0.0)
    }
}

/// Errors from the walk-forward allocator.
#[derive(Debug, Error)]
pub enum WalkForwardError {
    #[error(
        "price history ends {last} but the fitting window only completes at {window_end}: \
         no rebalance dates fit"
    )]
    InsufficientHistory {
        window_end: NaiveDate,
        last: NaiveDate,
    },
    #[error("no rows in the fitting window ending {date}")]
    EmptyFitWindow { date: NaiveDate },
    #[error(transparent)]
    Strategy(#[from] StrategyError),
    #[error(transparent)]
    Input(#[from] InputError),
}

// ─── Allocator ───────────────────────────────────────────────────────

/// Walk-forward backtest over an allocation-capable strategy.
#[derive(Debug, Clone)]
pub struct WalkForwardBacktest {
    config: WalkForwardConfig,
}

impl WalkForwardBacktest {
    pub fn new(config: WalkForwardConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WalkForwardConfig {
        &self.config
    }

    /// Run the refit-and-hold loop over the full table.
    pub fn run(
        &self,
        table: &PriceTable,
        strategy: &dyn Strategy,
    ) -> Result<WalkForwardReport, WalkForwardError> {
        let first = table.dates()[0];
        let last = *table.dates().last().expect("table is never empty");

        let grid = self.decision_grid(first, last)?;

        let mut periods = Vec::with_capacity(grid.len() - 1);
        let mut values = Vec::with_capacity(grid.len());
        let mut returns = Vec::with_capacity(grid.len() - 1);
        let mut value = self.config.starting_cash;
        values.push(ValuePoint {
            date: grid[0],
            value,
        });

        for pair in grid.windows(2) {
            let (decision_date, next_date) = (pair[0], pair[1]);

            let fit_table = self.fit_window(table, decision_date)?;
            let allocation = strategy.generate_portfolio(&fit_table)?;

            let period_return = if allocation.is_empty() {
                // Nothing selected: the period contributes zero return and
                // the portfolio value carries forward unchanged.
                0.0
            } else {
                holding_return(table, &allocation, decision_date, next_date)?
            };

            value *= 1.0 + period_return;
            values.push(ValuePoint {
                date: next_date,
                value,
            });
            returns.push(period_return);
            periods.push(HoldingPeriod {
                purchase_date: decision_date,
                valuation_date: next_date,
                allocation,
                period_return,
            });
        }

        Ok(WalkForwardReport {
            periods,
            values,
            returns,
        })
    }

    /// Grid of decision dates: `first + window`, stepped by the frequency,
    /// through the last available date. Needs at least two dates (one refit
    /// plus its valuation endpoint).
    fn decision_grid(
        &self,
        first: NaiveDate,
        last: NaiveDate,
    ) -> Result<Vec<NaiveDate>, WalkForwardError> {
        let start = self.config.window.add_to(first);
        let mut grid = Vec::new();
        let mut date = start;
        while date <= last {
            grid.push(date);
            date = self.config.frequency.advance(date);
        }
        if grid.len() < 2 {
            return Err(WalkForwardError::InsufficientHistory {
                window_end: start,
                last,
            });
        }
        Ok(grid)
    }

    /// Rows in `[decision_date - window, decision_date]`.
    fn fit_window(
        &self,
        table: &PriceTable,
        decision_date: NaiveDate,
    ) -> Result<PriceTable, WalkForwardError> {
        let fit_start = self.config.window.subtract_from(decision_date);
        let start_row = table.first_row_at_or_after(fit_start);
        let end_row = table.last_row_at_or_before(decision_date);
        match (start_row, end_row) {
            (Some(start), Some(end)) if start <= end => {
                Ok(table.slice_rows(start, end + 1))
            }
            _ => Err(WalkForwardError::EmptyFitWindow {
                date: decision_date,
            }),
        }
    }
}

/// Weighted sum of each held asset's simple return between the first row at
/// or after `entry` and the last row at or before `exit`.
fn holding_return(
    table: &PriceTable,
    allocation: &PortfolioAllocation,
    entry: NaiveDate,
    exit: NaiveDate,
) -> Result<f64, WalkForwardError> {
    let start_row = table
        .first_row_at_or_after(entry)
        .ok_or(WalkForwardError::EmptyFitWindow { date: entry })?;
    let end_row = table
        .last_row_at_or_before(exit)
        .ok_or(WalkForwardError::EmptyFitWindow { date: exit })?;

    let mut total = 0.0;
    for (symbol, weight) in allocation.iter() {
        let column = table.column(symbol)?;
        let entry_price = column[start_row];
        let exit_price = column[end_row.max(start_row)];
        total += weight * (exit_price - entry_price) / entry_price;
    }
    Ok(total)
}

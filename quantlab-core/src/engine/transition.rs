//! Per-asset position transitions — the signal state machine shared by both
//! simulators.

use crate::domain::Signal;

/// Short borrow cost accrues at `rate / 252` per bar, even for non-daily
/// data. This matches historical results; changing it would reprice every
/// existing backtest.
pub const DAILY_BORROW_PERIODS: f64 = 252.0;

/// Largest whole share count affordable with `budget` after the flat fee.
/// Never negative: a budget that cannot cover the fee and one share buys
/// nothing.
pub(crate) fn max_affordable_shares(budget: f64, fee: f64, price: f64) -> f64 {
    ((budget - fee) / price).floor().max(0.0)
}

/// Apply one bar's signal to one asset, mutating `cash` and `shares`.
///
/// `entry_budget` is consulted only when a new position is about to be
/// opened; it receives the live cash balance and whether an opposite position
/// was closed earlier in this call, and returns the cash figure used to size
/// the entry. The single-asset simulator passes live cash straight through;
/// the basket simulator applies its per-asset weight to a shared snapshot.
///
/// A sized entry of zero shares skips the trade branch entirely, so no fee is
/// charged when nothing trades. Requests matching the current position
/// (`Long` while long, `Short` while short) are no-ops for the same reason.
///
/// After signal handling, a remaining short position accrues borrow cost:
/// `|shares| * price * daily_borrow_rate`.
pub(crate) fn apply_signal<F>(
    cash: &mut f64,
    shares: &mut f64,
    signal: Signal,
    price: f64,
    fee: f64,
    daily_borrow_rate: f64,
    entry_budget: F,
) where
    F: FnOnce(f64, bool) -> f64,
{
    match signal {
        Signal::Long => {
            let mut closed = false;
            if *shares < 0.0 {
                // Buy to cover the entire short position.
                *cash -= shares.abs() * price + fee;
                *shares = 0.0;
                closed = true;
            }
            if *shares == 0.0 {
                let budget = entry_budget(*cash, closed);
                let quantity = max_affordable_shares(budget, fee, price);
                if quantity > 0.0 {
                    *cash -= quantity * price + fee;
                    *shares = quantity;
                }
            }
        }
        Signal::Short => {
            let mut closed = false;
            if *shares > 0.0 {
                // Sell the entire long position.
                *cash += *shares * price - fee;
                *shares = 0.0;
                closed = true;
            }
            if *shares == 0.0 {
                let budget = entry_budget(*cash, closed);
                let quantity = max_affordable_shares(budget, fee, price);
                if quantity > 0.0 {
                    *cash += quantity * price - fee;
                    *shares = -quantity;
                }
            }
        }
        Signal::Exit => {
            if *shares != 0.0 {
                *cash += *shares * price - fee;
                *shares = 0.0;
            }
        }
        Signal::Hold => {}
    }

    if *shares < 0.0 {
        *cash -= shares.abs() * price * daily_borrow_rate;
    }
}

//! Equal-weight allocation strategy — `1/n` to every symbol in the window.

use crate::domain::{PortfolioAllocation, PriceTable};

use super::{Capabilities, Strategy, StrategyError};

/// Allocates capital equally across every symbol in the fitting window.
///
/// The simplest allocation-capable strategy; also the baseline other
/// allocators are compared against.
#[derive(Debug, Clone, Default)]
pub struct EqualWeight;

impl Strategy for EqualWeight {
    fn name(&self) -> &str {
        "equal_weight"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::ALLOCATION_ONLY
    }

    fn generate_portfolio(
        &self,
        window: &PriceTable,
    ) -> Result<PortfolioAllocation, StrategyError> {
        let n = window.symbols().len() as f64;
        Ok(PortfolioAllocation::from_weights(
            window.symbols().iter().map(|s| (s.clone(), 1.0 / n)),
        ))
    }
}

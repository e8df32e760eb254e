//! Scripted signal playback — replays a fixed signal sequence.

use crate::domain::{PriceSeries, Signal};

use super::{Capabilities, Strategy, StrategyError};

/// Replays a predetermined signal sequence, one signal per bar.
///
/// Useful for exercising the simulators with known trade sequences; the
/// sequence must match the length of the series it is run against (the
/// simulator enforces alignment).
#[derive(Debug, Clone)]
pub struct ScriptedSignals {
    signals: Vec<Signal>,
}

impl ScriptedSignals {
    pub fn new(signals: Vec<Signal>) -> Self {
        Self { signals }
    }

    /// A script that holds for `n` bars — the do-nothing strategy.
    pub fn all_hold(n: usize) -> Self {
        Self::new(vec![Signal::Hold; n])
    }
}

impl Strategy for ScriptedSignals {
    fn name(&self) -> &str {
        "scripted"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::SIGNALS_ONLY
    }

    fn generate_signals(&self, _series: &PriceSeries) -> Result<Vec<Signal>, StrategyError> {
        Ok(self.signals.clone())
    }
}

// 10.0: the serializable cross-tick memory. owned by the caller as an opaque
// blob between ticks: decoded, mutated, and re-encoded every run. bounded by
// the configured window capacities, so the blob never grows without limit.
// a fresh run starts from EngineState::new(); a corrupt blob is surfaced as an
// error, never silently replaced, since that would erase accumulated statistics.

use crate::config::ProductConfig;
use crate::fair_value::Ema;
use crate::types::ProductId;
use crate::window::RollingWindow;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// 10.1: state for the quoting path of one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteState {
    pub fair_value: Ema,
    pub mids: RollingWindow,
}

// 10.2: all cross-tick state for one product. fields mirror the configured
// strategy paths; a pure synthetic leg or voucher strike carries no state at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductState {
    pub quote: Option<QuoteState>,
    pub reversion: Option<RollingWindow>,
    pub momentum: Option<RollingWindow>,
}

impl ProductState {
    pub fn for_config(config: &ProductConfig) -> Self {
        Self {
            quote: config.quote.as_ref().map(|q| QuoteState {
                fair_value: Ema::new(q.alpha),
                mids: RollingWindow::new(q.vol_window),
            }),
            reversion: config
                .reversion
                .as_ref()
                .map(|r| RollingWindow::new(r.window)),
            momentum: config
                .momentum
                .as_ref()
                .map(|m| RollingWindow::new(m.window)),
        }
    }
}

// 10.3: the whole memory blob. diff histories are keyed by synthetic group
// name, underlying mid histories by voucher group name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineState {
    pub products: BTreeMap<ProductId, ProductState>,
    pub diffs: BTreeMap<String, RollingWindow>,
    pub underlying_mids: BTreeMap<String, RollingWindow>,
}

impl EngineState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn encode(&self) -> Result<String, StateError> {
        serde_json::to_string(self).map_err(StateError::Encode)
    }

    pub fn decode(blob: &str) -> Result<Self, StateError> {
        serde_json::from_str(blob).map_err(StateError::Decode)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("failed to decode engine state: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("failed to encode engine state: {0}")]
    Encode(#[source] serde_json::Error),
}

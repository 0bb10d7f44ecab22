// 12.2: result types and errors for engine ticks.

use crate::state::StateError;
use crate::types::{OrderIntent, ProductId};
use std::collections::BTreeMap;

// Everything one tick produces: desired orders per product, and the re-encoded
// state blob the caller hands back on the next tick.
#[derive(Debug, Clone)]
pub struct TickResult {
    pub intents: BTreeMap<ProductId, Vec<OrderIntent>>,
    pub state: String,
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    // a corrupt or incompatible blob is the caller's decision to handle; the
    // engine never quietly restarts from empty state.
    #[error("state error: {0}")]
    State(#[from] StateError),
}

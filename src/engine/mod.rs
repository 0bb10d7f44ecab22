// 12.0: the per-tick coordinator. decodes prior state, updates rolling
// statistics and fair values, generates order intents, re-encodes state.
// deterministic and synchronous with no external I/O: one tick runs to
// completion before the next begins.

mod core;
mod results;

pub use core::Engine;
pub use results::{EngineError, TickResult};

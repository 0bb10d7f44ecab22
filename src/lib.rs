// maker-core: per-tick quoting and synthetic arbitrage decision engine.
// consumes an order-book snapshot and current positions once per discrete time
// step and emits a bounded set of buy/sell intents per product. all computation
// is deterministic with no external I/O; the only cross-tick memory is an
// explicit serializable state blob owned by the caller.
//
// file map (search X.0 for structs, X.1+ for logic):
//   1.x  types.rs: primitives: ProductId, Side, TickPrice, OrderIntent
//   2.x  book.rs: order-book snapshot, best bid/ask, mid-price, positions
//   3.x  window.rs: fixed-capacity rolling window, the warm-up gate
//   4.x  stats.rs: mean and population standard deviation
//   5.x  fair_value.rs: EMA fair-value estimator, seeded on first observation
//   6.x  risk.rs: per-tick exposure tracking against position limits
//   7.x  quoting.rs: inventory-skewed quotes, spread-crossing, passive posts
//   8.x  reversion.rs: rolling-mean reversion taker
//   8b.x momentum.rs: range-breakout momentum taker
//   9.x  synthetic.rs: basket-vs-components arbitrage, dynamic thresholds
//   9b.x voucher.rs: strike-ladder mispricing taker over a shared underlying
//   10.x state.rs: serializable cross-tick engine state
//   11.x config.rs: strategy parameters, validation, presets
//   12.x engine/: the tick coordinator

// core decision modules
pub mod book;
pub mod config;
pub mod engine;
pub mod fair_value;
pub mod momentum;
pub mod quoting;
pub mod reversion;
pub mod risk;
pub mod state;
pub mod stats;
pub mod synthetic;
pub mod types;
pub mod voucher;
pub mod window;

// re exports for convenience
pub use book::*;
pub use config::*;
pub use engine::*;
pub use fair_value::*;
pub use risk::*;
pub use state::*;
pub use types::*;
pub use window::*;
pub use quoting::{quote_targets, to_tick, QuoteTargets};

// 12.1 engine/core.rs: the engine itself. a pure function of
// (config, prior state, market input) -> (intents, new state). construction
// validates the config; two instances never observe each other's state, so an
// external sweep harness can run many engines in parallel safely.

use super::results::{EngineError, TickResult};
use crate::book::{MarketSnapshot, Positions};
use crate::config::{ConfigError, EngineConfig};
use crate::risk::ExposureTracker;
use crate::state::{EngineState, ProductState};
use crate::types::{OrderIntent, ProductId};
use crate::window::RollingWindow;
use crate::{momentum, quoting, reversion, synthetic, voucher};
use std::collections::BTreeMap;
use tracing::trace;

#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// One tick against an opaque state blob. An absent or empty blob starts a
    /// fresh run; a present but undecodable blob is an error.
    pub fn run(
        &self,
        snapshot: &MarketSnapshot,
        positions: &Positions,
        prior_state: Option<&str>,
    ) -> Result<TickResult, EngineError> {
        let mut state = match prior_state {
            Some(blob) if !blob.is_empty() => EngineState::decode(blob)?,
            _ => EngineState::new(),
        };
        let intents = self.run_with_state(snapshot, positions, &mut state);
        Ok(TickResult {
            intents,
            state: state.encode()?,
        })
    }

    /// One tick against decoded state, for embedding and tests. Intent order is
    /// deterministic: per product in product order (cross before passive before
    /// reversion before momentum), then synthetic groups, then voucher groups,
    /// each in configuration order.
    pub fn run_with_state(
        &self,
        snapshot: &MarketSnapshot,
        positions: &Positions,
        state: &mut EngineState,
    ) -> BTreeMap<ProductId, Vec<OrderIntent>> {
        let mut tracker = ExposureTracker::new();
        for (product, config) in &self.config.products {
            tracker.track(product.clone(), positions.get(product), config.limit);
        }

        let mut intents: BTreeMap<ProductId, Vec<OrderIntent>> = BTreeMap::new();

        for (product, config) in &self.config.products {
            if config.quote.is_none() && config.reversion.is_none() && config.momentum.is_none() {
                continue;
            }
            let Some(book) = snapshot.get(product) else {
                continue;
            };
            // either side empty: skip the product entirely, statistics included
            let Some(mid) = book.mid() else {
                trace!(product = %product, "book side empty, skipping product");
                continue;
            };

            let position = positions.get(product);
            let product_state = state
                .products
                .entry(product.clone())
                .or_insert_with(|| ProductState::for_config(config));

            let mut product_intents = Vec::new();

            if let (Some(params), Some(quote_state)) =
                (config.quote.as_ref(), product_state.quote.as_mut())
            {
                quote_state.mids.push(mid);
                let fair_value = quote_state.fair_value.update(mid);
                let sigma = quoting::volatility(params, &quote_state.mids);
                product_intents.extend(quoting::generate(
                    product,
                    params,
                    book,
                    fair_value,
                    sigma,
                    position,
                    config.limit,
                    &mut tracker,
                ));
            }

            if let (Some(params), Some(window)) =
                (config.reversion.as_ref(), product_state.reversion.as_mut())
            {
                window.push(mid);
                product_intents.extend(reversion::generate(
                    product,
                    params,
                    book,
                    window,
                    mid,
                    &mut tracker,
                ));
            }

            if let (Some(params), Some(window)) =
                (config.momentum.as_ref(), product_state.momentum.as_mut())
            {
                // breakout is judged against prior mids; push after
                product_intents.extend(momentum::generate(
                    product,
                    params,
                    book,
                    window,
                    mid,
                    &mut tracker,
                ));
                window.push(mid);
            }

            if !product_intents.is_empty() {
                intents.insert(product.clone(), product_intents);
            }
        }

        for group in &self.config.synthetics {
            let window = state
                .diffs
                .entry(group.name.clone())
                .or_insert_with(|| RollingWindow::new(group.window));
            for intent in synthetic::evaluate(group, snapshot, window, &mut tracker) {
                intents.entry(intent.product.clone()).or_default().push(intent);
            }
        }

        for group in &self.config.vouchers {
            let window = state
                .underlying_mids
                .entry(group.name.clone())
                .or_insert_with(|| RollingWindow::new(group.window));
            for intent in voucher::evaluate(group, snapshot, window, &mut tracker) {
                intents.entry(intent.product.clone()).or_default().push(intent);
            }
        }

        intents
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::{BookSide, ProductBook};
    use crate::config::{ProductConfig, QuoteParams};
    use rust_decimal_macros::dec;

    fn quoted_config() -> EngineConfig {
        EngineConfig::new().with_product(
            "ROCK",
            ProductConfig::new(50).with_quote(QuoteParams {
                alpha: dec!(0.2),
                base_edge: dec!(2),
                inv_skew: rust_decimal::Decimal::ZERO,
                passive_size: 3,
                vol_window: 20,
                vol_scale: rust_decimal::Decimal::ZERO,
                vol_floor: rust_decimal::Decimal::ZERO,
                min_vol_obs: 6,
            }),
        )
    }

    fn snapshot(bid: i64, ask: i64) -> MarketSnapshot {
        let mut s = MarketSnapshot::new();
        s.insert(
            ProductId::from("ROCK"),
            ProductBook::new(
                BookSide::from_levels([(bid, 10)]),
                BookSide::from_levels([(ask, 10)]),
            ),
        );
        s
    }

    #[test]
    fn rejects_invalid_config_at_construction() {
        let config = EngineConfig::new().with_product("ROCK", ProductConfig::new(-1));
        assert!(Engine::new(config).is_err());
    }

    #[test]
    fn fresh_run_seeds_fair_value_with_first_mid() {
        let engine = Engine::new(quoted_config()).unwrap();
        let mut state = EngineState::new();

        engine.run_with_state(&snapshot(99, 101), &Positions::new(), &mut state);

        let rock_state = &state.products[&ProductId::from("ROCK")];
        let quote_state = rock_state.quote.as_ref().unwrap();
        assert_eq!(quote_state.fair_value.value(), Some(dec!(100)));
        assert_eq!(quote_state.mids.len(), 1);
    }

    #[test]
    fn empty_side_leaves_state_untouched() {
        let engine = Engine::new(quoted_config()).unwrap();
        let mut state = EngineState::new();
        engine.run_with_state(&snapshot(99, 101), &Positions::new(), &mut state);
        let before = state.clone();

        let mut one_sided = MarketSnapshot::new();
        one_sided.insert(
            ProductId::from("ROCK"),
            ProductBook::new(BookSide::from_levels([(99, 10)]), BookSide::new()),
        );
        let intents = engine.run_with_state(&one_sided, &Positions::new(), &mut state);

        assert!(intents.is_empty());
        assert_eq!(state, before);
    }

    #[test]
    fn blob_threading_matches_in_memory_state() {
        let engine = Engine::new(quoted_config()).unwrap();
        let positions = Positions::new();

        // in-memory run
        let mut state = EngineState::new();
        engine.run_with_state(&snapshot(99, 101), &positions, &mut state);
        let expected = engine.run_with_state(&snapshot(100, 102), &positions, &mut state);

        // blob-threaded run
        let first = engine.run(&snapshot(99, 101), &positions, None).unwrap();
        let second = engine
            .run(&snapshot(100, 102), &positions, Some(&first.state))
            .unwrap();

        assert_eq!(second.intents, expected);
    }

    #[test]
    fn corrupt_blob_is_an_error_not_a_cold_start() {
        let engine = Engine::new(quoted_config()).unwrap();
        let result = engine.run(&snapshot(99, 101), &Positions::new(), Some("{corrupt"));
        assert!(matches!(result, Err(EngineError::State(_))));
    }

    #[test]
    fn instances_share_nothing() {
        let a = Engine::new(quoted_config()).unwrap();
        let b = Engine::new(quoted_config()).unwrap();

        let mut state_a = EngineState::new();
        engine_warmup(&a, &mut state_a);

        // a fresh engine with fresh state behaves exactly like the first did
        let mut state_b = EngineState::new();
        let intents_b = b.run_with_state(&snapshot(99, 101), &Positions::new(), &mut state_b);
        let quote_state = state_b.products[&ProductId::from("ROCK")].quote.as_ref().unwrap();
        assert_eq!(quote_state.fair_value.value(), Some(dec!(100)));
        assert!(!intents_b.is_empty());
    }

    fn engine_warmup(engine: &Engine, state: &mut EngineState) {
        for i in 0..10 {
            engine.run_with_state(&snapshot(99 + i, 101 + i), &Positions::new(), state);
        }
    }
}

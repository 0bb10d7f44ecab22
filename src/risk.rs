//! Per-tick exposure tracking against position limits.
//!
//! Every intent-emitting path (quoting, reversion, synthetic legs) draws
//! headroom from one tracker, so the union of intents emitted in a tick can
//! never push a position past its limit. Buys and sells are tracked one-sided
//! rather than netted: either subset alone may fill, so a buy does not free up
//! room to sell.

use crate::types::{OrderIntent, ProductId, Side};
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
struct Exposure {
    position: i64,
    limit: i64,
    pending_buy: i64,
    pending_sell: i64,
}

#[derive(Debug, Clone, Default)]
pub struct ExposureTracker {
    products: BTreeMap<ProductId, Exposure>,
}

impl ExposureTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a product for this tick. Untracked products report zero headroom.
    pub fn track(&mut self, product: ProductId, position: i64, limit: i64) {
        self.products.insert(
            product,
            Exposure {
                position,
                limit,
                pending_buy: 0,
                pending_sell: 0,
            },
        );
    }

    /// Remaining quantity that may still be bought this tick.
    pub fn buy_headroom(&self, product: &ProductId) -> i64 {
        self.products
            .get(product)
            .map(|e| (e.limit - e.position - e.pending_buy).max(0))
            .unwrap_or(0)
    }

    /// Remaining quantity that may still be sold this tick.
    pub fn sell_headroom(&self, product: &ProductId) -> i64 {
        self.products
            .get(product)
            .map(|e| (e.limit + e.position - e.pending_sell).max(0))
            .unwrap_or(0)
    }

    pub fn headroom(&self, product: &ProductId, side: Side) -> i64 {
        match side {
            Side::Buy => self.buy_headroom(product),
            Side::Sell => self.sell_headroom(product),
        }
    }

    /// Account for an emitted intent. Callers clamp to headroom before emitting;
    /// commit only records what was emitted.
    pub fn commit(&mut self, intent: &OrderIntent) {
        if let Some(exposure) = self.products.get_mut(&intent.product) {
            match intent.side() {
                Side::Buy => exposure.pending_buy += intent.size(),
                Side::Sell => exposure.pending_sell += intent.size(),
            }
        } else {
            debug_assert!(false, "commit for untracked product {}", intent.product);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TickPrice;

    fn rock() -> ProductId {
        ProductId::from("ROCK")
    }

    #[test]
    fn headroom_from_position_and_limit() {
        let mut tracker = ExposureTracker::new();
        tracker.track(rock(), 10, 50);
        assert_eq!(tracker.buy_headroom(&rock()), 40);
        assert_eq!(tracker.sell_headroom(&rock()), 60);
    }

    #[test]
    fn short_position_frees_buy_headroom() {
        let mut tracker = ExposureTracker::new();
        tracker.track(rock(), -50, 50);
        assert_eq!(tracker.buy_headroom(&rock()), 100);
        assert_eq!(tracker.sell_headroom(&rock()), 0);
    }

    #[test]
    fn commits_consume_headroom_one_sided() {
        let mut tracker = ExposureTracker::new();
        tracker.track(rock(), 0, 50);

        tracker.commit(&OrderIntent::buy(rock(), TickPrice(100), 30));
        assert_eq!(tracker.buy_headroom(&rock()), 20);
        // selling headroom is untouched: the buy may never fill
        assert_eq!(tracker.sell_headroom(&rock()), 50);

        tracker.commit(&OrderIntent::sell(rock(), TickPrice(102), 50));
        assert_eq!(tracker.sell_headroom(&rock()), 0);
        assert_eq!(tracker.buy_headroom(&rock()), 20);
    }

    #[test]
    fn untracked_product_has_no_headroom() {
        let tracker = ExposureTracker::new();
        assert_eq!(tracker.buy_headroom(&rock()), 0);
        assert_eq!(tracker.sell_headroom(&rock()), 0);
    }

    #[test]
    fn headroom_never_goes_negative() {
        let mut tracker = ExposureTracker::new();
        tracker.track(rock(), 60, 50); // over limit already (e.g. limit lowered)
        assert_eq!(tracker.buy_headroom(&rock()), 0);
        assert_eq!(tracker.sell_headroom(&rock()), 110);
    }
}

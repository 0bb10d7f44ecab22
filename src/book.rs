// 2.0: the market input for one tick. per product, two ordered price -> resting
// volume maps. volumes are positive on both sides; best bid is the highest bid
// price, best ask the lowest ask price. either side may be empty.

use crate::types::{ProductId, TickPrice};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookSide(BTreeMap<TickPrice, i64>);

impl BookSide {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_levels(levels: impl IntoIterator<Item = (i64, i64)>) -> Self {
        Self(
            levels
                .into_iter()
                .map(|(price, volume)| (TickPrice(price), volume))
                .collect(),
        )
    }

    pub fn insert(&mut self, price: TickPrice, volume: i64) {
        self.0.insert(price, volume);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn highest(&self) -> Option<(TickPrice, i64)> {
        self.0.iter().next_back().map(|(p, v)| (*p, *v))
    }

    pub fn lowest(&self) -> Option<(TickPrice, i64)> {
        self.0.iter().next().map(|(p, v)| (*p, *v))
    }
}

// 2.1: one product's visible book.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductBook {
    pub bids: BookSide,
    pub asks: BookSide,
}

impl ProductBook {
    pub fn new(bids: BookSide, asks: BookSide) -> Self {
        Self { bids, asks }
    }

    pub fn best_bid(&self) -> Option<(TickPrice, i64)> {
        self.bids.highest()
    }

    pub fn best_ask(&self) -> Option<(TickPrice, i64)> {
        self.asks.lowest()
    }

    // mid-price: average of best bid and best ask. None unless both sides exist.
    pub fn mid(&self) -> Option<Decimal> {
        let (bid, _) = self.best_bid()?;
        let (ask, _) = self.best_ask()?;
        Some((bid.as_decimal() + ask.as_decimal()) / dec!(2))
    }
}

// 2.2: snapshot across all products for one tick.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    books: BTreeMap<ProductId, ProductBook>,
}

impl MarketSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, product: ProductId, book: ProductBook) {
        self.books.insert(product, book);
    }

    pub fn get(&self, product: &ProductId) -> Option<&ProductBook> {
        self.books.get(product)
    }

    pub fn products(&self) -> impl Iterator<Item = &ProductId> {
        self.books.keys()
    }
}

// 2.3: net signed quantity held per product. absent entries are zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Positions(BTreeMap<ProductId, i64>);

impl Positions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, product: ProductId, quantity: i64) {
        self.0.insert(product, quantity);
    }

    pub fn get(&self, product: &ProductId) -> i64 {
        self.0.get(product).copied().unwrap_or(0)
    }

    pub fn apply(&mut self, product: &ProductId, delta: i64) {
        *self.0.entry(product.clone()).or_insert(0) += delta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(bids: &[(i64, i64)], asks: &[(i64, i64)]) -> ProductBook {
        ProductBook::new(
            BookSide::from_levels(bids.iter().copied()),
            BookSide::from_levels(asks.iter().copied()),
        )
    }

    #[test]
    fn best_bid_is_highest_best_ask_is_lowest() {
        let b = book(&[(98, 10), (99, 5), (97, 20)], &[(101, 7), (103, 4), (102, 9)]);
        assert_eq!(b.best_bid(), Some((TickPrice(99), 5)));
        assert_eq!(b.best_ask(), Some((TickPrice(101), 7)));
    }

    #[test]
    fn mid_requires_both_sides() {
        let full = book(&[(99, 5)], &[(101, 7)]);
        assert_eq!(full.mid(), Some(dec!(100)));

        let no_asks = book(&[(99, 5)], &[]);
        assert_eq!(no_asks.mid(), None);

        let no_bids = book(&[], &[(101, 7)]);
        assert_eq!(no_bids.mid(), None);
    }

    #[test]
    fn mid_can_sit_between_ticks() {
        let b = book(&[(99, 5)], &[(102, 7)]);
        assert_eq!(b.mid(), Some(dec!(100.5)));
    }

    #[test]
    fn absent_position_is_zero() {
        let mut positions = Positions::new();
        let rock = ProductId::from("ROCK");
        assert_eq!(positions.get(&rock), 0);

        positions.set(rock.clone(), -12);
        assert_eq!(positions.get(&rock), -12);

        positions.apply(&rock, 5);
        assert_eq!(positions.get(&rock), -7);
    }
}

// 1.0: all the primitives live here. nothing in the engine works without these types.
// product ids, sides, tick prices, order intents. each is a newtype so the compiler
// catches type mixups.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProductId(String);

impl ProductId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ProductId {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Buy = positive emitted quantity, Sell = negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn sign(&self) -> i64 {
        match self {
            Side::Buy => 1,
            Side::Sell => -1,
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

// 1.1: price on the integer tick grid. every emitted intent is priced in ticks;
// only intermediate statistics live off-grid as decimals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TickPrice(pub i64);

impl TickPrice {
    pub fn as_decimal(&self) -> Decimal {
        Decimal::from(self.0)
    }
}

impl fmt::Display for TickPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// 1.2: one desired order. quantity sign encodes side (positive = buy, negative = sell)
// and its magnitude never exceeds the remaining headroom to the position limit at the
// moment it was emitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderIntent {
    pub product: ProductId,
    pub price: TickPrice,
    pub quantity: i64,
}

impl OrderIntent {
    pub fn buy(product: ProductId, price: TickPrice, quantity: i64) -> Self {
        debug_assert!(quantity > 0);
        Self { product, price, quantity }
    }

    pub fn sell(product: ProductId, price: TickPrice, quantity: i64) -> Self {
        debug_assert!(quantity > 0);
        Self { product, price, quantity: -quantity }
    }

    pub fn side(&self) -> Side {
        if self.quantity >= 0 {
            Side::Buy
        } else {
            Side::Sell
        }
    }

    pub fn size(&self) -> i64 {
        self.quantity.abs()
    }
}

// 3.0: fixed-capacity rolling window. the substrate for every statistic in the
// engine and the single warm-up gate: nothing trusts a windowed statistic until
// is_full() says so.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollingWindow {
    capacity: usize,
    values: VecDeque<Decimal>,
}

impl RollingWindow {
    // capacity zero clamps to one: push always needs a slot to land in.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            values: VecDeque::with_capacity(capacity),
        }
    }

    // oldest-first eviction once capacity is exceeded.
    pub fn push(&mut self, value: Decimal) {
        while self.values.len() >= self.capacity {
            self.values.pop_front();
        }
        self.values.push_back(value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.values.len() >= self.capacity
    }

    // insertion order, oldest first.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = Decimal> + Clone + '_ {
        self.values.iter().copied()
    }

    pub fn last(&self) -> Option<Decimal> {
        self.values.back().copied()
    }
}

// 5.0: EMA fair value. per product, v <- alpha*obs + (1-alpha)*v, seeded by the
// first observation so tick one carries no smoothing artifact. alpha is
// validated into (0, 1] at configuration time, not here.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ema {
    alpha: Decimal,
    value: Option<Decimal>,
}

impl Ema {
    pub fn new(alpha: Decimal) -> Self {
        Self { alpha, value: None }
    }

    // returns the updated value.
    pub fn update(&mut self, observation: Decimal) -> Decimal {
        let next = match self.value {
            None => observation,
            Some(prev) => self.alpha * observation + (Decimal::ONE - self.alpha) * prev,
        };
        self.value = Some(next);
        next
    }

    // None until the first observation has been seen.
    pub fn value(&self) -> Option<Decimal> {
        self.value
    }

    pub fn alpha(&self) -> Decimal {
        self.alpha
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn undefined_until_first_observation() {
        let ema = Ema::new(dec!(0.2));
        assert_eq!(ema.value(), None);
    }

    #[test]
    fn first_observation_seeds_exactly() {
        let mut ema = Ema::new(dec!(0.2));
        assert_eq!(ema.update(dec!(100)), dec!(100));
        assert_eq!(ema.value(), Some(dec!(100)));
    }

    #[test]
    fn recurrence_after_seed() {
        let mut ema = Ema::new(dec!(0.2));
        ema.update(dec!(100));
        // 0.2 * 110 + 0.8 * 100 = 102
        assert_eq!(ema.update(dec!(110)), dec!(102));
        // 0.2 * 90 + 0.8 * 102 = 99.6
        assert_eq!(ema.update(dec!(90)), dec!(99.6));
    }

    #[test]
    fn alpha_one_tracks_observations() {
        let mut ema = Ema::new(dec!(1));
        ema.update(dec!(100));
        assert_eq!(ema.update(dec!(57)), dec!(57));
    }
}

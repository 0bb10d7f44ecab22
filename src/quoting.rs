// 7.0: inventory-skewed quote generation. fair value +/- edge, with both
// targets shifted against the current position so quotes work the inventory
// back toward flat. resting liquidity priced through our targets is taken
// first; passive quotes are always attempted on both sides afterwards.

use crate::book::ProductBook;
use crate::config::QuoteParams;
use crate::risk::ExposureTracker;
use crate::stats;
use crate::types::{OrderIntent, ProductId, TickPrice};
use crate::window::RollingWindow;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use tracing::trace;

// 7.1: tick rounding policy: nearest integer tick, ties toward zero. prices
// are positive on the tick grid, so toward-zero means a tied value rounds
// down: 98.5 -> 98 and 101.5 -> 101, and a tied bid never crosses the
// computed value. documented and tested because truncation changes
// realized edge.
pub fn to_tick(value: Decimal) -> Option<TickPrice> {
    value
        .round_dp_with_strategy(0, RoundingStrategy::MidpointTowardZero)
        .to_i64()
        .map(TickPrice)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuoteTargets {
    pub bid: TickPrice,
    pub ask: TickPrice,
}

// 7.2: target construction.
//   edge = base_edge + vol_scale * sigma
//   skew = inv_skew * (pos / lim) * edge * 2
//   bid  = tick(fv - edge - skew), ask = tick(fv + edge - skew)
// a long position pushes both targets down, encouraging sells and discouraging
// further buys; a short position pushes both up.
pub fn quote_targets(
    params: &QuoteParams,
    fair_value: Decimal,
    sigma: Decimal,
    position: i64,
    limit: i64,
) -> Option<QuoteTargets> {
    let edge = params.base_edge + params.vol_scale * sigma;
    let inventory = Decimal::from(position) / Decimal::from(limit);
    let skew = params.inv_skew * inventory * edge * dec!(2);
    Some(QuoteTargets {
        bid: to_tick(fair_value - edge - skew)?,
        ask: to_tick(fair_value + edge - skew)?,
    })
}

// volatility estimate: population stdev of the mid window once it holds enough
// observations, the configured floor before that.
pub fn volatility(params: &QuoteParams, mids: &RollingWindow) -> Decimal {
    if mids.len() >= params.min_vol_obs {
        stats::pstdev(mids.iter())
    } else {
        params.vol_floor
    }
}

// 7.3: the per-product decision sequence, cross first, then passive.
// the caller guarantees both book sides exist and has already updated the
// fair value and mid window for this tick. all sizing draws from the shared
// exposure tracker.
#[allow(clippy::too_many_arguments)]
pub fn generate(
    product: &ProductId,
    params: &QuoteParams,
    book: &ProductBook,
    fair_value: Decimal,
    sigma: Decimal,
    position: i64,
    limit: i64,
    tracker: &mut ExposureTracker,
) -> Vec<OrderIntent> {
    let mut intents = Vec::new();

    let (Some((best_bid, bid_volume)), Some((best_ask, ask_volume))) =
        (book.best_bid(), book.best_ask())
    else {
        return intents;
    };
    let Some(targets) = quote_targets(params, fair_value, sigma, position, limit) else {
        return intents;
    };

    trace!(
        product = %product,
        %fair_value,
        %sigma,
        bid_target = %targets.bid,
        ask_target = %targets.ask,
        "quote targets"
    );

    // 1. cross mispriced resting liquidity
    if best_ask < targets.bid {
        let quantity = ask_volume.min(tracker.buy_headroom(product));
        if quantity > 0 {
            let intent = OrderIntent::buy(product.clone(), best_ask, quantity);
            tracker.commit(&intent);
            intents.push(intent);
        }
    }
    if best_bid > targets.ask {
        let quantity = bid_volume.min(tracker.sell_headroom(product));
        if quantity > 0 {
            let intent = OrderIntent::sell(product.clone(), best_bid, quantity);
            tracker.commit(&intent);
            intents.push(intent);
        }
    }

    // 2. always attempt to rest on both sides while headroom permits
    let bid_size = params.passive_size.min(tracker.buy_headroom(product));
    if bid_size > 0 {
        let intent = OrderIntent::buy(product.clone(), targets.bid, bid_size);
        tracker.commit(&intent);
        intents.push(intent);
    }
    let ask_size = params.passive_size.min(tracker.sell_headroom(product));
    if ask_size > 0 {
        let intent = OrderIntent::sell(product.clone(), targets.ask, ask_size);
        tracker.commit(&intent);
        intents.push(intent);
    }

    intents
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::BookSide;
    use rust_decimal_macros::dec;

    fn rock() -> ProductId {
        ProductId::from("ROCK")
    }

    fn flat_params() -> QuoteParams {
        QuoteParams {
            alpha: dec!(0.2),
            base_edge: dec!(2),
            inv_skew: Decimal::ZERO,
            passive_size: 3,
            vol_window: 20,
            vol_scale: Decimal::ZERO,
            vol_floor: Decimal::ZERO,
            min_vol_obs: 6,
        }
    }

    fn book(bids: &[(i64, i64)], asks: &[(i64, i64)]) -> ProductBook {
        ProductBook::new(
            BookSide::from_levels(bids.iter().copied()),
            BookSide::from_levels(asks.iter().copied()),
        )
    }

    fn tracker(position: i64, limit: i64) -> ExposureTracker {
        let mut t = ExposureTracker::new();
        t.track(rock(), position, limit);
        t
    }

    #[test]
    fn ties_round_toward_zero() {
        assert_eq!(to_tick(dec!(98.5)), Some(TickPrice(98)));
        assert_eq!(to_tick(dec!(101.5)), Some(TickPrice(101)));
        assert_eq!(to_tick(dec!(98.6)), Some(TickPrice(99)));
        assert_eq!(to_tick(dec!(98.4)), Some(TickPrice(98)));
        assert_eq!(to_tick(dec!(-2.5)), Some(TickPrice(-2)));
    }

    #[test]
    fn flat_position_targets_are_symmetric() {
        let targets = quote_targets(&flat_params(), dec!(100), Decimal::ZERO, 0, 50).unwrap();
        assert_eq!(targets.bid, TickPrice(98));
        assert_eq!(targets.ask, TickPrice(102));
    }

    #[test]
    fn long_position_skews_both_targets_down() {
        let params = QuoteParams {
            inv_skew: dec!(0.5),
            ..flat_params()
        };
        // skew = 0.5 * (25/50) * 2 * 2 = 1
        let targets = quote_targets(&params, dec!(100), Decimal::ZERO, 25, 50).unwrap();
        assert_eq!(targets.bid, TickPrice(97));
        assert_eq!(targets.ask, TickPrice(101));

        // symmetric short pushes both up
        let targets = quote_targets(&params, dec!(100), Decimal::ZERO, -25, 50).unwrap();
        assert_eq!(targets.bid, TickPrice(99));
        assert_eq!(targets.ask, TickPrice(103));
    }

    #[test]
    fn volatility_inflates_edge() {
        let params = QuoteParams {
            vol_scale: dec!(0.5),
            ..flat_params()
        };
        // edge = 2 + 0.5 * 2 = 3
        let targets = quote_targets(&params, dec!(100), dec!(2), 0, 50).unwrap();
        assert_eq!(targets.bid, TickPrice(97));
        assert_eq!(targets.ask, TickPrice(103));
    }

    #[test]
    fn volatility_floor_applies_before_warm_up() {
        let params = QuoteParams {
            vol_floor: dec!(1.5),
            min_vol_obs: 3,
            ..flat_params()
        };
        let mut mids = RollingWindow::new(20);
        mids.push(dec!(100));
        mids.push(dec!(102));
        assert_eq!(volatility(&params, &mids), dec!(1.5));

        mids.push(dec!(104));
        // population is large enough now: pstdev of {100, 102, 104}
        assert_eq!(volatility(&params, &mids), stats::pstdev(mids.iter()));
    }

    #[test]
    fn passive_quotes_posted_when_nothing_crosses() {
        let mut t = tracker(0, 50);
        let intents = generate(
            &rock(),
            &flat_params(),
            &book(&[(99, 10)], &[(101, 10)]),
            dec!(100),
            Decimal::ZERO,
            0,
            50,
            &mut t,
        );
        assert_eq!(
            intents,
            vec![
                OrderIntent::buy(rock(), TickPrice(98), 3),
                OrderIntent::sell(rock(), TickPrice(102), 3),
            ]
        );
    }

    #[test]
    fn crosses_ask_priced_below_bid_target() {
        // ask at 95 sits below the 98 bid target: take it, then still quote
        let mut t = tracker(0, 50);
        let intents = generate(
            &rock(),
            &flat_params(),
            &book(&[(94, 10)], &[(95, 4)]),
            dec!(100),
            Decimal::ZERO,
            0,
            50,
            &mut t,
        );
        assert_eq!(intents[0], OrderIntent::buy(rock(), TickPrice(95), 4));
        assert_eq!(intents[1], OrderIntent::buy(rock(), TickPrice(98), 3));
        assert_eq!(intents[2], OrderIntent::sell(rock(), TickPrice(102), 3));
    }

    #[test]
    fn cross_size_capped_by_headroom() {
        let mut t = tracker(48, 50);
        let intents = generate(
            &rock(),
            &flat_params(),
            &book(&[(94, 10)], &[(95, 40)]),
            dec!(100),
            Decimal::ZERO,
            48,
            50,
            &mut t,
        );
        // headroom 2 consumed entirely by the cross; no passive bid remains
        assert_eq!(intents[0], OrderIntent::buy(rock(), TickPrice(95), 2));
        assert!(intents.iter().skip(1).all(|i| i.quantity < 0));
    }

    #[test]
    fn only_ask_side_quoted_at_long_limit() {
        let mut t = tracker(50, 50);
        let intents = generate(
            &rock(),
            &flat_params(),
            &book(&[(99, 10)], &[(101, 10)]),
            dec!(100),
            Decimal::ZERO,
            50,
            50,
            &mut t,
        );
        assert_eq!(intents.len(), 1);
        assert_eq!(intents[0].side(), crate::types::Side::Sell);
    }
}

// 8b.0: range-breakout momentum taker. keeps a mid-price window per product
// and, once the window is full, takes the touch when the mid clears the
// window's recent range by a configured fraction of that range. the breakout
// is judged against the window BEFORE this tick's mid enters it; a mid
// already inside the window can never exceed its own maximum.

use crate::book::ProductBook;
use crate::config::MomentumParams;
use crate::risk::ExposureTracker;
use crate::types::{OrderIntent, ProductId};
use crate::window::RollingWindow;
use rust_decimal::Decimal;
use tracing::trace;

// the caller pushes this tick's mid AFTER the check, unlike the reversion
// taker. the window holds only prior mids here.
pub fn generate(
    product: &ProductId,
    params: &MomentumParams,
    book: &ProductBook,
    window: &RollingWindow,
    mid: Decimal,
    tracker: &mut ExposureTracker,
) -> Option<OrderIntent> {
    if !window.is_full() {
        return None;
    }

    let high = window.iter().max()?;
    let low = window.iter().min()?;
    let threshold = params.breakout_factor * (high - low);
    trace!(product = %product, %mid, %high, %low, %threshold, "breakout check");

    if mid > high + threshold {
        // upside breakout: join it by lifting the ask
        let (ask, _) = book.best_ask()?;
        let quantity = params.trade_size.min(tracker.buy_headroom(product));
        if quantity > 0 {
            let intent = OrderIntent::buy(product.clone(), ask, quantity);
            tracker.commit(&intent);
            return Some(intent);
        }
    } else if mid < low - threshold {
        // downside breakout: hit the bid
        let (bid, _) = book.best_bid()?;
        let quantity = params.trade_size.min(tracker.sell_headroom(product));
        if quantity > 0 {
            let intent = OrderIntent::sell(product.clone(), bid, quantity);
            tracker.commit(&intent);
            return Some(intent);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::BookSide;
    use crate::types::TickPrice;
    use rust_decimal_macros::dec;

    fn fern() -> ProductId {
        ProductId::from("FERN")
    }

    fn params() -> MomentumParams {
        MomentumParams {
            window: 4,
            breakout_factor: dec!(0.5),
            trade_size: 2,
        }
    }

    fn book(bid: i64, ask: i64) -> ProductBook {
        ProductBook::new(
            BookSide::from_levels([(bid, 10)]),
            BookSide::from_levels([(ask, 10)]),
        )
    }

    fn window_of(values: &[Decimal]) -> RollingWindow {
        let mut w = RollingWindow::new(4);
        for v in values {
            w.push(*v);
        }
        w
    }

    fn tracker(position: i64) -> ExposureTracker {
        let mut t = ExposureTracker::new();
        t.track(fern(), position, 50);
        t
    }

    #[test]
    fn silent_before_warm_up() {
        let w = window_of(&[dec!(100), dec!(100), dec!(100)]);
        let mut t = tracker(0);
        let intent = generate(&fern(), &params(), &book(149, 151), &w, dec!(150), &mut t);
        assert_eq!(intent, None);
    }

    #[test]
    fn buys_an_upside_breakout() {
        // range {100, 104}: threshold 2, breakout above 106
        let w = window_of(&[dec!(100), dec!(102), dec!(104), dec!(101)]);
        let mut t = tracker(0);
        let intent = generate(&fern(), &params(), &book(106, 108), &w, dec!(107), &mut t);
        assert_eq!(intent, Some(OrderIntent::buy(fern(), TickPrice(108), 2)));
    }

    #[test]
    fn sells_a_downside_breakout() {
        let w = window_of(&[dec!(100), dec!(102), dec!(104), dec!(101)]);
        let mut t = tracker(0);
        let intent = generate(&fern(), &params(), &book(96, 98), &w, dec!(97), &mut t);
        assert_eq!(intent, Some(OrderIntent::sell(fern(), TickPrice(96), 2)));
    }

    #[test]
    fn quiet_inside_the_extended_range() {
        // 105.5 sits between the high 104 and the 106 breakout level
        let w = window_of(&[dec!(100), dec!(102), dec!(104), dec!(101)]);
        let mut t = tracker(0);
        let intent = generate(&fern(), &params(), &book(105, 106), &w, dec!(105.5), &mut t);
        assert_eq!(intent, None);
    }

    #[test]
    fn size_clamped_to_headroom() {
        let w = window_of(&[dec!(100), dec!(102), dec!(104), dec!(101)]);
        let mut t = tracker(49);
        let intent = generate(&fern(), &params(), &book(106, 108), &w, dec!(107), &mut t);
        assert_eq!(intent, Some(OrderIntent::buy(fern(), TickPrice(108), 1)));

        let mut t = tracker(50);
        let intent = generate(&fern(), &params(), &book(106, 108), &w, dec!(107), &mut t);
        assert_eq!(intent, None);
    }
}

// 8.0: rolling-mean reversion taker. keeps its own mid-price window per
// product and, once the window is full, fades deviations beyond a fixed
// threshold by taking the touch. no trade before warm-up no matter how far
// the mid has strayed.

use crate::book::ProductBook;
use crate::config::ReversionParams;
use crate::risk::ExposureTracker;
use crate::stats;
use crate::types::{OrderIntent, ProductId};
use crate::window::RollingWindow;
use rust_decimal::Decimal;
use tracing::trace;

// the caller has already pushed this tick's mid into the window.
pub fn generate(
    product: &ProductId,
    params: &ReversionParams,
    book: &ProductBook,
    window: &RollingWindow,
    mid: Decimal,
    tracker: &mut ExposureTracker,
) -> Option<OrderIntent> {
    if !window.is_full() {
        return None;
    }

    let mean = stats::mean(window.iter());
    let deviation = mid - mean;
    trace!(product = %product, %mid, %mean, %deviation, "reversion check");

    if deviation > params.threshold {
        // rich to its rolling mean: sell into the bid
        let (bid, _) = book.best_bid()?;
        let quantity = params.trade_size.min(tracker.sell_headroom(product));
        if quantity > 0 {
            let intent = OrderIntent::sell(product.clone(), bid, quantity);
            tracker.commit(&intent);
            return Some(intent);
        }
    } else if deviation < -params.threshold {
        // cheap: lift the ask
        let (ask, _) = book.best_ask()?;
        let quantity = params.trade_size.min(tracker.buy_headroom(product));
        if quantity > 0 {
            let intent = OrderIntent::buy(product.clone(), ask, quantity);
            tracker.commit(&intent);
            return Some(intent);
        }
    }

    None
}

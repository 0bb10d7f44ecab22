// 9b.0: voucher mispricing taker. a voucher pays out max(0, underlying - strike),
// so its intrinsic fair value is the rolling mean of the underlying mid minus
// the strike, floored at zero. all vouchers in a group share one underlying
// mid history; each is taken independently when its touch strays beyond a
// k * pstdev band around intrinsic value. no warm-up gate: with a short
// history the stdev is small and the band tight, which is the intent.

use crate::book::MarketSnapshot;
use crate::config::VoucherGroup;
use crate::risk::ExposureTracker;
use crate::stats;
use crate::types::{OrderIntent, ProductId};
use crate::window::RollingWindow;
use rust_decimal::Decimal;
use tracing::{debug, trace};

// 9b.1: one group, one tick. the underlying mid window lives in the engine
// state; a missing or one-sided underlying book skips the group without
// touching it.
pub fn evaluate(
    group: &VoucherGroup,
    snapshot: &MarketSnapshot,
    window: &mut RollingWindow,
    tracker: &mut ExposureTracker,
) -> Vec<OrderIntent> {
    let mut intents = Vec::new();

    let Some(mid) = snapshot.get(&group.underlying).and_then(|b| b.mid()) else {
        trace!(group = %group.name, "missing underlying mid, skipping group");
        return intents;
    };
    window.push(mid);

    let mean = stats::mean(window.iter());
    let sigma = stats::pstdev(window.iter());
    let band = group.vol_multiplier * sigma;
    debug!(group = %group.name, %mean, %sigma, %band, "voucher band");

    for voucher in &group.strikes {
        let Some(book) = snapshot.get(&voucher.product) else {
            continue;
        };
        let fair = (mean - voucher.strike).max(Decimal::ZERO);

        // ask below the band under intrinsic value: buy what rests there
        if let Some((ask, ask_volume)) = book.best_ask() {
            if ask.as_decimal() < fair - band {
                let quantity = ask_volume.min(tracker.buy_headroom(&voucher.product));
                if quantity > 0 {
                    let intent = OrderIntent::buy(voucher.product.clone(), ask, quantity);
                    tracker.commit(&intent);
                    intents.push(intent);
                }
            }
        }

        // bid above the band over intrinsic value: sell into it
        if let Some((bid, bid_volume)) = book.best_bid() {
            if bid.as_decimal() > fair + band {
                let quantity = bid_volume.min(tracker.sell_headroom(&voucher.product));
                if quantity > 0 {
                    let intent = OrderIntent::sell(voucher.product.clone(), bid, quantity);
                    tracker.commit(&intent);
                    intents.push(intent);
                }
            }
        }
    }

    intents
}

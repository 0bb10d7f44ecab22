// 9.0: synthetic basket arbitrage. a basket product priced against a fixed-
// weight combination of component mids. the mispricing diff feeds a rolling
// window; once warm, trade whenever the diff clears a dynamic mean + k*sigma
// threshold. every leg is gated independently on liquidity and headroom, and a
// leg that fails its gate is simply omitted: partial execution of the
// structure is expected, not an error.

use crate::book::MarketSnapshot;
use crate::config::{SyntheticGroup, SyntheticLeg};
use crate::risk::ExposureTracker;
use crate::stats;
use crate::types::{OrderIntent, ProductId, Side, TickPrice};
use crate::window::RollingWindow;
use rust_decimal::Decimal;
use tracing::{debug, trace};

// 9.1: weighted synthetic fair value and basket mid. None if any required mid
// is missing, in which case the group is skipped without touching its history.
fn group_mids(group: &SyntheticGroup, snapshot: &MarketSnapshot) -> Option<(Decimal, Decimal)> {
    let basket_mid = snapshot.get(&group.basket)?.mid()?;
    let mut synthetic_fair = Decimal::ZERO;
    for leg in &group.legs {
        synthetic_fair += leg.weight * snapshot.get(&leg.product)?.mid()?;
    }
    Some((synthetic_fair, basket_mid))
}

// a leg fires at its full fixed size or not at all: sizing legs dynamically
// would unbalance the structure against its weights.
fn leg_intent(
    product: &ProductId,
    side: Side,
    size: i64,
    best: Option<(TickPrice, i64)>,
    min_liquidity: i64,
    tracker: &mut ExposureTracker,
) -> Option<OrderIntent> {
    let (price, volume) = best?;
    if volume < min_liquidity {
        trace!(product = %product, volume, min_liquidity, "leg gated on liquidity");
        return None;
    }
    if tracker.headroom(product, side) < size {
        trace!(product = %product, ?side, size, "leg gated on headroom");
        return None;
    }
    let intent = match side {
        Side::Buy => OrderIntent::buy(product.clone(), price, size),
        Side::Sell => OrderIntent::sell(product.clone(), price, size),
    };
    tracker.commit(&intent);
    Some(intent)
}

// 9.2: one group, one tick. the diff window lives in the engine state and is
// passed in mutably; intents draw from the shared exposure tracker.
pub fn evaluate(
    group: &SyntheticGroup,
    snapshot: &MarketSnapshot,
    window: &mut RollingWindow,
    tracker: &mut ExposureTracker,
) -> Vec<OrderIntent> {
    let mut intents = Vec::new();

    let Some((synthetic_fair, basket_mid)) = group_mids(group, snapshot) else {
        trace!(group = %group.name, "missing mids, skipping group");
        return intents;
    };

    let diff = synthetic_fair - basket_mid;
    window.push(diff);

    if !window.is_full() {
        trace!(group = %group.name, observed = window.len(), needed = window.capacity(), "warming up");
        return intents;
    }

    let mean = stats::mean(window.iter());
    let sigma = stats::pstdev(window.iter());
    let threshold = mean + group.sigma_multiplier * sigma;
    debug!(group = %group.name, %diff, %mean, %sigma, %threshold, "synthetic diff");

    // basket side books are fetched lazily; group_mids proved they exist.
    let basket_book = match snapshot.get(&group.basket) {
        Some(book) => book,
        None => return intents,
    };

    if diff > threshold {
        // basket underpriced relative to its components: buy it, sell the legs
        intents.extend(leg_intent(
            &group.basket,
            Side::Buy,
            group.basket_trade_size,
            basket_book.best_ask(),
            group.min_liquidity,
            tracker,
        ));
        for leg in &group.legs {
            intents.extend(sell_leg(leg, snapshot, group.min_liquidity, tracker));
        }
    } else if diff < -threshold {
        // basket overpriced: sell it, buy the legs back
        intents.extend(leg_intent(
            &group.basket,
            Side::Sell,
            group.basket_trade_size,
            basket_book.best_bid(),
            group.min_liquidity,
            tracker,
        ));
        for leg in &group.legs {
            intents.extend(buy_leg(leg, snapshot, group.min_liquidity, tracker));
        }
    }

    intents
}

fn sell_leg(
    leg: &SyntheticLeg,
    snapshot: &MarketSnapshot,
    min_liquidity: i64,
    tracker: &mut ExposureTracker,
) -> Option<OrderIntent> {
    let book = snapshot.get(&leg.product)?;
    leg_intent(
        &leg.product,
        Side::Sell,
        leg.trade_size,
        book.best_bid(),
        min_liquidity,
        tracker,
    )
}

fn buy_leg(
    leg: &SyntheticLeg,
    snapshot: &MarketSnapshot,
    min_liquidity: i64,
    tracker: &mut ExposureTracker,
) -> Option<OrderIntent> {
    let book = snapshot.get(&leg.product)?;
    leg_intent(
        &leg.product,
        Side::Buy,
        leg.trade_size,
        book.best_ask(),
        min_liquidity,
        tracker,
    )
}

//! Quoting engine simulation.
//!
//! Feeds scripted order-book snapshots through the engine tick by tick,
//! threading the opaque state blob exactly the way an execution harness would,
//! and applies naive top-of-book fills so inventory skew and position limits
//! actually bite.

use maker_core::*;
use rust_decimal_macros::dec;
use std::collections::BTreeMap;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    println!("maker-core decision engine simulation");
    println!("quoting, reversion, momentum, basket arbitrage, and voucher taking\n");

    scenario_1_two_sided_quoting();
    scenario_2_mean_reversion();
    scenario_3_basket_arbitrage();
    scenario_4_breakout_momentum();
    scenario_5_voucher_taking();

    println!("\nAll simulations completed.");
}

fn book(bid: i64, bid_vol: i64, ask: i64, ask_vol: i64) -> ProductBook {
    ProductBook::new(
        BookSide::from_levels([(bid, bid_vol)]),
        BookSide::from_levels([(ask, ask_vol)]),
    )
}

fn print_intents(tick: usize, intents: &BTreeMap<ProductId, Vec<OrderIntent>>) {
    for (product, orders) in intents {
        for order in orders {
            let side = if order.quantity > 0 { "BUY " } else { "SELL" };
            println!(
                "  tick {tick:>3}  {side} {:>4} {} @ {}",
                order.size(),
                product,
                order.price
            );
        }
    }
}

/// Naive fills: crossing intents fill against the touch; a passive bid fills
/// when the scripted mid drops through it on the next tick, and symmetrically
/// for asks. Enough to watch inventory build and quotes skew.
fn apply_fills(
    positions: &mut Positions,
    intents: &BTreeMap<ProductId, Vec<OrderIntent>>,
    next_books: &MarketSnapshot,
) {
    for (product, orders) in intents {
        let Some(next) = next_books.get(product) else {
            continue;
        };
        for order in orders {
            let filled = match (order.quantity > 0, next.best_ask(), next.best_bid()) {
                (true, Some((ask, _)), _) => ask <= order.price,
                (false, _, Some((bid, _))) => bid >= order.price,
                _ => false,
            };
            if filled {
                positions.apply(product, order.quantity);
            }
        }
    }
}

/// Two-sided quoting around a drifting fair value.
fn scenario_1_two_sided_quoting() {
    println!("Scenario 1: Inventory-Skewed Quoting\n");

    let config = EngineConfig::new().with_product(
        "ROCK",
        ProductConfig::new(50).with_quote(QuoteParams {
            alpha: dec!(0.1),
            base_edge: dec!(1),
            inv_skew: dec!(0.03),
            passive_size: 12,
            ..QuoteParams::default()
        }),
    );
    let engine = Engine::new(config).expect("valid config");

    // mid grinds up, dips hard, recovers
    let mids: [i64; 12] = [100, 100, 101, 102, 102, 103, 99, 97, 98, 100, 101, 102];

    let mut positions = Positions::new();
    let mut blob: Option<String> = None;

    for (tick, window) in mids.windows(2).enumerate() {
        let (mid, next_mid) = (window[0], window[1]);
        let mut snapshot = MarketSnapshot::new();
        snapshot.insert(ProductId::from("ROCK"), book(mid - 1, 15, mid + 1, 15));

        let result = engine
            .run(&snapshot, &positions, blob.as_deref())
            .expect("tick failed");
        print_intents(tick, &result.intents);

        let mut next_snapshot = MarketSnapshot::new();
        next_snapshot.insert(
            ProductId::from("ROCK"),
            book(next_mid - 1, 15, next_mid + 1, 15),
        );
        apply_fills(&mut positions, &result.intents, &next_snapshot);
        blob = Some(result.state);
    }

    println!(
        "  final ROCK position: {}\n",
        positions.get(&ProductId::from("ROCK"))
    );
}

/// Mean reversion after the window warms up.
fn scenario_2_mean_reversion() {
    println!("Scenario 2: Rolling-Mean Reversion\n");

    let config = EngineConfig::new().with_product(
        "REED",
        ProductConfig::new(50).with_reversion(ReversionParams {
            window: 8,
            threshold: dec!(2.5),
            trade_size: 5,
        }),
    );
    let engine = Engine::new(config).expect("valid config");

    // flat, then a spike the taker fades
    let mids: [i64; 12] = [200, 200, 200, 200, 200, 200, 200, 200, 206, 205, 201, 200];

    let mut blob: Option<String> = None;
    for (tick, mid) in mids.into_iter().enumerate() {
        let mut snapshot = MarketSnapshot::new();
        snapshot.insert(ProductId::from("REED"), book(mid - 1, 20, mid + 1, 20));

        let result = engine
            .run(&snapshot, &Positions::new(), blob.as_deref())
            .expect("tick failed");
        print_intents(tick, &result.intents);
        blob = Some(result.state);
    }
    println!();
}

/// Range breakouts after a quiet stretch.
fn scenario_4_breakout_momentum() {
    println!("Scenario 4: Range-Breakout Momentum\n");

    let config = EngineConfig::new().with_product(
        "FERN",
        ProductConfig::new(50).with_momentum(MomentumParams {
            window: 8,
            breakout_factor: dec!(0.5),
            trade_size: 2,
        }),
    );
    let engine = Engine::new(config).expect("valid config");

    // a tight range, then a break to the upside
    let mids: [i64; 14] = [100, 101, 100, 102, 101, 100, 102, 101, 104, 106, 105, 103, 101, 100];

    let mut blob: Option<String> = None;
    for (tick, mid) in mids.into_iter().enumerate() {
        let mut snapshot = MarketSnapshot::new();
        snapshot.insert(ProductId::from("FERN"), book(mid - 1, 20, mid + 1, 20));

        let result = engine
            .run(&snapshot, &Positions::new(), blob.as_deref())
            .expect("tick failed");
        print_intents(tick, &result.intents);
        blob = Some(result.state);
    }
    println!();
}

/// Vouchers taken when the touch strays from intrinsic value.
fn scenario_5_voucher_taking() {
    println!("Scenario 5: Voucher Mispricing\n");

    let config = EngineConfig::new()
        .with_product("ROCK", ProductConfig::new(400))
        .with_product("ROCK_VOUCHER_950", ProductConfig::new(200))
        .with_product("ROCK_VOUCHER_1050", ProductConfig::new(200))
        .with_voucher(VoucherGroup {
            name: "rock-vouchers".to_string(),
            underlying: ProductId::from("ROCK"),
            strikes: vec![
                VoucherStrike {
                    product: ProductId::from("ROCK_VOUCHER_950"),
                    strike: dec!(950),
                },
                VoucherStrike {
                    product: ProductId::from("ROCK_VOUCHER_1050"),
                    strike: dec!(1050),
                },
            ],
            window: 20,
            vol_multiplier: dec!(1.5),
        });
    let engine = Engine::new(config).expect("valid config");

    let mut blob: Option<String> = None;
    for tick in 0..12 {
        // underlying drifts up; the 950 voucher lags its intrinsic value
        let rock_mid = 1000 + 2 * tick;
        let voucher_mid = 40 + tick;
        let mut snapshot = MarketSnapshot::new();
        snapshot.insert(ProductId::from("ROCK"), book(rock_mid - 1, 30, rock_mid + 1, 30));
        snapshot.insert(
            ProductId::from("ROCK_VOUCHER_950"),
            book(voucher_mid - 2, 15, voucher_mid + 2, 15),
        );
        snapshot.insert(ProductId::from("ROCK_VOUCHER_1050"), book(1, 10, 3, 10));

        let result = engine
            .run(&snapshot, &Positions::new(), blob.as_deref())
            .expect("tick failed");
        print_intents(tick as usize, &result.intents);
        blob = Some(result.state);
    }
    println!();
}

/// Basket arbitrage with a dynamic threshold.
fn scenario_3_basket_arbitrage() {
    println!("Scenario 3: Synthetic Basket Arbitrage\n");

    let engine = Engine::new(EngineConfig::sample()).expect("valid config");

    let mut blob: Option<String> = None;
    for tick in 0..45 {
        // components steady; the basket cheapens sharply on the last few ticks
        let basket_mid = if tick < 42 { 930 } else { 915 };
        let mut snapshot = MarketSnapshot::new();
        snapshot.insert(
            ProductId::from("BUNDLE"),
            book(basket_mid - 2, 25, basket_mid + 2, 25),
        );
        snapshot.insert(ProductId::from("PLANK"), book(119, 40, 121, 40));
        snapshot.insert(ProductId::from("NAIL"), book(69, 40, 71, 40));

        let result = engine
            .run(&snapshot, &Positions::new(), blob.as_deref())
            .expect("tick failed");
        print_intents(tick, &result.intents);
        blob = Some(result.state);
    }
    println!();
}

// 11.0 config.rs: all strategy parameters in one place. supplied at
// construction, never mutated, and fully serializable so an external sweep
// harness can stamp out many independently parameterized engines.
// 11.1 validation is fatal: a bad config refuses to start rather than
// misbehave at runtime.

use crate::types::ProductId;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// 11.2: parameters for the inventory-skewed quoting path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteParams {
    // EMA smoothing factor, in (0, 1].
    pub alpha: Decimal,
    // Half-width of the quoted spread around fair value, in ticks.
    pub base_edge: Decimal,
    // Inventory skew coefficient. Zero disables skewing.
    pub inv_skew: Decimal,
    // Size posted on each passive side.
    pub passive_size: i64,
    // Mid-price window length for the volatility estimate.
    pub vol_window: usize,
    // Edge inflation per unit of volatility. Zero keeps the edge flat.
    pub vol_scale: Decimal,
    // Volatility assumed while the window population is below min_vol_obs.
    pub vol_floor: Decimal,
    // Minimum population before the windowed stdev is trusted.
    pub min_vol_obs: usize,
}

impl Default for QuoteParams {
    fn default() -> Self {
        Self {
            alpha: dec!(0.2),
            base_edge: dec!(2),
            inv_skew: dec!(0.04),
            passive_size: 3,
            vol_window: 20,
            vol_scale: dec!(0.5),
            vol_floor: Decimal::ZERO,
            min_vol_obs: 6,
        }
    }
}

// 11.3: parameters for the rolling-mean reversion taker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReversionParams {
    // Mid-price window length; also the warm-up population.
    pub window: usize,
    // Deviation from the rolling mean required to trade, in ticks.
    pub threshold: Decimal,
    // Maximum quantity taken per tick.
    pub trade_size: i64,
}

impl Default for ReversionParams {
    fn default() -> Self {
        Self {
            window: 100,
            threshold: dec!(2.5),
            trade_size: 5,
        }
    }
}

// 11.3b: parameters for the range-breakout momentum taker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MomentumParams {
    // Mid-price window length; the breakout range is measured over it.
    pub window: usize,
    // Fraction of the window's range the mid must clear beyond it.
    pub breakout_factor: Decimal,
    // Maximum quantity taken per breakout.
    pub trade_size: i64,
}

impl Default for MomentumParams {
    fn default() -> Self {
        Self {
            window: 50,
            breakout_factor: dec!(0.5),
            trade_size: 2,
        }
    }
}

// 11.4: immutable per-product configuration. a product with no strategy
// parameters at all can still appear as a synthetic leg or a voucher strike;
// the limit always binds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductConfig {
    pub limit: i64,
    pub quote: Option<QuoteParams>,
    pub reversion: Option<ReversionParams>,
    pub momentum: Option<MomentumParams>,
}

impl ProductConfig {
    pub fn new(limit: i64) -> Self {
        Self {
            limit,
            quote: None,
            reversion: None,
            momentum: None,
        }
    }

    pub fn with_quote(mut self, params: QuoteParams) -> Self {
        self.quote = Some(params);
        self
    }

    pub fn with_reversion(mut self, params: ReversionParams) -> Self {
        self.reversion = Some(params);
        self
    }

    pub fn with_momentum(mut self, params: MomentumParams) -> Self {
        self.momentum = Some(params);
        self
    }
}

// 11.5: one leg of a synthetic group. weight prices the leg into the synthetic
// fair value; trade_size is the fixed quantity per firing, not dynamically sized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntheticLeg {
    pub product: ProductId,
    pub weight: Decimal,
    pub trade_size: i64,
}

// 11.6: a basket priced against a fixed-weight combination of component mids.
// each group owns its diff history, threshold, and liquidity checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntheticGroup {
    // Unique name; keys the group's diff history in the engine state.
    pub name: String,
    pub basket: ProductId,
    pub basket_trade_size: i64,
    pub legs: Vec<SyntheticLeg>,
    // Diff history length; also the warm-up population.
    pub window: usize,
    // k in the mean + k*sigma dynamic threshold.
    pub sigma_multiplier: Decimal,
    // Minimum resting volume at the relevant best level before a leg fires.
    pub min_liquidity: i64,
}

// 11.6b: one strike on a voucher ladder. the voucher trades as its own
// product; intrinsic fair value is the underlying's rolling mean minus strike,
// floored at zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoucherStrike {
    pub product: ProductId,
    pub strike: Decimal,
}

// 11.6c: a ladder of vouchers over one underlying. every strike shares the
// group's underlying mid history and mispricing band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoucherGroup {
    // Unique name; keys the group's underlying mid history in the engine state.
    pub name: String,
    pub underlying: ProductId,
    pub strikes: Vec<VoucherStrike>,
    // Underlying mid history length.
    pub window: usize,
    // k in the mean +/- k*sigma mispricing band.
    pub vol_multiplier: Decimal,
}

// 11.7: the complete engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub products: BTreeMap<ProductId, ProductConfig>,
    pub synthetics: Vec<SyntheticGroup>,
    pub vouchers: Vec<VoucherGroup>,
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_product(mut self, product: impl Into<ProductId>, config: ProductConfig) -> Self {
        self.products.insert(product.into(), config);
        self
    }

    pub fn with_synthetic(mut self, group: SyntheticGroup) -> Self {
        self.synthetics.push(group);
        self
    }

    pub fn with_voucher(mut self, group: VoucherGroup) -> Self {
        self.vouchers.push(group);
        self
    }

    // Demonstration preset: one quoted product, one mean-reverting product, and
    // a two-component basket. Used by the simulator and as a test fixture.
    pub fn sample() -> Self {
        Self::new()
            .with_product(
                "ROCK",
                ProductConfig::new(50).with_quote(QuoteParams {
                    alpha: dec!(0.1),
                    base_edge: dec!(1),
                    inv_skew: dec!(0.03),
                    passive_size: 12,
                    vol_window: 20,
                    vol_scale: Decimal::ZERO,
                    vol_floor: Decimal::ZERO,
                    min_vol_obs: 6,
                }),
            )
            .with_product(
                "REED",
                ProductConfig::new(50).with_reversion(ReversionParams {
                    window: 100,
                    threshold: dec!(2.5),
                    trade_size: 5,
                }),
            )
            .with_product("BUNDLE", ProductConfig::new(60))
            .with_product("PLANK", ProductConfig::new(250))
            .with_product("NAIL", ProductConfig::new(350))
            .with_synthetic(SyntheticGroup {
                name: "bundle-arb".to_string(),
                basket: ProductId::from("BUNDLE"),
                basket_trade_size: 2,
                legs: vec![
                    SyntheticLeg {
                        product: ProductId::from("PLANK"),
                        weight: dec!(6),
                        trade_size: 6,
                    },
                    SyntheticLeg {
                        product: ProductId::from("NAIL"),
                        weight: dec!(3),
                        trade_size: 3,
                    },
                ],
                window: 40,
                sigma_multiplier: dec!(1.5),
                min_liquidity: 10,
            })
    }

    // 11.8: internal consistency checks, run once by Engine::new.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (product, config) in &self.products {
            let invalid = |reason: &str| ConfigError::InvalidProduct {
                product: product.clone(),
                reason: reason.to_string(),
            };

            if config.limit <= 0 {
                return Err(invalid("position limit must be positive"));
            }

            if let Some(quote) = &config.quote {
                if quote.alpha <= Decimal::ZERO || quote.alpha > Decimal::ONE {
                    return Err(invalid("alpha must be in (0, 1]"));
                }
                if quote.base_edge <= Decimal::ZERO {
                    return Err(invalid("base edge must be positive"));
                }
                if quote.inv_skew < Decimal::ZERO {
                    return Err(invalid("inventory skew must not be negative"));
                }
                if quote.passive_size <= 0 {
                    return Err(invalid("passive size must be positive"));
                }
                if quote.vol_window == 0 {
                    return Err(invalid("volatility window must be positive"));
                }
                if quote.vol_scale < Decimal::ZERO || quote.vol_floor < Decimal::ZERO {
                    return Err(invalid("volatility scale and floor must not be negative"));
                }
            }

            if let Some(reversion) = &config.reversion {
                if reversion.window == 0 {
                    return Err(invalid("reversion window must be positive"));
                }
                if reversion.threshold <= Decimal::ZERO {
                    return Err(invalid("reversion threshold must be positive"));
                }
                if reversion.trade_size <= 0 {
                    return Err(invalid("reversion trade size must be positive"));
                }
            }

            if let Some(momentum) = &config.momentum {
                if momentum.window == 0 {
                    return Err(invalid("momentum window must be positive"));
                }
                if momentum.breakout_factor < Decimal::ZERO {
                    return Err(invalid("breakout factor must not be negative"));
                }
                if momentum.trade_size <= 0 {
                    return Err(invalid("momentum trade size must be positive"));
                }
            }
        }

        let mut seen_names = std::collections::BTreeSet::new();
        for group in &self.synthetics {
            let invalid = |reason: &str| ConfigError::InvalidSynthetic {
                group: group.name.clone(),
                reason: reason.to_string(),
            };

            if !seen_names.insert(&group.name) {
                return Err(ConfigError::DuplicateGroup(group.name.clone()));
            }
            if group.legs.is_empty() {
                return Err(invalid("at least one component leg is required"));
            }
            if group.window == 0 {
                return Err(invalid("diff window must be positive"));
            }
            if group.sigma_multiplier < Decimal::ZERO {
                return Err(invalid("sigma multiplier must not be negative"));
            }
            if group.min_liquidity < 0 {
                return Err(invalid("minimum liquidity must not be negative"));
            }
            if group.basket_trade_size <= 0 {
                return Err(invalid("basket trade size must be positive"));
            }
            if !self.products.contains_key(&group.basket) {
                return Err(ConfigError::UnknownProduct {
                    group: group.name.clone(),
                    product: group.basket.clone(),
                });
            }
            for leg in &group.legs {
                if leg.weight.is_zero() {
                    return Err(invalid("leg weights must be non-zero"));
                }
                if leg.trade_size <= 0 {
                    return Err(invalid("leg trade sizes must be positive"));
                }
                if !self.products.contains_key(&leg.product) {
                    return Err(ConfigError::UnknownProduct {
                        group: group.name.clone(),
                        product: leg.product.clone(),
                    });
                }
            }
        }

        let mut seen_voucher_names = std::collections::BTreeSet::new();
        for group in &self.vouchers {
            let invalid = |reason: &str| ConfigError::InvalidVoucher {
                group: group.name.clone(),
                reason: reason.to_string(),
            };

            if !seen_voucher_names.insert(&group.name) {
                return Err(ConfigError::DuplicateGroup(group.name.clone()));
            }
            if group.strikes.is_empty() {
                return Err(invalid("at least one strike is required"));
            }
            if group.window == 0 {
                return Err(invalid("underlying mid window must be positive"));
            }
            if group.vol_multiplier < Decimal::ZERO {
                return Err(invalid("volatility multiplier must not be negative"));
            }
            if !self.products.contains_key(&group.underlying) {
                return Err(ConfigError::UnknownProduct {
                    group: group.name.clone(),
                    product: group.underlying.clone(),
                });
            }
            for strike in &group.strikes {
                if strike.strike <= Decimal::ZERO {
                    return Err(invalid("strikes must be positive"));
                }
                if !self.products.contains_key(&strike.product) {
                    return Err(ConfigError::UnknownProduct {
                        group: group.name.clone(),
                        product: strike.product.clone(),
                    });
                }
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("product {product}: {reason}")]
    InvalidProduct { product: ProductId, reason: String },

    #[error("synthetic group {group:?}: {reason}")]
    InvalidSynthetic { group: String, reason: String },

    #[error("voucher group {group:?}: {reason}")]
    InvalidVoucher { group: String, reason: String },

    #[error("group {group:?} references unconfigured product {product}")]
    UnknownProduct { group: String, product: ProductId },

    #[error("duplicate group name {0:?}")]
    DuplicateGroup(String),
}

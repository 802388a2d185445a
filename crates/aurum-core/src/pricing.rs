//! # Pricing Functions
//!
//! Pure, stateless functions that turn a weighed piece of jewelry into money.
//!
//! ## Pricing Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Item Pricing Order                              │
//! │                                                                         │
//! │  gross ─► net_weight(gross, loss, loss_type)                           │
//! │                     │                                                   │
//! │                     ▼                                                   │
//! │  1. metal      = net × rate                                            │
//! │  2. making     = PerGram: net × mc │ Percentage: metal × mc% │ Fixed   │
//! │  3. wastage    = Percentage: metal × va% │ Weight: va grams × rate     │
//! │  4. subtotal   = metal + making + wastage                              │
//! │  5. tax        = subtotal × tax%        (tax is on the subtotal)       │
//! │  6. total      = subtotal + tax                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rules
//! - No validation and no clamping, except the floor in grams-mode net weight
//! - No division by runtime values (only by the constant 100)
//! - Full decimal precision; rounding is a display concern ([`Money::round_for_display`])

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::{LossType, MakingChargeType, WastageType};
use crate::DEFAULT_HISTORY_LIMIT;

/// Default GST on jewelry, in percent.
pub const DEFAULT_TAX_PERCENT: Decimal = dec!(3);

// =============================================================================
// Pricing Configuration
// =============================================================================

/// Deployment-level knobs the estimation store prices with.
///
/// Built from `estimate.toml` by aurum-db, or `Default` for tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Tax applied to every item's subtotal, in percent.
    pub tax_percent: Decimal,
    /// How many finalized estimations the store keeps in its history cache.
    pub history_limit: u32,
}

impl PricingConfig {
    pub fn with_tax_percent(mut self, tax_percent: Decimal) -> Self {
        self.tax_percent = tax_percent;
        self
    }

    pub fn with_history_limit(mut self, history_limit: u32) -> Self {
        self.history_limit = history_limit;
        self
    }
}

impl Default for PricingConfig {
    fn default() -> Self {
        PricingConfig {
            tax_percent: DEFAULT_TAX_PERCENT,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

// =============================================================================
// Price Breakdown
// =============================================================================

/// Every derived monetary value of one line item, computed together.
///
/// ## Invariants
/// - `subtotal == metal_value + making_charge_value + wastage_value`
/// - `total_value == subtotal + tax_value`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub metal_value: Money,
    pub making_charge_value: Money,
    pub wastage_value: Money,
    pub subtotal: Money,
    pub tax_value: Money,
    pub total_value: Money,
}

// =============================================================================
// Component Functions
// =============================================================================

/// Weight after removing a loss (stone weight, melting loss).
///
/// ## Modes
/// - `Percentage`: `gross − gross × loss / 100` (not floored)
/// - `Grams`: `max(0, gross − loss)`
///
/// ## Example
/// ```rust
/// use aurum_core::pricing::net_weight;
/// use aurum_core::types::LossType;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(net_weight(dec!(10), dec!(2), LossType::Grams), dec!(8));
/// assert_eq!(net_weight(dec!(10), dec!(20), LossType::Percentage), dec!(8));
/// assert_eq!(net_weight(dec!(1), dec!(3), LossType::Grams), dec!(0));
/// ```
pub fn net_weight(gross: Decimal, loss: Decimal, loss_type: LossType) -> Decimal {
    match loss_type {
        LossType::Percentage => gross - gross * loss / Decimal::ONE_HUNDRED,
        LossType::Grams => (gross - loss).max(Decimal::ZERO),
    }
}

/// Value of the metal itself.
#[inline]
pub fn metal_value(net_weight: Decimal, rate_per_gram: Decimal) -> Money {
    Money::new(net_weight * rate_per_gram)
}

/// Labor fee (MC).
pub fn making_charge_value(
    net_weight: Decimal,
    metal_value: Money,
    charge: Decimal,
    charge_type: MakingChargeType,
) -> Money {
    match charge_type {
        MakingChargeType::PerGram => Money::new(net_weight * charge),
        MakingChargeType::Percentage => metal_value.percent(charge),
        MakingChargeType::Fixed => Money::new(charge),
    }
}

/// Value addition for metal lost while crafting (VA).
///
/// In `Weight` mode the wastage grams are priced at the item's own rate.
pub fn wastage_value(
    metal_value: Money,
    wastage: Decimal,
    wastage_type: WastageType,
    rate_per_gram: Decimal,
) -> Money {
    match wastage_type {
        WastageType::Percentage => metal_value.percent(wastage),
        WastageType::Weight => Money::new(wastage * rate_per_gram),
    }
}

/// Tax on a subtotal.
#[inline]
pub fn tax_value(subtotal: Money, tax_percent: Decimal) -> Money {
    subtotal.percent(tax_percent)
}

// =============================================================================
// Composite Pricing
// =============================================================================

/// Prices one item in the fixed order metal → making → wastage → tax.
///
/// ## Example
/// ```rust
/// use aurum_core::pricing::price_item;
/// use aurum_core::types::{MakingChargeType, WastageType};
/// use rust_decimal_macros::dec;
///
/// let b = price_item(
///     dec!(2), dec!(6000),
///     dec!(400), MakingChargeType::PerGram,
///     dec!(0.3), WastageType::Weight,
///     dec!(3),
/// );
/// assert_eq!(b.metal_value.amount(), dec!(12000));
/// assert_eq!(b.making_charge_value.amount(), dec!(800));
/// assert_eq!(b.wastage_value.amount(), dec!(1800));
/// ```
pub fn price_item(
    net_weight: Decimal,
    rate: Decimal,
    making_charge: Decimal,
    making_charge_type: MakingChargeType,
    wastage: Decimal,
    wastage_type: WastageType,
    tax_percent: Decimal,
) -> PriceBreakdown {
    let metal = metal_value(net_weight, rate);
    let making = making_charge_value(net_weight, metal, making_charge, making_charge_type);
    let wastage = wastage_value(metal, wastage, wastage_type, rate);
    let subtotal = metal + making + wastage;
    let tax = tax_value(subtotal, tax_percent);

    PriceBreakdown {
        metal_value: metal,
        making_charge_value: making,
        wastage_value: wastage,
        subtotal,
        tax_value: tax,
        total_value: subtotal + tax,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_price_item_fixed_mc_percentage_va() {
        let b = price_item(
            dec!(5.5),
            dec!(6000),
            dec!(500),
            MakingChargeType::Fixed,
            dec!(10),
            WastageType::Percentage,
            dec!(3),
        );

        assert_eq!(b.metal_value.amount(), dec!(33000));
        assert_eq!(b.wastage_value.amount(), dec!(3300));
        assert_eq!(b.making_charge_value.amount(), dec!(500));
        assert_eq!(b.subtotal.amount(), dec!(36800));
        assert_eq!(b.tax_value.amount(), dec!(1104));
        assert_eq!(b.total_value.amount(), dec!(37904));
    }

    #[test]
    fn test_net_weight_modes() {
        assert_eq!(net_weight(dec!(10), dec!(2), LossType::Grams), dec!(8));
        assert_eq!(net_weight(dec!(10), dec!(20), LossType::Percentage), dec!(8));
    }

    #[test]
    fn test_net_weight_grams_floors_at_zero() {
        assert_eq!(net_weight(dec!(2), dec!(5), LossType::Grams), Decimal::ZERO);
    }

    #[test]
    fn test_net_weight_percentage_is_not_floored() {
        assert_eq!(net_weight(dec!(10), dec!(150), LossType::Percentage), dec!(-5));
    }

    #[test]
    fn test_making_charge_modes() {
        let metal = Money::new(dec!(12000));
        assert_eq!(
            making_charge_value(dec!(2), metal, dec!(350), MakingChargeType::PerGram).amount(),
            dec!(700)
        );
        assert_eq!(
            making_charge_value(dec!(2), metal, dec!(12), MakingChargeType::Percentage).amount(),
            dec!(1440)
        );
        assert_eq!(
            making_charge_value(dec!(2), metal, dec!(350), MakingChargeType::Fixed).amount(),
            dec!(350)
        );
    }

    #[test]
    fn test_wastage_weight_mode_uses_item_rate() {
        let metal = Money::new(dec!(12000));
        assert_eq!(
            wastage_value(metal, dec!(0.5), WastageType::Weight, dec!(6540)).amount(),
            dec!(3270)
        );
    }

    #[test]
    fn test_tax_is_on_subtotal() {
        let b = price_item(
            dec!(1),
            dec!(1000),
            dec!(100),
            MakingChargeType::Fixed,
            dec!(0),
            WastageType::Weight,
            dec!(10),
        );
        assert_eq!(b.subtotal.amount(), dec!(1100));
        assert_eq!(b.tax_value.amount(), dec!(110));
    }

    #[test]
    fn test_no_rounding_in_pricing() {
        let b = price_item(
            dec!(5.5),
            dec!(6123.45),
            dec!(0),
            MakingChargeType::Fixed,
            dec!(0),
            WastageType::Weight,
            dec!(3),
        );
        assert_eq!(b.metal_value.amount(), dec!(33678.975));
        assert_eq!(b.tax_value.amount(), dec!(1010.36925));
    }

    #[test]
    fn test_default_pricing_config() {
        let config = PricingConfig::default();
        assert_eq!(config.tax_percent, dec!(3));
        assert_eq!(config.history_limit, 20);

        let config = config.with_tax_percent(dec!(0)).with_history_limit(5);
        assert_eq!(config.tax_percent, Decimal::ZERO);
        assert_eq!(config.history_limit, 5);
    }

    // -------------------------------------------------------------------------
    // Property tests
    // -------------------------------------------------------------------------

    fn amount() -> impl Strategy<Value = Decimal> {
        (0i64..10_000_000, 0u32..=3).prop_map(|(n, scale)| Decimal::new(n, scale))
    }

    fn percent() -> impl Strategy<Value = Decimal> {
        (0i64..20_000, 0u32..=2).prop_map(|(n, scale)| Decimal::new(n, scale))
    }

    fn making_type() -> impl Strategy<Value = MakingChargeType> {
        prop_oneof![
            Just(MakingChargeType::PerGram),
            Just(MakingChargeType::Fixed),
            Just(MakingChargeType::Percentage),
        ]
    }

    fn wastage_type() -> impl Strategy<Value = WastageType> {
        prop_oneof![Just(WastageType::Percentage), Just(WastageType::Weight)]
    }

    proptest! {
        #[test]
        fn prop_breakdown_adds_up(
            net in amount(),
            rate in amount(),
            mc in amount(),
            mc_type in making_type(),
            va in percent(),
            va_type in wastage_type(),
            tax in percent(),
        ) {
            let b = price_item(net, rate, mc, mc_type, va, va_type, tax);
            prop_assert_eq!(b.subtotal, b.metal_value + b.making_charge_value + b.wastage_value);
            prop_assert_eq!(
                b.total_value,
                b.metal_value + b.making_charge_value + b.wastage_value + b.tax_value
            );
        }

        #[test]
        fn prop_price_item_is_deterministic(
            net in amount(),
            rate in amount(),
            mc in amount(),
            mc_type in making_type(),
            va in percent(),
            va_type in wastage_type(),
        ) {
            let first = price_item(net, rate, mc, mc_type, va, va_type, DEFAULT_TAX_PERCENT);
            let second = price_item(net, rate, mc, mc_type, va, va_type, DEFAULT_TAX_PERCENT);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_grams_net_weight_never_negative(gross in amount(), loss in amount()) {
            prop_assert!(net_weight(gross, loss, LossType::Grams) >= Decimal::ZERO);
        }
    }
}

//! # Entry Layer
//!
//! Turns item-source data into priced items the store can hold.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Tag scan / lookup ──► Product ──► LineItemDraft::from_product          │
//! │  Manual entry form ───────────────► LineItemDraft::new(..).manual()     │
//! │                                          │                              │
//! │                                          ▼                              │
//! │                         rate = override or sheet.rate_for(metal, purity)│
//! │                         net  = net_weight(gross, stone, Grams)          │
//! │                         breakdown = price_item(..)                      │
//! │                                          │                              │
//! │                                          ▼                              │
//! │                                      LineItem (frozen)                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Trade-ins follow the same path through [`PurchaseDraft`].

use rust_decimal::Decimal;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::pricing::{net_weight, price_item, PricingConfig};
use crate::types::{
    LineItem, LineItemFields, LossType, MakingChargeType, Metal, MetalRateSheet, Product,
    PurchaseDeduction, PurchaseItem, WastageType,
};
use crate::validation::{validate_gross_vs_stone, validate_piece_count};

// =============================================================================
// Rate Source
// =============================================================================

/// Where an item's per-gram rate comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RateSource {
    /// Look the rate up on the active sheet by metal and purity.
    #[default]
    Sheet,
    /// Clerk typed a rate on the manual entry form.
    Override(Decimal),
}

impl RateSource {
    /// Resolves to a per-gram rate.
    pub fn resolve(&self, sheet: &MetalRateSheet, metal: Metal, purity: u32) -> Decimal {
        match self {
            RateSource::Sheet => sheet.rate_for(metal, purity),
            RateSource::Override(rate) => *rate,
        }
    }
}

// =============================================================================
// Line Item Draft
// =============================================================================

/// An item that has been measured but not yet priced.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItemDraft {
    pub id: String,
    pub metal: Metal,
    pub purity: u32,
    pub piece_count: u32,
    pub gross_weight: Decimal,
    pub stone_weight: Decimal,
    pub wastage: Decimal,
    pub wastage_type: WastageType,
    pub making_charge: Decimal,
    pub making_charge_type: MakingChargeType,
    pub rate: RateSource,
    pub is_manual_entry: bool,
    pub tag_number: Option<String>,
    pub customer_name: Option<String>,
    pub description: Option<String>,
}

impl LineItemDraft {
    /// Creates a one-piece draft with no stone, no charges and a sheet rate.
    pub fn new(id: impl Into<String>, metal: Metal, purity: u32, gross_weight: Decimal) -> Self {
        LineItemDraft {
            id: id.into(),
            metal,
            purity,
            piece_count: 1,
            gross_weight,
            stone_weight: Decimal::ZERO,
            wastage: Decimal::ZERO,
            wastage_type: WastageType::default(),
            making_charge: Decimal::ZERO,
            making_charge_type: MakingChargeType::default(),
            rate: RateSource::Sheet,
            is_manual_entry: false,
            tag_number: None,
            customer_name: None,
            description: None,
        }
    }

    /// Creates a draft from a product returned by a tag lookup.
    pub fn from_product(id: impl Into<String>, product: &Product) -> Self {
        LineItemDraft {
            id: id.into(),
            metal: product.metal,
            purity: product.purity,
            piece_count: product.piece_count,
            gross_weight: product.gross_weight,
            stone_weight: product.stone_weight,
            wastage: product.wastage,
            wastage_type: product.wastage_type,
            making_charge: product.making_charge,
            making_charge_type: product.making_charge_type,
            rate: RateSource::Sheet,
            is_manual_entry: false,
            tag_number: product.tag_number.clone(),
            customer_name: None,
            description: product.description.clone(),
        }
    }

    pub fn with_stone_weight(mut self, stone_weight: Decimal) -> Self {
        self.stone_weight = stone_weight;
        self
    }

    pub fn with_piece_count(mut self, piece_count: u32) -> Self {
        self.piece_count = piece_count;
        self
    }

    pub fn with_wastage(mut self, wastage: Decimal, wastage_type: WastageType) -> Self {
        self.wastage = wastage;
        self.wastage_type = wastage_type;
        self
    }

    pub fn with_making_charge(mut self, charge: Decimal, charge_type: MakingChargeType) -> Self {
        self.making_charge = charge;
        self.making_charge_type = charge_type;
        self
    }

    /// Prices at this rate instead of the sheet rate.
    pub fn with_rate(mut self, rate: Decimal) -> Self {
        self.rate = RateSource::Override(rate);
        self
    }

    pub fn with_tag_number(mut self, tag_number: impl Into<String>) -> Self {
        self.tag_number = Some(tag_number.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_customer_name(mut self, customer_name: impl Into<String>) -> Self {
        self.customer_name = Some(customer_name.into());
        self
    }

    /// Marks the draft as typed in by hand rather than scanned.
    pub fn manual(mut self) -> Self {
        self.is_manual_entry = true;
        self
    }

    /// Prices the draft. Never fails; garbage in, garbage out.
    ///
    /// ## Example
    /// ```rust
    /// use aurum_core::entry::LineItemDraft;
    /// use aurum_core::types::{Metal, MetalRateSheet};
    /// use rust_decimal_macros::dec;
    ///
    /// let sheet = MetalRateSheet::new(dec!(4900), dec!(5450), dec!(6000), dec!(6540), dec!(80));
    /// let item = LineItemDraft::new("t-1", Metal::Gold, 22, dec!(10))
    ///     .with_stone_weight(dec!(2))
    ///     .price(&sheet, dec!(0));
    ///
    /// assert_eq!(item.net_weight, dec!(8));
    /// assert_eq!(item.rate, dec!(6000));
    /// assert_eq!(item.total_value().amount(), dec!(48000));
    /// ```
    pub fn price(self, sheet: &MetalRateSheet, tax_percent: Decimal) -> LineItem {
        let rate = self.rate.resolve(sheet, self.metal, self.purity);
        let net = net_weight(self.gross_weight, self.stone_weight, LossType::Grams);
        let breakdown = price_item(
            net,
            rate,
            self.making_charge,
            self.making_charge_type,
            self.wastage,
            self.wastage_type,
            tax_percent,
        );

        LineItem::from_parts(self.into_fields(), net, rate, tax_percent, breakdown)
    }

    /// Validates the draft, then prices it.
    ///
    /// ## Errors
    /// - `Validation` if stone weight exceeds gross or piece count is 0
    /// - `RateUnavailable` if the resolved rate is zero (no sheet loaded yet)
    pub fn try_price(self, sheet: &MetalRateSheet, tax_percent: Decimal) -> CoreResult<LineItem> {
        validate_gross_vs_stone(self.gross_weight, self.stone_weight)?;
        validate_piece_count(i64::from(self.piece_count))?;

        if self.rate.resolve(sheet, self.metal, self.purity) <= Decimal::ZERO {
            return Err(CoreError::RateUnavailable {
                metal: self.metal.to_string(),
                purity: self.purity,
            });
        }

        Ok(self.price(sheet, tax_percent))
    }

    fn into_fields(self) -> LineItemFields {
        LineItemFields {
            id: self.id,
            metal: self.metal,
            purity: self.purity,
            piece_count: self.piece_count,
            gross_weight: self.gross_weight,
            stone_weight: self.stone_weight,
            wastage: self.wastage,
            wastage_type: self.wastage_type,
            making_charge: self.making_charge,
            making_charge_type: self.making_charge_type,
            is_manual_entry: self.is_manual_entry,
            tag_number: self.tag_number,
            customer_name: self.customer_name,
            description: self.description,
        }
    }
}

/// Prices a looked-up product against the active sheet.
pub fn price_product(
    product: &Product,
    sheet: &MetalRateSheet,
    config: &PricingConfig,
    id: impl Into<String>,
) -> LineItem {
    LineItemDraft::from_product(id, product).price(sheet, config.tax_percent)
}

// =============================================================================
// Purchase Draft
// =============================================================================

/// Old gold or silver the customer is trading in, before valuation.
#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseDraft {
    pub id: String,
    pub category: String,
    pub metal: Metal,
    pub purity: u32,
    pub piece_count: u32,
    pub gross_weight: Decimal,
    pub deduction: PurchaseDeduction,
    pub rate: RateSource,
}

impl PurchaseDraft {
    pub fn new(
        id: impl Into<String>,
        category: impl Into<String>,
        metal: Metal,
        purity: u32,
        gross_weight: Decimal,
    ) -> Self {
        PurchaseDraft {
            id: id.into(),
            category: category.into(),
            metal,
            purity,
            piece_count: 1,
            gross_weight,
            deduction: PurchaseDeduction::none(),
            rate: RateSource::Sheet,
        }
    }

    pub fn with_piece_count(mut self, piece_count: u32) -> Self {
        self.piece_count = piece_count;
        self
    }

    pub fn with_deduction(mut self, deduction: PurchaseDeduction) -> Self {
        self.deduction = deduction;
        self
    }

    /// Buys back at this rate instead of the sheet rate.
    pub fn with_rate(mut self, rate: Decimal) -> Self {
        self.rate = RateSource::Override(rate);
        self
    }

    /// Values the trade-in.
    ///
    /// ## Deductions
    /// ```text
    /// Percentage(p) → net = gross − gross × p / 100     amount = net × rate
    /// Grams(g)      → net = max(0, gross − g)           amount = net × rate
    /// Amount(m)     → net = gross                       amount = max(0, net × rate − m)
    /// ```
    pub fn price(self, sheet: &MetalRateSheet) -> PurchaseItem {
        let rate = self.rate.resolve(sheet, self.metal, self.purity);

        let (net, amount_deduction) = match self.deduction {
            PurchaseDeduction::Percentage(p) => {
                (net_weight(self.gross_weight, p, LossType::Percentage), Money::zero())
            }
            PurchaseDeduction::Grams(g) => {
                (net_weight(self.gross_weight, g, LossType::Grams), Money::zero())
            }
            PurchaseDeduction::Amount(m) => (self.gross_weight, m),
        };

        let amount = (Money::new(net * rate) - amount_deduction).floor_at_zero();

        PurchaseItem {
            id: self.id,
            category: self.category,
            metal: self.metal,
            purity: self.purity,
            piece_count: self.piece_count,
            gross_weight: self.gross_weight,
            deduction: self.deduction,
            net_weight: net,
            rate,
            amount,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

//! # Domain Types
//!
//! Core domain types used throughout Aurum Estimate.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ MetalRateSheet  │   │    LineItem     │   │  PurchaseItem   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  rate_18k..24k  │   │  gross/stone/net│   │  old gold in    │       │
//! │  │  silver         │   │  MC / VA config │   │  deduction      │       │
//! │  │  as_of          │   │  PriceBreakdown │   │  amount (credit)│       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ ChitDeduction   │   │AdvanceDeduction │   │    Customer     │       │
//! │  │  reference_id   │   │  reference_id   │   │  name, mobile   │       │
//! │  │  amount (credit)│   │  amount (credit)│   │  email, address │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Frozen Pricing
//! A `LineItem` carries the rate it was priced at. Replacing the active rate
//! sheet never reprices items that are already in an estimation.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::money::Money;
use crate::pricing::PriceBreakdown;
use crate::totals::EstimationTotals;

// =============================================================================
// Metal & Charge Classifications
// =============================================================================

/// The metal an item is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Metal {
    #[default]
    Gold,
    Silver,
}

/// How a weight loss (stone weight, purchase deduction) is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossType {
    /// Loss is a percentage of gross weight.
    Percentage,
    /// Loss is an absolute number of grams.
    #[default]
    Grams,
}

/// How wastage (VA) is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WastageType {
    /// Percentage of metal value.
    Percentage,
    /// Extra grams, priced at the item's rate.
    #[default]
    Weight,
}

/// How the making charge (MC) is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MakingChargeType {
    /// Charge per gram of net weight.
    PerGram,
    /// Flat charge, independent of weight.
    #[default]
    Fixed,
    /// Percentage of metal value.
    Percentage,
}

/// Which list of an estimation an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListKind {
    Estimation,
    Purchase,
    Chit,
    Advance,
}

macro_rules! impl_wire_name {
    ($ty:ident, $field:literal, { $($variant:ident => $name:literal $(| $alias:literal)*),+ $(,)? }) => {
        impl $ty {
            /// Returns the wire/config name of this variant.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $name,)+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($name $(| $alias)* => Ok($ty::$variant),)+
                    _ => Err(ValidationError::NotAllowed {
                        field: $field.to_string(),
                        allowed: vec![$($name.to_string()),+],
                    }),
                }
            }
        }
    };
}

impl_wire_name!(Metal, "metal", {
    Gold => "gold",
    Silver => "silver",
});

impl_wire_name!(LossType, "loss type", {
    Percentage => "percentage" | "percent" | "%",
    Grams => "grams" | "gram" | "g",
});

impl_wire_name!(WastageType, "wastage type", {
    Percentage => "percentage" | "percent" | "%",
    Weight => "weight" | "grams" | "g",
});

impl_wire_name!(MakingChargeType, "making charge type", {
    PerGram => "per_gram" | "pergram" | "per gram",
    Fixed => "fixed" | "flat",
    Percentage => "percentage" | "percent" | "%",
});

impl_wire_name!(ListKind, "list", {
    Estimation => "estimation" | "items",
    Purchase => "purchase",
    Chit => "chit",
    Advance => "advance",
});

// =============================================================================
// Metal Rate Sheet
// =============================================================================

/// Per-purity price table (rupees per gram).
///
/// ## Snapshot Semantics
/// A sheet is replaced wholesale by an update; it is never edited field by
/// field. Exactly one sheet is active in an estimation store at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetalRateSheet {
    pub rate_18k: Decimal,
    pub rate_20k: Decimal,
    pub rate_22k: Decimal,
    pub rate_24k: Decimal,
    pub silver: Decimal,
    pub as_of: DateTime<Utc>,
}

impl MetalRateSheet {
    /// Creates a sheet stamped with the current time.
    pub fn new(
        rate_18k: Decimal,
        rate_20k: Decimal,
        rate_22k: Decimal,
        rate_24k: Decimal,
        silver: Decimal,
    ) -> Self {
        MetalRateSheet {
            rate_18k,
            rate_20k,
            rate_22k,
            rate_24k,
            silver,
            as_of: Utc::now(),
        }
    }

    /// The zero-valued sheet an empty store starts with.
    pub fn zero() -> Self {
        MetalRateSheet {
            rate_18k: Decimal::ZERO,
            rate_20k: Decimal::ZERO,
            rate_22k: Decimal::ZERO,
            rate_24k: Decimal::ZERO,
            silver: Decimal::ZERO,
            as_of: DateTime::<Utc>::default(),
        }
    }

    /// Resolves the default per-gram rate for an item.
    ///
    /// ## Resolution Table
    /// ```text
    /// GOLD   24 → rate_24k
    ///        22 → rate_22k
    ///        20 → rate_20k
    ///        18 → rate_18k
    ///        anything else → rate_22k   (business default, not a placeholder)
    /// SILVER any purity → silver
    /// ```
    ///
    /// ## Example
    /// ```rust
    /// use aurum_core::types::{Metal, MetalRateSheet};
    /// use rust_decimal_macros::dec;
    ///
    /// let sheet = MetalRateSheet::new(dec!(5000), dec!(5600), dec!(6000), dec!(6500), dec!(80));
    /// assert_eq!(sheet.rate_for(Metal::Gold, 26), dec!(6000));
    /// assert_eq!(sheet.rate_for(Metal::Silver, 925), dec!(80));
    /// ```
    pub fn rate_for(&self, metal: Metal, purity: u32) -> Decimal {
        match metal {
            Metal::Silver => self.silver,
            Metal::Gold => match purity {
                24 => self.rate_24k,
                22 => self.rate_22k,
                20 => self.rate_20k,
                18 => self.rate_18k,
                _ => self.rate_22k,
            },
        }
    }
}

impl Default for MetalRateSheet {
    fn default() -> Self {
        MetalRateSheet::zero()
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One priced product in an estimation.
///
/// Build through [`crate::entry::LineItemDraft::price`] so that the derived
/// values always come from a single [`PriceBreakdown`]. The breakdown itself
/// is private: `total_value == metal + making + wastage + tax` cannot be broken
/// by editing one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Unique within an estimation (caller-supplied).
    pub id: String,
    pub metal: Metal,
    pub purity: u32,
    pub piece_count: u32,
    pub gross_weight: Decimal,
    pub stone_weight: Decimal,
    pub net_weight: Decimal,
    pub wastage: Decimal,
    pub wastage_type: WastageType,
    pub making_charge: Decimal,
    pub making_charge_type: MakingChargeType,
    /// Per-gram rate frozen at the time the item was priced.
    pub rate: Decimal,
    pub tax_percent: Decimal,
    breakdown: PriceBreakdown,
    pub is_manual_entry: bool,
    pub tag_number: Option<String>,
    pub customer_name: Option<String>,
    pub description: Option<String>,
}

impl LineItem {
    pub(crate) fn from_parts(
        fields: LineItemFields,
        net_weight: Decimal,
        rate: Decimal,
        tax_percent: Decimal,
        breakdown: PriceBreakdown,
    ) -> Self {
        LineItem {
            id: fields.id,
            metal: fields.metal,
            purity: fields.purity,
            piece_count: fields.piece_count,
            gross_weight: fields.gross_weight,
            stone_weight: fields.stone_weight,
            net_weight,
            wastage: fields.wastage,
            wastage_type: fields.wastage_type,
            making_charge: fields.making_charge,
            making_charge_type: fields.making_charge_type,
            rate,
            tax_percent,
            breakdown,
            is_manual_entry: fields.is_manual_entry,
            tag_number: fields.tag_number,
            customer_name: fields.customer_name,
            description: fields.description,
        }
    }

    /// The full pricing breakdown of this item.
    #[inline]
    pub fn breakdown(&self) -> &PriceBreakdown {
        &self.breakdown
    }

    #[inline]
    pub fn metal_value(&self) -> Money {
        self.breakdown.metal_value
    }

    #[inline]
    pub fn making_charge_value(&self) -> Money {
        self.breakdown.making_charge_value
    }

    #[inline]
    pub fn wastage_value(&self) -> Money {
        self.breakdown.wastage_value
    }

    #[inline]
    pub fn tax_value(&self) -> Money {
        self.breakdown.tax_value
    }

    #[inline]
    pub fn total_value(&self) -> Money {
        self.breakdown.total_value
    }
}

/// Descriptive fields of a line item that pricing does not derive.
#[derive(Debug, Clone)]
pub(crate) struct LineItemFields {
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
    pub is_manual_entry: bool,
    pub tag_number: Option<String>,
    pub customer_name: Option<String>,
    pub description: Option<String>,
}

// =============================================================================
// Purchase (Old Gold Trade-In)
// =============================================================================

/// How a trade-in's melting/impurity deduction is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum PurchaseDeduction {
    /// Flat rupee deduction from the computed value.
    Amount(Money),
    /// Percentage of gross weight.
    Percentage(Decimal),
    /// Grams off gross weight.
    Grams(Decimal),
}

impl PurchaseDeduction {
    /// No deduction at all.
    pub fn none() -> Self {
        PurchaseDeduction::Grams(Decimal::ZERO)
    }
}

/// An old-gold/silver item bought back from the customer.
///
/// `amount` is a credit against the estimation total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseItem {
    pub id: String,
    pub category: String,
    pub metal: Metal,
    pub purity: u32,
    pub piece_count: u32,
    pub gross_weight: Decimal,
    pub deduction: PurchaseDeduction,
    pub net_weight: Decimal,
    pub rate: Decimal,
    pub amount: Money,
}

// =============================================================================
// Chit & Advance Deductions
// =============================================================================

/// Credit from a chit-fund (gold savings scheme) account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChitDeduction {
    pub id: String,
    /// Chit account / passbook number.
    pub reference_id: String,
    pub amount: Money,
}

impl ChitDeduction {
    pub fn new(id: impl Into<String>, reference_id: impl Into<String>, amount: Money) -> Self {
        ChitDeduction {
            id: id.into(),
            reference_id: reference_id.into(),
            amount,
        }
    }
}

/// Credit from an advance payment made earlier by the customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvanceDeduction {
    pub id: String,
    /// Advance receipt number.
    pub reference_id: String,
    pub amount: Money,
}

impl AdvanceDeduction {
    pub fn new(id: impl Into<String>, reference_id: impl Into<String>, amount: Money) -> Self {
        AdvanceDeduction {
            id: id.into(),
            reference_id: reference_id.into(),
            amount,
        }
    }
}

// =============================================================================
// Customer
// =============================================================================

/// Customer attached to an estimation before finalizing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub name: String,
    pub mobile: String,
    pub email: Option<String>,
    pub address: Option<String>,
}

impl Customer {
    pub fn new(name: impl Into<String>, mobile: impl Into<String>) -> Self {
        Customer {
            name: name.into(),
            mobile: mobile.into(),
            email: None,
            address: None,
        }
    }
}

// =============================================================================
// Product (item source shape)
// =============================================================================

/// Item data as supplied by a scanner, tag lookup or manual entry form.
///
/// The core does not fetch or validate this; it only prices it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub tag_number: Option<String>,
    pub description: Option<String>,
    pub metal: Metal,
    pub purity: u32,
    pub piece_count: u32,
    pub gross_weight: Decimal,
    pub stone_weight: Decimal,
    pub wastage: Decimal,
    pub wastage_type: WastageType,
    pub making_charge: Decimal,
    pub making_charge_type: MakingChargeType,
}

// =============================================================================
// Estimation Record (history)
// =============================================================================

/// A finalized estimation as written to the persistence gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimationRecord {
    /// Record identifier (UUID v4).
    pub id: String,
    /// Sequential, human-facing estimation number.
    pub estimation_number: i64,
    pub created_at: DateTime<Utc>,
    pub customer: Option<Customer>,
    /// Sheet that was active when the estimation was finalized.
    pub rate_sheet: MetalRateSheet,
    pub items: Vec<LineItem>,
    pub purchase_items: Vec<PurchaseItem>,
    pub chit_items: Vec<ChitDeduction>,
    pub advance_items: Vec<AdvanceDeduction>,
    pub totals: EstimationTotals,
}

// =============================================================================
// Unit Tests
// =============================================================================

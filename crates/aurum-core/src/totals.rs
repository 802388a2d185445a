//! # Totals Aggregator
//!
//! Folds an estimation's items and credits into one [`EstimationTotals`].
//!
//! ## Aggregation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  items ──────► Σ gross weight                                          │
//! │          ├───► Σ metal / making / wastage / tax                        │
//! │          └───► Σ line totals ─────────┐                                │
//! │                                       ▼                                 │
//! │  purchase ───► Σ amount ──────► − ────┤                                │
//! │  chit ───────► Σ amount ──────► − ────┤                                │
//! │  advance ────► Σ amount ──────► − ────┤                                │
//! │                                       ▼                                 │
//! │                              max(0, …) = net payable                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The store recomputes from scratch on every mutation; there is no
//! incremental bookkeeping to drift out of sync.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::{AdvanceDeduction, ChitDeduction, LineItem, PurchaseItem};

/// Aggregated view of one estimation.
///
/// `total_weight` is the sum of **gross** weights. Stone weight is part of
/// what the customer takes home, so the receipt shows gross.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EstimationTotals {
    pub total_weight: Decimal,
    pub total_metal_value: Money,
    pub total_making_charge: Money,
    pub total_wastage: Money,
    pub total_tax: Money,
    /// Σ line totals, before credits.
    pub total_item_value: Money,
    pub total_purchase: Money,
    pub total_chit: Money,
    pub total_advance: Money,
    pub net_payable: Money,
}

impl EstimationTotals {
    /// Sum of all credits (purchase + chit + advance).
    pub fn total_credits(&self) -> Money {
        self.total_purchase + self.total_chit + self.total_advance
    }
}

/// Computes totals for an estimation.
///
/// ## Example
/// ```rust
/// use aurum_core::totals::compute_totals;
///
/// let totals = compute_totals(&[], &[], &[], &[]);
/// assert!(totals.net_payable.is_zero());
/// ```
pub fn compute_totals(
    items: &[LineItem],
    purchase_items: &[PurchaseItem],
    chit_items: &[ChitDeduction],
    advance_items: &[AdvanceDeduction],
) -> EstimationTotals {
    let mut totals = EstimationTotals::default();

    for item in items {
        totals.total_weight += item.gross_weight;
        totals.total_metal_value += item.metal_value();
        totals.total_making_charge += item.making_charge_value();
        totals.total_wastage += item.wastage_value();
        totals.total_tax += item.tax_value();
        totals.total_item_value += item.total_value();
    }

    totals.total_purchase = purchase_items.iter().map(|p| p.amount).sum();
    totals.total_chit = chit_items.iter().map(|c| c.amount).sum();
    totals.total_advance = advance_items.iter().map(|a| a.amount).sum();

    totals.net_payable = (totals.total_item_value - totals.total_credits()).floor_at_zero();
    totals
}

// =============================================================================
// Unit Tests
// =============================================================================

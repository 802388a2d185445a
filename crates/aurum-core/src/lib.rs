//! # aurum-core: Estimation Engine for Aurum Estimate
//!
//! This crate is the **heart** of Aurum Estimate. It turns weights, purities
//! and charge settings into a priced jewelry estimation, and keeps the running
//! totals of an in-progress estimation consistent.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Aurum Estimate Architecture                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │          Item sources (scanner, manual entry, tag lookup)       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ Product / LineItemDraft                │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ aurum-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐  ┌──────────┐  ┌──────────┐  ┌──────────────┐   │   │
//! │  │   │ pricing  │  │  totals  │  │  store   │  │    entry     │   │   │
//! │  │   │ net wt   │  │ gross wt │  │ session  │  │ rate lookup  │   │   │
//! │  │   │ MC / VA  │  │ credits  │  │ finalize │  │ validation   │   │   │
//! │  │   │ tax      │  │ clamp    │  │ history  │  │              │   │   │
//! │  │   └──────────┘  └──────────┘  └────┬─────┘  └──────────────┘   │   │
//! │  │                                    │ EstimationGateway          │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK│                            │   │
//! │  └────────────────────────────────────┼────────────────────────────┘   │
//! │                                       │                                 │
//! │  ┌────────────────────────────────────▼────────────────────────────┐   │
//! │  │            aurum-db (SQLite rate sheets + history)              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (rate sheet, line item, deductions, customer)
//! - [`money`] - Money type over exact decimals
//! - [`pricing`] - Per-item pricing functions
//! - [`totals`] - Totals aggregator
//! - [`store`] - Estimation session and store
//! - [`gateway`] - Persistence gateway trait
//! - [`entry`] - Building priced items from item-source data
//! - [`validation`] - Entry-layer input validation
//! - [`error`] - Error types
//!
//! ## Example Usage
//!
//! ```rust
//! use aurum_core::pricing::{price_item, DEFAULT_TAX_PERCENT};
//! use aurum_core::types::{MakingChargeType, WastageType};
//! use rust_decimal_macros::dec;
//!
//! let breakdown = price_item(
//!     dec!(5.5),
//!     dec!(6000),
//!     dec!(500),
//!     MakingChargeType::Fixed,
//!     dec!(10),
//!     WastageType::Percentage,
//!     DEFAULT_TAX_PERCENT,
//! );
//!
//! assert_eq!(breakdown.total_value.amount(), dec!(37904));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod entry;
pub mod error;
pub mod gateway;
pub mod money;
pub mod pricing;
pub mod store;
pub mod totals;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, GatewayError, StoreError, ValidationError};
pub use gateway::EstimationGateway;
pub use money::Money;
pub use pricing::{PriceBreakdown, PricingConfig};
pub use store::{EstimationAction, EstimationSession, EstimationStore, FinalizeOutcome};
pub use totals::EstimationTotals;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Number of finalized estimations kept in the in-memory history cache.
pub const DEFAULT_HISTORY_LIMIT: u32 = 20;

/// Maximum piece count accepted by entry validation.
///
/// Prevents typing 1000 instead of 10 on a piece-count field.
pub const MAX_PIECE_COUNT: i64 = 999;

//! # Error Types
//!
//! Domain-specific error types for aurum-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  aurum-core errors (this file)                                         │
//! │  ├── ValidationError  - Clerk input rejected by the entry layer        │
//! │  ├── CoreError        - General domain errors                          │
//! │  ├── GatewayError     - Persistence failures seen through the trait    │
//! │  └── StoreError       - What the estimation store's async ops return   │
//! │                                                                         │
//! │  aurum-db errors (separate crate)                                      │
//! │  └── DbError          - sqlx failures, converted into GatewayError     │
//! │                                                                         │
//! │  Flow: DbError → GatewayError → StoreError → caller                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (field, estimation number)
//! 3. Pricing and totals never fail; only input parsing and I/O do

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An item could not be priced because no usable rate is known.
    ///
    /// ## When This Occurs
    /// - The active rate sheet is still the zero sheet (nothing loaded yet)
    ///   and the clerk did not type a rate override
    #[error("No rate available for {metal} purity {purity}")]
    RateUnavailable { metal: String, purity: u32 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when clerk input doesn't meet requirements.
/// Used for early validation before anything is priced.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must not be negative.
    #[error("{field} cannot be negative")]
    Negative { field: String },

    /// Invalid format (not a number, not a mobile number).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// Stone weight larger than the gross weight it is part of.
    #[error("stone weight {stone} g exceeds gross weight {gross} g")]
    StoneExceedsGross { gross: String, stone: String },
}

// =============================================================================
// Gateway Error
// =============================================================================

/// Persistence failures reported through [`crate::gateway::EstimationGateway`].
///
/// The core never inspects the storage engine; it only needs to know whether
/// a failure is worth retrying and what to show.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    /// Storage could not be reached (pool closed, file locked, timeout).
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// The storage engine rejected or failed the operation.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Stored data could not be interpreted (bad decimal, missing field).
    #[error("Corrupt stored data: {0}")]
    Corrupt(String),

    /// A record could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl GatewayError {
    /// Returns true if the operation may succeed if retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self, GatewayError::Unavailable(_))
    }
}

// =============================================================================
// Store Error
// =============================================================================

/// Errors returned by the estimation store's persisting operations.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// A gateway call failed before anything was committed.
    ///
    /// The in-memory session is exactly as it was before the call
    /// (except for `update_rate_sheet`, which always applies in memory).
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// The estimation was saved, but the history list could not be reloaded.
    ///
    /// ## User Workflow
    /// ```text
    /// finalize()
    ///      │
    ///      ├── next_estimation_number  ✓  (#42)
    ///      ├── save_estimation_record  ✓  (durable)
    ///      ├── load_recent_estimations ✗
    ///      ▼
    /// form is reset, history is stale
    /// UI shows: "Estimation #42 saved; history could not be refreshed"
    /// ```
    #[error("Estimation #{estimation_number} saved, but history refresh failed: {source}")]
    HistoryRefresh {
        estimation_number: i64,
        #[source]
        source: GatewayError,
    },
}

impl StoreError {
    /// Returns true if the estimation behind this error is already persisted.
    pub fn is_saved(&self) -> bool {
        matches!(self, StoreError::HistoryRefresh { .. })
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

//! # Repository Module
//!
//! Database repository implementations for Aurum Estimate.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  SqliteGateway (EstimationGateway impl)                                │
//! │       │                                                                 │
//! │       │  db.estimations().insert(&record)                              │
//! │       ▼                                                                 │
//! │  RateSheetRepository          EstimationRepository                     │
//! │  ├── insert(sheet)            ├── next_number()                        │
//! │  ├── latest()                 ├── insert(record)                       │
//! │  └── count()                  ├── recent(limit)                        │
//! │                               ├── get_by_number(n)                     │
//! │                               └── find_by_mobile(mobile, limit)        │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`rate_sheet::RateSheetRepository`] - Append-only rate sheet log
//! - [`estimation::EstimationRepository`] - Finalized estimations and numbering

pub mod estimation;
pub mod rate_sheet;

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::{DbError, DbResult};

/// Parses a decimal column stored as TEXT.
pub(crate) fn parse_decimal(column: &str, text: &str) -> DbResult<Decimal> {
    Decimal::from_str(text).map_err(|e| DbError::invalid_data(column, e.to_string()))
}

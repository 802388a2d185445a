//! # Rate Sheet Repository
//!
//! Append-only log of metal rate sheets.
//!
//! ```text
//! update_rate_sheet ──► INSERT row ──► rate_sheets (id ↑)
//! start-up          ──► SELECT … ORDER BY id DESC LIMIT 1
//! ```
//!
//! Older rows are kept so the day's rate changes can be audited.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use aurum_core::MetalRateSheet;

use super::parse_decimal;
use crate::error::DbResult;

/// One row of `rate_sheets`, decimals still as text.
#[derive(Debug, sqlx::FromRow)]
struct RateSheetRow {
    rate_18k: String,
    rate_20k: String,
    rate_22k: String,
    rate_24k: String,
    silver: String,
    as_of: DateTime<Utc>,
}

impl RateSheetRow {
    fn into_sheet(self) -> DbResult<MetalRateSheet> {
        Ok(MetalRateSheet {
            rate_18k: parse_decimal("rate_18k", &self.rate_18k)?,
            rate_20k: parse_decimal("rate_20k", &self.rate_20k)?,
            rate_22k: parse_decimal("rate_22k", &self.rate_22k)?,
            rate_24k: parse_decimal("rate_24k", &self.rate_24k)?,
            silver: parse_decimal("silver", &self.silver)?,
            as_of: self.as_of,
        })
    }
}

/// Repository for rate sheet database operations.
#[derive(Debug, Clone)]
pub struct RateSheetRepository {
    pool: SqlitePool,
}

impl RateSheetRepository {
    /// Creates a new RateSheetRepository.
    pub fn new(pool: SqlitePool) -> Self {
        RateSheetRepository { pool }
    }

    /// Appends a sheet and returns its row id.
    pub async fn insert(&self, sheet: &MetalRateSheet) -> DbResult<i64> {
        debug!(as_of = %sheet.as_of, rate_22k = %sheet.rate_22k, "Inserting rate sheet");

        let result = sqlx::query(
            r#"
            INSERT INTO rate_sheets (
                rate_18k, rate_20k, rate_22k, rate_24k, silver,
                as_of, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(sheet.rate_18k.to_string())
        .bind(sheet.rate_20k.to_string())
        .bind(sheet.rate_22k.to_string())
        .bind(sheet.rate_24k.to_string())
        .bind(sheet.silver.to_string())
        .bind(sheet.as_of)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// The most recently inserted sheet.
    pub async fn latest(&self) -> DbResult<Option<MetalRateSheet>> {
        let row: Option<RateSheetRow> = sqlx::query_as(
            r#"
            SELECT rate_18k, rate_20k, rate_22k, rate_24k, silver, as_of
            FROM rate_sheets
            ORDER BY id DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        row.map(RateSheetRow::into_sheet).transpose()
    }

    /// Number of sheets ever saved.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM rate_sheets")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

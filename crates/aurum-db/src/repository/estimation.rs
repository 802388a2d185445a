//! # Estimation Repository
//!
//! Finalized estimations and their sequential numbering.
//!
//! ## Numbering
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  next_number()        SELECT last_number + 1 FROM estimation_counter    │
//! │       │               (a peek; nothing is reserved)                     │
//! │       ▼                                                                 │
//! │  insert(record)       BEGIN                                             │
//! │                         INSERT INTO estimations (… number …)            │
//! │                         UPDATE estimation_counter                       │
//! │                            SET last_number = MAX(last_number, number)   │
//! │                       COMMIT                                            │
//! │                                                                         │
//! │  Two counters peeking the same number: the second INSERT hits the       │
//! │  UNIQUE index, rolls back, and the caller finalizes again.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Storage
//! The whole record is kept as a JSON payload. Customer, net payable and item
//! count are copied into columns so lists can be shown without decoding.

use sqlx::SqlitePool;
use tracing::{debug, info};

use aurum_core::EstimationRecord;

use crate::error::{DbError, DbResult};

/// Repository for estimation history operations.
#[derive(Debug, Clone)]
pub struct EstimationRepository {
    pool: SqlitePool,
}

impl EstimationRepository {
    /// Creates a new EstimationRepository.
    pub fn new(pool: SqlitePool) -> Self {
        EstimationRepository { pool }
    }

    /// The number the next inserted estimation should carry.
    pub async fn next_number(&self) -> DbResult<i64> {
        let next: Option<i64> =
            sqlx::query_scalar("SELECT last_number + 1 FROM estimation_counter WHERE id = 1")
                .fetch_optional(&self.pool)
                .await?;

        next.ok_or_else(|| DbError::not_found("estimation_counter", "1"))
    }

    /// Inserts a finalized estimation and advances the counter atomically.
    ///
    /// ## Errors
    /// - `UniqueViolation` if the estimation number (or id) is already taken
    pub async fn insert(&self, record: &EstimationRecord) -> DbResult<()> {
        let number = record.estimation_number;
        debug!(id = %record.id, estimation_number = number, "Inserting estimation");

        let payload = serde_json::to_string(record)?;
        let (customer_name, customer_mobile) = match &record.customer {
            Some(c) => (Some(c.name.clone()), Some(c.mobile.clone())),
            None => (None, None),
        };

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO estimations (
                id, estimation_number, customer_name, customer_mobile,
                net_payable, item_count, payload, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&record.id)
        .bind(number)
        .bind(customer_name)
        .bind(customer_mobile)
        .bind(record.totals.net_payable.amount().to_string())
        .bind(record.items.len() as i64)
        .bind(payload)
        .bind(record.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } if field.contains("estimation_number") => {
                DbError::duplicate("estimation_number", number.to_string())
            }
            other => other,
        })?;

        sqlx::query(
            "UPDATE estimation_counter SET last_number = MAX(last_number, ?1) WHERE id = 1",
        )
        .bind(number)
        .execute(&mut *tx)
        .await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(estimation_number = number, "Estimation saved");
        Ok(())
    }

    /// Newest estimations first.
    pub async fn recent(&self, limit: u32) -> DbResult<Vec<EstimationRecord>> {
        let payloads: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT payload
            FROM estimations
            ORDER BY estimation_number DESC
            LIMIT ?1
            "#,
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        decode_all(payloads)
    }

    /// Looks an estimation up by its printed number.
    pub async fn get_by_number(&self, number: i64) -> DbResult<Option<EstimationRecord>> {
        let payload: Option<String> =
            sqlx::query_scalar("SELECT payload FROM estimations WHERE estimation_number = ?1")
                .bind(number)
                .fetch_optional(&self.pool)
                .await?;

        payload
            .map(|p| serde_json::from_str(&p).map_err(DbError::from))
            .transpose()
    }

    /// A customer's estimations, newest first.
    pub async fn find_by_mobile(&self, mobile: &str, limit: u32) -> DbResult<Vec<EstimationRecord>> {
        let payloads: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT payload
            FROM estimations
            WHERE customer_mobile = ?1
            ORDER BY estimation_number DESC
            LIMIT ?2
            "#,
        )
        .bind(mobile)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        decode_all(payloads)
    }

    /// Number of saved estimations.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM estimations")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

fn decode_all(payloads: Vec<String>) -> DbResult<Vec<EstimationRecord>> {
    payloads
        .iter()
        .map(|p| serde_json::from_str(p).map_err(DbError::from))
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

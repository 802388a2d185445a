//! # Persistence Gateway
//!
//! The only door between the estimation store and durable storage.
//!
//! ```text
//! EstimationStore ──► EstimationGateway (this trait)
//!                          │
//!                          ├── SqliteGateway   (aurum-db)
//!                          └── in-memory fakes (tests)
//! ```
//!
//! Implementations must be `Send + Sync`; the store itself is single-writer
//! and awaits one gateway call at a time.

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::GatewayResult;
use crate::types::{EstimationRecord, MetalRateSheet};

/// Trait defining the contract for estimation persistence.
#[async_trait]
pub trait EstimationGateway: Send + Sync {
    /// Most recently saved rate sheet, if any was ever saved.
    async fn load_last_rate_sheet(&self) -> GatewayResult<Option<MetalRateSheet>>;

    async fn save_rate_sheet(&self, sheet: &MetalRateSheet) -> GatewayResult<()>;

    /// The number the next finalized estimation will carry.
    ///
    /// Does not reserve the number; `save_estimation_record` commits it.
    async fn next_estimation_number(&self) -> GatewayResult<i64>;

    async fn save_estimation_record(&self, record: &EstimationRecord) -> GatewayResult<()>;

    /// Newest first, at most `limit` records.
    async fn load_recent_estimations(&self, limit: u32) -> GatewayResult<Vec<EstimationRecord>>;
}

#[async_trait]
impl<G: EstimationGateway + ?Sized> EstimationGateway for Arc<G> {
    async fn load_last_rate_sheet(&self) -> GatewayResult<Option<MetalRateSheet>> {
        (**self).load_last_rate_sheet().await
    }

    async fn save_rate_sheet(&self, sheet: &MetalRateSheet) -> GatewayResult<()> {
        (**self).save_rate_sheet(sheet).await
    }

    async fn next_estimation_number(&self) -> GatewayResult<i64> {
        (**self).next_estimation_number().await
    }

    async fn save_estimation_record(&self, record: &EstimationRecord) -> GatewayResult<()> {
        (**self).save_estimation_record(record).await
    }

    async fn load_recent_estimations(&self, limit: u32) -> GatewayResult<Vec<EstimationRecord>> {
        (**self).load_recent_estimations(limit).await
    }
}

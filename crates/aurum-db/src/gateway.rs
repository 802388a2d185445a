//! # SQLite Estimation Gateway
//!
//! [`EstimationGateway`] backed by [`Database`].
//!
//! ```text
//! EstimationStore ──► SqliteGateway ──► RateSheetRepository ──► rate_sheets
//!                                  └──► EstimationRepository ──► estimations
//!                                                                estimation_counter
//! ```
//!
//! Repository errors are converted with `From<DbError> for GatewayError`, so
//! the store only ever sees storage-neutral failures.

use async_trait::async_trait;
use tracing::debug;

use aurum_core::{EstimationGateway, EstimationRecord, MetalRateSheet};
use aurum_core::error::GatewayResult;

use crate::pool::Database;

/// Persists estimations and rate sheets in the local SQLite database.
#[derive(Debug, Clone)]
pub struct SqliteGateway {
    db: Database,
}

impl SqliteGateway {
    pub fn new(db: Database) -> Self {
        SqliteGateway { db }
    }

    /// The underlying database handle.
    pub fn database(&self) -> &Database {
        &self.db
    }
}

#[async_trait]
impl EstimationGateway for SqliteGateway {
    async fn load_last_rate_sheet(&self) -> GatewayResult<Option<MetalRateSheet>> {
        Ok(self.db.rate_sheets().latest().await?)
    }

    async fn save_rate_sheet(&self, sheet: &MetalRateSheet) -> GatewayResult<()> {
        let id = self.db.rate_sheets().insert(sheet).await?;
        debug!(id, "Rate sheet persisted");
        Ok(())
    }

    async fn next_estimation_number(&self) -> GatewayResult<i64> {
        Ok(self.db.estimations().next_number().await?)
    }

    async fn save_estimation_record(&self, record: &EstimationRecord) -> GatewayResult<()> {
        Ok(self.db.estimations().insert(record).await?)
    }

    async fn load_recent_estimations(&self, limit: u32) -> GatewayResult<Vec<EstimationRecord>> {
        Ok(self.db.estimations().recent(limit).await?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DbConfig;
    use aurum_core::entry::{LineItemDraft, PurchaseDraft};
    use aurum_core::error::GatewayError;
    use aurum_core::{
        AdvanceDeduction, Customer, EstimationStore, FinalizeOutcome, MakingChargeType, Metal,
        Money, PricingConfig, PurchaseDeduction, StoreError, WastageType,
    };
    use rust_decimal_macros::dec;

    async fn gateway() -> SqliteGateway {
        SqliteGateway::new(Database::new(DbConfig::in_memory()).await.unwrap())
    }

    /// Fixed `as_of` so two calls compare equal.
    fn sheet() -> MetalRateSheet {
        MetalRateSheet {
            as_of: chrono::DateTime::<chrono::Utc>::from_timestamp(1_700_000_000, 0).unwrap(),
            ..MetalRateSheet::new(dec!(4900), dec!(5450), dec!(6000), dec!(6540), dec!(80))
        }
    }

    #[tokio::test]
    async fn test_gateway_contract_on_empty_database() {
        let gateway = gateway().await;

        assert!(gateway.load_last_rate_sheet().await.unwrap().is_none());
        assert_eq!(gateway.next_estimation_number().await.unwrap(), 1);
        assert!(gateway.load_recent_estimations(20).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_closed_database_is_unavailable() {
        let gateway = gateway().await;
        gateway.database().close().await;

        let err = gateway.next_estimation_number().await.unwrap_err();
        assert!(matches!(err, GatewayError::Unavailable(_)));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_store_round_trip_through_sqlite() {
        let gateway = gateway().await;
        let mut store = EstimationStore::new(gateway.clone(), PricingConfig::default());
        store.update_rate_sheet(sheet()).await.unwrap();

        let ring = store.price(
            LineItemDraft::new("r1", Metal::Gold, 22, dec!(5.5))
                .with_making_charge(dec!(500), MakingChargeType::Fixed)
                .with_wastage(dec!(10), WastageType::Percentage),
        );
        store.add_item(ring);
        let trade_in = store.price_purchase(
            PurchaseDraft::new("p1", "old ring", Metal::Gold, 22, dec!(2))
                .with_deduction(PurchaseDeduction::Grams(dec!(0.5))),
        );
        store.add_purchase_item(trade_in);
        store.add_advance_item(AdvanceDeduction::new("a1", "ADV-3", Money::new(dec!(904))));
        store.set_customer(Customer::new("Lakshmi", "9876543210"));

        // 37904 - 9000 - 904
        assert_eq!(store.totals().net_payable.amount(), dec!(28000));

        let outcome = store.finalize().await.unwrap();
        assert_eq!(outcome, FinalizeOutcome::Saved { estimation_number: 1 });
        assert!(store.is_empty());

        // A fresh counter session sees the same sheet and history
        let mut reopened = EstimationStore::new(gateway.clone(), PricingConfig::default());
        reopened.load().await.unwrap();

        assert_eq!(reopened.rate_sheet().rate_22k, dec!(6000));
        assert_eq!(reopened.history().len(), 1);
        let saved = &reopened.history()[0];
        assert_eq!(saved.estimation_number, 1);
        assert_eq!(saved.totals.net_payable.amount(), dec!(28000));
        assert_eq!(saved.purchase_items[0].net_weight, dec!(1.5));
        assert_eq!(saved.customer.as_ref().map(|c| c.name.as_str()), Some("Lakshmi"));

        reopened.add_item(reopened.price(LineItemDraft::new("r2", Metal::Silver, 925, dec!(10))));
        let outcome = reopened.finalize().await.unwrap();
        assert_eq!(outcome, FinalizeOutcome::Saved { estimation_number: 2 });

        let numbers: Vec<i64> = reopened.history().iter().map(|r| r.estimation_number).collect();
        assert_eq!(numbers, vec![2, 1]);
    }

    #[tokio::test]
    async fn test_stale_number_is_rejected() {
        let gateway = gateway().await;
        let mut first = EstimationStore::new(gateway.clone(), PricingConfig::default());
        first.add_item(first.price(LineItemDraft::new("x", Metal::Gold, 22, dec!(1))));

        // A second counter commits number 1 between our peek and our save
        let taken = aurum_core::EstimationSession::new(sheet()).to_record(1, chrono::Utc::now());
        gateway.save_estimation_record(&taken).await.unwrap();

        let stale = aurum_core::EstimationSession::new(sheet()).to_record(1, chrono::Utc::now());
        let err = gateway.save_estimation_record(&stale).await.unwrap_err();
        assert!(matches!(err, GatewayError::Storage(_)));

        // The store always asks for a fresh number, so it lands on 2
        let outcome = first.finalize().await.unwrap();
        assert_eq!(outcome, FinalizeOutcome::Saved { estimation_number: 2 });
    }

    #[tokio::test]
    async fn test_history_limit_applies() {
        let gateway = gateway().await;
        let mut store = EstimationStore::new(
            gateway,
            PricingConfig::default().with_history_limit(2),
        );

        for n in 0..3 {
            store.add_item(store.price(LineItemDraft::new(format!("x{n}"), Metal::Gold, 22, dec!(1))));
            store.finalize().await.unwrap();
        }

        assert_eq!(store.history().len(), 2);
        assert_eq!(store.history()[0].estimation_number, 3);
    }

    #[tokio::test]
    async fn test_rate_failure_surface() {
        let gateway = gateway().await;
        gateway.database().close().await;
        let mut store = EstimationStore::new(gateway, PricingConfig::default());

        let err = store.update_rate_sheet(sheet()).await.unwrap_err();

        assert!(matches!(err, StoreError::Gateway(GatewayError::Unavailable(_))));
        assert_eq!(*store.rate_sheet(), sheet());
    }

    #[tokio::test]
    async fn test_locked_database_is_retryable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("aurum.db");
        let holder = Database::new(DbConfig::new(&path)).await.unwrap();
        let gateway = SqliteGateway::new(
            Database::new(DbConfig::new(&path).busy_timeout(std::time::Duration::from_millis(100)))
                .await
                .unwrap(),
        );

        let mut conn = holder.pool().acquire().await.unwrap();
        sqlx::query("BEGIN EXCLUSIVE").execute(&mut *conn).await.unwrap();

        let err = gateway.save_rate_sheet(&sheet()).await.unwrap_err();
        assert!(matches!(err, GatewayError::Unavailable(_)), "got {err:?}");
        assert!(err.is_retryable());

        sqlx::query("ROLLBACK").execute(&mut *conn).await.unwrap();
        drop(conn);

        gateway.save_rate_sheet(&sheet()).await.unwrap();
        assert_eq!(gateway.load_last_rate_sheet().await.unwrap(), Some(sheet()));
    }
}

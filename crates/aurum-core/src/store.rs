//! # Estimation Store
//!
//! Holds the estimation being assembled at the counter and keeps its totals
//! consistent with its contents.
//!
//! ## Store Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Estimation Store Operations                          │
//! │                                                                         │
//! │  Clerk Action            Store Method             Session Change        │
//! │  ────────────            ────────────             ──────────────        │
//! │                                                                         │
//! │  Scan tag ──────────────► add_item() ───────────► items.push, totals    │
//! │  Manual entry ──────────► add_manual_item() ────► items.push, totals    │
//! │  Old gold in ───────────► add_purchase_item() ──► purchase.push, totals │
//! │  Chit / advance ────────► add_chit_item() ──────► chit.push, totals     │
//! │  Remove row ────────────► remove_item(id, list) ► retain, totals        │
//! │  New rates ─────────────► update_rate_sheet() ──► sheet, then persist   │
//! │  Save ──────────────────► finalize() ───────────► persist, reset        │
//! │  Clear ─────────────────► reset_form() ─────────► reset (no persist)    │
//! │                                                                         │
//! │  Every synchronous change is an EstimationAction applied by            │
//! │  EstimationSession::apply, which recomputes totals from scratch.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ownership
//! The store is a plain value owned by its caller. Mutators take `&mut self`
//! and there is no internal locking; an owner that shares a store across
//! tasks wraps it in its own `Mutex`.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::entry::{LineItemDraft, PurchaseDraft};
use crate::error::{StoreError, StoreResult};
use crate::gateway::EstimationGateway;
use crate::pricing::PricingConfig;
use crate::totals::{compute_totals, EstimationTotals};
use crate::types::{
    AdvanceDeduction, ChitDeduction, Customer, EstimationRecord, LineItem, ListKind,
    MetalRateSheet, PurchaseItem,
};

// =============================================================================
// Actions
// =============================================================================

/// A synchronous change to an estimation session.
#[derive(Debug, Clone, PartialEq)]
pub enum EstimationAction {
    AddItem(LineItem),
    AddItems(Vec<LineItem>),
    AddPurchaseItem(PurchaseItem),
    AddChitItem(ChitDeduction),
    AddAdvanceItem(AdvanceDeduction),
    RemoveItem { id: String, list: ListKind },
    SetCustomer(Option<Customer>),
    SetRateSheet(MetalRateSheet),
    SetHistory(Vec<EstimationRecord>),
    ResetForm,
}

impl EstimationAction {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            EstimationAction::AddItem(_) => "add_item",
            EstimationAction::AddItems(_) => "add_items",
            EstimationAction::AddPurchaseItem(_) => "add_purchase_item",
            EstimationAction::AddChitItem(_) => "add_chit_item",
            EstimationAction::AddAdvanceItem(_) => "add_advance_item",
            EstimationAction::RemoveItem { .. } => "remove_item",
            EstimationAction::SetCustomer(_) => "set_customer",
            EstimationAction::SetRateSheet(_) => "set_rate_sheet",
            EstimationAction::SetHistory(_) => "set_history",
            EstimationAction::ResetForm => "reset_form",
        }
    }
}

/// What `finalize` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinalizeOutcome {
    /// The estimation was persisted under this number.
    Saved { estimation_number: i64 },
    /// There were no items; the form was reset and nothing was written.
    NothingToSave,
}

// =============================================================================
// Session
// =============================================================================

/// The in-memory state of one counter's estimation.
///
/// ## Invariants
/// - `totals == compute_totals(items, purchase_items, chit_items, advance_items)`
///   after every [`EstimationSession::apply`]
/// - Exactly one active rate sheet; it survives resets
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EstimationSession {
    items: Vec<LineItem>,
    purchase_items: Vec<PurchaseItem>,
    chit_items: Vec<ChitDeduction>,
    advance_items: Vec<AdvanceDeduction>,
    active_rate_sheet: MetalRateSheet,
    customer: Option<Customer>,
    totals: EstimationTotals,
    history: Vec<EstimationRecord>,
}

impl EstimationSession {
    /// An empty session pricing against `sheet`.
    pub fn new(sheet: MetalRateSheet) -> Self {
        EstimationSession {
            active_rate_sheet: sheet,
            ..Default::default()
        }
    }

    /// Applies one action and recomputes totals.
    pub fn apply(&mut self, action: EstimationAction) {
        match action {
            EstimationAction::AddItem(item) => self.items.push(item),
            EstimationAction::AddItems(items) => self.items.extend(items),
            EstimationAction::AddPurchaseItem(item) => self.purchase_items.push(item),
            EstimationAction::AddChitItem(item) => self.chit_items.push(item),
            EstimationAction::AddAdvanceItem(item) => self.advance_items.push(item),
            EstimationAction::RemoveItem { id, list } => match list {
                ListKind::Estimation => self.items.retain(|i| i.id != id),
                ListKind::Purchase => self.purchase_items.retain(|i| i.id != id),
                ListKind::Chit => self.chit_items.retain(|i| i.id != id),
                ListKind::Advance => self.advance_items.retain(|i| i.id != id),
            },
            EstimationAction::SetCustomer(customer) => self.customer = customer,
            EstimationAction::SetRateSheet(sheet) => self.active_rate_sheet = sheet,
            EstimationAction::SetHistory(history) => self.history = history,
            EstimationAction::ResetForm => {
                self.items.clear();
                self.purchase_items.clear();
                self.chit_items.clear();
                self.advance_items.clear();
                self.customer = None;
            }
        }

        self.totals = compute_totals(
            &self.items,
            &self.purchase_items,
            &self.chit_items,
            &self.advance_items,
        );
    }

    /// Snapshot of the session as a history record.
    pub fn to_record(&self, estimation_number: i64, created_at: DateTime<Utc>) -> EstimationRecord {
        EstimationRecord {
            id: Uuid::new_v4().to_string(),
            estimation_number,
            created_at,
            customer: self.customer.clone(),
            rate_sheet: self.active_rate_sheet.clone(),
            items: self.items.clone(),
            purchase_items: self.purchase_items.clone(),
            chit_items: self.chit_items.clone(),
            advance_items: self.advance_items.clone(),
            totals: self.totals,
        }
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn purchase_items(&self) -> &[PurchaseItem] {
        &self.purchase_items
    }

    pub fn chit_items(&self) -> &[ChitDeduction] {
        &self.chit_items
    }

    pub fn advance_items(&self) -> &[AdvanceDeduction] {
        &self.advance_items
    }

    pub fn rate_sheet(&self) -> &MetalRateSheet {
        &self.active_rate_sheet
    }

    pub fn customer(&self) -> Option<&Customer> {
        self.customer.as_ref()
    }

    pub fn totals(&self) -> &EstimationTotals {
        &self.totals
    }

    /// Recently finalized estimations, newest first.
    pub fn history(&self) -> &[EstimationRecord] {
        &self.history
    }

    /// True if no list holds anything.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
            && self.purchase_items.is_empty()
            && self.chit_items.is_empty()
            && self.advance_items.is_empty()
    }
}

// =============================================================================
// Store
// =============================================================================

/// An estimation session bound to a persistence gateway.
pub struct EstimationStore<G: EstimationGateway> {
    session: EstimationSession,
    gateway: G,
    config: PricingConfig,
}

impl<G: EstimationGateway> EstimationStore<G> {
    /// Creates a store with an empty session and the zero rate sheet.
    ///
    /// Call [`EstimationStore::load`] to restore the last rate sheet and history.
    pub fn new(gateway: G, config: PricingConfig) -> Self {
        EstimationStore {
            session: EstimationSession::default(),
            gateway,
            config,
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn session(&self) -> &EstimationSession {
        &self.session
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    pub fn items(&self) -> &[LineItem] {
        self.session.items()
    }

    pub fn totals(&self) -> &EstimationTotals {
        self.session.totals()
    }

    pub fn rate_sheet(&self) -> &MetalRateSheet {
        self.session.rate_sheet()
    }

    pub fn customer(&self) -> Option<&Customer> {
        self.session.customer()
    }

    pub fn history(&self) -> &[EstimationRecord] {
        self.session.history()
    }

    pub fn is_empty(&self) -> bool {
        self.session.is_empty()
    }

    // -------------------------------------------------------------------------
    // Pricing against the active sheet
    // -------------------------------------------------------------------------

    /// Prices a draft at the active sheet and configured tax.
    pub fn price(&self, draft: LineItemDraft) -> LineItem {
        draft.price(self.session.rate_sheet(), self.config.tax_percent)
    }

    /// Values a trade-in at the active sheet.
    pub fn price_purchase(&self, draft: PurchaseDraft) -> PurchaseItem {
        draft.price(self.session.rate_sheet())
    }

    // -------------------------------------------------------------------------
    // Synchronous mutations
    // -------------------------------------------------------------------------

    /// Applies an action to the session.
    pub fn dispatch(&mut self, action: EstimationAction) {
        debug!(action = action.name(), "Applying estimation action");
        self.session.apply(action);
    }

    pub fn add_item(&mut self, item: LineItem) {
        self.dispatch(EstimationAction::AddItem(item));
    }

    /// Adds an item typed in by hand; it is flagged as a manual entry.
    pub fn add_manual_item(&mut self, mut item: LineItem) {
        item.is_manual_entry = true;
        self.dispatch(EstimationAction::AddItem(item));
    }

    pub fn add_items(&mut self, items: Vec<LineItem>) {
        self.dispatch(EstimationAction::AddItems(items));
    }

    pub fn add_purchase_item(&mut self, item: PurchaseItem) {
        self.dispatch(EstimationAction::AddPurchaseItem(item));
    }

    pub fn add_chit_item(&mut self, item: ChitDeduction) {
        self.dispatch(EstimationAction::AddChitItem(item));
    }

    pub fn add_advance_item(&mut self, item: AdvanceDeduction) {
        self.dispatch(EstimationAction::AddAdvanceItem(item));
    }

    /// Removes the entry with `id` from `list`. Unknown ids are ignored.
    pub fn remove_item(&mut self, id: &str, list: ListKind) {
        self.dispatch(EstimationAction::RemoveItem {
            id: id.to_string(),
            list,
        });
    }

    pub fn set_customer(&mut self, customer: Customer) {
        self.dispatch(EstimationAction::SetCustomer(Some(customer)));
    }

    pub fn clear_customer(&mut self) {
        self.dispatch(EstimationAction::SetCustomer(None));
    }

    /// Clears the form without saving. Rate sheet and history are kept.
    pub fn reset_form(&mut self) {
        self.dispatch(EstimationAction::ResetForm);
    }

    // -------------------------------------------------------------------------
    // Persisting operations
    // -------------------------------------------------------------------------

    /// Restores the last saved rate sheet and the history cache.
    pub async fn load(&mut self) -> StoreResult<()> {
        if let Some(sheet) = self.gateway.load_last_rate_sheet().await? {
            info!(as_of = %sheet.as_of, "Restored last rate sheet");
            self.dispatch(EstimationAction::SetRateSheet(sheet));
        }

        let history = self
            .gateway
            .load_recent_estimations(self.config.history_limit)
            .await?;
        debug!(count = history.len(), "Loaded estimation history");
        self.dispatch(EstimationAction::SetHistory(history));

        Ok(())
    }

    /// Replaces the active rate sheet, then persists it.
    ///
    /// The in-memory sheet is replaced even if persisting fails; items
    /// already in the estimation keep the rate they were priced at.
    pub async fn update_rate_sheet(&mut self, sheet: MetalRateSheet) -> StoreResult<()> {
        self.dispatch(EstimationAction::SetRateSheet(sheet.clone()));

        self.gateway.save_rate_sheet(&sheet).await.map_err(|e| {
            warn!(error = %e, "Rate sheet applied but not persisted");
            StoreError::from(e)
        })?;

        info!(
            rate_22k = %sheet.rate_22k,
            rate_24k = %sheet.rate_24k,
            silver = %sheet.silver,
            "Rate sheet updated"
        );
        Ok(())
    }

    /// Saves the estimation and starts a fresh one.
    ///
    /// ## Steps
    /// ```text
    /// no items? ──► reset, NothingToSave (no gateway call)
    ///     │
    ///     ▼
    /// next_estimation_number ──► save_estimation_record ──► load_recent_estimations
    ///     │ ✗                        │ ✗                         │ ✗
    ///     ▼                          ▼                           ▼
    /// Err, session unchanged    Err, session unchanged      reset, Err(HistoryRefresh)
    /// ```
    ///
    /// A failed history reload is not a persistence failure: the record is
    /// already durable under its number, so keeping the session would let a
    /// retry save the same estimation twice.
    pub async fn finalize(&mut self) -> StoreResult<FinalizeOutcome> {
        if self.session.items().is_empty() {
            debug!("Nothing to save; resetting form");
            self.reset_form();
            return Ok(FinalizeOutcome::NothingToSave);
        }

        let estimation_number = self.gateway.next_estimation_number().await?;
        let record = self.session.to_record(estimation_number, Utc::now());
        self.gateway.save_estimation_record(&record).await?;

        info!(
            estimation_number,
            items = record.items.len(),
            net_payable = %record.totals.net_payable,
            "Estimation finalized"
        );

        let refreshed = self
            .gateway
            .load_recent_estimations(self.config.history_limit)
            .await;
        self.reset_form();

        match refreshed {
            Ok(history) => {
                self.dispatch(EstimationAction::SetHistory(history));
                Ok(FinalizeOutcome::Saved { estimation_number })
            }
            Err(source) => {
                warn!(estimation_number, error = %source, "History refresh failed after save");
                Err(StoreError::HistoryRefresh {
                    estimation_number,
                    source,
                })
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{GatewayError, GatewayResult};
    use crate::money::Money;
    use crate::types::{MakingChargeType, Metal, PurchaseDeduction, WastageType};
    use async_trait::async_trait;
    use proptest::prelude::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::sync::{Arc, Mutex};

    // -------------------------------------------------------------------------
    // Recording gateway
    // -------------------------------------------------------------------------

    #[derive(Default)]
    struct FakeState {
        calls: Vec<&'static str>,
        sheet: Option<MetalRateSheet>,
        records: Vec<EstimationRecord>,
        fail_rate_save: bool,
        fail_number: bool,
        fail_save: bool,
        fail_history: bool,
    }

    #[derive(Default)]
    struct FakeGateway {
        state: Mutex<FakeState>,
    }

    impl FakeGateway {
        fn calls(&self) -> Vec<&'static str> {
            self.state.lock().unwrap().calls.clone()
        }

        fn clear_calls(&self) {
            self.state.lock().unwrap().calls.clear();
        }

        fn records(&self) -> Vec<EstimationRecord> {
            self.state.lock().unwrap().records.clone()
        }

        fn with<F: FnOnce(&mut FakeState)>(&self, f: F) {
            f(&mut self.state.lock().unwrap());
        }
    }

    #[async_trait]
    impl EstimationGateway for FakeGateway {
        async fn load_last_rate_sheet(&self) -> GatewayResult<Option<MetalRateSheet>> {
            let mut state = self.state.lock().unwrap();
            state.calls.push("load_last_rate_sheet");
            Ok(state.sheet.clone())
        }

        async fn save_rate_sheet(&self, sheet: &MetalRateSheet) -> GatewayResult<()> {
            let mut state = self.state.lock().unwrap();
            state.calls.push("save_rate_sheet");
            if state.fail_rate_save {
                return Err(GatewayError::Unavailable("database is locked".into()));
            }
            state.sheet = Some(sheet.clone());
            Ok(())
        }

        async fn next_estimation_number(&self) -> GatewayResult<i64> {
            let mut state = self.state.lock().unwrap();
            state.calls.push("next_estimation_number");
            if state.fail_number {
                return Err(GatewayError::Storage("counter missing".into()));
            }
            Ok(state.records.len() as i64 + 1)
        }

        async fn save_estimation_record(&self, record: &EstimationRecord) -> GatewayResult<()> {
            let mut state = self.state.lock().unwrap();
            state.calls.push("save_estimation_record");
            if state.fail_save {
                return Err(GatewayError::Storage("disk full".into()));
            }
            state.records.push(record.clone());
            Ok(())
        }

        async fn load_recent_estimations(&self, limit: u32) -> GatewayResult<Vec<EstimationRecord>> {
            let mut state = self.state.lock().unwrap();
            state.calls.push("load_recent_estimations");
            if state.fail_history {
                return Err(GatewayError::Corrupt("bad payload".into()));
            }
            Ok(state
                .records
                .iter()
                .rev()
                .take(limit as usize)
                .cloned()
                .collect())
        }
    }

    // -------------------------------------------------------------------------
    // Fixtures
    // -------------------------------------------------------------------------

    /// Fixed `as_of` so two calls compare equal.
    fn sheet() -> MetalRateSheet {
        MetalRateSheet {
            as_of: DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap(),
            ..MetalRateSheet::new(dec!(4900), dec!(5450), dec!(6000), dec!(6540), dec!(80))
        }
    }

    fn store() -> (EstimationStore<Arc<FakeGateway>>, Arc<FakeGateway>) {
        let gateway = Arc::new(FakeGateway::default());
        let mut store = EstimationStore::new(gateway.clone(), PricingConfig::default());
        store.dispatch(EstimationAction::SetRateSheet(sheet()));
        (store, gateway)
    }

    fn ring(store: &EstimationStore<Arc<FakeGateway>>, id: &str) -> LineItem {
        store.price(
            LineItemDraft::new(id, Metal::Gold, 22, dec!(5.5))
                .with_making_charge(dec!(500), MakingChargeType::Fixed)
                .with_wastage(dec!(10), WastageType::Percentage),
        )
    }

    fn flat_item(id: &str, total: Decimal) -> LineItem {
        LineItemDraft::new(id, Metal::Gold, 22, dec!(1))
            .with_rate(total)
            .price(&MetalRateSheet::zero(), Decimal::ZERO)
    }

    fn assert_consistent(session: &EstimationSession) {
        let expected = compute_totals(
            session.items(),
            session.purchase_items(),
            session.chit_items(),
            session.advance_items(),
        );
        assert_eq!(*session.totals(), expected);
    }

    // -------------------------------------------------------------------------
    // Synchronous mutations
    // -------------------------------------------------------------------------

    #[test]
    fn test_add_item_recomputes_totals() {
        let (mut store, _) = store();
        let item = ring(&store, "r1");
        store.add_item(item);

        assert_eq!(store.items().len(), 1);
        assert_eq!(store.totals().net_payable.amount(), dec!(37904));
        assert_eq!(store.totals().total_weight, dec!(5.5));
    }

    #[test]
    fn test_chit_reduces_net_payable() {
        let (mut store, _) = store();
        let item = ring(&store, "r1");
        store.add_item(item);
        store.add_chit_item(ChitDeduction::new("c1", "CH-7", Money::new(dec!(5000))));

        assert_eq!(store.totals().net_payable.amount(), dec!(32904));
    }

    #[test]
    fn test_add_manual_item_flags_entry() {
        let (mut store, _) = store();
        store.add_manual_item(flat_item("m1", dec!(100)));
        assert!(store.items()[0].is_manual_entry);
    }

    #[test]
    fn test_add_items_appends_in_order() {
        let (mut store, _) = store();
        store.add_items(vec![flat_item("a", dec!(1)), flat_item("b", dec!(2))]);
        let ids: Vec<&str> = store.items().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(store.totals().total_item_value.amount(), dec!(3));
    }

    #[test]
    fn test_remove_item_per_list() {
        let (mut store, _) = store();
        store.add_item(flat_item("x", dec!(1000)));
        store.add_advance_item(AdvanceDeduction::new("x", "ADV-1", Money::new(dec!(300))));

        store.remove_item("x", ListKind::Advance);
        assert_eq!(store.items().len(), 1);
        assert!(store.session().advance_items().is_empty());
        assert_eq!(store.totals().net_payable.amount(), dec!(1000));

        store.remove_item("x", ListKind::Estimation);
        assert!(store.is_empty());
        assert_eq!(*store.totals(), EstimationTotals::default());
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let (mut store, _) = store();
        store.add_item(flat_item("x", dec!(1000)));
        let before = store.session().clone();

        store.remove_item("nope", ListKind::Estimation);
        store.remove_item("x", ListKind::Purchase);

        assert_eq!(*store.session(), before);
    }

    #[test]
    fn test_set_customer_leaves_totals() {
        let (mut store, _) = store();
        store.add_item(flat_item("x", dec!(1000)));
        let totals = *store.totals();

        store.set_customer(Customer::new("Lakshmi", "9876543210"));
        assert_eq!(store.customer().map(|c| c.name.as_str()), Some("Lakshmi"));
        assert_eq!(*store.totals(), totals);

        store.clear_customer();
        assert!(store.customer().is_none());
    }

    #[test]
    fn test_reset_form_keeps_sheet_and_history() {
        let (mut store, _) = store();
        let record = store.session().to_record(7, Utc::now());
        store.dispatch(EstimationAction::SetHistory(vec![record]));
        store.add_item(flat_item("x", dec!(1000)));
        store.set_customer(Customer::new("Ravi", "9000000000"));

        store.reset_form();

        assert!(store.is_empty());
        assert!(store.customer().is_none());
        assert_eq!(*store.rate_sheet(), sheet());
        assert_eq!(store.history().len(), 1);
    }

    #[test]
    fn test_purchase_credit_through_store() {
        let (mut store, _) = store();
        store.add_item(flat_item("x", dec!(100000)));
        let trade_in = store.price_purchase(
            PurchaseDraft::new("p1", "old chain", Metal::Gold, 22, dec!(10))
                .with_deduction(PurchaseDeduction::Percentage(dec!(5))),
        );
        store.add_purchase_item(trade_in);

        assert_eq!(store.totals().total_purchase.amount(), dec!(57000));
        assert_eq!(store.totals().net_payable.amount(), dec!(43000));
    }

    // -------------------------------------------------------------------------
    // Rate sheet
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_update_rate_sheet_persists() {
        let (mut store, gateway) = store();
        let new_sheet = MetalRateSheet::new(dec!(5000), dec!(5500), dec!(6100), dec!(6650), dec!(82));

        store.update_rate_sheet(new_sheet.clone()).await.unwrap();

        assert_eq!(*store.rate_sheet(), new_sheet);
        assert_eq!(gateway.calls(), vec!["save_rate_sheet"]);
    }

    #[tokio::test]
    async fn test_update_rate_sheet_failure_keeps_new_sheet_in_memory() {
        let (mut store, gateway) = store();
        gateway.with(|s| s.fail_rate_save = true);
        let new_sheet = MetalRateSheet::new(dec!(5000), dec!(5500), dec!(6100), dec!(6650), dec!(82));

        let err = store.update_rate_sheet(new_sheet.clone()).await.unwrap_err();

        assert!(matches!(err, StoreError::Gateway(GatewayError::Unavailable(_))));
        assert_eq!(*store.rate_sheet(), new_sheet);
    }

    #[tokio::test]
    async fn test_existing_items_keep_frozen_rate() {
        let (mut store, _) = store();
        let item = ring(&store, "r1");
        store.add_item(item);

        let new_sheet = MetalRateSheet::new(dec!(5000), dec!(5500), dec!(7000), dec!(7500), dec!(90));
        store.update_rate_sheet(new_sheet).await.unwrap();

        assert_eq!(store.items()[0].rate, dec!(6000));
        assert_eq!(store.totals().total_item_value.amount(), dec!(37904));

        let repriced = ring(&store, "r2");
        assert_eq!(repriced.rate, dec!(7000));
    }

    // -------------------------------------------------------------------------
    // Finalize
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_finalize_saves_and_resets() {
        let (mut store, gateway) = store();
        let item = ring(&store, "r1");
        store.add_item(item);
        store.set_customer(Customer::new("Lakshmi", "9876543210"));

        let outcome = store.finalize().await.unwrap();

        assert_eq!(outcome, FinalizeOutcome::Saved { estimation_number: 1 });
        assert_eq!(
            gateway.calls(),
            vec!["next_estimation_number", "save_estimation_record", "load_recent_estimations"]
        );

        let records = gateway.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].estimation_number, 1);
        assert_eq!(records[0].items.len(), 1);
        assert_eq!(records[0].totals.net_payable.amount(), dec!(37904));
        assert_eq!(records[0].customer.as_ref().map(|c| c.mobile.as_str()), Some("9876543210"));
        assert_eq!(records[0].rate_sheet, sheet());

        assert!(store.is_empty());
        assert!(store.customer().is_none());
        assert_eq!(*store.rate_sheet(), sheet());
        assert_eq!(store.history().len(), 1);
    }

    #[tokio::test]
    async fn test_finalize_numbers_are_sequential_and_history_newest_first() {
        let (mut store, _) = store();

        for n in 1..=3 {
            store.add_item(flat_item("x", dec!(100)));
            let outcome = store.finalize().await.unwrap();
            assert_eq!(outcome, FinalizeOutcome::Saved { estimation_number: n });
        }

        let numbers: Vec<i64> = store.history().iter().map(|r| r.estimation_number).collect();
        assert_eq!(numbers, vec![3, 2, 1]);
    }

    #[tokio::test]
    async fn test_history_is_capped_at_limit() {
        let gateway = Arc::new(FakeGateway::default());
        let mut store = EstimationStore::new(
            gateway.clone(),
            PricingConfig::default().with_history_limit(2),
        );

        for _ in 0..3 {
            store.add_item(flat_item("x", dec!(100)));
            store.finalize().await.unwrap();
        }

        assert_eq!(store.history().len(), 2);
        assert_eq!(gateway.records().len(), 3);
    }

    #[tokio::test]
    async fn test_finalize_empty_session_makes_no_gateway_call() {
        let (mut store, gateway) = store();
        store.add_item(flat_item("x", dec!(100)));
        store.finalize().await.unwrap();
        let history_before = store.history().to_vec();
        gateway.clear_calls();

        store.add_chit_item(ChitDeduction::new("c1", "CH-1", Money::new(dec!(50))));
        let outcome = store.finalize().await.unwrap();

        assert_eq!(outcome, FinalizeOutcome::NothingToSave);
        assert!(gateway.calls().is_empty());
        assert_eq!(store.history(), history_before.as_slice());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_finalize_save_failure_leaves_session_unchanged() {
        let (mut store, gateway) = store();
        store.add_item(flat_item("x", dec!(100)));
        store.set_customer(Customer::new("Ravi", "9000000000"));
        let before = store.session().clone();
        gateway.with(|s| s.fail_save = true);

        let err = store.finalize().await.unwrap_err();

        assert!(matches!(err, StoreError::Gateway(GatewayError::Storage(_))));
        assert!(!err.is_saved());
        assert_eq!(*store.session(), before);
    }

    #[tokio::test]
    async fn test_finalize_number_failure_skips_save() {
        let (mut store, gateway) = store();
        store.add_item(flat_item("x", dec!(100)));
        gateway.with(|s| s.fail_number = true);

        assert!(store.finalize().await.is_err());
        assert_eq!(gateway.calls(), vec!["next_estimation_number"]);
        assert_eq!(store.items().len(), 1);
    }

    #[tokio::test]
    async fn test_finalize_history_failure_still_resets() {
        let (mut store, gateway) = store();
        store.add_item(flat_item("x", dec!(100)));
        gateway.with(|s| s.fail_history = true);

        let err = store.finalize().await.unwrap_err();

        assert!(matches!(
            err,
            StoreError::HistoryRefresh { estimation_number: 1, .. }
        ));
        assert!(err.is_saved());
        assert_eq!(gateway.records().len(), 1);
        assert!(store.is_empty());
        assert!(store.history().is_empty());
    }

    // -------------------------------------------------------------------------
    // Load
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_load_restores_sheet_and_history() {
        let gateway = Arc::new(FakeGateway::default());
        let saved_sheet = sheet();
        let record = EstimationSession::new(saved_sheet.clone()).to_record(1, Utc::now());
        gateway.with(|s| {
            s.sheet = Some(saved_sheet.clone());
            s.records.push(record);
        });

        let mut store = EstimationStore::new(gateway.clone(), PricingConfig::default());
        assert_eq!(*store.rate_sheet(), MetalRateSheet::zero());

        store.load().await.unwrap();

        assert_eq!(*store.rate_sheet(), saved_sheet);
        assert_eq!(store.history().len(), 1);
        assert_eq!(
            gateway.calls(),
            vec!["load_last_rate_sheet", "load_recent_estimations"]
        );
    }

    #[tokio::test]
    async fn test_load_without_saved_sheet_keeps_zero_sheet() {
        let gateway = Arc::new(FakeGateway::default());
        let mut store = EstimationStore::new(gateway, PricingConfig::default());

        store.load().await.unwrap();

        assert_eq!(*store.rate_sheet(), MetalRateSheet::zero());
        assert!(store.history().is_empty());
    }

    // -------------------------------------------------------------------------
    // Property: totals always match contents
    // -------------------------------------------------------------------------

    #[derive(Debug, Clone)]
    enum Op {
        Item(i64),
        Purchase(i64),
        Chit(i64),
        Advance(i64),
        Remove(u8, u8),
        Reset,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            4 => (0i64..1_000_000).prop_map(Op::Item),
            1 => (0i64..1_000_000).prop_map(Op::Purchase),
            1 => (0i64..1_000_000).prop_map(Op::Chit),
            1 => (0i64..1_000_000).prop_map(Op::Advance),
            2 => (0u8..8, 0u8..4).prop_map(|(id, list)| Op::Remove(id, list)),
            1 => Just(Op::Reset),
        ]
    }

    proptest! {
        #[test]
        fn prop_totals_match_contents(ops in prop::collection::vec(op(), 0..40)) {
            let mut session = EstimationSession::new(sheet());

            for (n, op) in ops.into_iter().enumerate() {
                let id = format!("id-{}", n % 8);
                let action = match op {
                    Op::Item(paise) => EstimationAction::AddItem(flat_item(&id, Decimal::new(paise, 2))),
                    Op::Purchase(paise) => EstimationAction::AddPurchaseItem(
                        PurchaseDraft::new(id, "old", Metal::Gold, 22, dec!(1))
                            .with_rate(Decimal::new(paise, 2))
                            .price(&MetalRateSheet::zero()),
                    ),
                    Op::Chit(paise) => EstimationAction::AddChitItem(
                        ChitDeduction::new(id, "CH", Money::new(Decimal::new(paise, 2))),
                    ),
                    Op::Advance(paise) => EstimationAction::AddAdvanceItem(
                        AdvanceDeduction::new(id, "ADV", Money::new(Decimal::new(paise, 2))),
                    ),
                    Op::Remove(target, list) => EstimationAction::RemoveItem {
                        id: format!("id-{}", target),
                        list: match list {
                            0 => ListKind::Estimation,
                            1 => ListKind::Purchase,
                            2 => ListKind::Chit,
                            _ => ListKind::Advance,
                        },
                    },
                    Op::Reset => EstimationAction::ResetForm,
                };

                session.apply(action);
                assert_consistent(&session);
                prop_assert!(!session.totals().net_payable.is_negative());
            }
        }
    }
}

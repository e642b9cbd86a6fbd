//! Distributor stock and retailer inventory use-cases.
//!
//! Thin typed helpers over `RecordStore`; a missing id is always a no-op.

use crate::aggregate::summary::{InventorySummary, StockSummary};
use crate::clock::Clock;
use crate::model::amount::Amount;
use crate::model::inventory::{InventoryDraft, InventoryItem};
use crate::model::record_id::RecordId;
use crate::model::stock::{StockDraft, StockItem};
use crate::repo::slot_repo::SlotStore;
use crate::service::record_store::{RecordStore, StoreResult};
use log::debug;

pub struct StockService<'s, S: SlotStore, C: Clock> {
    store: &'s RecordStore<S, C>,
}

impl<'s, S: SlotStore, C: Clock> StockService<'s, S, C> {
    pub fn new(store: &'s RecordStore<S, C>) -> Self {
        Self { store }
    }

    pub fn list(&self) -> StoreResult<Vec<StockItem>> {
        self.store.load()
    }

    pub fn receive(&self, draft: StockDraft) -> StoreResult<StockItem> {
        self.store.create(draft)
    }

    /// Moves up to `quantity` kg of a lot out of the warehouse.
    pub fn dispatch(
        &self,
        id: &RecordId,
        quantity: Amount,
        info: &str,
    ) -> StoreResult<Vec<StockItem>> {
        let at = self.store.clock().now();
        self.store.modify(id, |item: &mut StockItem| {
            let moved = item.dispatch(quantity, info, at);
            debug!(
                "event=stock_dispatch module=stock status=ok requested={} moved={}",
                quantity, moved
            );
        })
    }

    pub fn remove(&self, id: &RecordId) -> StoreResult<Vec<StockItem>> {
        self.store.remove(id)
    }

    pub fn summary(&self) -> StoreResult<StockSummary> {
        self.store.summarize::<StockItem>()
    }
}

pub struct InventoryService<'s, S: SlotStore, C: Clock> {
    store: &'s RecordStore<S, C>,
}

impl<'s, S: SlotStore, C: Clock> InventoryService<'s, S, C> {
    pub fn new(store: &'s RecordStore<S, C>) -> Self {
        Self { store }
    }

    pub fn list(&self) -> StoreResult<Vec<InventoryItem>> {
        self.store.load()
    }

    pub fn shelve(&self, draft: InventoryDraft) -> StoreResult<InventoryItem> {
        self.store.create(draft)
    }

    /// Records a retail sale, capped at the quantity still on the shelf.
    pub fn record_sale(&self, id: &RecordId, quantity: Amount) -> StoreResult<Vec<InventoryItem>> {
        self.store.modify(id, |item: &mut InventoryItem| {
            let recorded = item.record_sale(quantity);
            debug!(
                "event=inventory_sale module=inventory status=ok requested={} recorded={}",
                quantity, recorded
            );
        })
    }

    pub fn remove(&self, id: &RecordId) -> StoreResult<Vec<InventoryItem>> {
        self.store.remove(id)
    }

    pub fn summary(&self) -> StoreResult<InventorySummary> {
        self.store.summarize::<InventoryItem>()
    }
}

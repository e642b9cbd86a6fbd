//! Grower crop use-cases.
//!
//! # Responsibility
//! - Close sales, record bids and move crops between grow locations.
//! - Link local registration to the external ledger under an explicit policy.
//!
//! # Invariants
//! - A sale writes price, buyer, account and date in one replace.
//! - Under `LedgerPolicy::Required` a failed ledger write persists nothing.
//! - Under `LedgerPolicy::BestEffort` a ledger failure never rolls back the
//!   local append.

use crate::aggregate::summary::CropSummary;
use crate::clock::Clock;
use crate::model::amount::Amount;
use crate::model::crop::{CropDraft, CropRecord, CropStatus, SaleClosing, DEFAULT_GROW_LOCATION};
use crate::model::record_id::RecordId;
use crate::repo::slot_repo::SlotStore;
use crate::service::record_store::{RecordStore, StoreError, StoreResult};
use crate::wallet::client::{BatchReceipt, BatchRequest, WalletClient, WalletError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// How a registration depends on the ledger write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LedgerPolicy {
    /// Ledger write first; the crop is stored only when it succeeds.
    Required,
    /// Local write first; the ledger outcome is reported, not enforced.
    #[default]
    BestEffort,
}

/// Buyer side of a closed sale.
#[derive(Debug, Clone, PartialEq)]
pub struct SaleRequest {
    pub price_per_unit: Amount,
    pub distributor_name: String,
    pub distributor_account: String,
}

/// A stored crop together with the ledger result of its registration.
#[derive(Debug, Clone, PartialEq)]
pub struct CropRegistration {
    pub crop: CropRecord,
    pub ledger: Result<BatchReceipt, WalletError>,
}

#[derive(Debug)]
pub enum CropServiceError {
    Store(StoreError),
    Ledger(WalletError),
}

impl Display for CropServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::Ledger(err) => write!(f, "ledger registration failed: {err}"),
        }
    }
}

impl Error for CropServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Ledger(err) => Some(err),
        }
    }
}

impl From<StoreError> for CropServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<WalletError> for CropServiceError {
    fn from(value: WalletError) -> Self {
        Self::Ledger(value)
    }
}

/// Crop use-cases over a borrowed record store.
pub struct CropService<'s, S: SlotStore, C: Clock> {
    store: &'s RecordStore<S, C>,
}

impl<'s, S: SlotStore, C: Clock> CropService<'s, S, C> {
    pub fn new(store: &'s RecordStore<S, C>) -> Self {
        Self { store }
    }

    pub fn list(&self) -> StoreResult<Vec<CropRecord>> {
        self.store.load()
    }

    /// Stores a crop without touching the ledger.
    pub fn add(&self, draft: CropDraft) -> StoreResult<CropRecord> {
        self.store.create(draft)
    }

    /// Registers a crop and submits its batch to the ledger under `policy`.
    ///
    /// # Errors
    /// - `Ledger` only under `LedgerPolicy::Required`.
    /// - `Store` when the local write fails.
    pub fn register(
        &self,
        draft: CropDraft,
        wallet: &dyn WalletClient,
        policy: LedgerPolicy,
    ) -> Result<CropRegistration, CropServiceError> {
        match policy {
            LedgerPolicy::Required => {
                let crop: CropRecord = self.store.prepare(draft)?;
                let receipt = wallet.create_batch(&batch_request(&crop)).map_err(|err| {
                    warn!(
                        "event=crop_register module=crop status=error policy=required error_code={}",
                        err.code()
                    );
                    err
                })?;
                self.store.commit_new(crop.clone())?;
                info!("event=crop_register module=crop status=ok policy=required");
                Ok(CropRegistration {
                    crop,
                    ledger: Ok(receipt),
                })
            }
            LedgerPolicy::BestEffort => {
                let crop: CropRecord = self.store.create(draft)?;
                let ledger = wallet.create_batch(&batch_request(&crop));
                match &ledger {
                    Ok(_) => info!("event=crop_register module=crop status=ok policy=best_effort"),
                    Err(err) => warn!(
                        "event=crop_register module=crop status=degraded policy=best_effort error_code={}",
                        err.code()
                    ),
                }
                Ok(CropRegistration { crop, ledger })
            }
        }
    }

    /// Marks a crop sold today. Missing id is a no-op.
    pub fn sell(&self, id: &RecordId, sale: SaleRequest) -> StoreResult<Vec<CropRecord>> {
        let sold_date = self.store.clock().today();
        self.store.modify(id, move |crop: &mut CropRecord| {
            crop.status = CropStatus::Sold(SaleClosing {
                sold_price_per_unit: sale.price_per_unit,
                distributor_name: sale.distributor_name,
                distributor_account: sale.distributor_account,
                sold_date: sold_date.into(),
            });
        })
    }

    /// Records a distributor bid. Missing id is a no-op.
    pub fn place_bid(&self, id: &RecordId, bid_amount: Amount) -> StoreResult<Vec<CropRecord>> {
        self.store.modify(id, move |crop: &mut CropRecord| {
            crop.status = CropStatus::BidPlaced { bid_amount };
        })
    }

    /// Changes the grow location; blank input resets it to the default.
    pub fn update_location(&self, id: &RecordId, location: &str) -> StoreResult<Vec<CropRecord>> {
        let location = match location.trim() {
            "" => DEFAULT_GROW_LOCATION.to_string(),
            trimmed => trimmed.to_string(),
        };
        self.store.modify(id, move |crop: &mut CropRecord| {
            crop.grow_location = location;
        })
    }

    pub fn remove(&self, id: &RecordId) -> StoreResult<Vec<CropRecord>> {
        self.store.remove(id)
    }

    pub fn summary(&self) -> StoreResult<CropSummary> {
        self.store.summarize::<CropRecord>()
    }
}

fn batch_request(crop: &CropRecord) -> BatchRequest {
    BatchRequest {
        batch_id: crop.id.to_string(),
        name: crop.name.clone(),
        quantity_kg: crop.quantity_kg(),
        price_per_unit: Amount::new(crop.adjusted_price()),
        origin: crop.grow_location.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::batch_request;
    use crate::model::amount::Amount;
    use crate::model::crop::{CropDraft, CropRecord};
    use crate::model::record::Record;
    use chrono::Utc;

    #[test]
    fn batch_request_carries_adjusted_price_and_origin() {
        let draft = CropDraft {
            name: "First Flush".to_string(),
            crop_type: "Tea".to_string(),
            quantity: "40 kg".to_string(),
            expected_price_per_unit: Amount::new(100.0),
            grow_location: Some("Darjeeling".to_string()),
            ..CropDraft::default()
        };
        let crop = CropRecord::from_draft("1700000000000".into(), draft, Utc::now());

        let request = batch_request(&crop);
        assert_eq!(request.batch_id, "1700000000000");
        assert_eq!(request.quantity_kg.get(), 40.0);
        assert_eq!(request.price_per_unit.get(), 150.0);
        assert_eq!(request.origin, "Darjeeling");
    }
}

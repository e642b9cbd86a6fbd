//! Distributor stock items.
//!
//! # Invariants
//! - Quantities, prices and costs are `Amount`s (never negative).
//! - Farmer rating stays within `1..=5`.
//! - `timestamps.dispatched`, when set, is not earlier than `timestamps.received`.

use crate::model::amount::Amount;
use crate::model::record::{CollectionKey, Record, RecordValidationError};
use crate::model::record_date::RecordDate;
use crate::model::record_id::RecordId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_FARMER_RATING: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum QualityGrade {
    #[default]
    A,
    B,
    C,
}

/// Where and how a lot is held. Persisted as flat `warehouse*` fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Warehouse {
    #[serde(rename = "warehouseLocation", default)]
    pub location: String,
    #[serde(rename = "warehouseCapacity", default)]
    pub capacity: String,
    #[serde(rename = "packagingType", default)]
    pub packaging_type: String,
}

/// The grower a lot was bought from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceFarmer {
    #[serde(rename = "farmerName", default)]
    pub name: String,
    #[serde(rename = "farmerRating", default = "default_farmer_rating")]
    pub rating: u8,
}

impl Default for SourceFarmer {
    fn default() -> Self {
        Self {
            name: String::new(),
            rating: DEFAULT_FARMER_RATING,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockTimestamps {
    pub received: DateTime<Utc>,
    pub inspected: DateTime<Utc>,
    pub stored: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dispatched: Option<DateTime<Utc>>,
}

impl StockTimestamps {
    /// All intake stamps set to the same instant.
    pub fn intake(at: DateTime<Utc>) -> Self {
        Self {
            received: at,
            inspected: at,
            stored: at,
            dispatched: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockItem {
    pub id: RecordId,
    pub crop_name: String,
    #[serde(default)]
    pub crop_type: String,
    #[serde(default)]
    pub quantity_in_hand: Amount,
    #[serde(default)]
    pub quantity_dispatched: Amount,
    #[serde(rename = "wastedQuantity", default)]
    pub quantity_wasted: Amount,
    #[serde(default)]
    pub buying_price: Amount,
    #[serde(default)]
    pub selling_price: Amount,
    #[serde(default)]
    pub transportation_cost: Amount,
    #[serde(flatten)]
    pub warehouse: Warehouse,
    #[serde(flatten)]
    pub farmer: SourceFarmer,
    #[serde(default)]
    pub quality_grade: QualityGrade,
    pub purchase_date: RecordDate,
    #[serde(default)]
    pub dispatch_info: String,
    pub timestamps: StockTimestamps,
}

/// Distributor input for receiving a lot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StockDraft {
    pub crop_name: String,
    pub crop_type: String,
    pub quantity_in_hand: Amount,
    pub quantity_dispatched: Amount,
    pub quantity_wasted: Amount,
    pub buying_price: Amount,
    pub selling_price: Amount,
    pub transportation_cost: Amount,
    pub warehouse: Warehouse,
    pub farmer: SourceFarmer,
    pub quality_grade: QualityGrade,
    pub dispatch_info: String,
}

impl StockItem {
    /// Transport cost spread over the quantity in hand; zero when nothing is in hand.
    pub fn transport_cost_per_kg(&self) -> f64 {
        if self.quantity_in_hand.is_zero() {
            0.0
        } else {
            self.transportation_cost.get() / self.quantity_in_hand.get()
        }
    }

    pub fn net_profit_per_kg(&self) -> f64 {
        self.selling_price.get() - self.buying_price.get() - self.transport_cost_per_kg()
    }

    /// Profit realized on dispatched quantity, charging the full transport cost per kg.
    pub fn dispatch_profit(&self) -> f64 {
        (self.selling_price.get() - self.buying_price.get() - self.transportation_cost.get())
            * self.quantity_dispatched.get()
    }

    /// Moves up to `quantity` kg from hand to dispatched and stamps the dispatch.
    ///
    /// Returns the quantity actually moved.
    pub fn dispatch(&mut self, quantity: Amount, info: &str, at: DateTime<Utc>) -> Amount {
        let moved = quantity.min(self.quantity_in_hand);
        self.quantity_in_hand = self.quantity_in_hand.saturating_sub(moved);
        self.quantity_dispatched = self.quantity_dispatched + moved;
        self.timestamps.dispatched = Some(at);
        if !info.trim().is_empty() {
            self.dispatch_info = info.trim().to_string();
        }
        moved
    }
}

impl Record for StockItem {
    type Draft = StockDraft;

    const COLLECTION: CollectionKey = CollectionKey::DistributorStock;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn from_draft(id: RecordId, draft: StockDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            crop_name: draft.crop_name,
            crop_type: draft.crop_type,
            quantity_in_hand: draft.quantity_in_hand,
            quantity_dispatched: draft.quantity_dispatched,
            quantity_wasted: draft.quantity_wasted,
            buying_price: draft.buying_price,
            selling_price: draft.selling_price,
            transportation_cost: draft.transportation_cost,
            warehouse: draft.warehouse,
            farmer: draft.farmer,
            quality_grade: draft.quality_grade,
            purchase_date: now.date_naive().into(),
            dispatch_info: draft.dispatch_info,
            timestamps: StockTimestamps::intake(now),
        }
    }

    fn validate(&self) -> Result<(), RecordValidationError> {
        if self.id.is_blank() {
            return Err(RecordValidationError::EmptyId);
        }
        if !(1..=5).contains(&self.farmer.rating) {
            return Err(RecordValidationError::FarmerRatingOutOfRange(
                self.farmer.rating,
            ));
        }
        if let Some(dispatched) = self.timestamps.dispatched {
            if dispatched < self.timestamps.received {
                return Err(RecordValidationError::DispatchBeforeReceipt {
                    received: self.timestamps.received,
                    dispatched,
                });
            }
        }
        Ok(())
    }
}

fn default_farmer_rating() -> u8 {
    DEFAULT_FARMER_RATING
}

#[cfg(test)]
mod tests {
    use super::{StockDraft, StockItem};
    use crate::model::amount::Amount;
    use crate::model::record::{Record, RecordValidationError};
    use chrono::{Duration, TimeZone, Utc};

    fn lot(in_hand: f64, transport: f64) -> StockItem {
        let draft = StockDraft {
            crop_name: "Basmati".to_string(),
            quantity_in_hand: Amount::new(in_hand),
            buying_price: Amount::new(40.0),
            selling_price: Amount::new(55.0),
            transportation_cost: Amount::new(transport),
            ..StockDraft::default()
        };
        let now = Utc.with_ymd_and_hms(2024, 10, 18, 10, 0, 0).unwrap();
        StockItem::from_draft("1".into(), draft, now)
    }

    #[test]
    fn net_profit_per_kg_spreads_transport_over_stock() {
        let item = lot(100.0, 200.0);
        assert_eq!(item.net_profit_per_kg(), 13.0);
    }

    #[test]
    fn empty_stock_does_not_divide_by_zero() {
        let item = lot(0.0, 200.0);
        assert_eq!(item.transport_cost_per_kg(), 0.0);
        assert_eq!(item.net_profit_per_kg(), 15.0);
    }

    #[test]
    fn dispatch_moves_at_most_the_quantity_in_hand() {
        let mut item = lot(30.0, 0.0);
        let at = item.timestamps.received + Duration::hours(2);
        let moved = item.dispatch(Amount::new(50.0), "truck 7", at);
        assert_eq!(moved.get(), 30.0);
        assert!(item.quantity_in_hand.is_zero());
        assert_eq!(item.quantity_dispatched.get(), 30.0);
        assert_eq!(item.timestamps.dispatched, Some(at));
        assert_eq!(item.dispatch_info, "truck 7");
    }

    #[test]
    fn validate_rejects_rating_and_dispatch_window() {
        let mut item = lot(10.0, 0.0);
        item.farmer.rating = 0;
        assert_eq!(
            item.validate(),
            Err(RecordValidationError::FarmerRatingOutOfRange(0))
        );

        let mut item = lot(10.0, 0.0);
        item.timestamps.dispatched = Some(item.timestamps.received - Duration::minutes(1));
        assert!(matches!(
            item.validate(),
            Err(RecordValidationError::DispatchBeforeReceipt { .. })
        ));
    }
}

//! Retailer inventory items.

use crate::model::amount::Amount;
use crate::model::record::{CollectionKey, Record, RecordValidationError};
use crate::model::record_date::RecordDate;
use crate::model::record_id::RecordId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: RecordId,
    pub product_name: String,
    #[serde(default)]
    pub product_type: String,
    #[serde(default)]
    pub quantity: Amount,
    #[serde(default)]
    pub sold_quantity: Amount,
    #[serde(default)]
    pub purchase_price: Amount,
    #[serde(default)]
    pub selling_price: Amount,
    #[serde(default)]
    pub supplier: String,
    pub received_date: RecordDate,
    /// Date as entered by the retailer; may be blank.
    #[serde(default)]
    pub expiry_date: String,
}

/// Retailer input for shelving a product.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InventoryDraft {
    pub product_name: String,
    pub product_type: String,
    pub quantity: Amount,
    pub sold_quantity: Amount,
    pub purchase_price: Amount,
    pub selling_price: Amount,
    pub supplier: String,
    pub expiry_date: String,
}

impl InventoryItem {
    /// Purchase value of the full quantity.
    pub fn stock_value(&self) -> f64 {
        self.quantity.get() * self.purchase_price.get()
    }

    pub fn sales(&self) -> f64 {
        self.sold_quantity.get() * self.selling_price.get()
    }

    pub fn profit(&self) -> f64 {
        (self.selling_price.get() - self.purchase_price.get()) * self.sold_quantity.get()
    }

    pub fn remaining(&self) -> Amount {
        self.quantity.saturating_sub(self.sold_quantity)
    }

    /// Adds `quantity` to the sold total without exceeding what was shelved.
    ///
    /// Returns the quantity actually recorded.
    pub fn record_sale(&mut self, quantity: Amount) -> Amount {
        let recorded = quantity.min(self.remaining());
        self.sold_quantity = self.sold_quantity + recorded;
        recorded
    }
}

impl Record for InventoryItem {
    type Draft = InventoryDraft;

    const COLLECTION: CollectionKey = CollectionKey::RetailerInventory;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn from_draft(id: RecordId, draft: InventoryDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            product_name: draft.product_name,
            product_type: draft.product_type,
            quantity: draft.quantity,
            sold_quantity: draft.sold_quantity,
            purchase_price: draft.purchase_price,
            selling_price: draft.selling_price,
            supplier: draft.supplier,
            received_date: now.date_naive().into(),
            expiry_date: draft.expiry_date,
        }
    }

    fn validate(&self) -> Result<(), RecordValidationError> {
        if self.id.is_blank() {
            return Err(RecordValidationError::EmptyId);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{InventoryDraft, InventoryItem};
    use crate::model::amount::Amount;
    use crate::model::record::Record;
    use chrono::Utc;

    #[test]
    fn record_sale_is_capped_by_remaining_stock() {
        let draft = InventoryDraft {
            product_name: "Tomatoes".to_string(),
            quantity: Amount::new(10.0),
            sold_quantity: Amount::new(4.0),
            ..InventoryDraft::default()
        };
        let mut item = InventoryItem::from_draft("7".into(), draft, Utc::now());

        assert_eq!(item.record_sale(Amount::new(10.0)).get(), 6.0);
        assert_eq!(item.sold_quantity.get(), 10.0);
        assert!(item.remaining().is_zero());
    }
}

//! Grower crop records.
//!
//! # Responsibility
//! - Define the persisted crop shape and its lifecycle status.
//! - Derive location-adjusted prices from the fixed multiplier table.
//!
//! # Invariants
//! - The location multiplier is never stored; it is read from `grow_location`.
//! - Sale closing fields exist only inside `CropStatus::Sold`, so a sold crop
//!   without a price, buyer or date cannot be represented or decoded.

use crate::model::amount::{self, Amount};
use crate::model::record::{CollectionKey, Record, RecordValidationError};
use crate::model::record_date::RecordDate;
use crate::model::record_id::RecordId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Grow location used when none is given.
pub const DEFAULT_GROW_LOCATION: &str = "Other";

/// Regional premium factors applied to the expected base price.
pub const LOCATION_MULTIPLIERS: &[(&str, f64)] = &[
    ("Darjeeling", 1.5),
    ("Kashmir", 1.4),
    ("Assam", 1.3),
    ("Punjab", 1.2),
    ("Kerala", 1.3),
    ("Maharashtra", 1.1),
    ("Other", 1.0),
];

/// Crop categories offered by the grower form.
pub const CROP_TYPES: &[&str] = &[
    "Vegetable",
    "Dal",
    "Rice",
    "Wheat",
    "Tea",
    "Coffee",
    "Spices",
    "Fruits",
    "Other",
];

/// Looks up the multiplier for `location`; unknown locations get `1.0`.
pub fn location_multiplier(location: &str) -> f64 {
    let location = location.trim();
    LOCATION_MULTIPLIERS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(location))
        .map_or(1.0, |(_, multiplier)| *multiplier)
}

/// Renders a price with two decimals.
pub fn format_price(value: f64) -> String {
    format!("{value:.2}")
}

/// Closing data recorded when a crop is sold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleClosing {
    #[serde(deserialize_with = "amount::deserialize_required")]
    pub sold_price_per_unit: Amount,
    pub distributor_name: String,
    pub distributor_account: String,
    pub sold_date: RecordDate,
}

/// Crop lifecycle. Persisted as a `status` tag with the variant fields inline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CropStatus {
    Available,
    #[serde(rename_all = "camelCase")]
    BidPlaced {
        #[serde(default)]
        bid_amount: Amount,
    },
    Sold(SaleClosing),
}

impl CropStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::BidPlaced { .. } => "bid_placed",
            Self::Sold(_) => "sold",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropRecord {
    pub id: RecordId,
    pub name: String,
    #[serde(rename = "type")]
    pub crop_type: String,
    #[serde(default)]
    pub harvest_date: String,
    /// Free-form kilogram quantity as typed by the grower.
    #[serde(default)]
    pub quantity: String,
    #[serde(default)]
    pub expected_price_per_unit: Amount,
    #[serde(default = "default_grow_location")]
    pub grow_location: String,
    #[serde(default)]
    pub improvement_notes: String,
    #[serde(flatten)]
    pub status: CropStatus,
}

/// Grower input for registering a crop.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CropDraft {
    pub name: String,
    pub crop_type: String,
    pub harvest_date: String,
    pub quantity: String,
    pub expected_price_per_unit: Amount,
    pub grow_location: Option<String>,
    pub improvement_notes: String,
}

impl CropRecord {
    pub fn quantity_kg(&self) -> Amount {
        Amount::parse(&self.quantity)
    }

    pub fn location_multiplier(&self) -> f64 {
        location_multiplier(&self.grow_location)
    }

    /// Expected price per unit after the regional premium.
    pub fn adjusted_price(&self) -> f64 {
        self.expected_price_per_unit.get() * self.location_multiplier()
    }

    pub fn sale(&self) -> Option<&SaleClosing> {
        match &self.status {
            CropStatus::Sold(closing) => Some(closing),
            _ => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self.status, CropStatus::Available)
    }

    /// Realized revenue; zero unless sold.
    pub fn revenue(&self) -> f64 {
        self.sale().map_or(0.0, |closing| {
            closing.sold_price_per_unit.get() * self.quantity_kg().get()
        })
    }
}

impl Record for CropRecord {
    type Draft = CropDraft;

    const COLLECTION: CollectionKey = CollectionKey::FarmerCrops;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn from_draft(id: RecordId, draft: CropDraft, _now: DateTime<Utc>) -> Self {
        let grow_location = draft
            .grow_location
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(default_grow_location);

        Self {
            id,
            name: draft.name,
            crop_type: draft.crop_type,
            harvest_date: draft.harvest_date,
            quantity: draft.quantity,
            expected_price_per_unit: draft.expected_price_per_unit,
            grow_location,
            improvement_notes: draft.improvement_notes,
            status: CropStatus::Available,
        }
    }

    fn validate(&self) -> Result<(), RecordValidationError> {
        if self.id.is_blank() {
            return Err(RecordValidationError::EmptyId);
        }
        Ok(())
    }
}

fn default_grow_location() -> String {
    DEFAULT_GROW_LOCATION.to_string()
}

#[cfg(test)]
mod tests {
    use super::{format_price, location_multiplier};

    #[test]
    fn multiplier_table_matches_known_regions() {
        assert_eq!(location_multiplier("Darjeeling"), 1.5);
        assert_eq!(location_multiplier(" kashmir "), 1.4);
        assert_eq!(location_multiplier("Maharashtra"), 1.1);
    }

    #[test]
    fn unknown_location_defaults_to_one() {
        assert_eq!(location_multiplier("Atlantis"), 1.0);
        assert_eq!(location_multiplier(""), 1.0);
    }

    #[test]
    fn prices_render_with_two_decimals() {
        assert_eq!(format_price(150.0), "150.00");
        assert_eq!(format_price(12.346), "12.35");
    }
}

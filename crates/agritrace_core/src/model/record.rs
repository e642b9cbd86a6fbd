//! Shared record contract for role collections.
//!
//! # Invariants
//! - Each record type lives in exactly one collection slot.
//! - Writes call `Record::validate()` before touching storage.

use crate::model::record_id::RecordId;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Role-scoped collection slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKey {
    FarmerCrops,
    DistributorStock,
    RetailerInventory,
}

impl CollectionKey {
    /// Persisted slot key.
    pub fn slot_key(self) -> &'static str {
        match self {
            Self::FarmerCrops => "farmer-crops",
            Self::DistributorStock => "distributor-stock",
            Self::RetailerInventory => "retailer-inventory",
        }
    }
}

impl Display for CollectionKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slot_key())
    }
}

/// Write-boundary validation failures.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordValidationError {
    EmptyId,
    FarmerRatingOutOfRange(u8),
    DispatchBeforeReceipt {
        received: DateTime<Utc>,
        dispatched: DateTime<Utc>,
    },
}

impl Display for RecordValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "record id must not be empty"),
            Self::FarmerRatingOutOfRange(rating) => {
                write!(f, "farmer rating must be within 1..=5, got {rating}")
            }
            Self::DispatchBeforeReceipt {
                received,
                dispatched,
            } => write!(
                f,
                "dispatched at {dispatched} is earlier than received at {received}"
            ),
        }
    }
}

impl Error for RecordValidationError {}

/// A typed record stored in one role collection.
pub trait Record: Clone + Serialize + DeserializeOwned {
    /// User input needed to create a record; identity and stamps are filled by the store.
    type Draft;

    const COLLECTION: CollectionKey;

    fn id(&self) -> &RecordId;

    /// Builds a new record from user input, stamping creation fields with `now`.
    fn from_draft(id: RecordId, draft: Self::Draft, now: DateTime<Utc>) -> Self;

    fn validate(&self) -> Result<(), RecordValidationError>;
}

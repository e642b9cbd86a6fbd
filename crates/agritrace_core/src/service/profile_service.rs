//! Profile and settings datasets.
//!
//! # Invariants
//! - A missing or unreadable dataset slot reads as absent.
//! - `reset_settings` persists the defaults it returns.

use crate::clock::Clock;
use crate::model::profile::{AccountProfile, Dataset, Settings};
use crate::model::session::Role;
use crate::repo::slot_repo::SlotStore;
use crate::service::record_store::{RecordStore, StoreError, StoreResult};
use log::warn;

/// Reads one dataset slot; malformed content is reported as absent.
pub(crate) fn read_dataset<D: Dataset>(slots: &impl SlotStore) -> StoreResult<Option<D>> {
    let Some(raw) = slots.read_slot(D::SLOT)? else {
        return Ok(None);
    };
    match serde_json::from_str::<D>(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(err) => {
            warn!(
                "event=dataset_load module=profile status=degraded slot={} error_code=malformed_slot error={}",
                D::SLOT,
                err
            );
            Ok(None)
        }
    }
}

pub(crate) fn write_dataset<D: Dataset>(slots: &impl SlotStore, value: &D) -> StoreResult<()> {
    let encoded = serde_json::to_string(value).map_err(StoreError::Encode)?;
    slots.write_slot(D::SLOT, &encoded)?;
    Ok(())
}

pub struct ProfileService<'s, S: SlotStore, C: Clock> {
    store: &'s RecordStore<S, C>,
}

impl<'s, S: SlotStore, C: Clock> ProfileService<'s, S, C> {
    pub fn new(store: &'s RecordStore<S, C>) -> Self {
        Self { store }
    }

    /// Loads a dataset, or its `Default` when absent.
    pub fn load_or_default<D: Dataset + Default>(&self) -> StoreResult<D> {
        Ok(read_dataset::<D>(self.store.slots())?.unwrap_or_default())
    }

    pub fn save<D: Dataset>(&self, value: &D) -> StoreResult<()> {
        write_dataset(self.store.slots(), value)
    }

    /// Account profile, falling back to the role's default display name.
    pub fn account_profile(&self, role: Role) -> StoreResult<AccountProfile> {
        Ok(read_dataset::<AccountProfile>(self.store.slots())?
            .unwrap_or_else(|| AccountProfile::default_for(role)))
    }

    pub fn settings(&self) -> StoreResult<Settings> {
        self.load_or_default()
    }

    /// Overwrites stored settings with the defaults.
    pub fn reset_settings(&self) -> StoreResult<Settings> {
        let defaults = Settings::default();
        self.save(&defaults)?;
        Ok(defaults)
    }
}

//! Role record store.
//!
//! # Responsibility
//! - Load, append, replace and remove typed records in their role slot.
//! - Assign identities and creation stamps at the write boundary.
//!
//! # Invariants
//! - Every mutation rewrites the whole collection with one slot write.
//! - A slot that is not a JSON array reads as an empty collection.
//! - An element that does not decode is hidden from readers and written back
//!   unchanged by every later mutation.
//! - Replace/remove of an unknown id is a no-op and performs no write.
//! - Writes validate every touched record before persisting.

use crate::aggregate::summary::Summarize;
use crate::clock::{Clock, SystemClock};
use crate::model::record::{Record, RecordValidationError};
use crate::model::record_id::{IdIssuer, RecordId};
use crate::repo::slot_repo::{RepoError, SlotStore};
use log::{debug, warn};
use serde::Serialize;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug)]
pub enum StoreError {
    Repo(RepoError),
    Validation(RecordValidationError),
    /// `replace` was handed a record carrying a different identity.
    IdMismatch {
        expected: RecordId,
        found: RecordId,
    },
    Encode(serde_json::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::IdMismatch { expected, found } => write!(
                f,
                "record id mismatch: replacing `{expected}` with a record identified as `{found}`"
            ),
            Self::Encode(err) => write!(f, "failed to encode collection: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::IdMismatch { .. } => None,
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<RecordValidationError> for StoreError {
    fn from(value: RecordValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Record store over an injected slot substrate and clock.
///
/// Constructed once by the caller and passed by reference to the role
/// services; it holds no global state.
pub struct RecordStore<S: SlotStore, C: Clock = SystemClock> {
    slots: S,
    clock: C,
    ids: IdIssuer,
}

impl<S: SlotStore> RecordStore<S> {
    pub fn new(slots: S) -> Self {
        Self::with_clock(slots, SystemClock)
    }
}

impl<S: SlotStore, C: Clock> RecordStore<S, C> {
    pub fn with_clock(slots: S, clock: C) -> Self {
        Self {
            slots,
            clock,
            ids: IdIssuer::new(),
        }
    }

    pub fn slots(&self) -> &S {
        &self.slots
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Returns the readable records of the persisted collection.
    ///
    /// A missing slot, or one that is not a JSON array, reads as empty.
    /// Elements that do not decode are skipped here and kept in storage.
    ///
    /// # Errors
    /// Only storage-engine failures; decode failures are absorbed.
    pub fn load<R: Record>(&self) -> StoreResult<Vec<R>> {
        Ok(self.load_collection::<R>()?.into_records())
    }

    /// Creates a record from `draft` with a fresh id and persists it.
    pub fn append<R: Record>(&self, draft: R::Draft) -> StoreResult<Vec<R>> {
        let (_, records) = self.append_inner(draft)?;
        Ok(records)
    }

    /// Same as `append`, returning the created record.
    pub fn create<R: Record>(&self, draft: R::Draft) -> StoreResult<R> {
        let (record, _) = self.append_inner(draft)?;
        Ok(record)
    }

    /// Builds a record with a fresh id without persisting it.
    ///
    /// Pair with `commit_new` when an external step must succeed between id
    /// assignment and the local write.
    pub fn prepare<R: Record>(&self, draft: R::Draft) -> StoreResult<R> {
        let collection = self.load_collection::<R>()?;
        let record: R = self.build(draft, &collection.ids());
        record.validate()?;
        Ok(record)
    }

    /// Persists a record built by `prepare`. An existing record with the same
    /// id is replaced instead of duplicated.
    pub fn commit_new<R: Record>(&self, record: R) -> StoreResult<Vec<R>> {
        record.validate()?;
        let mut collection = self.load_collection::<R>()?;
        match collection.position(record.id()) {
            Some(index) => collection.entries[index] = Entry::Decoded(record),
            None => collection.entries.push(Entry::Decoded(record)),
        }
        self.persist(&collection)?;
        debug!(
            "event=record_append module=store status=ok collection={} count={}",
            R::COLLECTION,
            collection.entries.len()
        );
        Ok(collection.into_records())
    }

    /// Replaces the record identified by `id` with `updated`.
    ///
    /// No-op when `id` is absent.
    pub fn replace<R: Record>(&self, id: &RecordId, updated: R) -> StoreResult<Vec<R>> {
        if updated.id() != id {
            return Err(StoreError::IdMismatch {
                expected: id.clone(),
                found: updated.id().clone(),
            });
        }
        self.modify(id, move |record: &mut R| *record = updated)
    }

    /// Applies `change` to the record identified by `id` and persists the result.
    ///
    /// No-op when `id` is absent. A change that alters the identity is rejected.
    pub fn modify<R: Record>(
        &self,
        id: &RecordId,
        change: impl FnOnce(&mut R),
    ) -> StoreResult<Vec<R>> {
        let mut collection = self.load_collection::<R>()?;
        let Some(index) = collection.position(id) else {
            debug!(
                "event=record_update module=store status=noop collection={} reason=not_found",
                R::COLLECTION
            );
            return Ok(collection.into_records());
        };
        let Entry::Decoded(current) = &collection.entries[index] else {
            return Ok(collection.into_records());
        };

        let mut candidate = current.clone();
        change(&mut candidate);
        if candidate.id() != id {
            return Err(StoreError::IdMismatch {
                expected: id.clone(),
                found: candidate.id().clone(),
            });
        }
        candidate.validate()?;
        collection.entries[index] = Entry::Decoded(candidate);

        self.persist(&collection)?;
        debug!(
            "event=record_update module=store status=ok collection={}",
            R::COLLECTION
        );
        Ok(collection.into_records())
    }

    /// Deletes the record identified by `id`. Idempotent.
    ///
    /// Unreadable elements are never removed.
    pub fn remove<R: Record>(&self, id: &RecordId) -> StoreResult<Vec<R>> {
        let mut collection = self.load_collection::<R>()?;
        let before = collection.entries.len();
        collection.entries.retain(|entry| match entry {
            Entry::Decoded(record) => record.id() != id,
            Entry::Opaque(_) => true,
        });
        if collection.entries.len() == before {
            debug!(
                "event=record_remove module=store status=noop collection={} reason=not_found",
                R::COLLECTION
            );
            return Ok(collection.into_records());
        }

        self.persist(&collection)?;
        debug!(
            "event=record_remove module=store status=ok collection={} count={}",
            R::COLLECTION,
            collection.entries.len()
        );
        Ok(collection.into_records())
    }

    /// Finds one record by id.
    pub fn get<R: Record>(&self, id: &RecordId) -> StoreResult<Option<R>> {
        Ok(self
            .load::<R>()?
            .into_iter()
            .find(|record| record.id() == id))
    }

    /// Loads the collection and folds it into its summary.
    pub fn summarize<R: Record + Summarize>(&self) -> StoreResult<R::Summary> {
        let records = self.load::<R>()?;
        Ok(R::summarize(&records))
    }

    fn append_inner<R: Record>(&self, draft: R::Draft) -> StoreResult<(R, Vec<R>)> {
        let mut collection = self.load_collection::<R>()?;
        let record: R = self.build(draft, &collection.ids());
        record.validate()?;
        collection.entries.push(Entry::Decoded(record.clone()));
        self.persist(&collection)?;
        debug!(
            "event=record_append module=store status=ok collection={} count={}",
            R::COLLECTION,
            collection.entries.len()
        );
        Ok((record, collection.into_records()))
    }

    fn load_collection<R: Record>(&self) -> StoreResult<Collection<R>> {
        let key = R::COLLECTION.slot_key();
        let Some(raw) = self.slots.read_slot(key)? else {
            return Ok(Collection::empty());
        };

        let elements = match serde_json::from_str::<Vec<Value>>(&raw) {
            Ok(elements) => elements,
            Err(err) => {
                warn!(
                    "event=record_load module=store status=degraded collection={} error_code=malformed_slot error={}",
                    key, err
                );
                return Ok(Collection::empty());
            }
        };

        let entries = elements
            .into_iter()
            .enumerate()
            .map(|(index, element)| {
                let decoded = R::deserialize(&element);
                match decoded {
                    Ok(record) => Entry::Decoded(record),
                    Err(err) => {
                        warn!(
                            "event=record_load module=store status=degraded collection={} index={} error_code=malformed_record error={}",
                            key, index, err
                        );
                        Entry::Opaque(element)
                    }
                }
            })
            .collect();
        Ok(Collection { entries })
    }

    fn build<R: Record>(&self, draft: R::Draft, existing: &[RecordId]) -> R {
        let now = self.clock.now();
        let id = self.ids.next_id(now.timestamp_millis(), existing);
        R::from_draft(id, draft, now)
    }

    fn persist<R: Record>(&self, collection: &Collection<R>) -> StoreResult<()> {
        let encoded = serde_json::to_string(&collection.entries).map_err(StoreError::Encode)?;
        self.slots.write_slot(R::COLLECTION.slot_key(), &encoded)?;
        Ok(())
    }
}

/// One element of a persisted collection.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Entry<R> {
    Decoded(R),
    /// Element that does not decode as `R`; written back unchanged.
    Opaque(Value),
}

/// A collection as stored, in slot order.
struct Collection<R> {
    entries: Vec<Entry<R>>,
}

impl<R: Record> Collection<R> {
    fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Index of the readable record identified by `id`.
    fn position(&self, id: &RecordId) -> Option<usize> {
        self.entries.iter().position(|entry| match entry {
            Entry::Decoded(record) => record.id() == id,
            Entry::Opaque(_) => false,
        })
    }

    /// Ids already taken, including those of unreadable elements.
    fn ids(&self) -> Vec<RecordId> {
        self.entries
            .iter()
            .filter_map(|entry| match entry {
                Entry::Decoded(record) => Some(record.id().clone()),
                Entry::Opaque(value) => value
                    .get("id")
                    .and_then(Value::as_str)
                    .map(RecordId::from),
            })
            .collect()
    }

    fn into_records(self) -> Vec<R> {
        self.entries
            .into_iter()
            .filter_map(|entry| match entry {
                Entry::Decoded(record) => Some(record),
                Entry::Opaque(_) => None,
            })
            .collect()
    }
}

//! Record identity and clock-derived id issuance.
//!
//! # Invariants
//! - Issued ids are decimal Unix-epoch milliseconds.
//! - Each issued id is strictly greater than every id issued before it by the
//!   same `IdIssuer` and than every numeric id already in the target collection.

use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::fmt::{Display, Formatter};

/// Stable identity of one record inside a role collection.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Returns the millisecond value when this id was clock-issued.
    pub fn as_millis(&self) -> Option<i64> {
        self.0.parse::<i64>().ok()
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Monotonic id source shared by all collections of one store.
#[derive(Debug, Default)]
pub struct IdIssuer {
    last_issued: Cell<i64>,
}

impl IdIssuer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues the next id given the current clock reading and the ids already taken.
    pub fn next_id<'a>(
        &self,
        now_ms: i64,
        existing: impl IntoIterator<Item = &'a RecordId>,
    ) -> RecordId {
        let highest_existing = existing
            .into_iter()
            .filter_map(RecordId::as_millis)
            .max()
            .unwrap_or(i64::MIN);

        let candidate = now_ms
            .max(self.last_issued.get().saturating_add(1))
            .max(highest_existing.saturating_add(1));
        self.last_issued.set(candidate);
        RecordId(candidate.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::{IdIssuer, RecordId};

    #[test]
    fn ids_follow_the_clock_when_it_moves_forward() {
        let issuer = IdIssuer::new();
        assert_eq!(issuer.next_id(1_000, []).as_str(), "1000");
        assert_eq!(issuer.next_id(2_000, []).as_str(), "2000");
    }

    #[test]
    fn ids_stay_unique_under_a_frozen_clock() {
        let issuer = IdIssuer::new();
        let first = issuer.next_id(5_000, []);
        let second = issuer.next_id(5_000, []);
        assert_eq!(first.as_str(), "5000");
        assert_eq!(second.as_str(), "5001");
    }

    #[test]
    fn ids_skip_past_existing_collection_ids() {
        let issuer = IdIssuer::new();
        let existing = vec![RecordId::from("9000"), RecordId::from("legacy-a")];
        assert_eq!(issuer.next_id(1_000, &existing).as_str(), "9001");
    }
}

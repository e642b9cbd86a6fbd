//! Persisted domain model for role collections and side datasets.
//!
//! # Responsibility
//! - Define the typed records each role stores (crops, stock, inventory).
//! - Define session, profile and settings datasets.
//!
//! # Invariants
//! - Every record is identified by a stable `RecordId`.
//! - Deletion is permanent; there are no tombstones.
//! - Numeric fields are non-negative `Amount`s.

pub mod amount;
pub mod crop;
pub mod inventory;
pub mod profile;
pub mod record;
pub mod record_date;
pub mod record_id;
pub mod session;
pub mod stock;

//! Key-value slot persistence.
//!
//! # Responsibility
//! - Define the slot substrate contract every store sits on.
//! - Isolate SQLite details from record/service orchestration.
//!
//! # Invariants
//! - A slot write replaces the whole value in one statement; readers see the
//!   old value or the new one, never a mix.
//! - Last write wins; there is no merge or conflict detection.

pub mod slot_repo;

//! Read-time aggregates over full role collections.
//!
//! Aggregates are recomputed on every read and never persisted.

pub mod summary;

//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate record-store and slot calls into role-level APIs.
//! - Keep the CLI decoupled from storage details.
//!
//! Every service borrows one caller-owned `RecordStore`.

pub mod crop_service;
pub mod profile_service;
pub mod record_store;
pub mod session_service;
pub mod stock_service;

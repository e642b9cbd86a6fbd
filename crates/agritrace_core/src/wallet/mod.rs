//! External wallet/contract collaborator.
//!
//! # Responsibility
//! - Describe the account lookup and ledger write the dashboards depend on.
//! - Bound every external call in time and allow the caller to abandon it.
//!
//! # Invariants
//! - Wallet failures are values (`WalletError`), never panics.
//! - Nothing in this module touches the record store.

pub mod bounded;
pub mod client;
pub mod demo;

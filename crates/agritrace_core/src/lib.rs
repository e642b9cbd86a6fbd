//! Core domain logic for AgriTrace.
//! This crate is the single source of truth for role records, their
//! aggregates and the wallet boundary.

pub mod aggregate;
pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod wallet;

pub use aggregate::summary::{
    aggregate, CropSummary, InventorySummary, StockSummary, Summarize,
};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ConfigError, CoreConfig};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::amount::Amount;
pub use model::crop::{CropDraft, CropRecord, CropStatus, SaleClosing};
pub use model::inventory::{InventoryDraft, InventoryItem};
pub use model::profile::{AccountProfile, Dataset, Settings};
pub use model::record::{CollectionKey, Record, RecordValidationError};
pub use model::record_date::RecordDate;
pub use model::record_id::RecordId;
pub use model::session::{Role, UserSession};
pub use model::stock::{StockDraft, StockItem};
pub use repo::slot_repo::{
    MemorySlotStore, RepoError, RepoResult, SlotStore, SqliteSlotStore,
};
pub use service::crop_service::{
    CropRegistration, CropService, CropServiceError, LedgerPolicy, SaleRequest,
};
pub use service::profile_service::ProfileService;
pub use service::record_store::{RecordStore, StoreError, StoreResult};
pub use service::session_service::{SessionError, SessionService};
pub use service::stock_service::{InventoryService, StockService};
pub use wallet::bounded::{BoundedWallet, CancelToken};
pub use wallet::client::{
    AccountAddress, BatchReceipt, BatchRequest, WalletClient, WalletError,
};
pub use wallet::demo::{DemoWallet, UnavailableWallet};

/// Minimal health-check API.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}

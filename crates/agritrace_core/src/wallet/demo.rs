//! Built-in providers: demo mode and "no wallet injected".

use crate::wallet::client::{
    AccountAddress, BatchReceipt, BatchRequest, WalletClient, WalletError, WalletResult,
};
use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

/// Account used when no browser wallet is present.
pub const DEMO_ACCOUNT: &str = "0x742d35Cc6634C0532925a3b8D404d00Ca11da58F";

/// Offline provider that accepts every request.
#[derive(Debug)]
pub struct DemoWallet {
    account: AccountAddress,
    next_tx: AtomicU64,
    submitted: Mutex<Vec<BatchRequest>>,
}

impl DemoWallet {
    pub fn new() -> Self {
        Self::with_account(AccountAddress::from_static(DEMO_ACCOUNT))
    }

    pub fn with_account(account: AccountAddress) -> Self {
        Self {
            account,
            next_tx: AtomicU64::new(1),
            submitted: Mutex::new(Vec::new()),
        }
    }

    /// Batches accepted so far, oldest first.
    pub fn submitted_batches(&self) -> Vec<BatchRequest> {
        self.submitted
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Default for DemoWallet {
    fn default() -> Self {
        Self::new()
    }
}

impl WalletClient for DemoWallet {
    fn connected_account(&self) -> WalletResult<AccountAddress> {
        Ok(self.account.clone())
    }

    fn create_batch(&self, request: &BatchRequest) -> WalletResult<BatchReceipt> {
        let tx_number = self.next_tx.fetch_add(1, Ordering::SeqCst);
        self.submitted
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());
        Ok(BatchReceipt {
            tx_ref: format!("demo-tx-{tx_number}"),
            batch_id: request.batch_id.clone(),
            submitted_at: Utc::now(),
        })
    }
}

/// Provider for environments without an injected wallet.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableWallet;

impl WalletClient for UnavailableWallet {
    fn connected_account(&self) -> WalletResult<AccountAddress> {
        Err(WalletError::Unavailable(
            "no wallet provider injected".to_string(),
        ))
    }

    fn create_batch(&self, _request: &BatchRequest) -> WalletResult<BatchReceipt> {
        Err(WalletError::Unavailable(
            "no wallet provider injected".to_string(),
        ))
    }
}

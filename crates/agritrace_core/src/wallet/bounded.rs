//! Time-bounded, cancellable wallet calls.
//!
//! # Invariants
//! - A call never blocks its caller longer than the configured timeout
//!   (plus one poll interval).
//! - A provider that never answers is abandoned on its worker thread; the
//!   worker is not joined.
//! - Cancellation is cooperative: it stops the wait, not the provider.

use crate::wallet::client::{
    AccountAddress, BatchReceipt, BatchRequest, WalletClient, WalletError, WalletResult,
};
use log::{info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

pub const DEFAULT_WALLET_TIMEOUT: Duration = Duration::from_secs(30);
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Shared flag a caller flips to stop waiting on a wallet prompt.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Wraps a provider so every call has a deadline and a cancel path.
pub struct BoundedWallet {
    inner: Arc<dyn WalletClient>,
    timeout: Duration,
    cancel: CancelToken,
}

impl BoundedWallet {
    pub fn new(inner: Arc<dyn WalletClient>, timeout: Duration) -> Self {
        Self {
            inner,
            timeout,
            cancel: CancelToken::new(),
        }
    }

    /// Uses a caller-owned token, e.g. one wired to a "dismiss" button.
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn run<T, F>(&self, operation: &'static str, call: F) -> WalletResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&dyn WalletClient) -> WalletResult<T> + Send + 'static,
    {
        if self.cancel.is_cancelled() {
            return Err(WalletError::Cancelled { operation });
        }

        let started_at = Instant::now();
        let (sender, receiver) = mpsc::channel();
        let provider = Arc::clone(&self.inner);
        let spawned = thread::Builder::new()
            .name(format!("wallet-{operation}"))
            .spawn(move || {
                // Receiver may be gone after a timeout; the late result is dropped.
                let _ = sender.send(call(provider.as_ref()));
            });
        if let Err(err) = spawned {
            return Err(WalletError::Unavailable(format!(
                "failed to start wallet worker: {err}"
            )));
        }

        loop {
            let remaining = self.timeout.saturating_sub(started_at.elapsed());
            match receiver.recv_timeout(remaining.min(POLL_INTERVAL)) {
                Ok(result) => {
                    match &result {
                        Ok(_) => info!(
                            "event=wallet_call module=wallet status=ok operation={} duration_ms={}",
                            operation,
                            started_at.elapsed().as_millis()
                        ),
                        Err(err) => warn!(
                            "event=wallet_call module=wallet status=error operation={} duration_ms={} error_code={}",
                            operation,
                            started_at.elapsed().as_millis(),
                            err.code()
                        ),
                    }
                    return result;
                }
                Err(RecvTimeoutError::Timeout) => {
                    if self.cancel.is_cancelled() {
                        warn!(
                            "event=wallet_call module=wallet status=cancelled operation={} duration_ms={}",
                            operation,
                            started_at.elapsed().as_millis()
                        );
                        return Err(WalletError::Cancelled { operation });
                    }
                    if started_at.elapsed() >= self.timeout {
                        warn!(
                            "event=wallet_call module=wallet status=timeout operation={} timeout_ms={}",
                            operation,
                            self.timeout.as_millis()
                        );
                        return Err(WalletError::TimedOut {
                            operation,
                            timeout_ms: self.timeout.as_millis(),
                        });
                    }
                }
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(WalletError::Unavailable(format!(
                        "wallet worker for {operation} exited without a response"
                    )));
                }
            }
        }
    }
}

impl WalletClient for BoundedWallet {
    fn connected_account(&self) -> WalletResult<AccountAddress> {
        self.run("connected_account", |wallet| wallet.connected_account())
    }

    fn create_batch(&self, request: &BatchRequest) -> WalletResult<BatchReceipt> {
        let request = request.clone();
        self.run("create_batch", move |wallet| wallet.create_batch(&request))
    }
}

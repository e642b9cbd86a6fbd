//! Session use-cases: connect through the wallet, read back, log out.
//!
//! # Invariants
//! - A failed wallet lookup persists nothing.
//! - `current` returning `None` is the only signal to send the user to login.

use crate::clock::Clock;
use crate::model::session::{Role, UserSession, SESSION_SLOT};
use crate::repo::slot_repo::SlotStore;
use crate::service::profile_service::{read_dataset, write_dataset};
use crate::service::record_store::{RecordStore, StoreError};
use crate::wallet::client::{WalletClient, WalletError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum SessionError {
    Wallet(WalletError),
    Store(StoreError),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Wallet(err) => write!(f, "could not connect wallet: {err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Wallet(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<WalletError> for SessionError {
    fn from(value: WalletError) -> Self {
        Self::Wallet(value)
    }
}

impl From<StoreError> for SessionError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

pub struct SessionService<'s, S: SlotStore, C: Clock> {
    store: &'s RecordStore<S, C>,
}

impl<'s, S: SlotStore, C: Clock> SessionService<'s, S, C> {
    pub fn new(store: &'s RecordStore<S, C>) -> Self {
        Self { store }
    }

    /// Resolves the wallet account and stores the session for `role`.
    pub fn connect(
        &self,
        role: Role,
        wallet: &dyn WalletClient,
    ) -> Result<UserSession, SessionError> {
        let address = wallet.connected_account().map_err(|err| {
            warn!(
                "event=session_connect module=session status=error role={} error_code={}",
                role,
                err.code()
            );
            err
        })?;
        let session = UserSession {
            address,
            role,
            connected_at: self.store.clock().now(),
        };
        write_dataset(self.store.slots(), &session)?;
        info!(
            "event=session_connect module=session status=ok role={}",
            role
        );
        Ok(session)
    }

    pub fn current(&self) -> Result<Option<UserSession>, SessionError> {
        Ok(read_dataset::<UserSession>(self.store.slots())?)
    }

    /// Clears the session. Returns whether one was stored.
    pub fn logout(&self) -> Result<bool, SessionError> {
        let removed = self
            .store
            .slots()
            .remove_slot(SESSION_SLOT)
            .map_err(StoreError::from)?;
        info!(
            "event=session_logout module=session status=ok removed={}",
            removed
        );
        Ok(removed)
    }
}

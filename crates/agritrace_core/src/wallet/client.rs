//! Wallet client contract and wire types.

use crate::model::amount::Amount;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

static ADDRESS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^0x[0-9a-fA-F]{40}$").expect("valid address regex"));

pub type WalletResult<T> = Result<T, WalletError>;

/// Errors surfaced by wallet providers and the bounded-call wrapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    /// No provider injected, or the provider could not be reached.
    Unavailable(String),
    /// The user or the contract refused the request.
    Rejected(String),
    InvalidAddress(String),
    TimedOut {
        operation: &'static str,
        timeout_ms: u128,
    },
    Cancelled {
        operation: &'static str,
    },
}

impl WalletError {
    /// Stable machine-readable code for logs.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unavailable(_) => "wallet_unavailable",
            Self::Rejected(_) => "wallet_rejected",
            Self::InvalidAddress(_) => "wallet_invalid_address",
            Self::TimedOut { .. } => "wallet_timeout",
            Self::Cancelled { .. } => "wallet_cancelled",
        }
    }
}

impl Display for WalletError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(message) => write!(f, "wallet unavailable: {message}"),
            Self::Rejected(message) => write!(f, "wallet request rejected: {message}"),
            Self::InvalidAddress(value) => write!(f, "invalid account address: `{value}`"),
            Self::TimedOut {
                operation,
                timeout_ms,
            } => write!(f, "wallet {operation} timed out after {timeout_ms} ms"),
            Self::Cancelled { operation } => write!(f, "wallet {operation} was cancelled"),
        }
    }
}

impl Error for WalletError {}

/// Hex account address (`0x` + 40 hex digits), case preserved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountAddress(String);

impl AccountAddress {
    pub fn parse(raw: &str) -> WalletResult<Self> {
        let trimmed = raw.trim();
        if ADDRESS_RE.is_match(trimmed) {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(WalletError::InvalidAddress(trimmed.to_string()))
        }
    }

    /// Wraps a constant known to be well-formed.
    pub(super) fn from_static(value: &'static str) -> Self {
        Self(value.to_string())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for AccountAddress {
    type Error = WalletError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<AccountAddress> for String {
    fn from(value: AccountAddress) -> Self {
        value.0
    }
}

impl Display for AccountAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Arguments of the opaque `create_batch` ledger write.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchRequest {
    pub batch_id: String,
    pub name: String,
    pub quantity_kg: Amount,
    pub price_per_unit: Amount,
    pub origin: String,
}

/// Provider acknowledgement of a submitted batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReceipt {
    pub tx_ref: String,
    pub batch_id: String,
    pub submitted_at: DateTime<Utc>,
}

/// Browser-injected wallet capability.
pub trait WalletClient: Send + Sync {
    fn connected_account(&self) -> WalletResult<AccountAddress>;
    fn create_batch(&self, request: &BatchRequest) -> WalletResult<BatchReceipt>;
}

impl<T: WalletClient + ?Sized> WalletClient for Arc<T> {
    fn connected_account(&self) -> WalletResult<AccountAddress> {
        (**self).connected_account()
    }

    fn create_batch(&self, request: &BatchRequest) -> WalletResult<BatchReceipt> {
        (**self).create_batch(request)
    }
}

#[cfg(test)]
mod tests {
    use super::{AccountAddress, WalletError};

    #[test]
    fn address_accepts_mixed_case_hex() {
        let address = AccountAddress::parse(" 0x742d35Cc6634C0532925a3b8D404d00Ca11da58F ").unwrap();
        assert_eq!(address.as_str(), "0x742d35Cc6634C0532925a3b8D404d00Ca11da58F");
    }

    #[test]
    fn address_rejects_short_or_non_hex_values() {
        assert!(matches!(
            AccountAddress::parse("0x1234"),
            Err(WalletError::InvalidAddress(_))
        ));
        assert!(AccountAddress::parse("0xZZ2d35Cc6634C0532925a3b8D404d00Ca11da58F").is_err());
    }
}

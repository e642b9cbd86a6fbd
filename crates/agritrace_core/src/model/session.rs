//! Signed-in user context handed to role views.

use crate::model::profile::Dataset;
use crate::model::record::CollectionKey;
use crate::wallet::client::AccountAddress;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Slot holding the current session.
pub const SESSION_SLOT: &str = "agritrace-user";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Farmer,
    Distributor,
    Retailer,
    Consumer,
}

impl Role {
    pub const ALL: [Role; 4] = [
        Role::Farmer,
        Role::Distributor,
        Role::Retailer,
        Role::Consumer,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Farmer => "farmer",
            Self::Distributor => "distributor",
            Self::Retailer => "retailer",
            Self::Consumer => "consumer",
        }
    }

    /// Route of the role dashboard.
    pub fn dashboard_path(self) -> String {
        format!("/dashboard/{}", self.as_str())
    }

    /// Record collection owned by this role; consumers own none.
    pub fn collection(self) -> Option<CollectionKey> {
        match self {
            Self::Farmer => Some(CollectionKey::FarmerCrops),
            Self::Distributor => Some(CollectionKey::DistributorStock),
            Self::Retailer => Some(CollectionKey::RetailerInventory),
            Self::Consumer => None,
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == normalized)
            .ok_or_else(|| {
                format!(
                    "unsupported role `{}`; expected farmer|distributor|retailer|consumer",
                    value.trim()
                )
            })
    }
}

/// Current user context `{address, role, connectedAt}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSession {
    pub address: AccountAddress,
    pub role: Role,
    pub connected_at: DateTime<Utc>,
}

impl Dataset for UserSession {
    const SLOT: &'static str = SESSION_SLOT;
}

#[cfg(test)]
mod tests {
    use super::Role;
    use crate::model::record::CollectionKey;

    #[test]
    fn role_parses_case_insensitively() {
        assert_eq!(" Retailer ".parse::<Role>(), Ok(Role::Retailer));
        assert!("admin".parse::<Role>().is_err());
    }

    #[test]
    fn role_maps_to_dashboard_and_collection() {
        assert_eq!(Role::Farmer.dashboard_path(), "/dashboard/farmer");
        assert_eq!(
            Role::Distributor.collection(),
            Some(CollectionKey::DistributorStock)
        );
        assert_eq!(Role::Consumer.collection(), None);
    }
}

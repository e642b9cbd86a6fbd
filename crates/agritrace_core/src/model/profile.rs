//! Profile and settings datasets kept next to the record collections.
//!
//! Each dataset occupies one slot and falls back to its default when the
//! slot is missing or unreadable.

use crate::model::session::Role;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A single-slot dataset with a default value.
pub trait Dataset: Serialize + DeserializeOwned {
    const SLOT: &'static str;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FarmerProfile {
    pub name: String,
    pub farm_location: String,
    pub contact_number: String,
    pub farm_size: String,
}

impl Dataset for FarmerProfile {
    const SLOT: &'static str = "farmer-profile";
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DistributorProfile {
    pub name: String,
    pub company_name: String,
    pub contact_number: String,
    pub license_number: String,
}

impl Dataset for DistributorProfile {
    const SLOT: &'static str = "distributor-profile";
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RetailerProfile {
    pub name: String,
    pub store_name: String,
    pub store_location: String,
    pub contact_number: String,
    pub gst_number: String,
}

impl Dataset for RetailerProfile {
    const SLOT: &'static str = "retailer-profile";
}

/// Role-independent account profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccountProfile {
    pub display_name: String,
    pub email: String,
    pub organization: String,
    pub location: String,
    pub bio: String,
}

impl AccountProfile {
    /// Profile shown before the user saves one.
    pub fn default_for(role: Role) -> Self {
        let display_name = match role {
            Role::Farmer => "Farm Manager",
            Role::Distributor => "Logistics Manager",
            Role::Retailer => "Store Manager",
            Role::Consumer => "User",
        };
        Self {
            display_name: display_name.to_string(),
            ..Self::default()
        }
    }
}

impl Dataset for AccountProfile {
    const SLOT: &'static str = "agritrace-profile";
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    System,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationSettings {
    pub email: bool,
    pub push: bool,
    pub batch_updates: bool,
    pub security_alerts: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            email: true,
            push: true,
            batch_updates: true,
            security_alerts: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrivacySettings {
    pub data_sharing: bool,
    pub analytics: bool,
    pub public_profile: bool,
}

impl Default for PrivacySettings {
    fn default() -> Self {
        Self {
            data_sharing: false,
            analytics: true,
            public_profile: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    pub compact_mode: bool,
    pub show_tips: bool,
    pub animated_ui: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            compact_mode: false,
            show_tips: true,
            animated_ui: true,
        }
    }
}

/// User preferences. Nested keys are snake_case on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub theme: Theme,
    pub notifications: NotificationSettings,
    pub privacy: PrivacySettings,
    pub display: DisplaySettings,
}

impl Dataset for Settings {
    const SLOT: &'static str = "agritrace-settings";
}

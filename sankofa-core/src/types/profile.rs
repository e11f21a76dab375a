//! User profile types.
//!
//! Profiles are client-side state; the on-chain source of truth for the same
//! attributes is the text records attached at registration.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Preferred display currency.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Ether
    #[default]
    Eth,
    /// Sankofa token
    Sankofa,
}

/// Where the user is based.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Country name
    pub country: String,
    /// Optional region/state
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

/// Social profile links.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLinks {
    /// Personal website
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    /// Twitter handle
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    /// Instagram handle
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    /// LinkedIn profile
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
}

/// Display preferences.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    /// Display currency
    pub currency: Currency,
    /// UI language tag
    pub language: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            currency: Currency::Eth,
            language: "en".into(),
        }
    }
}

/// The current user's profile.
///
/// `is_ens_registered` always mirrors `ens_name.is_some()`; use
/// [`UserProfile::set_ens_name`] rather than writing either field directly.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Owning wallet address
    pub wallet_address: String,
    /// Registered name, e.g. "alice.sankofachain.eth"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ens_name: Option<String>,
    /// Display name
    pub name: String,
    /// Short biography
    pub bio: String,
    /// Avatar URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    /// Social links
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social_links: Option<SocialLinks>,
    /// Display preferences
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferences: Option<Preferences>,
    /// Whether a name is registered for this wallet
    #[serde(rename = "isENSRegistered")]
    pub is_ens_registered: bool,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// Creates an empty profile for a wallet.
    pub fn new(wallet_address: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            wallet_address: wallet_address.into(),
            ens_name: None,
            name: String::new(),
            bio: String::new(),
            avatar: None,
            location: None,
            social_links: None,
            preferences: None,
            is_ens_registered: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets or clears the registered name, keeping the flag in sync.
    pub fn set_ens_name(&mut self, ens_name: Option<String>) {
        self.is_ens_registered = ens_name.is_some();
        self.ens_name = ens_name;
    }

    /// Returns true if both name and bio are filled in.
    pub fn is_complete(&self) -> bool {
        !self.name.is_empty() && !self.bio.is_empty()
    }
}

/// Partial profile used by create and update.
///
/// Only supplied (`Some`) fields are applied. Nested structures are replaced
/// wholesale, not merged.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    /// Owning wallet address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallet_address: Option<String>,
    /// Registered name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ens_name: Option<String>,
    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Short biography
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// Avatar URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    /// Social links
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social_links: Option<SocialLinks>,
    /// Display preferences
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferences: Option<Preferences>,
}

impl ProfileUpdate {
    /// Shallow-merges the supplied fields into `profile` and stamps `updated_at`.
    pub fn apply_to(self, profile: &mut UserProfile) {
        if let Some(wallet_address) = self.wallet_address {
            profile.wallet_address = wallet_address;
        }
        if let Some(ens_name) = self.ens_name {
            profile.set_ens_name(Some(ens_name));
        }
        if let Some(name) = self.name {
            profile.name = name;
        }
        if let Some(bio) = self.bio {
            profile.bio = bio;
        }
        if self.avatar.is_some() {
            profile.avatar = self.avatar;
        }
        if self.location.is_some() {
            profile.location = self.location;
        }
        if self.social_links.is_some() {
            profile.social_links = self.social_links;
        }
        if self.preferences.is_some() {
            profile.preferences = self.preferences;
        }
        profile.updated_at = Utc::now();
    }

    /// Builds a complete profile from this update.
    ///
    /// Missing strings default to empty and missing preferences to ETH/"en".
    pub fn into_profile(self, wallet_address: String) -> UserProfile {
        let mut profile = UserProfile::new(wallet_address);
        profile.set_ens_name(self.ens_name);
        profile.name = self.name.unwrap_or_default();
        profile.bio = self.bio.unwrap_or_default();
        profile.avatar = self.avatar;
        profile.location = self.location;
        profile.social_links = self.social_links;
        profile.preferences = Some(self.preferences.unwrap_or_default());
        profile
    }
}

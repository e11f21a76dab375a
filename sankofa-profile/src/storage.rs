//! Persisted state, its versioned envelope, and the backend trait.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use sankofa_core::constants::{PROFILE_STORE_NAME, PROFILE_STORE_VERSION};
use sankofa_core::error::{Result, SankofaError};
use sankofa_core::types::UserProfile;

/// The durable part of the profile store.
///
/// Loading/error flags and the availability map are deliberately absent.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    /// Profile of the current user
    pub current_profile: Option<UserProfile>,
    /// Wallet address → full name
    #[serde(default)]
    pub ens_names: BTreeMap<String, String>,
}

/// Named, versioned wrapper written to storage.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// Store name
    pub name: String,
    /// Format version
    pub version: u32,
    /// Payload
    pub state: PersistedState,
}

impl Envelope {
    /// Wraps `state` with the current name and version.
    pub fn new(state: PersistedState) -> Self {
        Self {
            name: PROFILE_STORE_NAME.to_string(),
            version: PROFILE_STORE_VERSION,
            state,
        }
    }

    /// Unwraps the payload, rejecting foreign or incompatible envelopes.
    pub fn into_state(self) -> Result<PersistedState> {
        if self.name != PROFILE_STORE_NAME {
            return Err(SankofaError::StorageError(format!(
                "Unexpected store name '{}'",
                self.name
            )));
        }

        if self.version != PROFILE_STORE_VERSION {
            return Err(SankofaError::StorageVersionMismatch {
                name: self.name,
                expected: PROFILE_STORE_VERSION,
                actual: self.version,
            });
        }

        Ok(self.state)
    }

    /// Parses an envelope from JSON and unwraps it.
    pub fn decode(json: &str) -> Result<PersistedState> {
        serde_json::from_str::<Envelope>(json)?.into_state()
    }

    /// Serializes `state` inside a fresh envelope.
    pub fn encode(state: &PersistedState) -> Result<String> {
        Ok(serde_json::to_string_pretty(&Envelope::new(state.clone()))?)
    }
}

/// Backend holding the persisted profile state.
#[async_trait]
pub trait ProfileStorage: Send + Sync {
    /// Reads the stored state, or None if nothing was ever saved.
    async fn load(&self) -> Result<Option<PersistedState>>;

    /// Replaces the stored state.
    async fn save(&self, state: &PersistedState) -> Result<()>;

    /// Removes the stored state.
    async fn clear(&self) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_shape() {
        let mut state = PersistedState::default();
        state
            .ens_names
            .insert("0xabc".into(), "alice.sankofachain.eth".into());

        let json: serde_json::Value =
            serde_json::from_str(&Envelope::encode(&state).unwrap()).unwrap();

        assert_eq!(json["name"], "sankofa-user-profile");
        assert_eq!(json["version"], 1);
        assert!(json["state"]["currentProfile"].is_null());
        assert_eq!(json["state"]["ensNames"]["0xabc"], "alice.sankofachain.eth");
        assert!(json["state"].get("isLoading").is_none());
    }

    #[test]
    fn test_version_mismatch_rejected() {
        let json = r#"{"name":"sankofa-user-profile","version":2,"state":{"currentProfile":null,"ensNames":{}}}"#;

        match Envelope::decode(json) {
            Err(SankofaError::StorageVersionMismatch { expected, actual, .. }) => {
                assert_eq!(expected, 1);
                assert_eq!(actual, 2);
            }
            other => panic!("expected version mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_foreign_store_rejected() {
        let json = r#"{"name":"something-else","version":1,"state":{"currentProfile":null}}"#;
        assert!(matches!(
            Envelope::decode(json),
            Err(SankofaError::StorageError(_))
        ));
    }

    #[test]
    fn test_garbage_is_json_error() {
        assert!(matches!(
            Envelope::decode("not json"),
            Err(SankofaError::JsonError(_))
        ));
    }
}

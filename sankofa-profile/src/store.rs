//! Profile store.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use sankofa_core::constants::PARENT_DOMAIN;
use sankofa_core::error::{Result, SankofaError};
use sankofa_core::types::{ProfileUpdate, UserProfile};
use sankofa_core::validation::check_label;

use crate::memory::MemoryStorage;
use crate::storage::{PersistedState, ProfileStorage};

#[derive(Debug, Default)]
struct StoreState {
    current_profile: Option<UserProfile>,
    ens_names: BTreeMap<String, String>,
    ens_availability: HashMap<String, bool>,
    is_loading: bool,
    error: Option<String>,
}

impl StoreState {
    fn persisted(&self) -> PersistedState {
        PersistedState {
            current_profile: self.current_profile.clone(),
            ens_names: self.ens_names.clone(),
        }
    }

    /// Makes `profile` current and records its name mapping.
    fn install(&mut self, mut profile: UserProfile) -> UserProfile {
        let ens_name = profile.ens_name.take();
        profile.set_ens_name(ens_name);
        if let Some(name) = &profile.ens_name {
            self.ens_names
                .insert(profile.wallet_address.clone(), name.clone());
        }
        self.current_profile = Some(profile.clone());
        profile
    }
}

/// The current user's profile and known address → name mappings.
///
/// Mutations are applied under a lock and then written to the storage
/// backend, one at a time. A failed action leaves its message in
/// [`error`](Self::error) as well as returning it.
pub struct ProfileStore {
    storage: Arc<dyn ProfileStorage>,
    state: RwLock<StoreState>,
    writes: Mutex<()>,
}

impl ProfileStore {
    /// Creates an empty store over `storage` without reading it.
    pub fn new(storage: Arc<dyn ProfileStorage>) -> Self {
        Self {
            storage,
            state: RwLock::new(StoreState::default()),
            writes: Mutex::new(()),
        }
    }

    /// Creates an empty store backed by memory.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    /// Creates a store and loads whatever `storage` holds.
    pub async fn open(storage: Arc<dyn ProfileStorage>) -> Result<Self> {
        let store = Self::new(storage);
        store.hydrate().await?;
        Ok(store)
    }

    /// Replaces the durable part of the state with the stored copy.
    #[instrument(skip(self))]
    pub async fn hydrate(&self) -> Result<()> {
        let _write = self.writes.lock().await;
        if let Some(persisted) = self.storage.load().await? {
            let mut state = self.state.write();
            state.current_profile = persisted.current_profile;
            state.ens_names = persisted.ens_names;
            debug!(names = state.ens_names.len(), "Profile store hydrated");
        }
        Ok(())
    }

    /// Applies `f` and persists the result.
    async fn commit<T>(&self, f: impl FnOnce(&mut StoreState) -> Result<T>) -> Result<T> {
        let _write = self.writes.lock().await;

        let (value, snapshot) = {
            let mut state = self.state.write();
            match f(&mut state) {
                Ok(value) => (value, state.persisted()),
                Err(e) => {
                    state.error = Some(e.to_string());
                    return Err(e);
                }
            }
        };

        if let Err(e) = self.storage.save(&snapshot).await {
            warn!(error = %e, "Failed to persist profile state");
            self.state.write().error = Some(e.to_string());
            return Err(e);
        }

        Ok(value)
    }

    /// Like [`commit`](Self::commit), raising the loading flag meanwhile.
    async fn run<T>(&self, f: impl FnOnce(&mut StoreState) -> Result<T>) -> Result<T> {
        {
            let mut state = self.state.write();
            state.is_loading = true;
            state.error = None;
        }
        let result = self.commit(f).await;
        self.state.write().is_loading = false;
        result
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // ACTIONS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Replaces the current profile.
    pub async fn set_current_profile(&self, profile: Option<UserProfile>) -> Result<()> {
        self.commit(|state| {
            match profile {
                Some(profile) => {
                    state.install(profile);
                }
                None => state.current_profile = None,
            }
            Ok(())
        })
        .await
    }

    /// Records `address` → `ens_name`.
    pub async fn set_ens_name(&self, address: &str, ens_name: &str) -> Result<()> {
        self.commit(|state| {
            state
                .ens_names
                .insert(address.to_string(), ens_name.to_string());
            Ok(())
        })
        .await
    }

    /// Records a session-only availability verdict.
    pub fn set_ens_availability(&self, label: &str, available: bool) {
        self.state
            .write()
            .ens_availability
            .insert(label.to_string(), available);
    }

    /// Sets the loading flag.
    pub fn set_loading(&self, loading: bool) {
        self.state.write().is_loading = loading;
    }

    /// Sets or clears the error message.
    pub fn set_error(&self, error: Option<String>) {
        self.state.write().error = error;
    }

    /// Clears the error message.
    pub fn clear_error(&self) {
        self.state.write().error = None;
    }

    /// Makes `address` the current profile.
    ///
    /// Keeps the current profile if it already belongs to `address`, syncing
    /// its name from the mapping. Otherwise starts a blank profile that
    /// carries the mapped name, if any.
    #[instrument(skip(self))]
    pub async fn load_profile(&self, address: &str) -> Result<UserProfile> {
        self.run(|state| {
            let mapped = state.ens_names.get(address).cloned();

            let profile = match state.current_profile.take() {
                Some(mut current) if current.wallet_address == address => {
                    if mapped.is_some() && current.ens_name != mapped {
                        current.set_ens_name(mapped);
                    }
                    current
                }
                _ => {
                    debug!(address, "Starting fresh profile");
                    let mut profile = UserProfile::new(address);
                    profile.set_ens_name(mapped);
                    profile
                }
            };

            Ok(state.install(profile))
        })
        .await
    }

    /// Replaces the current profile with one built from `update`.
    ///
    /// The wallet address defaults to the current profile's.
    #[instrument(skip(self, update))]
    pub async fn create_profile(&self, update: ProfileUpdate) -> Result<UserProfile> {
        self.run(|state| {
            let wallet = update
                .wallet_address
                .clone()
                .or_else(|| {
                    state
                        .current_profile
                        .as_ref()
                        .map(|p| p.wallet_address.clone())
                })
                .ok_or_else(|| {
                    SankofaError::ValidationError("Wallet address is required".into())
                })?;

            let profile = update.into_profile(wallet);
            info!(wallet = %profile.wallet_address, "Created profile");
            Ok(state.install(profile))
        })
        .await
    }

    /// Shallow-merges `update` into the current profile.
    #[instrument(skip(self, update))]
    pub async fn update_profile(&self, update: ProfileUpdate) -> Result<UserProfile> {
        self.run(|state| {
            let mut profile = state
                .current_profile
                .clone()
                .ok_or_else(|| SankofaError::NoProfileLoaded("No profile to update".into()))?;

            update.apply_to(&mut profile);
            Ok(state.install(profile))
        })
        .await
    }

    /// Attaches `<label>.sankofachain.eth` to the current profile.
    #[instrument(skip(self))]
    pub async fn register_ens_name(&self, label: &str) -> Result<String> {
        self.run(|state| {
            let mut profile = state.current_profile.clone().ok_or_else(|| {
                SankofaError::NoProfileLoaded("No profile to update with ENS name".into())
            })?;
            check_label(label)?;

            let ens_name = format!("{}.{}", label, PARENT_DOMAIN);
            ProfileUpdate {
                ens_name: Some(ens_name.clone()),
                ..Default::default()
            }
            .apply_to(&mut profile);

            state.install(profile);
            info!(ens_name = %ens_name, "Name attached to profile");
            Ok(ens_name)
        })
        .await
    }

    /// Wipes memory and storage.
    pub async fn clear(&self) -> Result<()> {
        let _write = self.writes.lock().await;
        *self.state.write() = StoreState::default();
        self.storage.clear().await
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // SELECTORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Current profile.
    pub fn current_profile(&self) -> Option<UserProfile> {
        self.state.read().current_profile.clone()
    }

    /// Returns true while a profile action is running.
    pub fn is_loading(&self) -> bool {
        self.state.read().is_loading
    }

    /// Last error message.
    pub fn error(&self) -> Option<String> {
        self.state.read().error.clone()
    }

    /// Name recorded for `address`.
    pub fn get_ens_name(&self, address: &str) -> Option<String> {
        self.state.read().ens_names.get(address).cloned()
    }

    /// Availability recorded this session for `label`.
    pub fn check_ens_availability(&self, label: &str) -> Option<bool> {
        self.state.read().ens_availability.get(label).copied()
    }

    /// Returns true if the current profile has a name and a bio.
    pub fn is_profile_complete(&self) -> bool {
        self.state
            .read()
            .current_profile
            .as_ref()
            .map(UserProfile::is_complete)
            .unwrap_or(false)
    }

    /// Returns true if the current profile has a registered name.
    pub fn has_ens_name(&self) -> bool {
        self.state
            .read()
            .current_profile
            .as_ref()
            .map(|p| p.ens_name.is_some())
            .unwrap_or(false)
    }

    /// Every recorded address → name pair.
    pub fn ens_names(&self) -> BTreeMap<String, String> {
        self.state.read().ens_names.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;
    use sankofa_core::types::SocialLinks;
    use tempfile::tempdir;

    use crate::FileStorage;

    const ALICE: &str = "0x1111111111111111111111111111111111111111";
    const BOB: &str = "0x2222222222222222222222222222222222222222";

    #[tokio::test]
    async fn test_load_profile_is_idempotent() {
        let store = ProfileStore::in_memory();

        let first = store.load_profile(ALICE).await.unwrap();
        let second = store.load_profile(ALICE).await.unwrap();

        assert_eq!(first, second);
        assert!(first.name.is_empty());
        assert!(!first.is_ens_registered);
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn test_load_profile_carries_mapped_name() {
        let store = ProfileStore::in_memory();
        store
            .set_ens_name(ALICE, "alice.sankofachain.eth")
            .await
            .unwrap();

        let profile = store.load_profile(ALICE).await.unwrap();

        assert_eq!(profile.ens_name.as_deref(), Some("alice.sankofachain.eth"));
        assert!(profile.is_ens_registered);
        assert!(store.has_ens_name());
    }

    #[tokio::test]
    async fn test_load_profile_syncs_name_into_existing_profile() {
        let store = ProfileStore::in_memory();
        store
            .create_profile(ProfileUpdate {
                wallet_address: Some(ALICE.into()),
                name: Some("Alice".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        store
            .set_ens_name(ALICE, "alice.sankofachain.eth")
            .await
            .unwrap();

        let profile = store.load_profile(ALICE).await.unwrap();

        assert_eq!(profile.name, "Alice");
        assert_eq!(profile.ens_name.as_deref(), Some("alice.sankofachain.eth"));
        assert!(profile.is_ens_registered);
    }

    #[tokio::test]
    async fn test_switching_address_starts_fresh() {
        let store = ProfileStore::in_memory();
        store
            .create_profile(ProfileUpdate {
                wallet_address: Some(ALICE.into()),
                name: Some("Alice".into()),
                ..Default::default()
            })
            .await
            .unwrap();

        let profile = store.load_profile(BOB).await.unwrap();

        assert_eq!(profile.wallet_address, BOB);
        assert!(profile.name.is_empty());
    }

    #[tokio::test]
    async fn test_create_profile_records_name_mapping() {
        let store = ProfileStore::in_memory();

        let profile = store
            .create_profile(ProfileUpdate {
                wallet_address: Some(ALICE.into()),
                ens_name: Some("alice.sankofachain.eth".into()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert!(profile.is_ens_registered);
        assert_eq!(
            store.get_ens_name(ALICE).as_deref(),
            Some("alice.sankofachain.eth")
        );
        assert_eq!(profile.preferences.unwrap_or_default().language, "en");
    }

    #[tokio::test]
    async fn test_name_mapping_survives_clearing_the_profile() {
        let store = ProfileStore::in_memory();
        store
            .create_profile(ProfileUpdate {
                wallet_address: Some(ALICE.into()),
                ens_name: Some("alice.sankofachain.eth".into()),
                ..Default::default()
            })
            .await
            .unwrap();

        store.set_current_profile(None).await.unwrap();

        assert!(store.current_profile().is_none());
        assert!(!store.has_ens_name());
        assert_eq!(
            store.get_ens_name(ALICE).as_deref(),
            Some("alice.sankofachain.eth")
        );
    }

    #[tokio::test]
    async fn test_create_profile_needs_a_wallet() {
        let store = ProfileStore::in_memory();

        let err = store
            .create_profile(ProfileUpdate::default())
            .await
            .unwrap_err();

        assert!(matches!(err, SankofaError::ValidationError(_)));
        assert!(store.error().is_some());
        assert!(store.current_profile().is_none());
    }

    #[tokio::test]
    async fn test_update_changes_only_supplied_fields() {
        let store = ProfileStore::in_memory();
        store
            .create_profile(ProfileUpdate {
                wallet_address: Some(ALICE.into()),
                name: Some("Alice".into()),
                bio: Some("old".into()),
                social_links: Some(SocialLinks {
                    twitter: Some("@alice".into()),
                    ..Default::default()
                }),
                ..Default::default()
            })
            .await
            .unwrap();
        let before = store.current_profile().unwrap();

        let after = store
            .update_profile(ProfileUpdate {
                bio: Some("new".into()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(after.bio, "new");
        assert!(after.updated_at >= before.updated_at);
        let normalized = UserProfile {
            bio: before.bio.clone(),
            updated_at: before.updated_at,
            ..after
        };
        assert_eq!(normalized, before);
    }

    #[tokio::test]
    async fn test_update_without_profile_fails() {
        let store = ProfileStore::in_memory();

        let err = store
            .update_profile(ProfileUpdate::default())
            .await
            .unwrap_err();

        assert!(matches!(err, SankofaError::NoProfileLoaded(_)));
        assert_eq!(store.error().as_deref(), Some("No profile to update"));
    }

    #[tokio::test]
    async fn test_register_ens_name() {
        let store = ProfileStore::in_memory();
        store.load_profile(ALICE).await.unwrap();

        let name = store.register_ens_name("alice").await.unwrap();

        assert_eq!(name, "alice.sankofachain.eth");
        assert!(store.has_ens_name());
        assert!(store.current_profile().unwrap().is_ens_registered);
        assert_eq!(store.get_ens_name(ALICE).as_deref(), Some("alice.sankofachain.eth"));
    }

    #[tokio::test]
    async fn test_register_ens_name_validates_and_needs_profile() {
        let store = ProfileStore::in_memory();

        store.register_ens_name("alice").await.unwrap_err();
        assert_eq!(
            store.error().as_deref(),
            Some("No profile to update with ENS name")
        );

        store.load_profile(ALICE).await.unwrap();
        let err = store.register_ens_name("-bad-").await.unwrap_err();
        assert!(err.is_validation_error());
        assert!(!store.has_ens_name());
    }

    #[tokio::test]
    async fn test_selectors() {
        let store = ProfileStore::in_memory();
        assert!(!store.is_profile_complete());
        assert_eq!(store.check_ens_availability("alice"), None);

        store.set_ens_availability("alice", true);
        assert_eq!(store.check_ens_availability("alice"), Some(true));
        assert_eq!(store.check_ens_availability("Alice"), None);

        store
            .create_profile(ProfileUpdate {
                wallet_address: Some(ALICE.into()),
                name: Some("Alice".into()),
                bio: Some("Builder".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(store.is_profile_complete());

        store.set_error(Some("boom".into()));
        assert_eq!(store.error().as_deref(), Some("boom"));
        store.clear_error();
        assert_eq!(store.error(), None);

        store.set_loading(true);
        assert!(store.is_loading());
    }

    #[tokio::test]
    async fn test_flag_follows_name_on_set_current_profile() {
        let store = ProfileStore::in_memory();
        let mut profile = UserProfile::new(ALICE);
        profile.is_ens_registered = true;

        store.set_current_profile(Some(profile)).await.unwrap();

        assert!(!store.current_profile().unwrap().is_ens_registered);

        store.set_current_profile(None).await.unwrap();
        assert!(store.current_profile().is_none());
    }

    #[tokio::test]
    async fn test_persists_only_durable_state() {
        let storage = Arc::new(MemoryStorage::new());
        let store = ProfileStore::new(storage.clone());

        store.load_profile(ALICE).await.unwrap();
        store.set_ens_availability("alice", true);
        store.set_error(Some("transient".into()));

        let raw = storage.raw().unwrap();
        assert!(raw.contains("currentProfile"));
        assert!(!raw.contains("ensAvailability"));
        assert!(!raw.contains("transient"));
        assert_eq!(storage.save_count(), 1);
    }

    #[tokio::test]
    async fn test_file_round_trip_across_instances() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("profile.json");

        {
            let store = ProfileStore::open(Arc::new(FileStorage::new(&path)))
                .await
                .unwrap();
            store.load_profile(ALICE).await.unwrap();
            store.register_ens_name("alice").await.unwrap();
            store.set_ens_availability("bob42", false);
        }

        let store = ProfileStore::open(Arc::new(FileStorage::new(&path)))
            .await
            .unwrap();

        assert_eq!(
            store.current_profile().unwrap().ens_name.as_deref(),
            Some("alice.sankofachain.eth")
        );
        assert_eq!(store.get_ens_name(ALICE).as_deref(), Some("alice.sankofachain.eth"));
        assert_eq!(store.check_ens_availability("bob42"), None);
    }

    #[tokio::test]
    async fn test_clear_wipes_memory_and_storage() {
        let storage = Arc::new(MemoryStorage::new());
        let store = ProfileStore::new(storage.clone());
        store.load_profile(ALICE).await.unwrap();

        store.clear().await.unwrap();

        assert!(store.current_profile().is_none());
        assert!(storage.raw().is_none());
    }

    struct BrokenStorage {
        fail: AtomicBool,
    }

    #[async_trait]
    impl ProfileStorage for BrokenStorage {
        async fn load(&self) -> Result<Option<PersistedState>> {
            Ok(None)
        }

        async fn save(&self, _state: &PersistedState) -> Result<()> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(SankofaError::StorageError("disk full".into()));
            }
            Ok(())
        }

        async fn clear(&self) -> Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_save_failure_is_surfaced() {
        let store = ProfileStore::new(Arc::new(BrokenStorage {
            fail: AtomicBool::new(true),
        }));

        let err = store.load_profile(ALICE).await.unwrap_err();

        assert!(matches!(err, SankofaError::StorageError(_)));
        assert_eq!(store.error().as_deref(), Some("Storage error: disk full"));
        assert!(!store.is_loading());
    }
}

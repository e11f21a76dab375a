//! In-memory profile storage.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;

use sankofa_core::error::Result;

use crate::storage::{Envelope, PersistedState, ProfileStorage};

/// Keeps the serialized envelope in memory.
///
/// State goes through the same JSON envelope as the file backend, so a
/// version mismatch or malformed payload surfaces identically.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    /// Serialized envelope
    raw: RwLock<Option<String>>,
    /// Number of completed saves
    saves: AtomicU64,
}

impl MemoryStorage {
    /// Creates empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates storage pre-filled with a serialized envelope.
    pub fn from_json(json: impl Into<String>) -> Self {
        Self {
            raw: RwLock::new(Some(json.into())),
            saves: AtomicU64::new(0),
        }
    }

    /// Serialized envelope, if any.
    pub fn raw(&self) -> Option<String> {
        self.raw.read().clone()
    }

    /// Number of completed saves.
    pub fn save_count(&self) -> u64 {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProfileStorage for MemoryStorage {
    async fn load(&self) -> Result<Option<PersistedState>> {
        let raw = self.raw.read().clone();
        raw.map(|json| Envelope::decode(&json)).transpose()
    }

    async fn save(&self, state: &PersistedState) -> Result<()> {
        let json = Envelope::encode(state)?;
        *self.raw.write() = Some(json);
        self.saves.fetch_add(1, Ordering::SeqCst);
        debug!("Profile state saved in memory");
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        *self.raw.write() = None;
        Ok(())
    }
}

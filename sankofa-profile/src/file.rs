//! File-based profile storage.
//!
//! The envelope is written as pretty-printed JSON. Writes go to a sibling
//! temp file first and are renamed into place.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, instrument};

use sankofa_core::error::{Result, SankofaError};

use crate::storage::{Envelope, PersistedState, ProfileStorage};

/// Stores the profile envelope in a single JSON file.
///
/// # File Format
///
/// ```text
/// {
///   "name": "sankofa-user-profile",
///   "version": 1,
///   "state": { "currentProfile": {...} | null, "ensNames": {...} }
/// }
/// ```
#[derive(Clone, Debug)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Storage at `path`. Nothing is touched until the first save.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Returns the file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ProfileStorage for FileStorage {
    #[instrument(skip(self), fields(path = ?self.path))]
    async fn load(&self) -> Result<Option<PersistedState>> {
        if !fs::try_exists(&self.path).await? {
            debug!("No profile file yet");
            return Ok(None);
        }

        let json = fs::read_to_string(&self.path).await.map_err(|e| {
            SankofaError::IoError(std::io::Error::new(
                e.kind(),
                format!("Failed to read profile file: {}", e),
            ))
        })?;

        let state = Envelope::decode(&json)?;
        info!(
            has_profile = state.current_profile.is_some(),
            names = state.ens_names.len(),
            "Loaded profile state"
        );
        Ok(Some(state))
    }

    #[instrument(skip(self, state), fields(path = ?self.path))]
    async fn save(&self, state: &PersistedState) -> Result<()> {
        let json = Envelope::encode(state)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let temp_path = self.path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path).await?;
        file.write_all(json.as_bytes()).await?;
        file.sync_all().await?;

        fs::rename(&temp_path, &self.path).await?;

        debug!("Profile state saved");
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

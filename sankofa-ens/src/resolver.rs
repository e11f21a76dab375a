//! Best-effort name resolution with a short-lived cache.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use sankofa_cache::{CacheStats, TtlCache};
use sankofa_core::traits::{NameLookup, UnresolvedLookup};

use crate::names::{is_address, is_ens_name};

/// Combined answer for a name or an address.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// Resolved or supplied address
    pub address: Option<String>,
    /// Resolved or supplied name
    pub name: Option<String>,
    /// Avatar URL; never populated
    pub avatar: Option<String>,
}

/// Resolves names and addresses through a [`NameLookup`].
///
/// Lookup failures are logged and reported as unresolved. Only positive
/// answers are cached.
pub struct NameResolver {
    lookup: Arc<dyn NameLookup>,
    cache: TtlCache<String>,
}

impl NameResolver {
    /// Creates a resolver over `lookup` with the default 30 s cache.
    pub fn new(lookup: Arc<dyn NameLookup>) -> Self {
        Self {
            lookup,
            cache: TtlCache::new(),
        }
    }

    /// Resolves a dotted name to an address.
    #[instrument(skip(self))]
    pub async fn resolve_name(&self, name: &str) -> Option<String> {
        if !is_ens_name(name) {
            return None;
        }

        let key = format!("forward:{}", name);
        if let Some(address) = self.cache.get(&key) {
            debug!(name, "Cache hit");
            return Some(address);
        }

        match self.lookup.forward(name).await {
            Ok(Some(address)) => {
                self.cache.set(&key, address.clone());
                Some(address)
            }
            Ok(None) => None,
            Err(e) => {
                warn!(name, error = %e, "Forward lookup failed");
                None
            }
        }
    }

    /// Resolves an address to its primary name.
    #[instrument(skip(self))]
    pub async fn lookup_name(&self, address: &str) -> Option<String> {
        if !is_address(address) {
            return None;
        }

        let key = format!("reverse:{}", address);
        if let Some(name) = self.cache.get(&key) {
            debug!(address, "Cache hit");
            return Some(name);
        }

        match self.lookup.reverse(address).await {
            Ok(Some(name)) => {
                self.cache.set(&key, name.clone());
                Some(name)
            }
            Ok(None) => None,
            Err(e) => {
                warn!(address, error = %e, "Reverse lookup failed");
                None
            }
        }
    }

    /// Resolves whichever side of the pair is missing.
    pub async fn resolution(&self, name_or_address: &str) -> Resolution {
        if is_address(name_or_address) {
            Resolution {
                address: Some(name_or_address.to_string()),
                name: self.lookup_name(name_or_address).await,
                avatar: None,
            }
        } else if is_ens_name(name_or_address) {
            Resolution {
                address: self.resolve_name(name_or_address).await,
                name: Some(name_or_address.to_string()),
                avatar: None,
            }
        } else {
            Resolution::default()
        }
    }

    /// Drops all cached answers.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Cache statistics.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

impl Default for NameResolver {
    fn default() -> Self {
        Self::new(Arc::new(UnresolvedLookup))
    }
}

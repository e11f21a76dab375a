//! Collaborator traits.
//!
//! Wallet connectivity, transaction signing, and RPC transport live outside
//! this workspace. These traits are the only surface the core uses, so they
//! can be backed by a browser wallet bridge, a JSON-RPC client, or a test double.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{Node, TextRecord};

// ═══════════════════════════════════════════════════════════════════════════════
// WALLET
// ═══════════════════════════════════════════════════════════════════════════════

/// Supplies the connected account.
pub trait WalletProvider: Send + Sync {
    /// Connected address, if any.
    fn address(&self) -> Option<String>;

    /// Returns true if a wallet is connected.
    fn is_connected(&self) -> bool {
        self.address().is_some()
    }
}

/// A wallet whose connection state is fixed at construction.
#[derive(Clone, Debug, Default)]
pub struct StaticWallet {
    address: Option<String>,
}

impl StaticWallet {
    /// A wallet connected as `address`.
    pub fn connected(address: impl Into<String>) -> Self {
        Self {
            address: Some(address.into()),
        }
    }

    /// A wallet with nothing connected.
    pub fn disconnected() -> Self {
        Self { address: None }
    }
}

impl WalletProvider for StaticWallet {
    fn address(&self) -> Option<String> {
        self.address.clone()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// REGISTRAR
// ═══════════════════════════════════════════════════════════════════════════════

/// Read-only view of the subdomain registrar.
#[async_trait]
pub trait RegistrarReader: Send + Sync {
    /// Returns true if `label` can be registered.
    async fn available(&self, label: &str) -> Result<bool>;
}

/// Write access to the subdomain registrar.
///
/// Implementations sign and submit a transaction; the error message of a
/// rejected or reverted write is surfaced to the user verbatim.
#[async_trait]
pub trait RegistrarWriter: Send + Sync {
    /// Registers `label` with no text records.
    async fn register_basic(&self, label: &str) -> Result<Node>;

    /// Registers `label` and sets the given text records.
    async fn register(&self, label: &str, records: &[TextRecord]) -> Result<Node>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// REGISTRY
// ═══════════════════════════════════════════════════════════════════════════════

/// Read-only view of the name registry.
#[async_trait]
pub trait RegistryReader: Send + Sync {
    /// Owner of `node`, or the zero address if unowned.
    async fn owner(&self, node: [u8; 32]) -> Result<String>;

    /// Resolver of `node`, or the zero address if unset.
    async fn resolver(&self, node: [u8; 32]) -> Result<String>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// NAME LOOKUP
// ═══════════════════════════════════════════════════════════════════════════════

/// Forward and reverse name resolution.
#[async_trait]
pub trait NameLookup: Send + Sync {
    /// Resolves a full name to an address.
    async fn forward(&self, name: &str) -> Result<Option<String>>;

    /// Resolves an address to its primary name.
    async fn reverse(&self, address: &str) -> Result<Option<String>>;
}

/// Lookup that never resolves anything.
///
/// The registrar has no resolver wired up yet, so this is what the
/// application uses.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnresolvedLookup;

#[async_trait]
impl NameLookup for UnresolvedLookup {
    async fn forward(&self, _name: &str) -> Result<Option<String>> {
        Ok(None)
    }

    async fn reverse(&self, _address: &str) -> Result<Option<String>> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_wallet() {
        let wallet = StaticWallet::connected("0x1234");
        assert!(wallet.is_connected());
        assert_eq!(wallet.address().as_deref(), Some("0x1234"));

        assert!(!StaticWallet::disconnected().is_connected());
        assert!(!StaticWallet::default().is_connected());
    }
}

//! Protocol constants for Sankofa names.
//!
//! Contract addresses and the chain id are deployment configuration; they live
//! here so every crate agrees on the defaults.

use std::time::Duration;

// ═══════════════════════════════════════════════════════════════════════════════
// NAMING
// ═══════════════════════════════════════════════════════════════════════════════

/// Parent domain every label is registered under.
pub const PARENT_DOMAIN: &str = "sankofachain.eth";

/// Minimum label length in characters.
pub const MIN_LABEL_LENGTH: usize = 3;

/// Maximum label length in characters (DNS label limit).
pub const MAX_LABEL_LENGTH: usize = 63;

// ═══════════════════════════════════════════════════════════════════════════════
// TEXT RECORD KEYS
// ═══════════════════════════════════════════════════════════════════════════════

/// Display name text record key.
pub const TEXT_KEY_DISPLAY: &str = "display";

/// Bio text record key.
pub const TEXT_KEY_DESCRIPTION: &str = "description";

/// Website text record key.
pub const TEXT_KEY_URL: &str = "url";

/// Twitter handle text record key.
pub const TEXT_KEY_TWITTER: &str = "com.twitter";

/// Instagram handle text record key.
pub const TEXT_KEY_INSTAGRAM: &str = "com.instagram";

// ═══════════════════════════════════════════════════════════════════════════════
// CHAIN & CONTRACTS (Base Sepolia)
// ═══════════════════════════════════════════════════════════════════════════════

/// Chain id of the network the registrar is deployed on.
pub const CHAIN_ID: u64 = 84532;

/// Default Base Sepolia RPC URL when none is provided.
pub const DEFAULT_RPC_URL: &str = "https://sepolia.base.org";

/// Subdomain registrar contract.
pub const REGISTRAR_ADDRESS: &str = "0x910DDfaf66627797fb7CD50e664568E84EBb0E1a";

/// Name registry contract.
pub const REGISTRY_ADDRESS: &str = "0x7bd23bf843970570908f2fdbfeb42fcf0da32bd5";

/// Block explorer address page prefix.
pub const EXPLORER_ADDRESS_URL: &str = "https://basescan.org/address/";

/// Size of an Ethereum address in bytes.
pub const ETH_ADDRESS_SIZE: usize = 20;

/// Size of a keccak256 hash (namehash node) in bytes.
pub const KECCAK256_SIZE: usize = 32;

// ═══════════════════════════════════════════════════════════════════════════════
// TIMING
// ═══════════════════════════════════════════════════════════════════════════════

/// Input inactivity before an availability query is issued.
pub const AVAILABILITY_DEBOUNCE: Duration = Duration::from_millis(500);

/// Lifetime of cached availability and resolution answers.
pub const CACHE_TTL: Duration = Duration::from_secs(30);

/// Delay between a successful registration and the success callback.
pub const SUCCESS_CLOSE_DELAY: Duration = Duration::from_secs(2);

// ═══════════════════════════════════════════════════════════════════════════════
// PERSISTENCE
// ═══════════════════════════════════════════════════════════════════════════════

/// Name of the persisted profile store.
pub const PROFILE_STORE_NAME: &str = "sankofa-user-profile";

/// Current persisted profile store version.
pub const PROFILE_STORE_VERSION: u32 = 1;

// ═══════════════════════════════════════════════════════════════════════════════
// MESSAGES
// ═══════════════════════════════════════════════════════════════════════════════

/// Surfaced when the availability query fails.
pub const MSG_AVAILABILITY_FAILED: &str = "Failed to check availability";

/// Surfaced when a registration is attempted without a wallet.
pub const MSG_WALLET_NOT_CONNECTED: &str = "Wallet not connected";

/// Fallback when a write fails without a message.
pub const MSG_REGISTRATION_FAILED: &str = "Failed to register ENS subdomain";

/// Surfaced when a second registration is attempted while one is in flight.
pub const MSG_REGISTRATION_IN_PROGRESS: &str = "Registration already in progress";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_bounds() {
        assert_eq!(MIN_LABEL_LENGTH, 3);
        assert_eq!(MAX_LABEL_LENGTH, 63);
    }

    #[test]
    fn test_contract_addresses_well_formed() {
        for addr in [REGISTRAR_ADDRESS, REGISTRY_ADDRESS] {
            let hex_part = addr.strip_prefix("0x").unwrap();
            assert_eq!(hex_part.len(), ETH_ADDRESS_SIZE * 2);
            assert!(hex::decode(hex_part).is_ok());
        }
    }

    #[test]
    fn test_text_keys_unique() {
        let keys = [
            TEXT_KEY_DISPLAY,
            TEXT_KEY_DESCRIPTION,
            TEXT_KEY_URL,
            TEXT_KEY_TWITTER,
            TEXT_KEY_INSTAGRAM,
        ];

        for (i, a) in keys.iter().enumerate() {
            for (j, b) in keys.iter().enumerate() {
                if i != j {
                    assert_ne!(a, b);
                }
            }
        }
    }
}

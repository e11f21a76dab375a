//! Environment-driven CLI configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use sankofa_core::constants::{DEFAULT_RPC_URL, REGISTRAR_ADDRESS, REGISTRY_ADDRESS};
use sankofa_ens::RpcConfig;

/// Default profile file, relative to the working directory.
pub const DEFAULT_PROFILE_PATH: &str = ".sankofa/profile.json";

/// Settings read from the environment (and `.env`).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CliConfig {
    pub rpc_url: String,
    pub registrar_address: String,
    pub registry_address: String,
    pub profile_path: PathBuf,
    pub wallet_address: Option<String>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.into(),
            registrar_address: REGISTRAR_ADDRESS.into(),
            registry_address: REGISTRY_ADDRESS.into(),
            profile_path: PathBuf::from(DEFAULT_PROFILE_PATH),
            wallet_address: None,
        }
    }
}

impl CliConfig {
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            rpc_url: var("SANKOFA_RPC_URL").unwrap_or(defaults.rpc_url),
            registrar_address: var("SANKOFA_REGISTRAR_ADDRESS")
                .unwrap_or(defaults.registrar_address),
            registry_address: var("SANKOFA_REGISTRY_ADDRESS").unwrap_or(defaults.registry_address),
            profile_path: var("SANKOFA_PROFILE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.profile_path),
            wallet_address: var("SANKOFA_WALLET_ADDRESS"),
        }
    }

    /// RPC configuration, with an optional endpoint override.
    pub fn rpc_config(&self, rpc_url: Option<String>) -> RpcConfig {
        RpcConfig::new(rpc_url.unwrap_or_else(|| self.rpc_url.clone()))
            .with_contracts(&self.registrar_address, &self.registry_address)
    }
}

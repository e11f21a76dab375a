//! JSON-RPC reads against the registrar and registry contracts.
//!
//! Only view functions are called here, through `eth_call`. Writes need a
//! signing wallet and go through a [`RegistrarWriter`](sankofa_core::RegistrarWriter)
//! supplied by the host application.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use tracing::{debug, instrument, warn};

use sankofa_core::constants::{CHAIN_ID, DEFAULT_RPC_URL, REGISTRAR_ADDRESS, REGISTRY_ADDRESS};
use sankofa_core::error::{Result, SankofaError};
use sankofa_core::traits::{RegistrarReader, RegistryReader};

/// RPC client configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RpcConfig {
    /// JSON-RPC endpoint
    pub rpc_url: String,
    /// Registrar contract address
    pub registrar_address: String,
    /// Registry contract address
    pub registry_address: String,
    /// Expected chain id
    pub chain_id: u64,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.into(),
            registrar_address: REGISTRAR_ADDRESS.into(),
            registry_address: REGISTRY_ADDRESS.into(),
            chain_id: CHAIN_ID,
            timeout_seconds: 30,
        }
    }
}

impl RpcConfig {
    /// Creates a new configuration with the given RPC URL.
    pub fn new(rpc_url: impl Into<String>) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            ..Default::default()
        }
    }

    /// Overrides the contract addresses.
    pub fn with_contracts(
        mut self,
        registrar_address: impl Into<String>,
        registry_address: impl Into<String>,
    ) -> Self {
        self.registrar_address = registrar_address.into();
        self.registry_address = registry_address.into();
        self
    }

    /// Checks that the URL parses and the addresses are well formed.
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.rpc_url)
            .map_err(|e| SankofaError::ConfigError(format!("invalid RPC URL: {}", e)))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(SankofaError::ConfigError(format!(
                "unsupported RPC URL scheme: {}",
                url.scheme()
            )));
        }

        for (what, addr) in [
            ("registrar", &self.registrar_address),
            ("registry", &self.registry_address),
        ] {
            if !crate::names::is_address(addr) {
                return Err(SankofaError::ConfigError(format!(
                    "invalid {} address: {}",
                    what, addr
                )));
            }
        }

        Ok(())
    }
}

/// Read-only registrar/registry client over JSON-RPC.
pub struct RpcRegistrar {
    config: RpcConfig,
    http_client: reqwest::Client,
}

impl RpcRegistrar {
    /// Creates a client for the given RPC URL with default contracts.
    pub fn new(rpc_url: impl Into<String>) -> Result<Self> {
        Self::with_config(RpcConfig::new(rpc_url))
    }

    /// Creates a client with custom configuration.
    pub fn with_config(config: RpcConfig) -> Result<Self> {
        config.validate()?;

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| SankofaError::ConfigError(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &RpcConfig {
        &self.config
    }

    /// Checks that the endpoint serves the configured chain.
    ///
    /// Returns the chain id reported by `eth_chainId`.
    #[instrument(skip(self), fields(expected = self.config.chain_id))]
    pub async fn verify_chain(&self) -> Result<u64> {
        let result = self.rpc_result("eth_chainId", serde_json::json!([])).await?;
        let actual = u64::from_str_radix(result.strip_prefix("0x").unwrap_or(&result), 16)
            .map_err(|e| SankofaError::RpcError(format!("invalid chain id '{}': {}", result, e)))?;

        if actual != self.config.chain_id {
            warn!(actual, "Endpoint serves a different chain");
            return Err(SankofaError::ChainMismatch {
                expected: self.config.chain_id,
                actual,
            });
        }

        debug!(actual, "Chain verified");
        Ok(actual)
    }

    /// Performs an `eth_call` and returns the raw return data.
    #[instrument(skip(self, data))]
    async fn eth_call(&self, to: &str, data: &[u8]) -> Result<Vec<u8>> {
        let params = serde_json::json!([
            {
                "to": to,
                "data": format!("0x{}", hex::encode(data)),
            },
            "latest"
        ]);
        let result = self.rpc_result("eth_call", params).await?;

        let bytes = hex::decode(result.strip_prefix("0x").unwrap_or(&result))?;
        debug!(to, len = bytes.len(), "eth_call returned");
        Ok(bytes)
    }

    /// Sends one JSON-RPC request and returns its string `result`.
    async fn rpc_result(&self, method: &str, params: serde_json::Value) -> Result<String> {
        let request = serde_json::json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
            "id": 1
        });

        let response = self
            .http_client
            .post(&self.config.rpc_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| SankofaError::HttpError(e.to_string()))?;

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| SankofaError::HttpError(e.to_string()))?;

        if let Some(error) = json.get("error") {
            let message = error
                .get("message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| error.to_string());
            warn!(method, error = %message, "RPC returned an error");
            return Err(SankofaError::RpcError(message));
        }

        json.get("result")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .ok_or_else(|| SankofaError::RpcError("missing result".into()))
    }
}

#[async_trait]
impl RegistrarReader for RpcRegistrar {
    #[instrument(skip(self))]
    async fn available(&self, label: &str) -> Result<bool> {
        let data = encode_call_string("available(string)", label);
        let ret = self.eth_call(&self.config.registrar_address, &data).await?;
        decode_bool(&ret)
    }
}

#[async_trait]
impl RegistryReader for RpcRegistrar {
    #[instrument(skip(self, node), fields(node = %hex::encode(node)))]
    async fn owner(&self, node: [u8; 32]) -> Result<String> {
        let data = encode_call_bytes32("owner(bytes32)", &node);
        let ret = self.eth_call(&self.config.registry_address, &data).await?;
        decode_address(&ret)
    }

    #[instrument(skip(self, node), fields(node = %hex::encode(node)))]
    async fn resolver(&self, node: [u8; 32]) -> Result<String> {
        let data = encode_call_bytes32("resolver(bytes32)", &node);
        let ret = self.eth_call(&self.config.registry_address, &data).await?;
        decode_address(&ret)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ABI ENCODING
// ═══════════════════════════════════════════════════════════════════════════════

/// First four bytes of keccak256 of the function signature.
fn selector(signature: &str) -> [u8; 4] {
    let hash = Keccak256::digest(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// Big-endian 32-byte word holding `value`.
fn word(value: usize) -> [u8; 32] {
    let mut out = [0u8; 32];
    out[24..].copy_from_slice(&(value as u64).to_be_bytes());
    out
}

/// Encodes a call taking a single dynamic `string`.
fn encode_call_string(signature: &str, arg: &str) -> Vec<u8> {
    let bytes = arg.as_bytes();
    let padded_len = bytes.len().div_ceil(32) * 32;

    let mut data = Vec::with_capacity(4 + 64 + padded_len);
    data.extend_from_slice(&selector(signature));
    data.extend_from_slice(&word(0x20));
    data.extend_from_slice(&word(bytes.len()));
    data.extend_from_slice(bytes);
    data.resize(4 + 64 + padded_len, 0);
    data
}

/// Encodes a call taking a single `bytes32`.
fn encode_call_bytes32(signature: &str, arg: &[u8; 32]) -> Vec<u8> {
    let mut data = Vec::with_capacity(36);
    data.extend_from_slice(&selector(signature));
    data.extend_from_slice(arg);
    data
}

fn decode_bool(ret: &[u8]) -> Result<bool> {
    if ret.len() < 32 {
        return Err(SankofaError::AbiDecodeError(format!(
            "expected 32 bytes for bool, got {}",
            ret.len()
        )));
    }
    if ret[..31].iter().any(|&b| b != 0) || ret[31] > 1 {
        return Err(SankofaError::AbiDecodeError("bool word out of range".into()));
    }
    Ok(ret[31] == 1)
}

fn decode_address(ret: &[u8]) -> Result<String> {
    if ret.len() < 32 {
        return Err(SankofaError::AbiDecodeError(format!(
            "expected 32 bytes for address, got {}",
            ret.len()
        )));
    }
    Ok(format!("0x{}", hex::encode(&ret[12..32])))
}

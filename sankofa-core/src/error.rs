//! Error types for Sankofa names.
//!
//! Errors are grouped by where they surface: input validation, availability
//! lookups, wallet state, write transactions, the registration workflow, the
//! profile store, and the network/storage plumbing underneath them.

use thiserror::Error;

use crate::validation::LabelError;

/// Result type alias using `SankofaError`.
pub type Result<T> = std::result::Result<T, SankofaError>;

/// Main error type for all Sankofa operations.
#[derive(Debug, Error)]
pub enum SankofaError {
    // ═══════════════════════════════════════════════════════════════════════════
    // VALIDATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Label failed the syntax/length rules.
    #[error("{0}")]
    InvalidLabel(#[from] LabelError),

    /// Other input validation failed.
    #[error("Validation error: {0}")]
    ValidationError(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // AVAILABILITY ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// The availability query failed.
    #[error("Failed to check availability: {0}")]
    AvailabilityCheckFailed(String),

    /// The label is already registered.
    #[error("{0} is already taken")]
    LabelUnavailable(String),

    /// Availability has not been determined for the label yet.
    #[error("Availability of '{0}' is not known yet")]
    AvailabilityUnknown(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // WALLET & TRANSACTION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// No wallet is connected.
    #[error("Wallet not connected")]
    WalletNotConnected,

    /// The write transaction was rejected or reverted.
    #[error("{0}")]
    TransactionFailed(String),

    /// Another registration is still in flight.
    #[error("Registration already in progress")]
    RegistrationInProgress,

    // ═══════════════════════════════════════════════════════════════════════════
    // WORKFLOW ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// The requested step transition is not allowed from the current step.
    #[error("Cannot {action} from step '{step}'")]
    InvalidTransition {
        /// Step the workflow was in
        step: String,
        /// Attempted action
        action: String,
    },

    /// The workflow is processing and does not accept input.
    #[error("Registration is processing; input is locked")]
    WorkflowBusy,

    // ═══════════════════════════════════════════════════════════════════════════
    // PROFILE ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// A profile operation needs a loaded profile.
    #[error("{0}")]
    NoProfileLoaded(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // NETWORK ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// JSON-RPC call returned an error.
    #[error("RPC call failed: {0}")]
    RpcError(String),

    /// Contract return data could not be decoded.
    #[error("ABI decode error: {0}")]
    AbiDecodeError(String),

    /// The RPC endpoint serves a different chain.
    #[error("Wrong chain: expected {expected}, endpoint reports {actual}")]
    ChainMismatch {
        /// Configured chain id
        expected: u64,
        /// Chain id reported by the endpoint
        actual: u64,
    },

    // ═══════════════════════════════════════════════════════════════════════════
    // STORAGE & SERIALIZATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// File I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Invalid hex encoding.
    #[error("Invalid hex encoding: {0}")]
    HexError(#[from] hex::FromHexError),

    /// Persisted store was written by an incompatible version.
    #[error("Store '{name}' version mismatch: expected {expected}, got {actual}")]
    StorageVersionMismatch {
        /// Store name
        name: String,
        /// Version this build understands
        expected: u32,
        /// Version found on disk
        actual: u32,
    },

    /// Persisted store is unreadable.
    #[error("Storage error: {0}")]
    StorageError(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // CONFIGURATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl SankofaError {
    /// Returns true if this error is recoverable (can retry).
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SankofaError::HttpError(_)
                | SankofaError::RpcError(_)
                | SankofaError::AvailabilityCheckFailed(_)
                | SankofaError::TransactionFailed(_)
                | SankofaError::RegistrationInProgress
        )
    }

    /// Returns true if this is a validation error.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            SankofaError::InvalidLabel(_)
                | SankofaError::ValidationError(_)
                | SankofaError::LabelUnavailable(_)
                | SankofaError::AvailabilityUnknown(_)
        )
    }
}

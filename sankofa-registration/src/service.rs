//! Registrar write calls with wallet and in-flight gating.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{info, instrument, warn};

use sankofa_core::constants::{
    MSG_REGISTRATION_FAILED, MSG_REGISTRATION_IN_PROGRESS, MSG_WALLET_NOT_CONNECTED,
};
use sankofa_core::traits::{RegistrarWriter, WalletProvider};
use sankofa_core::types::{RegistrationResult, TextRecord};
use sankofa_core::validation::check_label;

/// Clears the in-flight flag when the attempt ends, even if it is dropped.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Submits registrations for the connected wallet.
///
/// Every attempt resolves to a [`RegistrationResult`]. Checks run in order:
/// wallet connected, no other attempt in flight, label valid. Only then is
/// the registrar called, exactly once.
pub struct RegistrationService {
    wallet: Arc<dyn WalletProvider>,
    writer: Arc<dyn RegistrarWriter>,
    registering: AtomicBool,
    error: RwLock<Option<String>>,
}

impl RegistrationService {
    /// Creates a service for `wallet` writing through `writer`.
    pub fn new(wallet: Arc<dyn WalletProvider>, writer: Arc<dyn RegistrarWriter>) -> Self {
        Self {
            wallet,
            writer,
            registering: AtomicBool::new(false),
            error: RwLock::new(None),
        }
    }

    /// Registers `label` with no text records.
    #[instrument(skip(self))]
    pub async fn register_basic(&self, label: &str) -> RegistrationResult {
        self.submit(label, None).await
    }

    /// Registers `label` and sets `records`, in order.
    #[instrument(skip(self, records), fields(records = records.len()))]
    pub async fn register_subdomain(&self, label: &str, records: &[TextRecord]) -> RegistrationResult {
        self.submit(label, Some(records)).await
    }

    async fn submit(&self, label: &str, records: Option<&[TextRecord]>) -> RegistrationResult {
        if !self.wallet.is_connected() {
            warn!(label, "Registration attempted without a wallet");
            return RegistrationResult::failure(MSG_WALLET_NOT_CONNECTED);
        }

        if self
            .registering
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return RegistrationResult::failure(MSG_REGISTRATION_IN_PROGRESS);
        }
        let _in_flight = InFlight(&self.registering);

        *self.error.write() = None;

        if let Err(e) = check_label(label) {
            return self.fail(e.to_string());
        }

        let outcome = match records {
            None => self.writer.register_basic(label).await,
            Some(records) => self.writer.register(label, records).await,
        };

        match outcome {
            Ok(node) => {
                info!(label, node = %node, "Registered subdomain");
                RegistrationResult::Success { node }
            }
            Err(e) => {
                let message = e.to_string();
                warn!(label, error = %message, "Registration failed");
                if message.is_empty() {
                    self.fail(MSG_REGISTRATION_FAILED.to_string())
                } else {
                    self.fail(message)
                }
            }
        }
    }

    fn fail(&self, message: String) -> RegistrationResult {
        *self.error.write() = Some(message.clone());
        RegistrationResult::failure(message)
    }

    /// Returns true while a write is outstanding.
    pub fn is_registering(&self) -> bool {
        self.registering.load(Ordering::SeqCst)
    }

    /// Message of the last failed attempt.
    pub fn error(&self) -> Option<String> {
        self.error.read().clone()
    }

    /// Clears the last failure message.
    pub fn clear_error(&self) {
        *self.error.write() = None;
    }

    /// Address of the connected wallet.
    pub fn wallet_address(&self) -> Option<String> {
        self.wallet.address()
    }
}

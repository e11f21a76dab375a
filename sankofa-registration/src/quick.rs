//! Single-label registration control.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::info;

use sankofa_core::constants::MIN_LABEL_LENGTH;
use sankofa_core::error::{Result, SankofaError};
use sankofa_core::types::{AvailabilityState, AvailabilityStatus, RegistrationResult};
use sankofa_ens::names::full_name;
use sankofa_ens::AvailabilityChecker;

use crate::{ensure_available, RegistrationService};

#[derive(Default)]
struct QuickState {
    label: String,
    expanded: bool,
}

/// Collapsible control that claims a name with basic registration.
pub struct QuickRegister {
    service: Arc<RegistrationService>,
    checker: Arc<AvailabilityChecker>,
    state: RwLock<QuickState>,
}

impl QuickRegister {
    /// Creates a collapsed control.
    pub fn new(service: Arc<RegistrationService>, checker: Arc<AvailabilityChecker>) -> Self {
        Self {
            service,
            checker,
            state: RwLock::new(QuickState::default()),
        }
    }

    /// Returns true if a wallet is connected.
    pub fn is_wallet_connected(&self) -> bool {
        self.service.wallet_address().is_some()
    }

    /// Shows the input.
    pub fn expand(&self) {
        self.state.write().expanded = true;
    }

    /// Hides the input and clears the label.
    pub fn cancel(&self) {
        let mut state = self.state.write();
        state.expanded = false;
        state.label.clear();
    }

    /// Returns true if the input is shown.
    pub fn is_expanded(&self) -> bool {
        self.state.read().expanded
    }

    /// Replaces the label, lower-cased.
    pub fn set_label(&self, value: &str) {
        self.state.write().label = value.to_lowercase();
    }

    /// Current label.
    pub fn label(&self) -> String {
        self.state.read().label.clone()
    }

    /// Runs a debounced availability check for the current label.
    pub async fn check_availability(&self) -> AvailabilityState {
        let label = self.label();
        self.checker.check(&label).await
    }

    /// Availability status for display.
    pub fn status(&self) -> AvailabilityStatus {
        self.checker.status()
    }

    /// Returns true if the label is long enough, known free, and no
    /// registration is running.
    pub fn can_register(&self) -> bool {
        let label = self.label();
        label.chars().count() >= MIN_LABEL_LENGTH
            && self.checker.is_available(&label)
            && !self.service.is_registering()
    }

    /// Last registration failure.
    pub fn error(&self) -> Option<String> {
        self.service.error()
    }

    /// Registers the current label.
    ///
    /// Returns the full name on success and collapses the control. On
    /// failure the label is kept and the message is available from
    /// [`error`](Self::error).
    pub async fn register(&self) -> Result<String> {
        let label = self.label();
        if self.service.is_registering() {
            return Err(SankofaError::RegistrationInProgress);
        }
        ensure_available(&self.checker, &label)?;

        match self.service.register_basic(&label).await {
            RegistrationResult::Success { node } => {
                let name = full_name(&label);
                info!(name = %name, node = %node, "Quick registration complete");
                self.cancel();
                Ok(name)
            }
            RegistrationResult::Failure { error } => Err(SankofaError::TransactionFailed(error)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use sankofa_core::traits::StaticWallet;

    use crate::testing::{MockReader, MockWriter, WriteCall, WALLET};

    fn control(writer: &Arc<MockWriter>, connected: bool) -> QuickRegister {
        let wallet = if connected {
            StaticWallet::connected(WALLET)
        } else {
            StaticWallet::disconnected()
        };
        let service = Arc::new(RegistrationService::new(Arc::new(wallet), writer.clone()));
        let checker = Arc::new(AvailabilityChecker::new(Arc::new(MockReader {
            taken: vec!["bob42"],
        })));
        QuickRegister::new(service, checker)
    }

    #[tokio::test(start_paused = true)]
    async fn test_register_available_label() {
        let writer = Arc::new(MockWriter::default());
        let quick = control(&writer, true);

        quick.expand();
        quick.set_label("Alice");
        quick.check_availability().await;
        assert!(quick.can_register());
        assert_eq!(quick.status().short_message(), "Available");

        let name = quick.register().await.unwrap();

        assert_eq!(name, "alice.sankofachain.eth");
        assert_eq!(writer.calls(), vec![WriteCall::Basic("alice".into())]);
        assert_eq!(quick.label(), "");
        assert!(!quick.is_expanded());
    }

    #[tokio::test(start_paused = true)]
    async fn test_taken_label_cannot_register() {
        let writer = Arc::new(MockWriter::default());
        let quick = control(&writer, true);

        quick.set_label("bob42");
        quick.check_availability().await;

        assert!(!quick.can_register());
        assert_eq!(quick.status().short_message(), "Already taken");
        assert!(matches!(
            quick.register().await,
            Err(SankofaError::LabelUnavailable(_))
        ));
        assert!(writer.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_label_cannot_register() {
        let writer = Arc::new(MockWriter::default());
        let quick = control(&writer, true);

        quick.set_label("al");
        quick.check_availability().await;

        assert!(!quick.can_register());
        assert_eq!(quick.status(), AvailabilityStatus::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_keeps_label() {
        let writer = Arc::new(MockWriter::failing("execution reverted"));
        let quick = control(&writer, true);

        quick.expand();
        quick.set_label("alice");
        quick.check_availability().await;

        let err = quick.register().await.unwrap_err();

        assert_eq!(err.to_string(), "execution reverted");
        assert_eq!(quick.error().as_deref(), Some("execution reverted"));
        assert_eq!(quick.label(), "alice");
        assert!(quick.is_expanded());
    }

    #[tokio::test(start_paused = true)]
    async fn test_disconnected_wallet() {
        let writer = Arc::new(MockWriter::default());
        let quick = control(&writer, false);
        assert!(!quick.is_wallet_connected());

        quick.set_label("alice");
        quick.check_availability().await;
        let err = quick.register().await.unwrap_err();

        assert_eq!(err.to_string(), "Wallet not connected");
        assert!(writer.calls().is_empty());
    }

    #[test]
    fn test_cancel_clears_label() {
        let writer = Arc::new(MockWriter::default());
        let quick = control(&writer, true);

        quick.expand();
        quick.set_label("alice");
        quick.cancel();

        assert_eq!(quick.label(), "");
        assert!(!quick.is_expanded());
    }
}

//! # Sankofa Registration
//!
//! Claiming a subdomain under `sankofachain.eth`.
//!
//! - [`RegistrationService`]: wallet and in-flight gating around the registrar
//!   write calls; failures come back as values.
//! - [`RegistrationWorkflow`]: the form → confirm → processing → success
//!   state machine, observable through a `watch` channel.
//! - [`QuickRegister`]: a single-label control using basic registration.
//!
//! ## Example
//!
//! ```rust,ignore
//! use sankofa_registration::{RegistrationService, RegistrationWorkflow};
//!
//! let service = Arc::new(RegistrationService::new(wallet, writer));
//! let workflow = RegistrationWorkflow::new(service, checker);
//!
//! workflow.open();
//! workflow.set_field(FormField::Label, "Alice")?;
//! workflow.set_field(FormField::DisplayName, "Alice Johnson")?;
//! workflow.check_availability().await;
//! workflow.next()?;
//! let result = workflow.register().await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod quick;
mod service;
mod workflow;

#[cfg(test)]
mod testing;

pub use quick::QuickRegister;
pub use service::RegistrationService;
pub use workflow::{
    ConfirmSummary, FormData, FormField, RegistrationMode, RegistrationWorkflow, WorkflowConfig,
    WorkflowState, WorkflowStep,
};

use sankofa_core::error::{Result, SankofaError};
use sankofa_ens::names::full_name;
use sankofa_ens::AvailabilityChecker;

/// Fails unless the checker reports `label` as current and free.
fn ensure_available(checker: &AvailabilityChecker, label: &str) -> Result<()> {
    let state = checker.state();
    if state.is_available(label) {
        return Ok(());
    }

    if state.label == label && !state.is_loading && state.available == Some(false) {
        return Err(SankofaError::LabelUnavailable(full_name(label)));
    }

    Err(SankofaError::AvailabilityUnknown(label.to_string()))
}

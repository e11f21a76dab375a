//! Registration workflow state machine.
//!
//! ```text
//! Form ──next──▶ Confirm ──register──▶ Processing ──▶ Success ──(delay)──▶ closed
//!   ▲               │                      │
//!   └─────back──────┘◀──────failure────────┘
//! ```
//!
//! Every state change is published on a `watch` channel.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use sankofa_core::constants::SUCCESS_CLOSE_DELAY;
use sankofa_core::error::{Result, SankofaError};
use sankofa_core::types::{AvailabilityState, RegistrationResult, TextRecord};
use sankofa_core::validation::check_label;
use sankofa_ens::names::{full_name, truncate_address};
use sankofa_ens::AvailabilityChecker;

use crate::{ensure_available, RegistrationService};

// ═══════════════════════════════════════════════════════════════════════════════
// STATE
// ═══════════════════════════════════════════════════════════════════════════════

/// Workflow step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowStep {
    /// Collecting input
    #[default]
    Form,
    /// Reviewing before submission
    Confirm,
    /// Write outstanding
    Processing,
    /// Name registered
    Success,
}

impl fmt::Display for WorkflowStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WorkflowStep::Form => "form",
            WorkflowStep::Confirm => "confirm",
            WorkflowStep::Processing => "processing",
            WorkflowStep::Success => "success",
        };
        f.write_str(name)
    }
}

/// Editable form field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormField {
    /// Subdomain label; lower-cased on input
    Label,
    /// Display name; required
    DisplayName,
    /// Free-form bio
    Bio,
    /// Website URL
    Website,
    /// Twitter handle
    Twitter,
    /// Instagram handle
    Instagram,
}

/// Form contents.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormData {
    /// Subdomain label
    pub label: String,
    /// Display name
    pub display_name: String,
    /// Bio
    pub bio: String,
    /// Website
    pub website: String,
    /// Twitter handle
    pub twitter: String,
    /// Instagram handle
    pub instagram: String,
}

impl FormData {
    fn set(&mut self, field: FormField, value: &str) {
        match field {
            FormField::Label => self.label = value.to_lowercase(),
            FormField::DisplayName => self.display_name = value.to_string(),
            FormField::Bio => self.bio = value.to_string(),
            FormField::Website => self.website = value.to_string(),
            FormField::Twitter => self.twitter = value.to_string(),
            FormField::Instagram => self.instagram = value.to_string(),
        }
    }

    /// Text records for a full registration.
    pub fn records(&self) -> Vec<TextRecord> {
        TextRecord::profile_records(
            &self.display_name,
            &self.bio,
            &self.website,
            &self.twitter,
            &self.instagram,
        )
    }
}

/// Observable workflow state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowState {
    /// Whether the workflow is shown
    pub is_open: bool,
    /// Current step
    pub step: WorkflowStep,
    /// Form contents
    pub form: FormData,
    /// Message of the last failed write
    pub registration_error: Option<String>,
    /// Full name once registered
    pub registered_name: Option<String>,
}

/// Read-only summary shown before submission.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmSummary {
    /// `<label>.sankofachain.eth`
    pub full_name: String,
    /// Display name
    pub display_name: String,
    /// Connected wallet as `0x1234...abcd`
    pub wallet: Option<String>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// CONFIG
// ═══════════════════════════════════════════════════════════════════════════════

/// Which registrar entry point to call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationMode {
    /// Label only
    Basic,
    /// Label plus text records
    #[default]
    Full,
}

/// Workflow configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkflowConfig {
    /// Registrar entry point
    pub mode: RegistrationMode,
    /// Pause on the success step before closing, in milliseconds
    pub success_delay_ms: u64,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            mode: RegistrationMode::Full,
            success_delay_ms: SUCCESS_CLOSE_DELAY.as_millis() as u64,
        }
    }
}

impl WorkflowConfig {
    /// Default configuration with a different entry point.
    pub fn with_mode(mode: RegistrationMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }
}

type SuccessCallback = Arc<dyn Fn(&str) + Send + Sync>;

// ═══════════════════════════════════════════════════════════════════════════════
// WORKFLOW
// ═══════════════════════════════════════════════════════════════════════════════

/// Drives a single registration from input to confirmation.
pub struct RegistrationWorkflow {
    service: Arc<RegistrationService>,
    checker: Arc<AvailabilityChecker>,
    config: WorkflowConfig,
    state: watch::Sender<WorkflowState>,
    session: AtomicU64,
    on_success: Option<SuccessCallback>,
}

impl RegistrationWorkflow {
    /// Creates a closed workflow with default configuration.
    pub fn new(service: Arc<RegistrationService>, checker: Arc<AvailabilityChecker>) -> Self {
        Self::with_config(service, checker, WorkflowConfig::default())
    }

    /// Creates a closed workflow with custom configuration.
    pub fn with_config(
        service: Arc<RegistrationService>,
        checker: Arc<AvailabilityChecker>,
        config: WorkflowConfig,
    ) -> Self {
        let (state, _) = watch::channel(WorkflowState::default());
        Self {
            service,
            checker,
            config,
            state,
            session: AtomicU64::new(0),
            on_success: None,
        }
    }

    /// Sets the callback invoked with the full name after a registration.
    pub fn on_success(mut self, callback: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_success = Some(Arc::new(callback));
        self
    }

    /// Subscribes to state changes.
    pub fn subscribe(&self) -> watch::Receiver<WorkflowState> {
        self.state.subscribe()
    }

    /// Current state.
    pub fn state(&self) -> WorkflowState {
        self.state.borrow().clone()
    }

    /// Current step.
    pub fn step(&self) -> WorkflowStep {
        self.state.borrow().step
    }

    /// Opens the workflow on an empty form.
    pub fn open(&self) {
        self.session.fetch_add(1, Ordering::SeqCst);
        self.service.clear_error();
        self.state.send_replace(WorkflowState {
            is_open: true,
            ..Default::default()
        });
        debug!("Workflow opened");
    }

    /// Hides and resets the workflow.
    ///
    /// An outstanding write is not cancelled; its outcome no longer changes
    /// the state.
    pub fn close(&self) {
        self.session.fetch_add(1, Ordering::SeqCst);
        self.state.send_replace(WorkflowState::default());
        debug!("Workflow closed");
    }

    /// Applies `f` if it succeeds; publishes only on success.
    fn transition(&self, f: impl FnOnce(&mut WorkflowState) -> Result<()>) -> Result<()> {
        let mut outcome = Ok(());
        self.state.send_if_modified(|state| match f(state) {
            Ok(()) => true,
            Err(e) => {
                outcome = Err(e);
                false
            }
        });
        outcome
    }

    /// Edits a form field.
    ///
    /// Editing the label clears any surfaced registration error.
    pub fn set_field(&self, field: FormField, value: &str) -> Result<()> {
        self.transition(|state| {
            match state.step {
                WorkflowStep::Form => {}
                WorkflowStep::Processing => return Err(SankofaError::WorkflowBusy),
                step => return Err(invalid(step, "edit the form")),
            }
            state.form.set(field, value);
            if field == FormField::Label {
                state.registration_error = None;
            }
            Ok(())
        })?;

        if field == FormField::Label {
            self.service.clear_error();
        }
        Ok(())
    }

    /// Runs a debounced availability check for the current label.
    pub async fn check_availability(&self) -> AvailabilityState {
        let label = self.state.borrow().form.label.clone();
        self.checker.check(&label).await
    }

    /// Returns true if the form may advance to confirmation.
    pub fn can_proceed(&self) -> bool {
        let form = self.state.borrow().form.clone();
        self.ready(&form).is_ok()
    }

    fn ready(&self, form: &FormData) -> Result<()> {
        check_label(&form.label)?;
        if form.display_name.is_empty() {
            return Err(SankofaError::ValidationError(
                "Display name is required".into(),
            ));
        }
        ensure_available(&self.checker, &form.label)
    }

    /// Advances from the form to confirmation.
    pub fn next(&self) -> Result<()> {
        self.transition(|state| {
            match state.step {
                WorkflowStep::Form => {}
                WorkflowStep::Processing => return Err(SankofaError::WorkflowBusy),
                step => return Err(invalid(step, "continue")),
            }
            self.ready(&state.form)?;
            state.step = WorkflowStep::Confirm;
            Ok(())
        })
    }

    /// Returns from confirmation to the form, keeping its data.
    pub fn back(&self) -> Result<()> {
        self.transition(|state| match state.step {
            WorkflowStep::Confirm => {
                state.step = WorkflowStep::Form;
                Ok(())
            }
            WorkflowStep::Processing => Err(SankofaError::WorkflowBusy),
            step => Err(invalid(step, "go back")),
        })
    }

    /// Summary of what will be registered.
    pub fn summary(&self) -> ConfirmSummary {
        let state = self.state.borrow();
        ConfirmSummary {
            full_name: full_name(&state.form.label),
            display_name: state.form.display_name.clone(),
            wallet: self.service.wallet_address().map(|a| truncate_address(&a)),
        }
    }

    /// Submits the registration.
    ///
    /// On success the state moves to `Success`, and after the configured
    /// delay the success callback runs and the workflow closes. On failure
    /// the state returns to `Confirm` with the error set.
    #[instrument(skip(self))]
    pub async fn register(&self) -> Result<RegistrationResult> {
        let mut form = FormData::default();
        self.transition(|state| {
            match state.step {
                WorkflowStep::Confirm => {}
                WorkflowStep::Processing => return Err(SankofaError::WorkflowBusy),
                step => return Err(invalid(step, "register")),
            }
            self.ready(&state.form)?;
            state.step = WorkflowStep::Processing;
            state.registration_error = None;
            form = state.form.clone();
            Ok(())
        })?;

        let session = self.session.load(Ordering::SeqCst);
        self.service.clear_error();

        let result = match self.config.mode {
            RegistrationMode::Basic => self.service.register_basic(&form.label).await,
            RegistrationMode::Full => {
                self.service
                    .register_subdomain(&form.label, &form.records())
                    .await
            }
        };

        let name = full_name(&form.label);
        let current = self.session.load(Ordering::SeqCst) == session;

        match &result {
            RegistrationResult::Success { .. } => {
                info!(name = %name, "Registration complete");
                if current {
                    self.state.send_modify(|state| {
                        state.step = WorkflowStep::Success;
                        state.registered_name = Some(name.clone());
                    });
                    tokio::time::sleep(Duration::from_millis(self.config.success_delay_ms)).await;
                }
                if let Some(callback) = &self.on_success {
                    callback(&name);
                }
                if current && self.session.load(Ordering::SeqCst) == session {
                    self.close();
                }
            }
            RegistrationResult::Failure { error } => {
                warn!(name = %name, error = %error, "Registration failed");
                if current {
                    self.state.send_modify(|state| {
                        state.step = WorkflowStep::Confirm;
                        state.registration_error = Some(error.clone());
                    });
                }
            }
        }

        Ok(result)
    }
}

fn invalid(step: WorkflowStep, action: &str) -> SankofaError {
    SankofaError::InvalidTransition {
        step: step.to_string(),
        action: action.to_string(),
    }
}

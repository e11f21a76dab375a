//! Text records, registration results, and availability verdicts.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{
    TEXT_KEY_DESCRIPTION, TEXT_KEY_DISPLAY, TEXT_KEY_INSTAGRAM, TEXT_KEY_TWITTER, TEXT_KEY_URL,
};

// ═══════════════════════════════════════════════════════════════════════════════
// TEXT RECORDS
// ═══════════════════════════════════════════════════════════════════════════════

/// A key/value profile attribute attached to a registered name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRecord {
    /// Record key (e.g. "display", "com.twitter")
    pub key: String,
    /// Record value
    pub value: String,
}

impl TextRecord {
    /// Creates a new text record.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Builds the ordered record list for a full registration.
    ///
    /// `display` and `description` are always present; the optional social
    /// fields follow in fixed order and only when non-empty.
    pub fn profile_records(
        display_name: &str,
        bio: &str,
        website: &str,
        twitter: &str,
        instagram: &str,
    ) -> Vec<TextRecord> {
        let mut records = vec![
            TextRecord::new(TEXT_KEY_DISPLAY, display_name),
            TextRecord::new(TEXT_KEY_DESCRIPTION, bio),
        ];

        for (key, value) in [
            (TEXT_KEY_URL, website),
            (TEXT_KEY_TWITTER, twitter),
            (TEXT_KEY_INSTAGRAM, instagram),
        ] {
            if !value.is_empty() {
                records.push(TextRecord::new(key, value));
            }
        }

        records
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// REGISTRATION RESULTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Opaque identifier returned by the registrar for a registered name.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Node(pub String);

impl Node {
    /// Creates a node from its hex representation.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the node as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of a registration attempt.
///
/// Failures are values, not errors: callers render them directly.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RegistrationResult {
    /// The write transaction succeeded.
    Success {
        /// Node returned by the registrar
        node: Node,
    },
    /// The attempt failed before or during the write.
    Failure {
        /// Message to surface
        error: String,
    },
}

impl RegistrationResult {
    /// Creates a failure result.
    pub fn failure(error: impl Into<String>) -> Self {
        RegistrationResult::Failure { error: error.into() }
    }

    /// Returns true on success.
    pub fn is_success(&self) -> bool {
        matches!(self, RegistrationResult::Success { .. })
    }

    /// Returns the node on success.
    pub fn node(&self) -> Option<&Node> {
        match self {
            RegistrationResult::Success { node } => Some(node),
            RegistrationResult::Failure { .. } => None,
        }
    }

    /// Returns the error message on failure.
    pub fn error(&self) -> Option<&str> {
        match self {
            RegistrationResult::Success { .. } => None,
            RegistrationResult::Failure { error } => Some(error),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// AVAILABILITY
// ═══════════════════════════════════════════════════════════════════════════════

/// Snapshot of the availability checker for the current label.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityState {
    /// Latest debounced label
    pub label: String,
    /// `Some(true)` available, `Some(false)` taken, `None` unknown
    pub available: Option<bool>,
    /// Whether a query for `label` is outstanding
    pub is_loading: bool,
    /// Validation or query failure message
    pub error: Option<String>,
}

impl AvailabilityState {
    /// Returns true if `label` is the checked label and it is known to be free.
    pub fn is_available(&self, label: &str) -> bool {
        self.label == label && !self.is_loading && self.available == Some(true)
    }

    /// Classifies the snapshot for display.
    pub fn status(&self, full_name: impl Into<String>) -> AvailabilityStatus {
        if self.is_loading {
            return AvailabilityStatus::Checking;
        }

        if let Some(error) = &self.error {
            return AvailabilityStatus::Error(error.clone());
        }

        match self.available {
            Some(true) => AvailabilityStatus::Available(full_name.into()),
            Some(false) => AvailabilityStatus::Taken(full_name.into()),
            None => AvailabilityStatus::Idle,
        }
    }
}

/// Displayable availability status.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AvailabilityStatus {
    /// Nothing to show yet
    Idle,
    /// A query is in flight
    Checking,
    /// Validation or query failure
    Error(String),
    /// The full name is free
    Available(String),
    /// The full name is registered
    Taken(String),
}

impl AvailabilityStatus {
    /// Compact form for inline controls.
    pub fn short_message(&self) -> &str {
        match self {
            AvailabilityStatus::Idle => "",
            AvailabilityStatus::Checking => "Checking...",
            AvailabilityStatus::Error(_) => "Error",
            AvailabilityStatus::Available(_) => "Available",
            AvailabilityStatus::Taken(_) => "Already taken",
        }
    }
}

impl fmt::Display for AvailabilityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AvailabilityStatus::Idle => Ok(()),
            AvailabilityStatus::Checking => write!(f, "Checking availability..."),
            AvailabilityStatus::Error(error) => write!(f, "{}", error),
            AvailabilityStatus::Available(name) => write!(f, "{} is available!", name),
            AvailabilityStatus::Taken(name) => write!(f, "{} is already taken", name),
        }
    }
}

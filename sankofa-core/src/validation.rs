//! Label validation.
//!
//! Labels are the leaf segment registered under the parent domain:
//! - Length: 3-63 characters
//! - Characters: ASCII letters, digits, and hyphens
//! - No leading or trailing hyphen
//!
//! Rules are checked in that order and the first failure wins. Every path that
//! touches a label (availability, registration, profile) calls [`validate_label`]
//! so they never disagree.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{MAX_LABEL_LENGTH, MIN_LABEL_LENGTH};

/// Why a label was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelError {
    /// Empty or fewer than 3 characters.
    #[error("Label must be at least 3 characters long")]
    TooShort,
    /// More than 63 characters.
    #[error("Label must be less than 64 characters")]
    TooLong,
    /// Characters outside `[A-Za-z0-9-]`, or a hyphen at either end.
    #[error("Label can only contain letters, numbers, and hyphens (not at start/end)")]
    InvalidCharacters,
}

/// Outcome of validating a label.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelValidation {
    /// Whether the label may be registered
    pub valid: bool,
    /// First rule the label broke
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<LabelError>,
}

impl LabelValidation {
    /// Converts into a `Result`, for callers that want `?`.
    pub fn into_result(self) -> std::result::Result<(), LabelError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Validates a candidate label.
pub fn validate_label(label: &str) -> LabelValidation {
    match check_label(label) {
        Ok(()) => LabelValidation { valid: true, error: None },
        Err(err) => LabelValidation { valid: false, error: Some(err) },
    }
}

/// Validates a candidate label, returning the first broken rule.
pub fn check_label(label: &str) -> std::result::Result<(), LabelError> {
    let len = label.chars().count();

    if len < MIN_LABEL_LENGTH {
        return Err(LabelError::TooShort);
    }

    if len > MAX_LABEL_LENGTH {
        return Err(LabelError::TooLong);
    }

    if !matches_label_pattern(label) {
        return Err(LabelError::InvalidCharacters);
    }

    Ok(())
}

/// `^[A-Za-z0-9]([A-Za-z0-9-]*[A-Za-z0-9])?$`
fn matches_label_pattern(label: &str) -> bool {
    let bytes = label.as_bytes();

    let (Some(&first), Some(&last)) = (bytes.first(), bytes.last()) else {
        return false;
    };

    first.is_ascii_alphanumeric()
        && last.is_ascii_alphanumeric()
        && bytes.iter().all(|&b| b.is_ascii_alphanumeric() || b == b'-')
}

//! # Sankofa Core
//!
//! Core types, errors, and traits for registering names under `sankofachain.eth`.
//!
//! This crate provides the foundational building blocks used by all other Sankofa crates:
//!
//! - **Types**: Profiles, text records, availability verdicts, registration results
//! - **Validation**: The single label validator shared by every registration path
//! - **Errors**: Error taxonomy with classification helpers
//! - **Constants**: Parent domain, chain id, contract addresses, timing defaults
//! - **Traits**: Wallet and contract collaborators
//!
//! ## Example
//!
//! ```rust
//! use sankofa_core::validation::validate_label;
//!
//! assert!(validate_label("alice").valid);
//! assert!(!validate_label("al").valid);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod constants;
pub mod error;
pub mod traits;
pub mod types;
pub mod validation;

// Re-export commonly used items at crate root
pub use constants::*;
pub use error::{Result, SankofaError};
pub use traits::*;
pub use types::*;
pub use validation::{validate_label, LabelError, LabelValidation};

//! Domain types for Sankofa names.
//!
//! - [`profile`]: The locally cached user profile and its partial updates
//! - [`records`]: Text records, registration results, and availability verdicts

pub mod profile;
pub mod records;

pub use profile::{Currency, Location, Preferences, ProfileUpdate, SocialLinks, UserProfile};
pub use records::{
    AvailabilityState, AvailabilityStatus, Node, RegistrationResult, TextRecord,
};

//! # Sankofa Profile
//!
//! The current user's profile and the address → name mapping, persisted
//! through a pluggable backend:
//!
//! - **Memory**: keeps the serialized envelope in process, for tests and
//!   short-lived sessions
//! - **File**: writes the envelope to a JSON file atomically
//!
//! ## Example
//!
//! ```rust,ignore
//! use sankofa_profile::{FileStorage, ProfileStore};
//!
//! let store = ProfileStore::open(Arc::new(FileStorage::new("profile.json"))).await?;
//! store.load_profile("0x1234...").await?;
//! store.register_ens_name("alice").await?;
//! assert!(store.has_ens_name());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod file;
mod memory;
mod storage;
mod store;

pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use storage::{Envelope, PersistedState, ProfileStorage};
pub use store::ProfileStore;

//! # Sankofa ENS Integration
//!
//! Everything between a typed label and the registrar contract:
//! name formatting and hashing, JSON-RPC contract reads, the debounced
//! availability checker, and best-effort name resolution.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod availability;
pub mod names;
mod resolver;
mod rpc;

pub use availability::{AvailabilityChecker, AvailabilityConfig};
pub use resolver::{NameResolver, Resolution};
pub use rpc::{RpcConfig, RpcRegistrar};

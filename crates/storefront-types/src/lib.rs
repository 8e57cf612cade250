//! Common types for the storefront order core.
//!
//! This crate defines the domain model shared by every storefront component:
//! orders and their line items, authenticated principals, HTTP request and
//! response payloads, lifecycle events, and the configuration validation
//! helpers used by pluggable backends.

/// API types for HTTP endpoints and request/response structures.
pub mod api;
/// Lifecycle events published by the order engine.
pub mod events;
/// Order domain types: line items, statuses, payment methods.
pub mod order;
/// Authenticated identities attached to incoming requests.
pub mod principal;
/// Registry trait for self-registering backend implementations.
pub mod registry;
/// Redacting wrapper for bearer tokens and other secrets.
pub mod secret_string;
/// Storage namespaces.
pub mod storage;
/// Small formatting helpers.
pub mod utils;
/// Configuration validation types for backend configuration tables.
pub mod validation;

pub use api::*;
pub use events::*;
pub use order::*;
pub use principal::{Principal, Role};
pub use registry::ImplementationRegistry;
pub use secret_string::SecretString;
pub use storage::StorageKey;
pub use utils::truncate_id;
pub use validation::*;

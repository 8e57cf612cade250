//! Order lifecycle core for the storefront.
//!
//! The [`OrderEngine`] owns every rule about orders: how they are priced,
//! who may read or change them, and which status changes are allowed. It is
//! assembled from configuration by the [`OrderEngineBuilder`], which picks
//! the storage and auth backends from factory maps.

use storefront_auth::AuthError;
use storefront_pricing::PricingError;
use storefront_storage::StorageError;
use storefront_types::OrderStatus;
use thiserror::Error;

pub mod audit;
pub mod builder;
pub mod engine;
pub mod state;
pub mod stats;

pub use builder::{BuilderError, OrderEngineBuilder, OrderFactories};
pub use engine::{event_bus::EventBus, OrderEngine};

/// Errors returned by order operations.
#[derive(Debug, Error)]
pub enum OrderError {
	/// The request cannot be turned into a valid order.
	#[error("Invalid order input: {0}")]
	InvalidOrderInput(String),
	/// No valid credentials were presented.
	#[error("Not authorized, no valid token")]
	Unauthenticated,
	/// The caller is authenticated but may not perform the operation.
	#[error("Not authorized: {0}")]
	Forbidden(String),
	#[error("Order not found")]
	NotFound,
	/// The order's current status does not allow the operation.
	#[error("Cannot {action} an order that is {status}")]
	InvalidTransition {
		action: &'static str,
		status: OrderStatus,
	},
	/// The customer cancellation window has passed.
	#[error("Order can only be cancelled within {window_minutes} minutes of placing it")]
	WindowExpired { window_minutes: u64 },
	/// The requested status is unknown or may not be set by an administrator.
	#[error("Invalid status: {0}")]
	InvalidStatus(String),
	/// The order changed since it was read; the caller should reload and retry.
	#[error("Order was modified concurrently: {0}")]
	ConflictRetry(String),
	/// A backend failed.
	#[error("Internal failure: {0}")]
	InternalFailure(String),
}

impl From<StorageError> for OrderError {
	fn from(err: StorageError) -> Self {
		match err {
			StorageError::NotFound => OrderError::NotFound,
			StorageError::Conflict(message) => OrderError::ConflictRetry(message),
			other => OrderError::InternalFailure(other.to_string()),
		}
	}
}

impl From<PricingError> for OrderError {
	fn from(err: PricingError) -> Self {
		match err {
			PricingError::InvalidOrderInput(message) => OrderError::InvalidOrderInput(message),
		}
	}
}

impl From<AuthError> for OrderError {
	fn from(err: AuthError) -> Self {
		match err {
			AuthError::MissingToken | AuthError::InvalidToken => OrderError::Unauthenticated,
			other => OrderError::InternalFailure(other.to_string()),
		}
	}
}

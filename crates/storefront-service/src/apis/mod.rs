//! Request handlers for the storefront API.

pub mod admin;
pub mod auth;
pub mod order;

use storefront_core::OrderError;
use storefront_types::APIError;

/// Seconds a client should wait before retrying after a conflict.
const CONFLICT_RETRY_AFTER_SECS: u64 = 1;

/// Maps an engine error to its HTTP representation.
pub fn api_error(err: OrderError) -> APIError {
	let message = err.to_string();
	match err {
		OrderError::InvalidOrderInput(_) => APIError::bad_request("INVALID_ORDER_INPUT", message),
		OrderError::InvalidTransition { .. } => {
			APIError::bad_request("INVALID_TRANSITION", message)
		},
		OrderError::WindowExpired { .. } => {
			APIError::bad_request("CANCELLATION_WINDOW_EXPIRED", message)
		},
		OrderError::InvalidStatus(_) => APIError::bad_request("INVALID_STATUS", message),
		OrderError::Unauthenticated => APIError::unauthorized("UNAUTHENTICATED", message),
		OrderError::Forbidden(_) => APIError::unauthorized("FORBIDDEN", message),
		OrderError::NotFound => APIError::NotFound {
			error_type: "ORDER_NOT_FOUND".to_string(),
			message,
		},
		OrderError::ConflictRetry(_) => APIError::Conflict {
			error_type: "CONFLICT_RETRY".to_string(),
			message,
			retry_after: Some(CONFLICT_RETRY_AFTER_SECS),
		},
		OrderError::InternalFailure(_) => {
			tracing::error!(error = %message, "Request failed");
			APIError::InternalServerError {
				error_type: "INTERNAL_ERROR".to_string(),
				message: "Internal server error".to_string(),
			}
		},
	}
}

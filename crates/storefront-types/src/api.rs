//! API types for the storefront HTTP API.
//!
//! Request payloads mirror what the storefront client submits at checkout;
//! responses are the persisted [`Order`] documents themselves.

use crate::{DeliveryDetails, LineItem, Order, PaymentMethod};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Contact block of a checkout submission.
///
/// `email` is accepted so existing clients keep working, but it is never
/// stored; the order takes the authenticated principal's e-mail instead.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerDetailsInput {
	#[serde(default)]
	pub name: String,
	#[serde(default)]
	pub email: Option<String>,
	#[serde(default)]
	pub phone: String,
	#[serde(default)]
	pub address: String,
	#[serde(default)]
	pub city: Option<String>,
}

impl From<CustomerDetailsInput> for DeliveryDetails {
	fn from(input: CustomerDetailsInput) -> Self {
		DeliveryDetails {
			name: input.name,
			phone: input.phone,
			address: input.address,
			city: input.city,
		}
	}
}

/// Body of `POST /api/orders`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
	#[serde(default)]
	pub customer_details: CustomerDetailsInput,
	#[serde(default)]
	pub order_items: Vec<LineItem>,
	pub payment_method: PaymentMethod,
	/// Client-side total. Ignored; the server always recomputes it.
	#[serde(default)]
	pub total_price: Option<serde_json::Value>,
}

/// Body of `PUT /api/orders/{id}/status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateOrderStatusRequest {
	/// Requested status, validated by the engine.
	pub status: String,
	/// Version the caller last saw; a mismatch is rejected as a conflict.
	#[serde(default)]
	pub version: Option<u64>,
}

/// Query of `GET /api/orders`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListOrdersQuery {
	pub status: Option<String>,
}

/// Delivered sales for one UTC day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySales {
	pub date: NaiveDate,
	pub daily_total: Decimal,
}

/// Response of `GET /api/admin/stats`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStats {
	pub total_orders: usize,
	/// Sum of totals of delivered orders.
	pub total_sales: Decimal,
	pub daily_sales: Vec<DailySales>,
	pub recent_orders: Vec<Order>,
}

/// API error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
	/// Error type/code
	pub error: String,
	/// Human-readable description
	pub message: String,
	/// Additional error context
	pub details: Option<serde_json::Value>,
	/// Suggested retry delay in seconds
	#[serde(rename = "retryAfter")]
	pub retry_after: Option<u64>,
}

/// Structured API error type with HTTP status mapping.
#[derive(Debug)]
pub enum APIError {
	/// Malformed input or a rejected business rule (400)
	BadRequest {
		error_type: String,
		message: String,
		details: Option<serde_json::Value>,
	},
	/// Missing credentials or insufficient rights (401)
	Unauthorized { error_type: String, message: String },
	/// Unknown resource (404)
	NotFound { error_type: String, message: String },
	/// Concurrent modification; the client should reload and retry (409)
	Conflict {
		error_type: String,
		message: String,
		retry_after: Option<u64>,
	},
	/// Internal server error (500)
	InternalServerError { error_type: String, message: String },
}

impl APIError {
	pub fn bad_request(error_type: &str, message: impl Into<String>) -> Self {
		APIError::BadRequest {
			error_type: error_type.to_string(),
			message: message.into(),
			details: None,
		}
	}

	pub fn unauthorized(error_type: &str, message: impl Into<String>) -> Self {
		APIError::Unauthorized {
			error_type: error_type.to_string(),
			message: message.into(),
		}
	}

	/// Get the HTTP status code for this error.
	pub fn status_code(&self) -> u16 {
		match self {
			APIError::BadRequest { .. } => 400,
			APIError::Unauthorized { .. } => 401,
			APIError::NotFound { .. } => 404,
			APIError::Conflict { .. } => 409,
			APIError::InternalServerError { .. } => 500,
		}
	}

	/// Convert to ErrorResponse for JSON serialization.
	pub fn to_error_response(&self) -> ErrorResponse {
		let (error, message, details, retry_after) = match self {
			APIError::BadRequest {
				error_type,
				message,
				details,
			} => (error_type, message, details.clone(), None),
			APIError::Unauthorized {
				error_type,
				message,
			}
			| APIError::NotFound {
				error_type,
				message,
			}
			| APIError::InternalServerError {
				error_type,
				message,
			} => (error_type, message, None, None),
			APIError::Conflict {
				error_type,
				message,
				retry_after,
			} => (error_type, message, None, *retry_after),
		};
		ErrorResponse {
			error: error.clone(),
			message: message.clone(),
			details,
			retry_after,
		}
	}
}

impl fmt::Display for APIError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			APIError::BadRequest { message, .. } => write!(f, "Bad Request: {}", message),
			APIError::Unauthorized { message, .. } => write!(f, "Unauthorized: {}", message),
			APIError::NotFound { message, .. } => write!(f, "Not Found: {}", message),
			APIError::Conflict { message, .. } => write!(f, "Conflict: {}", message),
			APIError::InternalServerError { message, .. } => {
				write!(f, "Internal Server Error: {}", message)
			},
		}
	}
}

impl std::error::Error for APIError {}

impl axum::response::IntoResponse for APIError {
	fn into_response(self) -> axum::response::Response {
		use axum::{http::StatusCode, response::Json};

		let status = StatusCode::from_u16(self.status_code())
			.unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
		(status, Json(self.to_error_response())).into_response()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_create_request_ignores_client_total_shape() {
		let body = serde_json::json!({
			"customerDetails": {
				"name": "Ayesha Khan",
				"email": "someone-else@example.com",
				"phone": "03123456789",
				"address": "House 1, Street 2"
			},
			"orderItems": [
				{ "product": "p1", "name": "Almonds 500g", "price": 1000, "qty": 2 }
			],
			"paymentMethod": "JazzCash",
			"totalPrice": "not even a number"
		});

		let request: CreateOrderRequest = serde_json::from_value(body).unwrap();
		assert_eq!(request.order_items.len(), 1);
		assert_eq!(request.order_items[0].unit_price, Decimal::from(1000));
		let delivery: DeliveryDetails = request.customer_details.into();
		assert_eq!(delivery.name, "Ayesha Khan");
	}

	#[test]
	fn test_error_response_shape() {
		let err = APIError::Conflict {
			error_type: "CONFLICT_RETRY".into(),
			message: "Order was modified concurrently".into(),
			retry_after: Some(1),
		};
		assert_eq!(err.status_code(), 409);
		let body = serde_json::to_value(err.to_error_response()).unwrap();
		assert_eq!(body["error"], "CONFLICT_RETRY");
		assert_eq!(body["retryAfter"], 1);
	}
}

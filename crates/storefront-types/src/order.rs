//! Order domain types.
//!
//! An order is a snapshot taken at checkout: the line items carry the name and
//! unit price the customer saw, and the customer details carry the contact
//! information typed into the delivery form. Later catalog or profile edits
//! never reach back into a stored order.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One product/quantity/price tuple within an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
	/// Catalog id of the product.
	#[serde(rename = "product")]
	pub product_id: String,
	/// Product name at the time the order was placed.
	pub name: String,
	/// Unit price at the time the order was placed, discounts already applied.
	#[serde(rename = "price")]
	pub unit_price: Decimal,
	/// Number of units, at least one.
	#[serde(rename = "qty")]
	pub quantity: u32,
}

impl LineItem {
	pub fn new(
		product_id: impl Into<String>,
		name: impl Into<String>,
		unit_price: Decimal,
		quantity: u32,
	) -> Self {
		Self {
			product_id: product_id.into(),
			name: name.into(),
			unit_price,
			quantity,
		}
	}
}

/// Delivery information entered on the checkout form.
///
/// Deliberately carries no e-mail: the order's e-mail always comes from the
/// authenticated principal.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeliveryDetails {
	pub name: String,
	pub phone: String,
	pub address: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub city: Option<String>,
}

impl DeliveryDetails {
	/// Returns the name of the first required field that is blank, if any.
	pub fn first_missing_field(&self) -> Option<&'static str> {
		[
			("name", &self.name),
			("phone", &self.phone),
			("address", &self.address),
		]
		.into_iter()
		.find(|(_, value)| value.trim().is_empty())
		.map(|(field, _)| field)
	}
}

/// Customer identity and contact snapshot stored on an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDetails {
	pub name: String,
	pub email: String,
	pub phone: String,
	pub address: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub city: Option<String>,
}

impl CustomerDetails {
	/// Combines delivery details with the e-mail of the submitting principal.
	pub fn from_delivery(delivery: DeliveryDetails, email: impl Into<String>) -> Self {
		Self {
			name: delivery.name.trim().to_string(),
			email: email.into(),
			phone: delivery.phone.trim().to_string(),
			address: delivery.address.trim().to_string(),
			city: delivery
				.city
				.map(|c| c.trim().to_string())
				.filter(|c| !c.is_empty()),
		}
	}
}

/// Payment methods offered at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
	/// Prepaid mobile-wallet transfer.
	Easypaisa,
	/// Prepaid mobile-wallet transfer.
	JazzCash,
	/// Cash collected by the courier.
	#[serde(rename = "COD", alias = "CashOnDelivery")]
	CashOnDelivery,
}

impl fmt::Display for PaymentMethod {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			PaymentMethod::Easypaisa => write!(f, "Easypaisa"),
			PaymentMethod::JazzCash => write!(f, "JazzCash"),
			PaymentMethod::CashOnDelivery => write!(f, "COD"),
		}
	}
}

/// Status of an order.
///
/// Nominal lifecycle: `Pending -> Shipped -> Delivered`, `Pending -> Cancelled`,
/// and `Pending | Shipped -> OutOfStock`. `Delivered`, `Cancelled` and
/// `OutOfStock` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
	Pending,
	Shipped,
	Delivered,
	Cancelled,
	#[serde(rename = "Out of Stock", alias = "OutOfStock")]
	OutOfStock,
}

impl OrderStatus {
	/// Statuses an administrator may assign.
	pub const ADMIN_SETTABLE: [OrderStatus; 4] = [
		OrderStatus::Shipped,
		OrderStatus::Delivered,
		OrderStatus::Cancelled,
		OrderStatus::OutOfStock,
	];

	/// Returns true if the nominal lifecycle has no outbound transitions.
	pub fn is_terminal(&self) -> bool {
		matches!(
			self,
			OrderStatus::Delivered | OrderStatus::Cancelled | OrderStatus::OutOfStock
		)
	}

	/// Returns true for orders that still need fulfilment work.
	pub fn is_active(&self) -> bool {
		matches!(self, OrderStatus::Pending | OrderStatus::Shipped)
	}

	/// Returns true if an administrator may set this status.
	pub fn is_admin_settable(&self) -> bool {
		Self::ADMIN_SETTABLE.contains(self)
	}

	/// Checks the nominal lifecycle graph.
	///
	/// The administrator path does not enforce this; it is used to flag
	/// overrides in the audit log.
	pub fn can_transition_to(&self, to: OrderStatus) -> bool {
		use OrderStatus::*;
		matches!(
			(*self, to),
			(Pending, Shipped)
				| (Pending, Cancelled)
				| (Pending, OutOfStock)
				| (Shipped, Delivered)
				| (Shipped, OutOfStock)
		)
	}
}

impl fmt::Display for OrderStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			OrderStatus::Pending => write!(f, "Pending"),
			OrderStatus::Shipped => write!(f, "Shipped"),
			OrderStatus::Delivered => write!(f, "Delivered"),
			OrderStatus::Cancelled => write!(f, "Cancelled"),
			OrderStatus::OutOfStock => write!(f, "Out of Stock"),
		}
	}
}

/// Error returned when text does not name an order status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown order status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for OrderStatus {
	type Err = UnknownStatus;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim() {
			"Pending" => Ok(Self::Pending),
			"Shipped" => Ok(Self::Shipped),
			"Delivered" => Ok(Self::Delivered),
			"Cancelled" => Ok(Self::Cancelled),
			"Out of Stock" | "OutOfStock" => Ok(Self::OutOfStock),
			other => Err(UnknownStatus(other.to_string())),
		}
	}
}

/// Filter applied by the administrator order listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderFilter {
	/// Every order.
	#[default]
	All,
	/// Pending and shipped orders.
	Active,
	/// Delivered, cancelled and out-of-stock orders.
	History,
}

impl OrderFilter {
	/// Parses the `status` query parameter. Unrecognised values list everything.
	pub fn from_query(value: Option<&str>) -> Self {
		match value.map(str::trim) {
			Some("active") => OrderFilter::Active,
			Some("history") => OrderFilter::History,
			_ => OrderFilter::All,
		}
	}

	pub fn matches(&self, status: OrderStatus) -> bool {
		match self {
			OrderFilter::All => true,
			OrderFilter::Active => status.is_active(),
			OrderFilter::History => status.is_terminal(),
		}
	}
}

/// A persisted order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
	/// Unique identifier, assigned by the server.
	pub id: String,
	/// Id of the principal that placed the order.
	pub user: String,
	/// Contact snapshot; `email` is always the submitter's.
	pub customer_details: CustomerDetails,
	/// Items in checkout order.
	pub order_items: Vec<LineItem>,
	pub payment_method: PaymentMethod,
	/// Server-computed total including shipping.
	pub total_price: Decimal,
	pub order_status: OrderStatus,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
	/// Incremented on every persisted change.
	pub version: u64,
}

impl Order {
	/// Returns true if the given e-mail owns this order.
	pub fn is_owned_by(&self, email: &str) -> bool {
		self.customer_details.email == email
	}
}

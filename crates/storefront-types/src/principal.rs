//! Authenticated identities.
//!
//! A principal is resolved from the bearer token of each request and passed
//! explicitly into every order operation; nothing about the caller is kept in
//! ambient state.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Privilege level of a principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
	/// Regular storefront customer.
	#[default]
	#[serde(rename = "user", alias = "customer")]
	Customer,
	/// Back-office administrator.
	Admin,
}

impl fmt::Display for Role {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Role::Customer => write!(f, "user"),
			Role::Admin => write!(f, "admin"),
		}
	}
}

/// The authenticated identity attached to a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
	/// Stable account id.
	pub id: String,
	/// Display name.
	pub name: String,
	/// Account e-mail, used for order ownership.
	pub email: String,
	#[serde(default)]
	pub role: Role,
}

impl Principal {
	pub fn new(
		id: impl Into<String>,
		name: impl Into<String>,
		email: impl Into<String>,
		role: Role,
	) -> Self {
		Self {
			id: id.into(),
			name: name.into(),
			email: email.into(),
			role,
		}
	}

	pub fn is_admin(&self) -> bool {
		self.role == Role::Admin
	}
}

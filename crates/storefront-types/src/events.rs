//! Order lifecycle events.
//!
//! Every persisted change to an order is published on the engine's event bus.
//! The audit subscriber turns these into log records; since the administrator
//! path may move an order between any two statuses, this stream is the only
//! record of how an order reached its current state.

use crate::{OrderStatus, Principal, Role};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Who requested a change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
	pub id: String,
	pub email: String,
	pub role: Role,
}

impl From<&Principal> for Actor {
	fn from(principal: &Principal) -> Self {
		Self {
			id: principal.id.clone(),
			email: principal.email.clone(),
			role: principal.role,
		}
	}
}

/// Events emitted by the order engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OrderEvent {
	/// A new order was persisted.
	Created {
		order_id: String,
		actor: Actor,
		total_price: Decimal,
		at: DateTime<Utc>,
	},
	/// An order's status was overwritten.
	StatusChanged {
		order_id: String,
		actor: Actor,
		from: OrderStatus,
		to: OrderStatus,
		version: u64,
		at: DateTime<Utc>,
	},
}

impl OrderEvent {
	pub fn order_id(&self) -> &str {
		match self {
			OrderEvent::Created { order_id, .. } | OrderEvent::StatusChanged { order_id, .. } => {
				order_id
			},
		}
	}
}

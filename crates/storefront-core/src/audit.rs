//! Audit trail of order changes.
//!
//! Administrators may overwrite an order's status without regard to the
//! nominal lifecycle. The audit subscriber logs every change under the
//! `storefront::audit` target and raises overrides to `warn`.

use crate::EventBus;
use storefront_types::{truncate_id, OrderEvent};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

/// Returns true if the event moved an order along an edge the nominal
/// lifecycle does not have.
pub fn is_override(event: &OrderEvent) -> bool {
	match event {
		OrderEvent::StatusChanged { from, to, .. } => !from.can_transition_to(*to),
		OrderEvent::Created { .. } => false,
	}
}

/// Writes one audit record.
pub fn record(event: &OrderEvent) {
	match event {
		OrderEvent::Created {
			order_id,
			actor,
			total_price,
			at,
		} => {
			tracing::info!(
				target: "storefront::audit",
				order_id = %truncate_id(order_id),
				actor = %actor.id,
				total_price = %total_price,
				at = %at,
				"Order created"
			);
		},
		OrderEvent::StatusChanged {
			order_id,
			actor,
			from,
			to,
			version,
			at,
		} => {
			if is_override(event) {
				tracing::warn!(
					target: "storefront::audit",
					order_id = %truncate_id(order_id),
					actor = %actor.id,
					role = %actor.role,
					from = %from,
					to = %to,
					version,
					at = %at,
					"Status overridden outside the normal lifecycle"
				);
			} else {
				tracing::info!(
					target: "storefront::audit",
					order_id = %truncate_id(order_id),
					actor = %actor.id,
					role = %actor.role,
					from = %from,
					to = %to,
					version,
					at = %at,
					"Status changed"
				);
			}
		},
	}
}

/// Spawns a task that records every event published on the bus.
///
/// The task ends when the bus is dropped.
pub fn spawn_audit_log(event_bus: &EventBus) -> JoinHandle<()> {
	let mut receiver = event_bus.subscribe();
	tokio::spawn(async move {
		loop {
			match receiver.recv().await {
				Ok(event) => record(&event),
				Err(RecvError::Lagged(missed)) => {
					tracing::warn!(
						target: "storefront::audit",
						missed,
						"Audit log fell behind, events were dropped"
					);
				},
				Err(RecvError::Closed) => break,
			}
		}
	})
}

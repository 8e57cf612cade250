//! Broadcast channel for order events.

use storefront_types::OrderEvent;
use tokio::sync::broadcast;

/// Fan-out of [`OrderEvent`]s to any number of subscribers.
///
/// Publishing never blocks. Slow subscribers lag and are told how many events
/// they missed; events published while nobody listens are dropped.
#[derive(Clone)]
pub struct EventBus {
	sender: broadcast::Sender<OrderEvent>,
}

impl EventBus {
	/// Creates a bus that buffers up to `capacity` events per subscriber.
	pub fn new(capacity: usize) -> Self {
		let (sender, _) = broadcast::channel(capacity);
		Self { sender }
	}

	pub fn subscribe(&self) -> broadcast::Receiver<OrderEvent> {
		self.sender.subscribe()
	}

	/// Publishes an event, failing only if there are no subscribers.
	pub fn publish(
		&self,
		event: OrderEvent,
	) -> Result<usize, broadcast::error::SendError<OrderEvent>> {
		self.sender.send(event)
	}
}

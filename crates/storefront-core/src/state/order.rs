//! Versioned order persistence.
//!
//! Every change goes through [`OrderStateMachine::update_order_with`], which
//! performs one compare-and-swap on the stored document, stamps `updated_at`
//! and bumps `version`.

use crate::OrderError;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use storefront_storage::StorageService;
use storefront_types::{Order, StorageKey};

/// Reads and writes orders in the `orders` namespace.
pub struct OrderStateMachine {
	storage: Arc<StorageService>,
}

impl OrderStateMachine {
	pub fn new(storage: Arc<StorageService>) -> Self {
		Self { storage }
	}

	/// Stores a newly created order.
	pub async fn store_order(&self, order: &Order) -> Result<(), OrderError> {
		if self
			.storage
			.exists(StorageKey::Orders.as_str(), &order.id)
			.await?
		{
			return Err(OrderError::InternalFailure(format!(
				"order id {} already in use",
				order.id
			)));
		}
		self.storage
			.store(StorageKey::Orders.as_str(), &order.id, order)
			.await
			.map_err(OrderError::from)
	}

	pub async fn get_order(&self, order_id: &str) -> Result<Order, OrderError> {
		self.storage
			.retrieve(StorageKey::Orders.as_str(), order_id)
			.await
			.map_err(OrderError::from)
	}

	/// Loads every order, in no particular order.
	pub async fn all_orders(&self) -> Result<Vec<Order>, OrderError> {
		self.storage
			.retrieve_all(StorageKey::Orders.as_str())
			.await
			.map_err(OrderError::from)
	}

	/// Applies `updater` to the stored order and persists the result atomically.
	///
	/// If the updater returns an error nothing is written. If another writer
	/// changed the order in between, fails with [`OrderError::ConflictRetry`].
	pub async fn update_order_with<F>(
		&self,
		order_id: &str,
		now: DateTime<Utc>,
		updater: F,
	) -> Result<Order, OrderError>
	where
		F: FnOnce(&mut Order) -> Result<(), OrderError>,
	{
		self.storage
			.update_atomic(StorageKey::Orders.as_str(), order_id, |order: &mut Order| {
				updater(order)?;
				order.updated_at = now;
				order.version += 1;
				Ok(())
			})
			.await
	}
}

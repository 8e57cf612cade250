//! Document storage for the storefront.
//!
//! This module provides the storage abstraction the order engine persists
//! through. Backends only deal in raw bytes keyed by `namespace:id`; the
//! [`StorageService`] layers typed JSON documents and atomic read-modify-write
//! on top of them.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use storefront_types::{ConfigSchema, ImplementationRegistry};
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod file;
	pub mod memory;
}

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
	/// Error that occurs when a requested item is not found.
	#[error("Not found")]
	NotFound,
	/// The stored document changed between read and write.
	#[error("Conflict: {0}")]
	Conflict(String),
	/// Error that occurs during serialization/deserialization.
	#[error("Serialization error: {0}")]
	Serialization(String),
	/// Error that occurs in the storage backend.
	#[error("Backend error: {0}")]
	Backend(String),
	/// Error that occurs during configuration validation.
	#[error("Configuration error: {0}")]
	Configuration(String),
}

/// Trait defining the low-level interface for storage backends.
///
/// Keys have the form `namespace:id`. Every single-key operation must be
/// atomic with respect to the others on the same key.
#[async_trait]
pub trait StorageInterface: Send + Sync {
	/// Retrieves raw bytes for the given key.
	async fn get_bytes(&self, key: &str) -> Result<Vec<u8>, StorageError>;

	/// Stores raw bytes, creating or overwriting the key.
	async fn set_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError>;

	/// Replaces the value only if it still equals `expected`.
	///
	/// Returns `NotFound` if the key is absent and `Conflict` if the stored
	/// bytes differ from `expected`.
	async fn compare_and_swap(
		&self,
		key: &str,
		expected: &[u8],
		value: Vec<u8>,
	) -> Result<(), StorageError>;

	/// Checks if a key exists in storage.
	async fn exists(&self, key: &str) -> Result<bool, StorageError>;

	/// Returns every value stored under the namespace, in no particular order.
	async fn list(&self, namespace: &str) -> Result<Vec<Vec<u8>>, StorageError>;

	/// Returns the configuration schema for validation.
	fn config_schema(&self) -> Box<dyn ConfigSchema>;
}

/// Type alias for storage factory functions.
pub type StorageFactory = fn(&toml::Value) -> Result<Box<dyn StorageInterface>, StorageError>;

/// Registry trait for storage implementations.
pub trait StorageRegistry: ImplementationRegistry<Factory = StorageFactory> {}

/// Get all registered storage implementations as (name, factory) pairs.
pub fn get_all_implementations() -> Vec<(&'static str, StorageFactory)> {
	use implementations::{file, memory};

	vec![
		(file::Registry::NAME, file::Registry::factory()),
		(memory::Registry::NAME, memory::Registry::factory()),
	]
}

/// Splits a `namespace:id` key. Keys without a namespace return `None`.
pub(crate) fn split_key(key: &str) -> Option<(&str, &str)> {
	key.split_once(':')
}

/// High-level storage service that provides typed operations.
///
/// Documents are serialized to JSON. The namespace and id are combined to
/// form the backend key.
pub struct StorageService {
	/// The underlying storage backend implementation.
	backend: Box<dyn StorageInterface>,
}

impl StorageService {
	/// Creates a new StorageService with the specified backend.
	pub fn new(backend: Box<dyn StorageInterface>) -> Self {
		Self { backend }
	}

	fn key(namespace: &str, id: &str) -> String {
		format!("{}:{}", namespace, id)
	}

	/// Stores a serializable value, creating or overwriting it.
	pub async fn store<T: Serialize>(
		&self,
		namespace: &str,
		id: &str,
		data: &T,
	) -> Result<(), StorageError> {
		let bytes =
			serde_json::to_vec(data).map_err(|e| StorageError::Serialization(e.to_string()))?;
		self.backend
			.set_bytes(&Self::key(namespace, id), bytes)
			.await
	}

	/// Retrieves and deserializes a value from storage.
	pub async fn retrieve<T: DeserializeOwned>(
		&self,
		namespace: &str,
		id: &str,
	) -> Result<T, StorageError> {
		let bytes = self.backend.get_bytes(&Self::key(namespace, id)).await?;
		serde_json::from_slice(&bytes).map_err(|e| StorageError::Serialization(e.to_string()))
	}

	/// Retrieves and deserializes every value in a namespace.
	pub async fn retrieve_all<T: DeserializeOwned>(
		&self,
		namespace: &str,
	) -> Result<Vec<T>, StorageError> {
		self.backend
			.list(namespace)
			.await?
			.iter()
			.map(|bytes| {
				serde_json::from_slice(bytes)
					.map_err(|e| StorageError::Serialization(e.to_string()))
			})
			.collect()
	}

	/// Checks if a value exists in storage.
	pub async fn exists(&self, namespace: &str, id: &str) -> Result<bool, StorageError> {
		self.backend.exists(&Self::key(namespace, id)).await
	}

	/// Atomically reads, modifies and writes back one document.
	///
	/// The updater receives the current document and may reject the change by
	/// returning an error, in which case nothing is written. The write only
	/// succeeds if the stored bytes are unchanged since the read; otherwise the
	/// call fails with [`StorageError::Conflict`] and the caller decides
	/// whether to retry.
	pub async fn update_atomic<T, E, F>(
		&self,
		namespace: &str,
		id: &str,
		updater: F,
	) -> Result<T, E>
	where
		T: Serialize + DeserializeOwned,
		E: From<StorageError>,
		F: FnOnce(&mut T) -> Result<(), E>,
	{
		let key = Self::key(namespace, id);
		let current = self.backend.get_bytes(&key).await?;
		let mut document: T = serde_json::from_slice(&current)
			.map_err(|e| StorageError::Serialization(e.to_string()))?;

		updater(&mut document)?;

		let bytes = serde_json::to_vec(&document)
			.map_err(|e| StorageError::Serialization(e.to_string()))?;
		self.backend.compare_and_swap(&key, &current, bytes).await?;
		tracing::debug!(key = %key, "Document updated");
		Ok(document)
	}
}

#[cfg(test)]
mod tests {
	use super::implementations::memory::MemoryStorage;
	use super::*;
	use serde::Deserialize;

	#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
	struct Counter {
		value: u64,
	}

	#[derive(Debug, Error)]
	enum TestError {
		#[error("storage: {0}")]
		Storage(#[from] StorageError),
		#[error("rejected")]
		Rejected,
	}

	fn service() -> StorageService {
		StorageService::new(Box::new(MemoryStorage::new()))
	}

	#[tokio::test]
	async fn test_typed_round_trip_and_listing() {
		let storage = service();
		storage.store("counters", "a", &Counter { value: 1 }).await.unwrap();
		storage.store("counters", "b", &Counter { value: 2 }).await.unwrap();
		storage.store("other", "c", &Counter { value: 3 }).await.unwrap();

		let a: Counter = storage.retrieve("counters", "a").await.unwrap();
		assert_eq!(a.value, 1);

		let mut all: Vec<Counter> = storage.retrieve_all("counters").await.unwrap();
		all.sort_by_key(|c| c.value);
		assert_eq!(all, vec![Counter { value: 1 }, Counter { value: 2 }]);
	}

	#[tokio::test]
	async fn test_update_atomic_applies_change() {
		let storage = service();
		storage.store("counters", "a", &Counter { value: 1 }).await.unwrap();

		let updated: Counter = storage
			.update_atomic::<_, TestError, _>("counters", "a", |c: &mut Counter| {
				c.value += 1;
				Ok(())
			})
			.await
			.unwrap();
		assert_eq!(updated.value, 2);

		let stored: Counter = storage.retrieve("counters", "a").await.unwrap();
		assert_eq!(stored.value, 2);
	}

	#[tokio::test]
	async fn test_update_atomic_rejection_writes_nothing() {
		let storage = service();
		storage.store("counters", "a", &Counter { value: 1 }).await.unwrap();

		let result = storage
			.update_atomic::<Counter, TestError, _>("counters", "a", |c| {
				c.value = 99;
				Err(TestError::Rejected)
			})
			.await;
		assert!(matches!(result, Err(TestError::Rejected)));

		let stored: Counter = storage.retrieve("counters", "a").await.unwrap();
		assert_eq!(stored.value, 1);
	}

	#[tokio::test]
	async fn test_update_atomic_missing_document() {
		let storage = service();
		let result = storage
			.update_atomic::<Counter, TestError, _>("counters", "missing", |_| Ok(()))
			.await;
		assert!(matches!(
			result,
			Err(TestError::Storage(StorageError::NotFound))
		));
	}

	#[test]
	fn test_registered_implementations() {
		let names: Vec<_> = get_all_implementations()
			.into_iter()
			.map(|(name, _)| name)
			.collect();
		assert_eq!(names, vec!["file", "memory"]);
	}
}

//! File-based storage backend.
//!
//! Each document is one JSON file at `<storage_path>/<namespace>/<id>.json`.
//! Writes go through a temporary file and a rename so readers never observe a
//! partially written document. Writers of the same key serialize on an
//! advisory lock file next to the document, which is what makes
//! compare-and-swap safe across tasks and processes.

use crate::{split_key, StorageError, StorageFactory, StorageInterface, StorageRegistry};
use async_trait::async_trait;
use fs2::FileExt;
use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use storefront_types::{
	ConfigSchema, Field, FieldType, ImplementationRegistry, Schema, ValidationError,
};
use tokio::fs;

const DEFAULT_STORAGE_PATH: &str = "./data/storage";

/// File-based storage implementation.
pub struct FileStorage {
	base_path: PathBuf,
}

impl FileStorage {
	/// Creates a new FileStorage rooted at `base_path`.
	pub fn new(base_path: PathBuf) -> Self {
		Self { base_path }
	}

	/// Maps a key to its document path.
	///
	/// Both parts are sanitized so a key can never escape the base directory.
	fn get_file_path(&self, key: &str) -> PathBuf {
		match split_key(key) {
			Some((namespace, id)) => self
				.base_path
				.join(sanitize(namespace))
				.join(format!("{}.json", sanitize(id))),
			None => self.base_path.join(format!("{}.json", sanitize(key))),
		}
	}

	/// Runs a locked write on the blocking pool.
	async fn locked<F>(&self, key: &str, op: F) -> Result<(), StorageError>
	where
		F: FnOnce(&Path) -> Result<(), StorageError> + Send + 'static,
	{
		let path = self.get_file_path(key);
		tokio::task::spawn_blocking(move || with_lock(&path, op))
			.await
			.map_err(|e| StorageError::Backend(e.to_string()))?
	}
}

fn sanitize(part: &str) -> String {
	part.chars()
		.map(|c| {
			if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
				c
			} else {
				'_'
			}
		})
		.collect()
}

fn backend_error(e: std::io::Error) -> StorageError {
	StorageError::Backend(e.to_string())
}

/// Holds the exclusive lock for `path` while `op` runs.
fn with_lock<F>(path: &Path, op: F) -> Result<(), StorageError>
where
	F: FnOnce(&Path) -> Result<(), StorageError>,
{
	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent).map_err(backend_error)?;
	}
	let lock_file = OpenOptions::new()
		.create(true)
		.truncate(false)
		.write(true)
		.open(path.with_extension("lock"))
		.map_err(backend_error)?;
	FileExt::lock_exclusive(&lock_file).map_err(backend_error)?;

	let result = op(path);

	if let Err(e) = FileExt::unlock(&lock_file) {
		tracing::warn!("Failed to release lock for {:?}: {}", path, e);
	}
	result
}

/// Writes to a temporary sibling and renames it over the target.
fn write_atomic(path: &Path, value: &[u8]) -> Result<(), StorageError> {
	let temp_path = path.with_extension("tmp");
	std::fs::write(&temp_path, value).map_err(backend_error)?;
	std::fs::rename(&temp_path, path).map_err(backend_error)
}

#[async_trait]
impl StorageInterface for FileStorage {
	async fn get_bytes(&self, key: &str) -> Result<Vec<u8>, StorageError> {
		let path = self.get_file_path(key);
		match fs::read(&path).await {
			Ok(data) => Ok(data),
			Err(e) if e.kind() == ErrorKind::NotFound => Err(StorageError::NotFound),
			Err(e) => Err(backend_error(e)),
		}
	}

	async fn set_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
		self.locked(key, move |path| write_atomic(path, &value)).await
	}

	async fn compare_and_swap(
		&self,
		key: &str,
		expected: &[u8],
		value: Vec<u8>,
	) -> Result<(), StorageError> {
		let expected = expected.to_vec();
		let key_name = key.to_string();
		self.locked(key, move |path| {
			let current = match std::fs::read(path) {
				Ok(data) => data,
				Err(e) if e.kind() == ErrorKind::NotFound => return Err(StorageError::NotFound),
				Err(e) => return Err(backend_error(e)),
			};
			if current != expected {
				return Err(StorageError::Conflict(format!(
					"{} was modified concurrently",
					key_name
				)));
			}
			write_atomic(path, &value)
		})
		.await
	}

	async fn exists(&self, key: &str) -> Result<bool, StorageError> {
		fs::try_exists(self.get_file_path(key))
			.await
			.map_err(backend_error)
	}

	async fn list(&self, namespace: &str) -> Result<Vec<Vec<u8>>, StorageError> {
		let dir = self.base_path.join(sanitize(namespace));
		let mut entries = match fs::read_dir(&dir).await {
			Ok(entries) => entries,
			Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
			Err(e) => return Err(backend_error(e)),
		};

		let mut documents = Vec::new();
		while let Some(entry) = entries.next_entry().await.map_err(backend_error)? {
			let path = entry.path();
			if path.extension() != Some(std::ffi::OsStr::new("json")) {
				continue;
			}
			match fs::read(&path).await {
				Ok(data) => documents.push(data),
				// Deleted between read_dir and read
				Err(e) if e.kind() == ErrorKind::NotFound => {},
				Err(e) => return Err(backend_error(e)),
			}
		}
		Ok(documents)
	}

	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(FileStorageSchema)
	}
}

/// Configuration schema for FileStorage.
pub struct FileStorageSchema;

impl ConfigSchema for FileStorageSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let schema = Schema::new(
			vec![],
			vec![
				Field::new("storage_path", FieldType::String).with_validator(|value| {
					match value.as_str() {
						Some(path) if path.trim().is_empty() => {
							Err("storage_path cannot be empty".to_string())
						},
						_ => Ok(()),
					}
				}),
			],
		);
		schema.validate(config)
	}
}

/// Factory function to create a file storage backend from configuration.
///
/// Configuration parameters:
/// - `storage_path`: Base directory for documents (default: "./data/storage")
pub fn create_storage(config: &toml::Value) -> Result<Box<dyn StorageInterface>, StorageError> {
	FileStorageSchema
		.validate(config)
		.map_err(|e| StorageError::Configuration(e.to_string()))?;

	let storage_path = config
		.get("storage_path")
		.and_then(|v| v.as_str())
		.unwrap_or(DEFAULT_STORAGE_PATH);

	Ok(Box::new(FileStorage::new(PathBuf::from(storage_path))))
}

/// Registry for the file storage implementation.
pub struct Registry;

impl ImplementationRegistry for Registry {
	const NAME: &'static str = "file";
	type Factory = StorageFactory;

	fn factory() -> Self::Factory {
		create_storage
	}
}

impl StorageRegistry for Registry {}

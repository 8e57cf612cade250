//! Configuration for the storefront service.
//!
//! Configuration is read from TOML. Values may reference environment
//! variables as `${VAR}` or `${VAR:-default}`, and a file may pull in other
//! files with `include = ["pricing.toml", "auth.toml"]`. Each top-level
//! section must appear in exactly one file.

mod loader;

use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use std::sync::OnceLock;
use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		// Keep the message, drop the echoed input
		ConfigError::Parse(err.message().to_string())
	}
}

/// Upper bound for the cancellation window: one week.
pub const MAX_CANCELLATION_WINDOW_MINUTES: u64 = 7 * 24 * 60;

/// Main configuration structure for the storefront.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	/// Identity of this storefront instance.
	pub storefront: StorefrontConfig,
	/// Shipping and currency settings.
	#[serde(default)]
	pub pricing: PricingConfig,
	/// Order lifecycle settings.
	#[serde(default)]
	pub orders: OrdersConfig,
	/// Order persistence backend.
	pub storage: StorageConfig,
	/// Bearer token resolution backend.
	pub auth: AuthConfig,
	/// Configuration for the HTTP API server.
	pub api: Option<ApiConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorefrontConfig {
	/// Unique identifier for this storefront, used in logs.
	pub id: String,
}

/// Pricing settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PricingConfig {
	/// Flat shipping fee added to every order.
	#[serde(default = "default_shipping_fee")]
	pub shipping_fee: Decimal,
	/// Display currency. Amounts are never converted.
	#[serde(default = "default_currency")]
	pub currency: String,
}

impl Default for PricingConfig {
	fn default() -> Self {
		Self {
			shipping_fee: default_shipping_fee(),
			currency: default_currency(),
		}
	}
}

fn default_shipping_fee() -> Decimal {
	Decimal::from(250)
}

fn default_currency() -> String {
	"PKR".to_string()
}

/// Order lifecycle settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OrdersConfig {
	/// How long after creation a customer may still cancel.
	#[serde(default = "default_cancellation_window_minutes")]
	pub cancellation_window_minutes: u64,
}

impl Default for OrdersConfig {
	fn default() -> Self {
		Self {
			cancellation_window_minutes: default_cancellation_window_minutes(),
		}
	}
}

fn default_cancellation_window_minutes() -> u64 {
	120
}

/// Configuration for the storage backend.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
	/// Which implementation to use as primary.
	pub primary: String,
	/// Map of storage implementation names to their configurations.
	pub implementations: HashMap<String, toml::Value>,
}

/// Configuration for the authentication backend.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
	/// Which implementation to use as primary.
	pub primary: String,
	/// Map of auth implementation names to their configurations.
	pub implementations: HashMap<String, toml::Value>,
}

/// Configuration for the HTTP API server.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
	/// Whether the API server is enabled.
	#[serde(default)]
	pub enabled: bool,
	/// Host address to bind the server to.
	#[serde(default = "default_api_host")]
	pub host: String,
	/// Port to bind the server to.
	#[serde(default = "default_api_port")]
	pub port: u16,
	/// Maximum request body size in bytes.
	#[serde(default = "default_max_request_size")]
	pub max_request_size: usize,
	/// CORS configuration. Permissive when absent.
	pub cors: Option<CorsConfig>,
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CorsConfig {
	/// Allowed origins for CORS.
	pub allowed_origins: Vec<String>,
}

fn default_api_host() -> String {
	"127.0.0.1".to_string()
}

fn default_api_port() -> u16 {
	5000
}

fn default_max_request_size() -> usize {
	1024 * 1024
}

fn env_var_pattern() -> Result<&'static Regex, ConfigError> {
	static PATTERN: OnceLock<Regex> = OnceLock::new();
	if let Some(re) = PATTERN.get() {
		return Ok(re);
	}
	let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {}", e)))?;
	Ok(PATTERN.get_or_init(|| re))
}

/// Resolves environment variables in a string.
///
/// Replaces `${VAR_NAME}` with the value of VAR_NAME, or the default in
/// `${VAR_NAME:-default}` when the variable is unset. Input is limited to 1MB.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	const MAX_INPUT_SIZE: usize = 1024 * 1024;
	if input.len() > MAX_INPUT_SIZE {
		return Err(ConfigError::Validation(format!(
			"Configuration file too large: {} bytes (max: {} bytes)",
			input.len(),
			MAX_INPUT_SIZE
		)));
	}

	let re = env_var_pattern()?;
	let mut result = String::with_capacity(input.len());
	let mut last_end = 0;

	for cap in re.captures_iter(input) {
		let (Some(full_match), Some(var_name)) = (cap.get(0), cap.get(1)) else {
			continue;
		};
		let value = match std::env::var(var_name.as_str()) {
			Ok(v) => v,
			Err(_) => match cap.get(2) {
				Some(default) => default.as_str().to_string(),
				None => {
					return Err(ConfigError::Validation(format!(
						"Environment variable '{}' not found",
						var_name.as_str()
					)))
				},
			},
		};

		result.push_str(&input[last_end..full_match.start()]);
		result.push_str(&value);
		last_end = full_match.end();
	}
	result.push_str(&input[last_end..]);

	Ok(result)
}

impl Config {
	/// Loads configuration from a file, following `include` directives.
	pub async fn from_file(path: &str) -> Result<Self, ConfigError> {
		let path_buf = Path::new(path);
		let base_dir = path_buf.parent().unwrap_or_else(|| Path::new("."));

		let mut loader = loader::ConfigLoader::new(base_dir);
		let file_name = path_buf
			.file_name()
			.ok_or_else(|| ConfigError::Validation(format!("Invalid path: {}", path)))?;
		loader.load_config(file_name).await
	}

	fn validate(&self) -> Result<(), ConfigError> {
		if self.storefront.id.trim().is_empty() {
			return Err(ConfigError::Validation(
				"Storefront ID cannot be empty".into(),
			));
		}

		if self.pricing.shipping_fee.is_sign_negative() {
			return Err(ConfigError::Validation(format!(
				"Shipping fee cannot be negative: {}",
				self.pricing.shipping_fee
			)));
		}
		if self.pricing.currency.trim().is_empty() {
			return Err(ConfigError::Validation("Currency cannot be empty".into()));
		}

		let window = self.orders.cancellation_window_minutes;
		if window == 0 || window > MAX_CANCELLATION_WINDOW_MINUTES {
			return Err(ConfigError::Validation(format!(
				"orders.cancellation_window_minutes must be between 1 and {}, got {}",
				MAX_CANCELLATION_WINDOW_MINUTES, window
			)));
		}

		validate_backend_section("storage", &self.storage.primary, &self.storage.implementations)?;
		validate_backend_section("auth", &self.auth.primary, &self.auth.implementations)?;

		if let Some(api) = &self.api {
			if api.enabled && api.port == 0 {
				return Err(ConfigError::Validation(
					"API port must be greater than 0".into(),
				));
			}
		}

		Ok(())
	}
}

/// Checks that a pluggable section names a primary that is configured.
fn validate_backend_section(
	section: &str,
	primary: &str,
	implementations: &HashMap<String, toml::Value>,
) -> Result<(), ConfigError> {
	if implementations.is_empty() {
		return Err(ConfigError::Validation(format!(
			"At least one {} implementation must be configured",
			section
		)));
	}
	if primary.is_empty() {
		return Err(ConfigError::Validation(format!(
			"{} primary implementation cannot be empty",
			section
		)));
	}
	if !implementations.contains_key(primary) {
		return Err(ConfigError::Validation(format!(
			"Primary {} '{}' not found in implementations",
			section, primary
		)));
	}
	Ok(())
}

/// Parses configuration from a TOML string, resolving environment variables
/// and validating the result.
impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let resolved = resolve_env_vars(s)?;
		let config: Config = toml::from_str(&resolved)?;
		config.validate()?;
		Ok(config)
	}
}

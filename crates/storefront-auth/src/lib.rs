//! Caller authentication for the storefront.
//!
//! Requests carry an opaque bearer token. An [`AuthInterface`] backend maps
//! that token to a [`Principal`]; how tokens are issued is outside this crate.

use async_trait::async_trait;
use storefront_types::{ConfigSchema, ImplementationRegistry, Principal};
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod static_tokens;
}

/// Errors that can occur while authenticating a caller.
#[derive(Debug, Error)]
pub enum AuthError {
	/// No bearer token was presented.
	#[error("Missing bearer token")]
	MissingToken,
	/// The token does not resolve to a principal.
	#[error("Invalid bearer token")]
	InvalidToken,
	/// The backend configuration is unusable.
	#[error("Configuration error: {0}")]
	Configuration(String),
	/// The backend failed while resolving the token.
	#[error("Implementation error: {0}")]
	Implementation(String),
}

/// Trait defining the interface for token resolution backends.
#[async_trait]
pub trait AuthInterface: Send + Sync {
	/// Returns the configuration schema for this backend.
	fn config_schema(&self) -> Box<dyn ConfigSchema>;

	/// Resolves a bearer token to the principal it was issued to.
	async fn authenticate(&self, token: &str) -> Result<Principal, AuthError>;
}

/// Type alias for auth factory functions.
pub type AuthFactory = fn(&toml::Value) -> Result<Box<dyn AuthInterface>, AuthError>;

/// Registry trait for auth implementations.
pub trait AuthRegistry: ImplementationRegistry<Factory = AuthFactory> {}

/// Get all registered auth implementations as (name, factory) pairs.
pub fn get_all_implementations() -> Vec<(&'static str, AuthFactory)> {
	use implementations::static_tokens;

	vec![(static_tokens::Registry::NAME, static_tokens::Registry::factory())]
}

/// Extracts the token from an `Authorization` header value.
///
/// The scheme is matched case-insensitively. Returns `None` for any other
/// scheme or an empty token.
pub fn bearer_token(header_value: &str) -> Option<&str> {
	let (scheme, token) = header_value.trim().split_once(' ')?;
	if !scheme.eq_ignore_ascii_case("bearer") {
		return None;
	}
	let token = token.trim();
	(!token.is_empty()).then_some(token)
}

/// Service that resolves callers through the configured backend.
pub struct AuthService {
	implementation: Box<dyn AuthInterface>,
}

impl AuthService {
	/// Creates a new AuthService with the specified backend.
	pub fn new(implementation: Box<dyn AuthInterface>) -> Self {
		Self { implementation }
	}

	/// Resolves a token, rejecting blank tokens before touching the backend.
	pub async fn authenticate(&self, token: &str) -> Result<Principal, AuthError> {
		if token.trim().is_empty() {
			return Err(AuthError::MissingToken);
		}
		let principal = self.implementation.authenticate(token).await?;
		tracing::debug!(principal_id = %principal.id, role = %principal.role, "Authenticated caller");
		Ok(principal)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_bearer_token_parsing() {
		assert_eq!(bearer_token("Bearer abc123"), Some("abc123"));
		assert_eq!(bearer_token("bearer   abc123 "), Some("abc123"));
		assert_eq!(bearer_token("Basic dXNlcjpwYXNz"), None);
		assert_eq!(bearer_token("Bearer "), None);
		assert_eq!(bearer_token("abc123"), None);
	}

	#[test]
	fn test_registered_implementations() {
		let names: Vec<_> = get_all_implementations()
			.into_iter()
			.map(|(name, _)| name)
			.collect();
		assert_eq!(names, vec!["static"]);
	}
}

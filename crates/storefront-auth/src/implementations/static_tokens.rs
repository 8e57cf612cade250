//! Token table read from configuration.
//!
//! Every principal is listed with the token it authenticates with. Suitable
//! for small deployments and tests; tokens never leave memory unredacted.

use crate::{AuthError, AuthFactory, AuthInterface, AuthRegistry};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashSet;
use storefront_types::{
	ConfigSchema, Field, FieldType, ImplementationRegistry, Principal, Role, Schema,
	SecretString, ValidationError,
};

/// One configured token and the identity it maps to.
#[derive(Debug, Clone, Deserialize)]
struct TokenEntry {
	token: SecretString,
	#[serde(flatten)]
	principal: Principal,
}

/// Auth backend backed by a fixed token table.
pub struct StaticTokenAuth {
	entries: Vec<TokenEntry>,
}

impl StaticTokenAuth {
	/// Creates a backend from (token, principal) pairs.
	pub fn new(entries: Vec<(SecretString, Principal)>) -> Self {
		Self {
			entries: entries
				.into_iter()
				.map(|(token, principal)| TokenEntry { token, principal })
				.collect(),
		}
	}
}

#[async_trait]
impl AuthInterface for StaticTokenAuth {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(StaticTokenSchema)
	}

	async fn authenticate(&self, token: &str) -> Result<Principal, AuthError> {
		// Compare against every entry so timing does not reveal the position.
		let mut found = None;
		for entry in &self.entries {
			if entry.token.matches(token) && found.is_none() {
				found = Some(entry.principal.clone());
			}
		}
		found.ok_or(AuthError::InvalidToken)
	}
}

/// Configuration schema for StaticTokenAuth.
pub struct StaticTokenSchema;

impl ConfigSchema for StaticTokenSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let non_blank = |value: &toml::Value| match value.as_str() {
			Some(s) if s.trim().is_empty() => Err("cannot be empty".to_string()),
			_ => Ok(()),
		};

		let principal = Schema::new(
			vec![
				Field::new("token", FieldType::String).with_validator(non_blank),
				Field::new("id", FieldType::String).with_validator(non_blank),
				Field::new("name", FieldType::String),
				Field::new("email", FieldType::String).with_validator(|value| {
					match value.as_str() {
						Some(email) if !email.contains('@') => {
							Err(format!("'{}' is not an e-mail address", email))
						},
						_ => Ok(()),
					}
				}),
			],
			vec![Field::new("role", FieldType::String).with_validator(|value| {
				match value.as_str() {
					Some("user" | "customer" | "admin") | None => Ok(()),
					Some(other) => Err(format!(
						"unknown role '{}', expected user or admin",
						other
					)),
				}
			})],
		);

		let schema = Schema::new(
			vec![],
			vec![Field::new(
				"principals",
				FieldType::Array(Box::new(FieldType::Table(principal))),
			)],
		);
		schema.validate(config)
	}
}

/// Factory function to create the static token backend from configuration.
///
/// Configuration parameters:
/// - `principals`: array of tables with `token`, `id`, `name`, `email` and an
///   optional `role` ("user" or "admin", default "user")
pub fn create_auth(config: &toml::Value) -> Result<Box<dyn AuthInterface>, AuthError> {
	StaticTokenSchema
		.validate(config)
		.map_err(|e| AuthError::Configuration(e.to_string()))?;

	let entries: Vec<TokenEntry> = match config.get("principals") {
		Some(value) => value
			.clone()
			.try_into()
			.map_err(|e: toml::de::Error| AuthError::Configuration(e.message().to_string()))?,
		None => Vec::new(),
	};

	let mut seen = HashSet::new();
	for entry in &entries {
		if !seen.insert(entry.token.expose_secret().to_string()) {
			return Err(AuthError::Configuration(format!(
				"Duplicate token configured for principal '{}'",
				entry.principal.id
			)));
		}
	}

	let admins = entries
		.iter()
		.filter(|e| e.principal.role == Role::Admin)
		.count();
	tracing::info!(
		principals = entries.len(),
		admins,
		"Loaded static token table"
	);

	Ok(Box::new(StaticTokenAuth { entries }))
}

/// Registry for the static token implementation.
pub struct Registry;

impl ImplementationRegistry for Registry {
	const NAME: &'static str = "static";
	type Factory = AuthFactory;

	fn factory() -> Self::Factory {
		create_auth
	}
}

impl AuthRegistry for Registry {}

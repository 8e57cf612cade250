//! Assembles an [`OrderEngine`] from configuration.
//!
//! Backends are chosen by name: every implementation listed in the config is
//! constructed through its factory (which validates its own table), then the
//! one named `primary` is used.

use crate::engine::{event_bus::EventBus, OrderEngine};
use crate::state::OrderStateMachine;
use std::collections::HashMap;
use std::sync::Arc;
use storefront_auth::{AuthError, AuthInterface, AuthService};
use storefront_config::Config;
use storefront_pricing::{PricingEngine, ShippingPolicy};
use storefront_storage::{StorageError, StorageInterface, StorageService};
use thiserror::Error;

/// Capacity of the order event bus.
const EVENT_BUS_CAPACITY: usize = 1000;

/// Errors that can occur while assembling the engine.
#[derive(Debug, Error)]
pub enum BuilderError {
	#[error("Configuration error: {0}")]
	Config(String),
	#[error("Missing required component: {0}")]
	MissingComponent(String),
}

/// Factory functions available to the builder, keyed by implementation name.
pub struct OrderFactories<SF, AF> {
	pub storage_factories: HashMap<String, SF>,
	pub auth_factories: HashMap<String, AF>,
}

/// Builder for an [`OrderEngine`] with pluggable storage and auth.
pub struct OrderEngineBuilder {
	config: Config,
}

impl OrderEngineBuilder {
	pub fn new(config: Config) -> Self {
		Self { config }
	}

	pub fn build<SF, AF>(self, factories: OrderFactories<SF, AF>) -> Result<OrderEngine, BuilderError>
	where
		SF: Fn(&toml::Value) -> Result<Box<dyn StorageInterface>, StorageError>,
		AF: Fn(&toml::Value) -> Result<Box<dyn AuthInterface>, AuthError>,
	{
		let storage_backend = select_primary(
			"storage",
			&self.config.storage.primary,
			&self.config.storage.implementations,
			&factories.storage_factories,
		)?;
		let storage = Arc::new(StorageService::new(storage_backend));

		let auth_backend = select_primary(
			"auth",
			&self.config.auth.primary,
			&self.config.auth.implementations,
			&factories.auth_factories,
		)?;
		let auth = Arc::new(AuthService::new(auth_backend));

		let shipping = ShippingPolicy::flat(self.config.pricing.shipping_fee)
			.map_err(|e| BuilderError::Config(e.to_string()))?;
		tracing::info!(
			component = "pricing",
			shipping_fee = %shipping.flat_fee,
			currency = %self.config.pricing.currency,
			"Loaded"
		);

		Ok(OrderEngine::new(
			self.config,
			OrderStateMachine::new(storage),
			PricingEngine::new(shipping),
			auth,
			EventBus::new(EVENT_BUS_CAPACITY),
		))
	}
}

/// Constructs every configured implementation of one component and returns
/// the primary.
fn select_primary<T: ?Sized, E: std::fmt::Display, F>(
	component: &str,
	primary: &str,
	configured: &HashMap<String, toml::Value>,
	factories: &HashMap<String, F>,
) -> Result<Box<T>, BuilderError>
where
	F: Fn(&toml::Value) -> Result<Box<T>, E>,
{
	let mut loaded = HashMap::new();
	for (name, config) in configured {
		let Some(factory) = factories.get(name) else {
			tracing::warn!(component, implementation = %name, "No factory registered, skipping");
			continue;
		};
		match factory(config) {
			Ok(implementation) => {
				tracing::info!(component, implementation = %name, enabled = %(name == primary), "Loaded");
				loaded.insert(name.clone(), implementation);
			},
			Err(e) => {
				tracing::error!(
					component,
					implementation = %name,
					error = %e,
					"Failed to create implementation"
				);
				return Err(BuilderError::Config(format!(
					"Failed to create {} implementation '{}': {}",
					component, name, e
				)));
			},
		}
	}

	if loaded.is_empty() {
		return Err(BuilderError::MissingComponent(format!(
			"no valid {} implementations available",
			component
		)));
	}
	loaded.remove(primary).ok_or_else(|| {
		BuilderError::Config(format!(
			"Primary {} '{}' failed to load or has no registered factory",
			component, primary
		))
	})
}

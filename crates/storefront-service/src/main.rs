//! Main entry point for the storefront order service.
//!
//! Loads configuration, wires the configured storage and auth backends into an
//! order engine, and serves the HTTP API until interrupted.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use storefront_config::Config;
use storefront_core::{audit, OrderEngine, OrderEngineBuilder, OrderFactories};

use storefront_auth::AuthFactory;
use storefront_storage::StorageFactory;

mod apis;
mod server;

/// Command-line arguments for the storefront service.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "config.toml")]
	config: PathBuf,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	use tracing_subscriber::{fmt, EnvFilter};

	let default_directive = args.log_level.to_string();
	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

	fmt()
		.with_env_filter(env_filter)
		.with_thread_ids(true)
		.with_target(true)
		.init();

	tracing::info!("Started storefront");

	let config_path = args
		.config
		.to_str()
		.ok_or("Configuration path is not valid UTF-8")?;
	let config = Config::from_file(config_path).await?;
	tracing::info!("Loaded configuration [{}]", config.storefront.id);

	let api_config = match &config.api {
		Some(api) if api.enabled => api.clone(),
		_ => return Err("API server is disabled; set [api] enabled = true".into()),
	};

	let engine = Arc::new(build_engine(config)?);
	let audit_task = audit::spawn_audit_log(engine.event_bus());

	server::start_server(api_config, engine).await?;

	audit_task.abort();
	tracing::info!("Stopped storefront");
	Ok(())
}

/// Factory maps for every backend the storage and auth crates register.
fn factories() -> OrderFactories<StorageFactory, AuthFactory> {
	OrderFactories {
		storage_factories: storefront_storage::get_all_implementations()
			.into_iter()
			.map(|(name, factory)| (name.to_string(), factory))
			.collect(),
		auth_factories: storefront_auth::get_all_implementations()
			.into_iter()
			.map(|(name, factory)| (name.to_string(), factory))
			.collect(),
	}
}

/// Builds the order engine with every registered backend.
fn build_engine(config: Config) -> Result<OrderEngine, Box<dyn std::error::Error>> {
	Ok(OrderEngineBuilder::new(config).build(factories())?)
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::{TimeZone, Utc};
	use rust_decimal::Decimal;
	use storefront_types::{DeliveryDetails, LineItem, PaymentMethod};

	#[test]
	fn test_args_defaults() {
		let args = Args::parse_from(["storefront"]);
		assert_eq!(args.config, PathBuf::from("config.toml"));
		assert_eq!(args.log_level, "info");

		let args = Args::parse_from(["storefront", "-c", "shop.toml", "--log-level", "debug"]);
		assert_eq!(args.config, PathBuf::from("shop.toml"));
		assert_eq!(args.log_level, "debug");
	}

	#[test]
	fn test_factories_cover_registered_backends() {
		let factories = factories();

		let mut storage: Vec<_> = factories.storage_factories.keys().cloned().collect();
		storage.sort();
		assert_eq!(storage, vec!["file", "memory"]);

		let auth: Vec<_> = factories.auth_factories.keys().cloned().collect();
		assert_eq!(auth, vec!["static"]);
	}

	#[tokio::test]
	async fn test_file_backed_engine_persists_across_restarts() {
		let dir = tempfile::tempdir().unwrap();
		let config_path = dir.path().join("config.toml");
		let storage_path = dir.path().join("orders");
		std::fs::write(
			&config_path,
			format!(
				r#"
[storefront]
id = "file-test"

[storage]
primary = "file"
[storage.implementations.file]
storage_path = "{}"

[auth]
primary = "static"
[[auth.implementations.static.principals]]
token = "ayesha-token"
id = "u-1"
name = "Ayesha"
email = "ayesha@example.com"
"#,
				storage_path.display()
			),
		)
		.unwrap();

		async fn load(path: &std::path::Path) -> OrderEngine {
			let config = Config::from_file(path.to_str().unwrap()).await.unwrap();
			build_engine(config).unwrap()
		}

		let engine = load(&config_path).await;
		let principal = engine.authenticate("ayesha-token").await.unwrap();
		let created = engine
			.create_order_at(
				&principal,
				vec![LineItem::new("p1", "Almonds 500g", Decimal::from(1000), 2)],
				PaymentMethod::JazzCash,
				DeliveryDetails {
					name: "Ayesha Khan".into(),
					phone: "03123456789".into(),
					address: "House 1".into(),
					city: None,
				},
				Utc.with_ymd_and_hms(2026, 5, 1, 10, 0, 0).unwrap(),
			)
			.await
			.unwrap();
		drop(engine);

		let engine = load(&config_path).await;
		let orders = engine.list_my_orders(&principal).await.unwrap();
		assert_eq!(orders.len(), 1);
		assert_eq!(orders[0].id, created.id);
		assert_eq!(orders[0].total_price, Decimal::from(2250));
	}
}

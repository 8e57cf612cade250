//! HTTP server for the storefront API.
//!
//! Exposes the order lifecycle under `/api` plus a `/health` check. Every
//! handler resolves the caller from its bearer token before touching input.

use crate::apis::{admin, order};
use axum::{
	extract::{DefaultBodyLimit, State},
	http::HeaderValue,
	response::Json,
	routing::{get, post, put},
	Router,
};
use serde_json::json;
use std::sync::Arc;
use storefront_config::ApiConfig;
use storefront_core::OrderEngine;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
	cors::{AllowOrigin, CorsLayer},
	trace::TraceLayer,
};

/// Shared application state for the API server.
#[derive(Clone)]
pub struct AppState {
	/// Reference to the order engine for processing requests.
	pub engine: Arc<OrderEngine>,
}

/// Builds the CORS layer, permissive unless origins are configured.
fn cors_layer(api_config: &ApiConfig) -> Result<CorsLayer, Box<dyn std::error::Error>> {
	let Some(cors) = &api_config.cors else {
		return Ok(CorsLayer::permissive());
	};
	let origins = cors
		.allowed_origins
		.iter()
		.map(|origin| origin.parse::<HeaderValue>())
		.collect::<Result<Vec<_>, _>>()?;
	Ok(CorsLayer::new()
		.allow_origin(AllowOrigin::list(origins))
		.allow_methods(tower_http::cors::Any)
		.allow_headers(tower_http::cors::Any))
}

/// Builds the application router.
pub fn router(
	state: AppState,
	api_config: &ApiConfig,
) -> Result<Router, Box<dyn std::error::Error>> {
	let api_routes = Router::new()
		.route("/orders", post(order::create_order).get(order::list_orders))
		.route("/orders/myorders", get(order::list_my_orders))
		.route("/orders/{id}", get(order::get_order))
		.route("/orders/{id}/cancel", put(order::cancel_order))
		.route("/orders/{id}/status", put(order::update_order_status))
		.route("/admin/stats", get(admin::order_stats));

	Ok(Router::new()
		.route("/health", get(handle_health))
		.nest("/api", api_routes)
		.layer(
			ServiceBuilder::new()
				.layer(TraceLayer::new_for_http())
				.layer(cors_layer(api_config)?)
				.layer(DefaultBodyLimit::max(api_config.max_request_size)),
		)
		.with_state(state))
}

/// Starts the HTTP server and serves until interrupted.
pub async fn start_server(
	api_config: ApiConfig,
	engine: Arc<OrderEngine>,
) -> Result<(), Box<dyn std::error::Error>> {
	let app = router(AppState { engine }, &api_config)?;

	let bind_address = format!("{}:{}", api_config.host, api_config.port);
	let listener = TcpListener::bind(&bind_address).await?;

	tracing::info!("Storefront API server starting on {}", bind_address);

	axum::serve(listener, app)
		.with_graceful_shutdown(shutdown_signal())
		.await?;

	Ok(())
}

async fn shutdown_signal() {
	if let Err(e) = tokio::signal::ctrl_c().await {
		tracing::error!("Failed to listen for shutdown signal: {}", e);
		return;
	}
	tracing::info!("Shutdown signal received");
}

/// Handles GET /health.
async fn handle_health(State(state): State<AppState>) -> Json<serde_json::Value> {
	Json(json!({
		"status": "ok",
		"storefront": state.engine.config().storefront.id,
	}))
}

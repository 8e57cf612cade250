//! Admin dashboard endpoint.

use super::{api_error, auth::Authenticated};
use crate::server::AppState;
use axum::{extract::State, response::Json};
use storefront_types::{APIError, OrderStats};

/// Handles GET /api/admin/stats.
pub async fn order_stats(
	State(state): State<AppState>,
	Authenticated(principal): Authenticated,
) -> Result<Json<OrderStats>, APIError> {
	state
		.engine
		.order_stats(&principal)
		.await
		.map(Json)
		.map_err(api_error)
}

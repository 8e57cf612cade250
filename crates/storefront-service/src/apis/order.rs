//! Order endpoints.

use super::{api_error, auth::Authenticated};
use crate::server::AppState;
use axum::{
	extract::{rejection::JsonRejection, Path, Query, State},
	http::StatusCode,
	response::Json,
};
use storefront_types::{
	truncate_id, APIError, CreateOrderRequest, ListOrdersQuery, Order, OrderFilter,
	UpdateOrderStatusRequest,
};

/// Handles POST /api/orders.
pub async fn create_order(
	State(state): State<AppState>,
	Authenticated(principal): Authenticated,
	payload: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Order>), APIError> {
	let Json(request) = payload.map_err(|rejection| {
		tracing::warn!("Rejected order body: {}", rejection.body_text());
		APIError::bad_request("INVALID_ORDER_INPUT", rejection.body_text())
	})?;

	if let Some(claimed) = &request.total_price {
		tracing::debug!(claimed = %claimed, "Ignoring client-supplied total");
	}

	let order = state
		.engine
		.create_order(
			&principal,
			request.order_items,
			request.payment_method,
			request.customer_details.into(),
		)
		.await
		.map_err(|e| {
			tracing::warn!("Order creation failed: {}", e);
			api_error(e)
		})?;
	Ok((StatusCode::CREATED, Json(order)))
}

/// Handles GET /api/orders/myorders.
pub async fn list_my_orders(
	State(state): State<AppState>,
	Authenticated(principal): Authenticated,
) -> Result<Json<Vec<Order>>, APIError> {
	state
		.engine
		.list_my_orders(&principal)
		.await
		.map(Json)
		.map_err(api_error)
}

/// Handles GET /api/orders/{id}.
pub async fn get_order(
	State(state): State<AppState>,
	Authenticated(principal): Authenticated,
	Path(id): Path<String>,
) -> Result<Json<Order>, APIError> {
	state
		.engine
		.get_order(&id, &principal)
		.await
		.map(Json)
		.map_err(|e| {
			tracing::warn!(order_id = %truncate_id(&id), "Order retrieval failed: {}", e);
			api_error(e)
		})
}

/// Handles PUT /api/orders/{id}/cancel.
pub async fn cancel_order(
	State(state): State<AppState>,
	Authenticated(principal): Authenticated,
	Path(id): Path<String>,
) -> Result<Json<Order>, APIError> {
	state
		.engine
		.cancel_order(&id, &principal)
		.await
		.map(Json)
		.map_err(api_error)
}

/// Handles GET /api/orders?status=active|history.
pub async fn list_orders(
	State(state): State<AppState>,
	Authenticated(principal): Authenticated,
	Query(query): Query<ListOrdersQuery>,
) -> Result<Json<Vec<Order>>, APIError> {
	let filter = OrderFilter::from_query(query.status.as_deref());
	state
		.engine
		.list_orders(filter, &principal)
		.await
		.map(Json)
		.map_err(api_error)
}

/// Handles PUT /api/orders/{id}/status.
pub async fn update_order_status(
	State(state): State<AppState>,
	Authenticated(principal): Authenticated,
	Path(id): Path<String>,
	payload: Result<Json<UpdateOrderStatusRequest>, JsonRejection>,
) -> Result<Json<Order>, APIError> {
	let Json(request) = payload
		.map_err(|rejection| APIError::bad_request("INVALID_STATUS", rejection.body_text()))?;

	state
		.engine
		.set_order_status(&id, &request.status, &principal, request.version)
		.await
		.map(Json)
		.map_err(api_error)
}

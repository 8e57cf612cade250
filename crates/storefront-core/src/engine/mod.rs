//! The order engine.
//!
//! Every operation takes the authenticated [`Principal`] explicitly and
//! enforces ownership and role rules itself. Time-dependent operations have
//! an `*_at` variant that takes the current time, which the plain variant
//! fills in from the system clock.

pub mod event_bus;

use crate::state::OrderStateMachine;
use crate::stats::{compute_stats, sort_newest_first};
use crate::OrderError;
use chrono::{DateTime, Duration, Utc};
use event_bus::EventBus;
use std::sync::Arc;
use storefront_auth::AuthService;
use storefront_config::Config;
use storefront_pricing::PricingEngine;
use storefront_types::{
	truncate_id, Actor, CustomerDetails, DeliveryDetails, LineItem, Order, OrderEvent,
	OrderFilter, OrderStats, OrderStatus, PaymentMethod, Principal,
};
use tracing::instrument;
use uuid::Uuid;

/// Owns the order lifecycle rules and the services they need.
pub struct OrderEngine {
	config: Config,
	state: OrderStateMachine,
	pricing: PricingEngine,
	auth: Arc<AuthService>,
	event_bus: EventBus,
}

impl OrderEngine {
	pub fn new(
		config: Config,
		state: OrderStateMachine,
		pricing: PricingEngine,
		auth: Arc<AuthService>,
		event_bus: EventBus,
	) -> Self {
		Self {
			config,
			state,
			pricing,
			auth,
			event_bus,
		}
	}

	pub fn config(&self) -> &Config {
		&self.config
	}

	pub fn event_bus(&self) -> &EventBus {
		&self.event_bus
	}

	fn cancellation_window(&self) -> Duration {
		Duration::minutes(self.config.orders.cancellation_window_minutes as i64)
	}

	/// Resolves a bearer token to a principal.
	pub async fn authenticate(&self, token: &str) -> Result<Principal, OrderError> {
		self.auth.authenticate(token).await.map_err(|e| {
			tracing::debug!(error = %e, "Authentication failed");
			OrderError::from(e)
		})
	}

	pub async fn create_order(
		&self,
		principal: &Principal,
		line_items: Vec<LineItem>,
		payment_method: PaymentMethod,
		delivery: DeliveryDetails,
	) -> Result<Order, OrderError> {
		self.create_order_at(principal, line_items, payment_method, delivery, Utc::now())
			.await
	}

	/// Prices and persists a new pending order.
	///
	/// The total is computed from the items and the configured shipping fee.
	/// The customer e-mail is always the principal's.
	#[instrument(skip_all, fields(user = %principal.id))]
	pub async fn create_order_at(
		&self,
		principal: &Principal,
		line_items: Vec<LineItem>,
		payment_method: PaymentMethod,
		delivery: DeliveryDetails,
		now: DateTime<Utc>,
	) -> Result<Order, OrderError> {
		if principal.email.trim().is_empty() {
			return Err(OrderError::Unauthenticated);
		}
		if let Some(field) = delivery.first_missing_field() {
			return Err(OrderError::InvalidOrderInput(format!(
				"customer {} is required",
				field
			)));
		}
		if let Some(index) = line_items
			.iter()
			.position(|item| item.product_id.trim().is_empty() || item.name.trim().is_empty())
		{
			return Err(OrderError::InvalidOrderInput(format!(
				"item {} must name a product",
				index
			)));
		}

		let quote = self.pricing.quote(&line_items)?;

		let order = Order {
			id: Uuid::new_v4().to_string(),
			user: principal.id.clone(),
			customer_details: CustomerDetails::from_delivery(delivery, principal.email.clone()),
			order_items: line_items,
			payment_method,
			total_price: quote.total_price,
			order_status: OrderStatus::Pending,
			created_at: now,
			updated_at: now,
			version: 1,
		};
		self.state.store_order(&order).await?;

		tracing::info!(
			order_id = %truncate_id(&order.id),
			items = order.order_items.len(),
			total_price = %order.total_price,
			payment_method = %order.payment_method,
			"Order created"
		);
		self.event_bus
			.publish(OrderEvent::Created {
				order_id: order.id.clone(),
				actor: Actor::from(principal),
				total_price: order.total_price,
				at: now,
			})
			.ok();

		Ok(order)
	}

	pub async fn cancel_order(
		&self,
		order_id: &str,
		principal: &Principal,
	) -> Result<Order, OrderError> {
		self.cancel_order_at(order_id, principal, Utc::now()).await
	}

	/// Cancels a pending order on behalf of its owner.
	///
	/// Checks, in order: the order exists, the principal owns it, it is still
	/// pending, and the cancellation window has not passed. The window is
	/// inclusive.
	#[instrument(skip_all, fields(order_id = %truncate_id(order_id)))]
	pub async fn cancel_order_at(
		&self,
		order_id: &str,
		principal: &Principal,
		now: DateTime<Utc>,
	) -> Result<Order, OrderError> {
		ensure_order_id(order_id)?;
		let window = self.cancellation_window();
		let window_minutes = self.config.orders.cancellation_window_minutes;

		let order = self
			.state
			.update_order_with(order_id, now, |order| {
				if !order.is_owned_by(&principal.email) {
					return Err(OrderError::Forbidden(
						"only the customer who placed an order may cancel it".into(),
					));
				}
				if order.order_status != OrderStatus::Pending {
					return Err(OrderError::InvalidTransition {
						action: "cancel",
						status: order.order_status,
					});
				}
				if now.signed_duration_since(order.created_at) > window {
					return Err(OrderError::WindowExpired { window_minutes });
				}
				order.order_status = OrderStatus::Cancelled;
				Ok(())
			})
			.await
			.inspect_err(|e| tracing::warn!(error = %e, "Cancellation rejected"))?;

		tracing::info!(version = order.version, "Order cancelled by customer");
		self.publish_status_change(&order, principal, OrderStatus::Pending, now);
		Ok(order)
	}

	pub async fn set_order_status(
		&self,
		order_id: &str,
		new_status: &str,
		principal: &Principal,
		expected_version: Option<u64>,
	) -> Result<Order, OrderError> {
		self.set_order_status_at(order_id, new_status, principal, expected_version, Utc::now())
			.await
	}

	/// Overwrites an order's status on behalf of an administrator.
	///
	/// Any settable status may replace any other; changes that leave the
	/// nominal lifecycle are flagged by the audit log. When `expected_version`
	/// is given the write only happens if the order is still at that version.
	#[instrument(skip_all, fields(order_id = %truncate_id(order_id), status = %new_status))]
	pub async fn set_order_status_at(
		&self,
		order_id: &str,
		new_status: &str,
		principal: &Principal,
		expected_version: Option<u64>,
		now: DateTime<Utc>,
	) -> Result<Order, OrderError> {
		require_admin(principal)?;
		ensure_order_id(order_id)?;

		let mut previous = None;
		let order = self
			.state
			.update_order_with(order_id, now, |order| {
				let status = parse_settable_status(new_status)?;
				if let Some(expected) = expected_version {
					if expected != order.version {
						return Err(OrderError::ConflictRetry(format!(
							"expected version {}, order is at version {}",
							expected, order.version
						)));
					}
				}
				previous = Some(order.order_status);
				order.order_status = status;
				Ok(())
			})
			.await
			.inspect_err(|e| tracing::warn!(error = %e, "Status update rejected"))?;

		let from = previous.unwrap_or(order.order_status);
		tracing::info!(from = %from, version = order.version, "Order status updated");
		self.publish_status_change(&order, principal, from, now);
		Ok(order)
	}

	/// Lists orders for the admin view, newest first.
	pub async fn list_orders(
		&self,
		filter: OrderFilter,
		principal: &Principal,
	) -> Result<Vec<Order>, OrderError> {
		require_admin(principal)?;
		let mut orders: Vec<Order> = self
			.state
			.all_orders()
			.await?
			.into_iter()
			.filter(|o| filter.matches(o.order_status))
			.collect();
		sort_newest_first(&mut orders);
		Ok(orders)
	}

	/// Lists the principal's own orders, newest first.
	pub async fn list_my_orders(&self, principal: &Principal) -> Result<Vec<Order>, OrderError> {
		let mut orders: Vec<Order> = self
			.state
			.all_orders()
			.await?
			.into_iter()
			.filter(|o| o.is_owned_by(&principal.email))
			.collect();
		sort_newest_first(&mut orders);
		Ok(orders)
	}

	/// Reads one order. Only its owner or an administrator may see it.
	pub async fn get_order(
		&self,
		order_id: &str,
		principal: &Principal,
	) -> Result<Order, OrderError> {
		ensure_order_id(order_id)?;
		let order = self.state.get_order(order_id).await?;
		if !principal.is_admin() && !order.is_owned_by(&principal.email) {
			return Err(OrderError::Forbidden(
				"order belongs to another customer".into(),
			));
		}
		Ok(order)
	}

	/// Dashboard figures across all orders.
	pub async fn order_stats(&self, principal: &Principal) -> Result<OrderStats, OrderError> {
		require_admin(principal)?;
		Ok(compute_stats(self.state.all_orders().await?))
	}

	fn publish_status_change(
		&self,
		order: &Order,
		principal: &Principal,
		from: OrderStatus,
		at: DateTime<Utc>,
	) {
		self.event_bus
			.publish(OrderEvent::StatusChanged {
				order_id: order.id.clone(),
				actor: Actor::from(principal),
				from,
				to: order.order_status,
				version: order.version,
				at,
			})
			.ok();
	}
}

/// Parses a status an administrator may set; `Pending` is never settable.
fn parse_settable_status(value: &str) -> Result<OrderStatus, OrderError> {
	let status: OrderStatus = value
		.parse()
		.map_err(|e: storefront_types::UnknownStatus| OrderError::InvalidStatus(e.0))?;
	if !status.is_admin_settable() {
		return Err(OrderError::InvalidStatus(status.to_string()));
	}
	Ok(status)
}

fn require_admin(principal: &Principal) -> Result<(), OrderError> {
	if principal.is_admin() {
		Ok(())
	} else {
		Err(OrderError::Forbidden("admin access required".into()))
	}
}

/// Order ids are server-issued UUIDs; anything else cannot exist.
fn ensure_order_id(order_id: &str) -> Result<(), OrderError> {
	Uuid::parse_str(order_id)
		.map(|_| ())
		.map_err(|_| OrderError::NotFound)
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::TimeZone;
	use rust_decimal::Decimal;
	use storefront_auth::implementations::static_tokens::StaticTokenAuth;
	use storefront_pricing::ShippingPolicy;
	use storefront_storage::{implementations::memory::MemoryStorage, StorageService};
	use storefront_types::{Role, SecretString};

	const CONFIG: &str = r#"
[storefront]
id = "engine-test"

[storage]
primary = "memory"
[storage.implementations.memory]

[auth]
primary = "static"
[auth.implementations.static]
"#;

	fn ayesha() -> Principal {
		Principal::new("u-1", "Ayesha", "ayesha@example.com", Role::Customer)
	}

	fn bilal() -> Principal {
		Principal::new("u-2", "Bilal", "bilal@example.com", Role::Customer)
	}

	fn admin() -> Principal {
		Principal::new("admin-1", "Admin", "admin@example.com", Role::Admin)
	}

	fn engine() -> OrderEngine {
		let config: Config = CONFIG.parse().unwrap();
		let storage = Arc::new(StorageService::new(Box::new(MemoryStorage::new())));
		let auth = StaticTokenAuth::new(vec![
			(SecretString::from("admin-token"), admin()),
			(SecretString::from("ayesha-token"), ayesha()),
		]);
		OrderEngine::new(
			config,
			OrderStateMachine::new(storage),
			PricingEngine::new(ShippingPolicy::flat(Decimal::from(250)).unwrap()),
			Arc::new(AuthService::new(Box::new(auth))),
			EventBus::new(64),
		)
	}

	fn delivery() -> DeliveryDetails {
		DeliveryDetails {
			name: "Ayesha Khan".into(),
			phone: "0300-1234567".into(),
			address: "House 12, Street 4".into(),
			city: Some("Karachi".into()),
		}
	}

	fn items() -> Vec<LineItem> {
		vec![
			LineItem::new("p-1", "Almonds 1kg", Decimal::from(1000), 2),
			LineItem::new("p-2", "Ajwa Dates", Decimal::from(500), 1),
		]
	}

	fn t0() -> DateTime<Utc> {
		Utc.with_ymd_and_hms(2026, 5, 1, 10, 0, 0).unwrap()
	}

	async fn place_at(engine: &OrderEngine, principal: &Principal, at: DateTime<Utc>) -> Order {
		engine
			.create_order_at(principal, items(), PaymentMethod::CashOnDelivery, delivery(), at)
			.await
			.unwrap()
	}

	async fn place(engine: &OrderEngine, principal: &Principal) -> Order {
		place_at(engine, principal, t0()).await
	}

	#[tokio::test]
	async fn test_create_order_prices_on_server() {
		let engine = engine();
		let order = place(&engine, &ayesha()).await;

		assert_eq!(order.total_price, Decimal::from(2750));
		assert_eq!(order.order_status, OrderStatus::Pending);
		assert_eq!(order.version, 1);
		assert_eq!(order.user, "u-1");
		assert_eq!(order.customer_details.email, "ayesha@example.com");
		assert_eq!(order.customer_details.city.as_deref(), Some("Karachi"));
		assert_eq!(order.created_at, t0());
		assert_eq!(order.order_items.len(), 2);
		assert_eq!(order.order_items[0].name, "Almonds 1kg");

		let stored = engine.get_order(&order.id, &ayesha()).await.unwrap();
		assert_eq!(stored, order);
	}

	#[tokio::test]
	async fn test_create_order_rejects_invalid_input() {
		let engine = engine();

		let empty = engine
			.create_order_at(&ayesha(), vec![], PaymentMethod::Easypaisa, delivery(), t0())
			.await;
		assert!(matches!(empty, Err(OrderError::InvalidOrderInput(_))));

		let mut no_phone = delivery();
		no_phone.phone = "  ".into();
		let result = engine
			.create_order_at(&ayesha(), items(), PaymentMethod::Easypaisa, no_phone, t0())
			.await;
		assert!(matches!(result, Err(OrderError::InvalidOrderInput(m)) if m.contains("phone")));

		let unnamed = vec![LineItem::new("p-1", "", Decimal::from(10), 1)];
		let result = engine
			.create_order_at(&ayesha(), unnamed, PaymentMethod::Easypaisa, delivery(), t0())
			.await;
		assert!(matches!(result, Err(OrderError::InvalidOrderInput(_))));

		let zero_qty = vec![LineItem::new("p-1", "Figs", Decimal::from(10), 0)];
		let result = engine
			.create_order_at(&ayesha(), zero_qty, PaymentMethod::Easypaisa, delivery(), t0())
			.await;
		assert!(matches!(result, Err(OrderError::InvalidOrderInput(_))));

		assert!(engine.list_my_orders(&ayesha()).await.unwrap().is_empty());
	}

	#[tokio::test]
	async fn test_create_order_requires_identity() {
		let engine = engine();
		let anonymous = Principal::new("u-9", "Nobody", " ", Role::Customer);
		let result = engine
			.create_order_at(&anonymous, items(), PaymentMethod::JazzCash, delivery(), t0())
			.await;
		assert!(matches!(result, Err(OrderError::Unauthenticated)));
	}

	#[tokio::test]
	async fn test_cancel_within_window() {
		let engine = engine();
		let order = place(&engine, &ayesha()).await;

		let at = t0() + Duration::minutes(119);
		let cancelled = engine
			.cancel_order_at(&order.id, &ayesha(), at)
			.await
			.unwrap();
		assert_eq!(cancelled.order_status, OrderStatus::Cancelled);
		assert_eq!(cancelled.version, 2);
		assert_eq!(cancelled.updated_at, at);
		assert_eq!(cancelled.total_price, order.total_price);
	}

	#[tokio::test]
	async fn test_cancel_window_boundaries() {
		let engine = engine();

		let exact = place(&engine, &ayesha()).await;
		assert!(engine
			.cancel_order_at(&exact.id, &ayesha(), t0() + Duration::hours(2))
			.await
			.is_ok());

		let late = place(&engine, &ayesha()).await;
		let result = engine
			.cancel_order_at(&late.id, &ayesha(), t0() + Duration::minutes(121))
			.await;
		assert!(matches!(
			result,
			Err(OrderError::WindowExpired {
				window_minutes: 120
			})
		));

		let unchanged = engine.get_order(&late.id, &ayesha()).await.unwrap();
		assert_eq!(unchanged.order_status, OrderStatus::Pending);
		assert_eq!(unchanged.version, 1);
	}

	#[tokio::test]
	async fn test_cancel_by_non_owner_is_forbidden_regardless_of_timing() {
		let engine = engine();
		let order = place(&engine, &ayesha()).await;

		for minutes in [1, 300] {
			let result = engine
				.cancel_order_at(&order.id, &bilal(), t0() + Duration::minutes(minutes))
				.await;
			assert!(matches!(result, Err(OrderError::Forbidden(_))));
		}
	}

	#[tokio::test]
	async fn test_cancel_requires_pending() {
		let engine = engine();

		for status in ["Shipped", "Delivered", "Cancelled", "Out of Stock"] {
			let order = place(&engine, &ayesha()).await;
			engine
				.set_order_status_at(&order.id, status, &admin(), None, t0())
				.await
				.unwrap();

			let result = engine
				.cancel_order_at(&order.id, &ayesha(), t0() + Duration::minutes(1))
				.await;
			assert!(
				matches!(result, Err(OrderError::InvalidTransition { action: "cancel", .. })),
				"cancel after {} should be rejected",
				status
			);
		}
	}

	#[tokio::test]
	async fn test_cancel_unknown_order() {
		let engine = engine();
		let missing = Uuid::new_v4().to_string();
		assert!(matches!(
			engine.cancel_order_at(&missing, &ayesha(), t0()).await,
			Err(OrderError::NotFound)
		));
		assert!(matches!(
			engine.cancel_order_at("../etc/passwd", &ayesha(), t0()).await,
			Err(OrderError::NotFound)
		));
	}

	#[tokio::test]
	async fn test_set_status_requires_admin_even_for_owner() {
		let engine = engine();
		let order = place(&engine, &ayesha()).await;
		let result = engine
			.set_order_status_at(&order.id, "Delivered", &ayesha(), None, t0())
			.await;
		assert!(matches!(result, Err(OrderError::Forbidden(_))));
	}

	#[tokio::test]
	async fn test_set_status_rejects_unsettable_values() {
		let engine = engine();
		let order = place(&engine, &ayesha()).await;

		for status in ["Pending", "Lost", ""] {
			let result = engine
				.set_order_status_at(&order.id, status, &admin(), None, t0())
				.await;
			assert!(matches!(result, Err(OrderError::InvalidStatus(_))));
		}

		let updated = engine
			.set_order_status_at(&order.id, "OutOfStock", &admin(), None, t0())
			.await
			.unwrap();
		assert_eq!(updated.order_status, OrderStatus::OutOfStock);
	}

	#[tokio::test]
	async fn test_set_status_on_missing_order_is_not_found() {
		let engine = engine();
		let missing = Uuid::new_v4().to_string();
		for status in ["Pending", "Lost", "Shipped"] {
			assert!(matches!(
				engine
					.set_order_status_at(&missing, status, &admin(), None, t0())
					.await,
				Err(OrderError::NotFound)
			));
		}
		assert!(matches!(
			engine
				.set_order_status_at(&missing, "Lost", &ayesha(), None, t0())
				.await,
			Err(OrderError::Forbidden(_))
		));
	}

	#[tokio::test]
	async fn test_admin_override_is_published() {
		let engine = engine();
		let mut events = engine.event_bus().subscribe();
		let order = place(&engine, &ayesha()).await;

		engine
			.set_order_status_at(&order.id, "Delivered", &admin(), None, t0())
			.await
			.unwrap();
		let reverted = engine
			.set_order_status_at(&order.id, "Cancelled", &admin(), None, t0())
			.await
			.unwrap();
		assert_eq!(reverted.version, 3);

		assert!(matches!(events.recv().await.unwrap(), OrderEvent::Created { .. }));
		match events.recv().await.unwrap() {
			OrderEvent::StatusChanged { from, to, .. } => {
				assert_eq!(from, OrderStatus::Pending);
				assert_eq!(to, OrderStatus::Delivered);
			},
			other => panic!("unexpected event {:?}", other),
		}
		let last = events.recv().await.unwrap();
		assert!(crate::audit::is_override(&last));
	}

	#[tokio::test]
	async fn test_stale_version_conflicts() {
		let engine = engine();
		let order = place(&engine, &ayesha()).await;

		engine
			.set_order_status_at(&order.id, "Shipped", &admin(), Some(1), t0())
			.await
			.unwrap();
		let stale = engine
			.set_order_status_at(&order.id, "Delivered", &admin(), Some(1), t0())
			.await;
		assert!(matches!(stale, Err(OrderError::ConflictRetry(_))));

		let current = engine
			.set_order_status_at(&order.id, "Delivered", &admin(), Some(2), t0())
			.await
			.unwrap();
		assert_eq!(current.version, 3);
	}

	#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
	async fn test_concurrent_updates_have_one_winner() {
		let engine = Arc::new(engine());
		let order = place(&engine, &ayesha()).await;

		let attempts = ["Shipped", "Delivered", "Cancelled", "Out of Stock"]
			.into_iter()
			.map(|status| {
				let engine = Arc::clone(&engine);
				let order_id = order.id.clone();
				tokio::spawn(async move {
					engine
						.set_order_status_at(&order_id, status, &admin(), Some(1), t0())
						.await
				})
			});
		let results = futures::future::join_all(attempts).await;

		let mut winners = 0;
		for result in results {
			match result.unwrap() {
				Ok(_) => winners += 1,
				Err(OrderError::ConflictRetry(_)) => {},
				Err(other) => panic!("unexpected error {}", other),
			}
		}
		assert_eq!(winners, 1);

		let stored = engine.get_order(&order.id, &admin()).await.unwrap();
		assert_eq!(stored.version, 2);
	}

	#[tokio::test]
	async fn test_list_orders_filters_and_sorts() {
		let engine = engine();
		let first = place_at(&engine, &ayesha(), t0()).await;
		let second = place_at(&engine, &bilal(), t0() + Duration::hours(1)).await;
		let third = place_at(&engine, &ayesha(), t0() + Duration::hours(2)).await;
		engine
			.set_order_status_at(&second.id, "Delivered", &admin(), None, t0())
			.await
			.unwrap();
		engine
			.set_order_status_at(&first.id, "Shipped", &admin(), None, t0())
			.await
			.unwrap();

		let ids = |orders: Vec<Order>| orders.into_iter().map(|o| o.id).collect::<Vec<_>>();

		let all = engine.list_orders(OrderFilter::All, &admin()).await.unwrap();
		assert_eq!(
			ids(all),
			vec![third.id.clone(), second.id.clone(), first.id.clone()]
		);

		let active = engine
			.list_orders(OrderFilter::Active, &admin())
			.await
			.unwrap();
		assert_eq!(ids(active), vec![third.id.clone(), first.id.clone()]);

		let history = engine
			.list_orders(OrderFilter::History, &admin())
			.await
			.unwrap();
		assert_eq!(ids(history), vec![second.id.clone()]);

		assert!(matches!(
			engine.list_orders(OrderFilter::All, &ayesha()).await,
			Err(OrderError::Forbidden(_))
		));
	}

	#[tokio::test]
	async fn test_list_my_orders_only_returns_own() {
		let engine = engine();
		let older = place_at(&engine, &ayesha(), t0()).await;
		place_at(&engine, &bilal(), t0()).await;
		let newer = place_at(&engine, &ayesha(), t0() + Duration::minutes(5)).await;

		let mine = engine.list_my_orders(&ayesha()).await.unwrap();
		let ids: Vec<_> = mine.iter().map(|o| o.id.clone()).collect();
		assert_eq!(ids, vec![newer.id, older.id]);
		assert!(engine.list_my_orders(&admin()).await.unwrap().is_empty());
	}

	#[tokio::test]
	async fn test_get_order_visibility() {
		let engine = engine();
		let order = place(&engine, &ayesha()).await;

		assert!(engine.get_order(&order.id, &ayesha()).await.is_ok());
		assert!(engine.get_order(&order.id, &admin()).await.is_ok());
		assert!(matches!(
			engine.get_order(&order.id, &bilal()).await,
			Err(OrderError::Forbidden(_))
		));
	}

	#[tokio::test]
	async fn test_order_stats() {
		let engine = engine();
		let delivered = place(&engine, &ayesha()).await;
		place(&engine, &bilal()).await;
		engine
			.set_order_status_at(&delivered.id, "Delivered", &admin(), None, t0())
			.await
			.unwrap();

		let stats = engine.order_stats(&admin()).await.unwrap();
		assert_eq!(stats.total_orders, 2);
		assert_eq!(stats.total_sales, Decimal::from(2750));
		assert_eq!(stats.daily_sales.len(), 1);
		assert_eq!(stats.recent_orders.len(), 2);

		assert!(matches!(
			engine.order_stats(&ayesha()).await,
			Err(OrderError::Forbidden(_))
		));
	}

	#[tokio::test]
	async fn test_authenticate() {
		let engine = engine();
		assert_eq!(engine.authenticate("admin-token").await.unwrap(), admin());
		assert!(matches!(
			engine.authenticate("forged").await,
			Err(OrderError::Unauthenticated)
		));
	}
}

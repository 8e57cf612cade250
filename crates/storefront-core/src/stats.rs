//! Sales figures for the admin dashboard.

use rust_decimal::Decimal;
use std::collections::BTreeMap;
use storefront_types::{DailySales, Order, OrderStats, OrderStatus};

/// Number of days reported in `daily_sales`.
pub const DAILY_SALES_DAYS: usize = 7;
/// Number of orders reported in `recent_orders`.
pub const RECENT_ORDERS: usize = 5;

/// Summarizes a set of orders.
///
/// Sales only count delivered orders. Daily sales are bucketed by the UTC
/// day the order was placed and reported oldest first.
pub fn compute_stats(mut orders: Vec<Order>) -> OrderStats {
	let mut total_sales = Decimal::ZERO;
	let mut by_day = BTreeMap::new();
	for order in orders
		.iter()
		.filter(|o| o.order_status == OrderStatus::Delivered)
	{
		total_sales = total_sales.saturating_add(order.total_price);
		let day = by_day
			.entry(order.created_at.date_naive())
			.or_insert(Decimal::ZERO);
		*day = day.saturating_add(order.total_price);
	}

	let daily_sales = by_day
		.into_iter()
		.take(DAILY_SALES_DAYS)
		.map(|(date, daily_total)| DailySales { date, daily_total })
		.collect();

	let total_orders = orders.len();
	sort_newest_first(&mut orders);
	orders.truncate(RECENT_ORDERS);

	OrderStats {
		total_orders,
		total_sales,
		daily_sales,
		recent_orders: orders,
	}
}

/// Sorts by creation time, newest first. Ties fall back to id so listings are stable.
pub fn sort_newest_first(orders: &mut [Order]) {
	orders.sort_by(|a, b| {
		b.created_at
			.cmp(&a.created_at)
			.then_with(|| a.id.cmp(&b.id))
	});
}

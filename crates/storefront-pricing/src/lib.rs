//! Order pricing.
//!
//! Totals are always computed here from the line items and the shipping
//! policy; a total supplied by a client is never consulted. All arithmetic is
//! exact decimal with overflow checks and no rounding.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use storefront_types::LineItem;
use thiserror::Error;

/// Errors that can occur while pricing an order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
	/// The items or fee cannot be priced.
	#[error("Invalid order input: {0}")]
	InvalidOrderInput(String),
}

/// Flat shipping fee charged once per order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingPolicy {
	pub flat_fee: Decimal,
}

impl ShippingPolicy {
	/// Creates a policy, rejecting negative fees.
	pub fn flat(flat_fee: Decimal) -> Result<Self, PricingError> {
		if flat_fee.is_sign_negative() && !flat_fee.is_zero() {
			return Err(PricingError::InvalidOrderInput(format!(
				"shipping fee cannot be negative: {}",
				flat_fee
			)));
		}
		Ok(Self { flat_fee })
	}
}

/// The parts that make up an order total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
	pub items_price: Decimal,
	pub shipping_price: Decimal,
	pub total_price: Decimal,
}

/// Sums `unit_price * quantity` over the items.
///
/// Fails on an empty list, a negative price, a zero quantity or overflow.
pub fn items_subtotal(line_items: &[LineItem]) -> Result<Decimal, PricingError> {
	if line_items.is_empty() {
		return Err(PricingError::InvalidOrderInput(
			"order must contain at least one item".into(),
		));
	}

	line_items
		.iter()
		.enumerate()
		.try_fold(Decimal::ZERO, |subtotal, (index, item)| {
			if item.unit_price.is_sign_negative() && !item.unit_price.is_zero() {
				return Err(PricingError::InvalidOrderInput(format!(
					"item {} has a negative price",
					index
				)));
			}
			if item.quantity == 0 {
				return Err(PricingError::InvalidOrderInput(format!(
					"item {} must have a quantity of at least 1",
					index
				)));
			}
			item.unit_price
				.checked_mul(Decimal::from(item.quantity))
				.and_then(|line_total| subtotal.checked_add(line_total))
				.ok_or_else(|| {
					PricingError::InvalidOrderInput("order total is out of range".into())
				})
		})
}

/// Computes `Σ(unit_price * quantity) + shipping_fee`.
pub fn compute_total(
	line_items: &[LineItem],
	shipping_fee: Decimal,
) -> Result<Decimal, PricingError> {
	let shipping = ShippingPolicy::flat(shipping_fee)?;
	Ok(quote_with(line_items, shipping)?.total_price)
}

fn quote_with(
	line_items: &[LineItem],
	shipping: ShippingPolicy,
) -> Result<PriceBreakdown, PricingError> {
	let items_price = items_subtotal(line_items)?;
	let total_price = items_price
		.checked_add(shipping.flat_fee)
		.ok_or_else(|| PricingError::InvalidOrderInput("order total is out of range".into()))?;
	Ok(PriceBreakdown {
		items_price,
		shipping_price: shipping.flat_fee,
		total_price,
	})
}

/// Prices orders under a fixed shipping policy.
#[derive(Debug, Clone, Copy)]
pub struct PricingEngine {
	shipping: ShippingPolicy,
}

impl PricingEngine {
	pub fn new(shipping: ShippingPolicy) -> Self {
		Self { shipping }
	}

	/// Prices the items, returning every component of the total.
	pub fn quote(&self, line_items: &[LineItem]) -> Result<PriceBreakdown, PricingError> {
		quote_with(line_items, self.shipping)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn item(price: i64, quantity: u32) -> LineItem {
		LineItem::new("p-1", "Almonds 500g", Decimal::from(price), quantity)
	}

	#[test]
	fn test_closed_form_total() {
		let items = vec![item(1000, 2), item(500, 1)];
		let total = compute_total(&items, Decimal::from(250)).unwrap();
		assert_eq!(total, Decimal::from(2750));
	}

	#[test]
	fn test_deterministic() {
		let items = vec![item(1299, 3), item(450, 7)];
		let first = compute_total(&items, Decimal::from(250)).unwrap();
		let second = compute_total(&items, Decimal::from(250)).unwrap();
		assert_eq!(first, second);
		assert_eq!(first, Decimal::from(1299 * 3 + 450 * 7 + 250));
	}

	#[test]
	fn test_fractional_prices_are_exact() {
		let items = vec![LineItem::new("p-2", "Saffron 1g", Decimal::new(1999, 2), 3)];
		let total = compute_total(&items, Decimal::new(1050, 2)).unwrap();
		assert_eq!(total, Decimal::new(7047, 2));
	}

	#[test]
	fn test_empty_items_rejected() {
		let result = compute_total(&[], Decimal::from(250));
		assert!(matches!(result, Err(PricingError::InvalidOrderInput(_))));
	}

	#[test]
	fn test_zero_quantity_rejected() {
		let result = compute_total(&[item(100, 0)], Decimal::from(250));
		assert!(matches!(result, Err(PricingError::InvalidOrderInput(_))));
	}

	#[test]
	fn test_negative_price_and_fee_rejected() {
		assert!(compute_total(&[item(-1, 1)], Decimal::from(250)).is_err());
		assert!(compute_total(&[item(100, 1)], Decimal::from(-1)).is_err());
		assert!(ShippingPolicy::flat(Decimal::from(-5)).is_err());
	}

	#[test]
	fn test_zero_price_and_fee_allowed() {
		let total = compute_total(&[item(0, 4)], Decimal::ZERO).unwrap();
		assert_eq!(total, Decimal::ZERO);
	}

	#[test]
	fn test_overflow_rejected() {
		let items = vec![LineItem::new("p-3", "Everything", Decimal::MAX, 2)];
		let result = compute_total(&items, Decimal::ZERO);
		assert!(matches!(result, Err(PricingError::InvalidOrderInput(_))));
	}

	#[test]
	fn test_engine_quote_breakdown() {
		let engine = PricingEngine::new(ShippingPolicy::flat(Decimal::from(250)).unwrap());
		let quote = engine.quote(&[item(1000, 2), item(500, 1)]).unwrap();
		assert_eq!(quote.items_price, Decimal::from(2500));
		assert_eq!(quote.shipping_price, Decimal::from(250));
		assert_eq!(quote.total_price, Decimal::from(2750));

		let json = serde_json::to_value(quote).unwrap();
		assert!(json.get("itemsPrice").is_some());
		assert!(json.get("totalPrice").is_some());
	}
}

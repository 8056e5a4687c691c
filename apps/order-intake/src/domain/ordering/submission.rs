//! Order submission validation.
//!
//! The request body arrives untyped. This module is the single place where it
//! becomes an [`OrderSubmission`]; everything downstream works with the typed
//! value.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::OrderError;
use crate::domain::shared::ProductId;

/// One submitted item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    /// Referenced catalog product.
    pub product: ProductId,
    /// Units ordered, at least 1.
    pub quantity: u32,
}

impl OrderLine {
    /// Create an order line.
    #[must_use]
    pub fn new(product: impl Into<ProductId>, quantity: u32) -> Self {
        Self {
            product: product.into(),
            quantity,
        }
    }

    fn from_value(value: &Value) -> Result<Self, OrderError> {
        let product = value
            .get("product")
            .and_then(Value::as_str)
            .filter(|p| !p.is_empty())
            .ok_or(OrderError::InvalidData)?;

        let quantity = value
            .get("quantity")
            .and_then(whole_quantity)
            .filter(|q| *q > 0)
            .ok_or(OrderError::InvalidData)?;

        Ok(Self::new(product, quantity))
    }
}

/// A validated cart submission.
///
/// The address is opaque to order intake and is forwarded verbatim in the
/// `order/created` event.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderSubmission {
    address: Value,
    items: Vec<OrderLine>,
}

impl OrderSubmission {
    /// Validate the raw `address` and `items` fields of a request body.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::InvalidData`] when the address is missing or
    /// falsy, when `items` is missing, not an array or empty, or when any item
    /// lacks a product id or a positive whole quantity.
    pub fn parse(address: Option<Value>, items: Option<Value>) -> Result<Self, OrderError> {
        let address = address.filter(is_truthy).ok_or(OrderError::InvalidData)?;

        let Some(Value::Array(raw_items)) = items else {
            return Err(OrderError::InvalidData);
        };
        if raw_items.is_empty() {
            return Err(OrderError::InvalidData);
        }

        let items = raw_items
            .iter()
            .map(OrderLine::from_value)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { address, items })
    }

    /// Delivery address as submitted.
    #[must_use]
    pub const fn address(&self) -> &Value {
        &self.address
    }

    /// Submitted items in input order.
    #[must_use]
    pub fn items(&self) -> &[OrderLine] {
        &self.items
    }

    /// Split into address and items.
    #[must_use]
    pub fn into_parts(self) -> (Value, Vec<OrderLine>) {
        (self.address, self.items)
    }
}

/// Truthiness of a submitted value: null, `false`, `0` and `""` count as
/// absent; objects and arrays are always present.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Accept `2` and `2.0`, reject fractions and values beyond `u32`.
fn whole_quantity(value: &Value) -> Option<u32> {
    if let Some(q) = value.as_u64() {
        return u32::try_from(q).ok();
    }
    let f = value.as_f64()?;
    if f.fract() != 0.0 || f < 0.0 || f > f64::from(u32::MAX) {
        return None;
    }
    Some(f as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    fn items() -> Option<Value> {
        Some(json!([{"product": "P1", "quantity": 2}]))
    }

    #[test]
    fn parses_valid_submission() {
        let submission =
            OrderSubmission::parse(Some(json!({"city": "Lagos"})), items()).unwrap();

        assert_eq!(submission.items(), &[OrderLine::new("P1", 2)]);
        assert_eq!(submission.address()["city"], "Lagos");
    }

    #[test]
    fn address_id_string_is_accepted() {
        let submission = OrderSubmission::parse(Some(json!("addr_123")), items()).unwrap();
        assert_eq!(submission.address(), &json!("addr_123"));
    }

    #[test_case(None ; "missing")]
    #[test_case(Some(json!(null)) ; "null")]
    #[test_case(Some(json!("")) ; "empty string")]
    #[test_case(Some(json!(false)) ; "false")]
    #[test_case(Some(json!(0)) ; "zero")]
    fn rejects_absent_address(address: Option<Value>) {
        assert_eq!(
            OrderSubmission::parse(address, items()),
            Err(OrderError::InvalidData)
        );
    }

    #[test_case(None ; "missing")]
    #[test_case(Some(json!([])) ; "empty")]
    #[test_case(Some(json!({"product": "P1", "quantity": 1})) ; "object instead of list")]
    #[test_case(Some(json!("P1")) ; "string")]
    #[test_case(Some(json!([{"quantity": 1}])) ; "item without product")]
    #[test_case(Some(json!([{"product": "", "quantity": 1}])) ; "blank product")]
    #[test_case(Some(json!([{"product": "P1"}])) ; "item without quantity")]
    #[test_case(Some(json!([{"product": "P1", "quantity": 0}])) ; "zero quantity")]
    #[test_case(Some(json!([{"product": "P1", "quantity": -3}])) ; "negative quantity")]
    #[test_case(Some(json!([{"product": "P1", "quantity": 1.5}])) ; "fractional quantity")]
    #[test_case(Some(json!([{"product": "P1", "quantity": "2"}])) ; "quantity as string")]
    fn rejects_invalid_items(items: Option<Value>) {
        assert_eq!(
            OrderSubmission::parse(Some(json!("addr")), items),
            Err(OrderError::InvalidData)
        );
    }

    #[test_case("P1" ; "plain")]
    #[test_case("  P1  " ; "padded")]
    #[test_case(" " ; "whitespace only")]
    fn product_id_is_kept_verbatim(id: &str) {
        let submission = OrderSubmission::parse(
            Some(json!("addr")),
            Some(json!([{"product": id, "quantity": 1}])),
        )
        .unwrap();
        assert_eq!(submission.items()[0].product.as_str(), id);
    }

    #[test]
    fn whole_float_quantity_is_accepted() {
        let submission = OrderSubmission::parse(
            Some(json!("addr")),
            Some(json!([{"product": "P1", "quantity": 3.0}])),
        )
        .unwrap();
        assert_eq!(submission.items()[0].quantity, 3);
    }

    #[test]
    fn preserves_item_order() {
        let submission = OrderSubmission::parse(
            Some(json!("addr")),
            Some(json!([
                {"product": "B", "quantity": 1},
                {"product": "A", "quantity": 2},
            ])),
        )
        .unwrap();
        let (_, lines) = submission.into_parts();
        let ids: Vec<&str> = lines.iter().map(|l| l.product.as_str()).collect();
        assert_eq!(ids, ["B", "A"]);
    }
}

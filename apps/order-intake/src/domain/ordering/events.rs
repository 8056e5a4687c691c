//! Order domain events.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::submission::OrderLine;
use crate::domain::shared::{ExternalUserId, Timestamp};

/// Emitted once per accepted order. Consumed by fulfillment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreated {
    /// Caller identity.
    pub user_id: ExternalUserId,
    /// Address exactly as submitted.
    pub address: Value,
    /// Submitted items, unchanged.
    pub items: Vec<OrderLine>,
    /// Charged amount, encoded as a JSON number.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    /// Creation time in Unix milliseconds.
    pub date: i64,
}

impl OrderCreated {
    /// Event name on the wire.
    pub const NAME: &'static str = "order/created";

    /// Build the event stamped at `at`.
    #[must_use]
    pub fn new(
        user_id: ExternalUserId,
        address: Value,
        items: Vec<OrderLine>,
        amount: Decimal,
        at: Timestamp,
    ) -> Self {
        Self {
            user_id,
            address,
            items,
            amount,
            date: at.unix_millis(),
        }
    }
}

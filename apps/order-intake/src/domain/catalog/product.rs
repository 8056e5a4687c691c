//! Product record.

use serde::{Deserialize, Serialize};

use crate::domain::shared::{Money, ProductId};

/// A catalog product as seen by order intake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Catalog identifier.
    pub id: ProductId,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Per-unit sale price used for order pricing.
    pub offer_price: Money,
}

impl Product {
    /// Create a product.
    #[must_use]
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, offer_price: Money) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            offer_price,
        }
    }

    /// Price of `quantity` units at the offer price, or `None` if it
    /// overflows.
    #[must_use]
    pub fn line_total(&self, quantity: u32) -> Option<Money> {
        self.offer_price.checked_times(quantity)
    }
}

//! Ordering errors.
//!
//! The `Display` text of each variant is exactly the message returned to the
//! caller in the `{success: false, message}` body.

use thiserror::Error;

use crate::domain::shared::ProductId;

/// Domain-level failures of an order submission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    /// Missing identity, missing address, or an empty/invalid item list.
    #[error("Invalid data provided")]
    InvalidData,

    /// An item references a product the catalog does not know.
    #[error("Product not found: {product_id}")]
    ProductNotFound {
        /// The unknown product id.
        product_id: ProductId,
    },

    /// The authenticated identity has no local user record.
    #[error("User not found in database")]
    UserNotFound,

    /// Line totals or the order amount exceed the representable range.
    #[error("Order amount out of range")]
    AmountOutOfRange,
}

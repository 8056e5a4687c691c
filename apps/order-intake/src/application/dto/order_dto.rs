//! Order DTOs

use serde::{Deserialize, Serialize};

use crate::application::use_cases::{PlaceOrderError, PlacedOrder};

/// Message returned for an accepted order.
pub const ORDER_PLACED_MESSAGE: &str = "Order placed successfully";

/// Result body of `POST /api/order/create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceOrderResponseDto {
    /// Whether the order was accepted.
    pub success: bool,
    /// Human-readable outcome.
    pub message: String,
}

impl PlaceOrderResponseDto {
    /// Accepted order.
    #[must_use]
    pub fn placed() -> Self {
        Self {
            success: true,
            message: ORDER_PLACED_MESSAGE.to_string(),
        }
    }

    /// Failed order with the given message.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

impl From<Result<PlacedOrder, PlaceOrderError>> for PlaceOrderResponseDto {
    fn from(result: Result<PlacedOrder, PlaceOrderError>) -> Self {
        match result {
            Ok(_) => Self::placed(),
            Err(e) => Self::failed(e.to_string()),
        }
    }
}

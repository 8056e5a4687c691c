//! HTTP response DTOs.

use serde::{Deserialize, Serialize};

pub use crate::application::dto::PlaceOrderResponseDto as CreateOrderResponse;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status.
    pub status: String,
    /// Version.
    pub version: String,
}

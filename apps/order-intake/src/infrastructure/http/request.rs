//! HTTP request DTOs.

use serde_json::Value;

use crate::application::use_cases::PlaceOrderCommand;
use crate::domain::shared::ExternalUserId;

/// Body of `POST /api/order/create`.
///
/// Fields stay untyped here; the use case validates them so that every shape
/// problem maps to the same client message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateOrderRequest {
    /// Delivery address or address id.
    pub address: Option<Value>,
    /// Submitted items.
    pub items: Option<Value>,
}

/// Body could not be turned into a request.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    /// Not valid JSON. Carries the parser's message.
    #[error("{0}")]
    Json(#[from] serde_json::Error),

    /// JSON `null` has no fields to read.
    #[error("Request body must be a JSON object")]
    NullBody,
}

impl CreateOrderRequest {
    /// Parse a raw body.
    ///
    /// Non-object JSON values other than `null` yield a request with no fields.
    pub fn from_slice(body: &[u8]) -> Result<Self, RequestError> {
        match serde_json::from_slice::<Value>(body)? {
            Value::Object(mut fields) => Ok(Self {
                address: fields.remove("address"),
                items: fields.remove("items"),
            }),
            Value::Null => Err(RequestError::NullBody),
            _ => Ok(Self::default()),
        }
    }

    /// Command for the caller `user_id`.
    #[must_use]
    pub fn into_command(self, user_id: Option<ExternalUserId>) -> PlaceOrderCommand {
        PlaceOrderCommand {
            user_id,
            address: self.address,
            items: self.items,
        }
    }
}

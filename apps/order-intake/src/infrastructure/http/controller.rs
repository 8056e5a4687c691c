//! HTTP Controller (Driver Adapter)
//!
//! Axum-based REST API that delegates to the place-order use case.

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{State, rejection::BytesRejection},
    http::HeaderMap,
    response::IntoResponse,
    routing::{get, post},
};

use crate::application::ports::{EventDispatcherPort, OutboxPort};
use crate::application::use_cases::PlaceOrderUseCase;
use crate::domain::account::UserRepository;
use crate::domain::catalog::ProductRepository;
use crate::infrastructure::auth::IdentityResolver;

use super::request::CreateOrderRequest;
use super::response::{CreateOrderResponse, HealthResponse};

/// Application state shared across handlers.
pub struct AppState<C, U, O, D>
where
    C: ProductRepository + ?Sized,
    U: UserRepository + ?Sized,
    O: OutboxPort + ?Sized,
    D: EventDispatcherPort + ?Sized,
{
    /// Use case for placing orders.
    pub place_order: Arc<PlaceOrderUseCase<C, U, O, D>>,
    /// Resolves the caller from request headers.
    pub identity: Arc<dyn IdentityResolver>,
    /// Application version.
    pub version: String,
}

impl<C, U, O, D> Clone for AppState<C, U, O, D>
where
    C: ProductRepository + ?Sized,
    U: UserRepository + ?Sized,
    O: OutboxPort + ?Sized,
    D: EventDispatcherPort + ?Sized,
{
    fn clone(&self) -> Self {
        Self {
            place_order: Arc::clone(&self.place_order),
            identity: Arc::clone(&self.identity),
            version: self.version.clone(),
        }
    }
}

/// Create the HTTP router with all endpoints.
pub fn create_router<C, U, O, D>(state: AppState<C, U, O, D>) -> Router
where
    C: ProductRepository + ?Sized + 'static,
    U: UserRepository + ?Sized + 'static,
    O: OutboxPort + ?Sized + 'static,
    D: EventDispatcherPort + ?Sized + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .route("/api/order/create", post(create_order))
        .with_state(state)
}

/// Health check endpoint.
async fn health_check<C, U, O, D>(State(state): State<AppState<C, U, O, D>>) -> impl IntoResponse
where
    C: ProductRepository + ?Sized,
    U: UserRepository + ?Sized,
    O: OutboxPort + ?Sized,
    D: EventDispatcherPort + ?Sized,
{
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
    })
}

/// Create order endpoint.
///
/// Always answers 200; the outcome is in the `{success, message}` body.
/// Body read failures, including an oversized body, are reported the same
/// way.
async fn create_order<C, U, O, D>(
    State(state): State<AppState<C, U, O, D>>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Json<CreateOrderResponse>
where
    C: ProductRepository + ?Sized,
    U: UserRepository + ?Sized,
    O: OutboxPort + ?Sized,
    D: EventDispatcherPort + ?Sized,
{
    let user_id = state.identity.resolve(&headers);

    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            tracing::error!(error = %rejection, "Error in /api/order/create");
            return Json(CreateOrderResponse::failed(rejection.body_text()));
        }
    };

    let request = match CreateOrderRequest::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            tracing::error!(error = %e, "Error in /api/order/create");
            return Json(CreateOrderResponse::failed(e.to_string()));
        }
    };

    let result = state
        .place_order
        .execute(request.into_command(user_id))
        .await;

    if let Err(e) = &result {
        tracing::error!(error = %e, "Error in /api/order/create");
    }

    Json(result.into())
}

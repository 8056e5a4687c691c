// Allow unwrap/expect in tests - tests should panic on unexpected errors
// Allow test-specific patterns and pedantic lints in test code
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::items_after_statements,
        clippy::or_fun_call
    )
)]

//! Order Intake - Storefront order creation
//!
//! Turns a shopper's cart submission into an `order/created` event for the
//! fulfillment pipeline, then clears the shopper's cart.
//!
//! # Architecture (Clean Architecture + DDD + Hexagonal)
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: Business rules with no I/O
//!   - `catalog`: Products and their offer prices
//!   - `account`: Users and their carts
//!   - `ordering`: Submission validation, pricing, the `OrderCreated` event
//!
//! - **Application**: Use cases and orchestration
//!   - `ports`: Event dispatcher and transactional outbox
//!   - `use_cases`: `PlaceOrder`
//!   - `services`: Outbox relay
//!   - `dto`: `{success, message}` response body
//!
//! - **Infrastructure**: Adapters
//!   - `http`: Axum router for `POST /api/order/create`
//!   - `auth`: Caller identity from a trusted header
//!   - `dispatcher`: Event API client
//!   - `persistence`: In-memory stores seeded from YAML
//!   - `config`: Dependency injection container
//!
//! # Order flow
//!
//! ```text
//! request → identity → body parse → validate → price (concurrent lookups)
//!         → clear cart + enqueue event (one transaction) → 200 {success}
//!                                   ↓
//!                          outbox relay → event API
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Clean Architecture Layers
// =============================================================================

/// Domain layer - Core business logic with no external dependencies.
pub mod domain;

/// Application layer - Use cases and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

// =============================================================================
// Cross-cutting
// =============================================================================

/// YAML configuration with environment interpolation.
pub mod config;

/// Metrics, logging and span export.
pub mod observability;

// =============================================================================
// Re-exports
// =============================================================================

pub use application::dto::PlaceOrderResponseDto;
pub use application::services::{OutboxRelay, OutboxRelayConfig};
pub use application::use_cases::{
    DispatchMode, PlaceOrderCommand, PlaceOrderError, PlaceOrderUseCase, PlacedOrder,
};
pub use config::{Config, ConfigError, load_config, load_config_from_string};
pub use domain::ordering::{OrderCreated, OrderError, OrderQuote, PricingPolicy};
pub use infrastructure::config::{Container, ContainerError};
pub use infrastructure::http::{AppState, create_router};

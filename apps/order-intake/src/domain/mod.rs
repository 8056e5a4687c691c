//! Domain Layer
//!
//! Business rules for storefront order intake, free of transport and storage
//! concerns. This layer defines:
//!
//! - **Value Objects**: identifiers, money and timestamps
//! - **Entities**: catalog products and shopper accounts
//! - **Domain Events**: `order/created`
//! - **Repository Traits**: persistence abstractions (implemented in adapters)
//!
//! # Bounded Contexts
//!
//! - [`catalog`]: Products and their offer prices
//! - [`account`]: Shoppers and their carts
//! - [`ordering`]: Submission validation, pricing and the order event

pub mod account;
pub mod catalog;
pub mod ordering;
pub mod shared;

//! Shared Domain Types
//!
//! Value objects and errors shared across the catalog, account and ordering
//! contexts.

pub mod errors;
pub mod value_objects;

pub use errors::RepositoryError;
pub use value_objects::{ExternalUserId, Money, OutboxId, ProductId, Timestamp};

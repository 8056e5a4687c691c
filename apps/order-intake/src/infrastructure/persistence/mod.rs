//! Persistence Adapters
//!
//! In-memory implementations of the repository and outbox traits.

pub mod in_memory;
pub mod seed;

pub use in_memory::{InMemoryAccountStore, InMemoryCatalog};
pub use seed::{SeedData, SeedError};

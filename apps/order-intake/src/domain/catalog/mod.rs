//! Catalog Bounded Context
//!
//! Product records owned by the catalog subsystem. Order intake only reads
//! them to price a submission.

pub mod product;
pub mod repository;

pub use product::Product;
pub use repository::ProductRepository;

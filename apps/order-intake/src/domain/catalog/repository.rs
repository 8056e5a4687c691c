//! Product Repository Trait

use async_trait::async_trait;

use super::product::Product;
use crate::domain::shared::{ProductId, RepositoryError};

/// Read access to catalog products.
///
/// Implemented by adapters in the infrastructure layer.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Find a product by its catalog identifier.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails. A missing product is `Ok(None)`.
    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError>;
}

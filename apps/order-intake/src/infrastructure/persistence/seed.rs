//! Seed fixture loading.
//!
//! ```yaml
//! products:
//!   - id: "P1"
//!     name: "Headphones"
//!     offerPrice: 100
//! users:
//!   - clerkId: "user_1"
//!     cartItems:
//!       - { product: "P1", quantity: 2 }
//! ```

use std::path::Path;

use serde::Deserialize;

use super::in_memory::{InMemoryAccountStore, InMemoryCatalog};
use crate::domain::account::User;
use crate::domain::catalog::Product;
use crate::domain::shared::ProductId;

/// Seed loading errors.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    /// File could not be read.
    #[error("failed to read seed file: {0}")]
    Io(#[from] std::io::Error),

    /// File is not a valid fixture.
    #[error("failed to parse seed file: {0}")]
    Parse(#[from] serde_yaml_bw::Error),

    /// A product is priced below zero.
    #[error("product {product_id} has a negative offerPrice")]
    NegativePrice {
        /// Offending product.
        product_id: ProductId,
    },
}

/// Initial store contents.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedData {
    /// Catalog products.
    #[serde(default)]
    pub products: Vec<Product>,
    /// Storefront users.
    #[serde(default)]
    pub users: Vec<User>,
}

impl SeedData {
    /// Load a fixture from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SeedError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse a fixture from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, SeedError> {
        let seed: Self = serde_yaml_bw::from_str(yaml)?;
        if let Some(product) = seed.products.iter().find(|p| p.offer_price.is_negative()) {
            return Err(SeedError::NegativePrice {
                product_id: product.id.clone(),
            });
        }
        Ok(seed)
    }

    /// Build the stores.
    #[must_use]
    pub fn into_stores(self) -> (InMemoryCatalog, InMemoryAccountStore) {
        (
            InMemoryCatalog::with_products(self.products),
            InMemoryAccountStore::with_users(self.users),
        )
    }
}

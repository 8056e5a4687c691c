//! User record.

use serde::{Deserialize, Serialize};

use crate::domain::shared::{ExternalUserId, ProductId};

/// One line of a shopper's cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Product in the cart.
    pub product: ProductId,
    /// Units of that product.
    pub quantity: u32,
}

/// A persisted storefront user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// External identity reference issued by the authentication provider.
    pub clerk_id: ExternalUserId,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Contact email.
    #[serde(default)]
    pub email: String,
    /// Current cart contents.
    #[serde(default)]
    pub cart_items: Vec<CartLine>,
}

impl User {
    /// Create a user with an empty cart.
    #[must_use]
    pub fn new(clerk_id: impl Into<ExternalUserId>) -> Self {
        Self {
            clerk_id: clerk_id.into(),
            name: String::new(),
            email: String::new(),
            cart_items: Vec::new(),
        }
    }

    /// Builder-style cart contents, mostly for fixtures.
    #[must_use]
    pub fn with_cart(mut self, cart_items: Vec<CartLine>) -> Self {
        self.cart_items = cart_items;
        self
    }

    /// Empty the cart. The only mutation order intake performs on a user.
    pub fn clear_cart(&mut self) {
        self.cart_items.clear();
    }

    /// Whether the cart holds nothing.
    #[must_use]
    pub fn cart_is_empty(&self) -> bool {
        self.cart_items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_cart_empties_lines() {
        let mut user = User::new("user_1").with_cart(vec![CartLine {
            product: ProductId::new("P1"),
            quantity: 2,
        }]);
        assert!(!user.cart_is_empty());

        user.clear_cart();

        assert!(user.cart_is_empty());
        assert_eq!(user.clerk_id.as_str(), "user_1");
    }

    #[test]
    fn deserializes_seed_record() {
        let json = r#"{
            "clerkId": "user_2",
            "name": "Ada",
            "cartItems": [{"product": "P1", "quantity": 3}]
        }"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.cart_items.len(), 1);
        assert!(user.email.is_empty());
    }
}

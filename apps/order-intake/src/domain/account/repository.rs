//! User Repository Trait

use async_trait::async_trait;

use super::user::User;
use crate::domain::shared::{ExternalUserId, RepositoryError};

/// Persistence abstraction for user records.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by the external identity reference.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails. An unknown identity is `Ok(None)`.
    async fn find_by_external_id(
        &self,
        external_id: &ExternalUserId,
    ) -> Result<Option<User>, RepositoryError>;

    /// Save a user (insert or replace), last write wins.
    ///
    /// # Errors
    ///
    /// Returns error if persistence fails.
    async fn save(&self, user: &User) -> Result<(), RepositoryError>;
}

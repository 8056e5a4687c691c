//! Caller identity resolution.

mod header;

use axum::http::HeaderMap;

use crate::domain::shared::ExternalUserId;

pub use header::TrustedHeaderResolver;

/// Maps request headers to the authenticated caller.
pub trait IdentityResolver: Send + Sync {
    /// The caller's external identity, or `None` when unauthenticated.
    fn resolve(&self, headers: &HeaderMap) -> Option<ExternalUserId>;
}

//! Trusted-header identity resolution.

use axum::http::HeaderMap;

use super::IdentityResolver;
use crate::domain::shared::ExternalUserId;

/// Reads the caller identity from a header set by the authentication gateway.
///
/// The service must only be reachable through that gateway; the header is
/// taken at face value.
#[derive(Debug, Clone)]
pub struct TrustedHeaderResolver {
    header: String,
}

impl TrustedHeaderResolver {
    /// Resolve identities from `header`.
    #[must_use]
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into().to_ascii_lowercase(),
        }
    }

    /// Header name in use.
    #[must_use]
    pub fn header(&self) -> &str {
        &self.header
    }
}

impl IdentityResolver for TrustedHeaderResolver {
    fn resolve(&self, headers: &HeaderMap) -> Option<ExternalUserId> {
        headers
            .get(self.header.as_str())
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(ExternalUserId::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(name: &'static str, value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(name, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn resolves_trimmed_value() {
        let resolver = TrustedHeaderResolver::new("x-user-id");
        let id = resolver.resolve(&headers("x-user-id", "  user_2abc ")).unwrap();
        assert_eq!(id.as_str(), "user_2abc");
    }

    #[test]
    fn header_name_is_case_insensitive() {
        let resolver = TrustedHeaderResolver::new("X-User-Id");
        assert!(resolver.resolve(&headers("x-user-id", "u")).is_some());
    }

    #[test]
    fn missing_or_blank_header_is_anonymous() {
        let resolver = TrustedHeaderResolver::new("x-user-id");
        assert!(resolver.resolve(&HeaderMap::new()).is_none());
        assert!(resolver.resolve(&headers("x-user-id", "   ")).is_none());
        assert!(resolver.resolve(&headers("x-other", "u")).is_none());
    }
}

//! Persistence errors shared by the repository traits.

use thiserror::Error;

/// Errors raised by repository adapters.
///
/// Lookups that find nothing are not errors; they return `Ok(None)`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// The backing store could not be reached.
    #[error("Store unavailable: {message}")]
    Unavailable {
        /// Error message.
        message: String,
    },

    /// A record could not be read or written.
    #[error("Store query failed: {message}")]
    Query {
        /// Error message.
        message: String,
    },

    /// A stored record failed to decode.
    #[error("Corrupt record {id}: {message}")]
    Corrupt {
        /// Record identifier.
        id: String,
        /// Error message.
        message: String,
    },
}

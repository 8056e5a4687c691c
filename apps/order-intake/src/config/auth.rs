//! Identity configuration.

use serde::{Deserialize, Serialize};

/// Where the caller identity comes from.
///
/// The authentication gateway in front of the service verifies the session
/// and forwards the user id in a header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Header carrying the verified user id.
    #[serde(default = "default_user_id_header")]
    pub user_id_header: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            user_id_header: default_user_id_header(),
        }
    }
}

fn default_user_id_header() -> String {
    "x-user-id".to_string()
}

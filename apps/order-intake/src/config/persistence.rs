//! Store configuration.

use serde::{Deserialize, Serialize};

/// Store configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersistenceConfig {
    /// YAML fixture of products and users loaded at startup.
    #[serde(default)]
    pub seed_path: Option<String>,
}

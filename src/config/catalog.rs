//! Catalog source and tenant configuration.
//!
//! A deployment either serves one catalog (`catalog:`) or one catalog per
//! tenant (`tenants:`), where each tenant is selected by its API key.
//!
//! ```yaml
//! catalog:
//!   type: file
//!   path: ./config/catalog.yaml
//! ```
//!
//! ```yaml
//! tenants:
//!   - name: acme
//!     api_key: ${ACME_API_KEY}
//!     catalog:
//!       type: remote
//!       url: https://store.example.com/catalogs/acme
//!       token: ${STORE_TOKEN}
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants::DEFAULT_FETCH_TIMEOUT_SECS;

fn default_fetch_timeout() -> u64 {
    DEFAULT_FETCH_TIMEOUT_SECS
}

/// Where a catalog document lives.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CatalogSourceConfig {
    /// Local JSON or YAML file
    File { path: PathBuf },
    /// JSON document fetched over HTTP(S)
    Remote {
        url: String,
        /// Bearer token sent with the request
        #[serde(default, skip_serializing_if = "Option::is_none")]
        token: Option<String>,
    },
}

// Tokens come from the environment and must not end up in logs.
impl std::fmt::Debug for CatalogSourceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File { path } => f.debug_struct("File").field("path", path).finish(),
            Self::Remote { url, token } => f
                .debug_struct("Remote")
                .field("url", url)
                .field("token", &token.as_ref().map(|_| "<redacted>"))
                .finish(),
        }
    }
}

/// One tenant of a multi-tenant deployment.
#[derive(Clone, Serialize, Deserialize)]
pub struct TenantConfig {
    pub name: String,
    pub api_key: String,
    pub catalog: CatalogSourceConfig,
}

impl std::fmt::Debug for TenantConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TenantConfig")
            .field("name", &self.name)
            .field("api_key", &"<redacted>")
            .field("catalog", &self.catalog)
            .finish()
    }
}

/// Settings for fetching remote images and catalogs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Timeout for a single HTTP fetch in seconds (default: 30)
    #[serde(default = "default_fetch_timeout")]
    pub timeout_seconds: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_fetch_timeout(),
        }
    }
}

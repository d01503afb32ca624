// Configuration module

pub mod catalog;
pub mod server;

pub use catalog::{CatalogSourceConfig, FetchConfig, TenantConfig};
pub use server::ServerConfig;

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    /// Catalog for single-tenant deployments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<CatalogSourceConfig>,
    /// Per-tenant catalogs selected by API key
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tenants: Vec<TenantConfig>,
}

impl Config {
    pub fn from_yaml_with_env(yaml: &str) -> Result<Self, String> {
        // Replace ${VAR_NAME} with environment variable values
        let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").map_err(|e| e.to_string())?;

        // First, check that all referenced environment variables exist
        for caps in re.captures_iter(yaml) {
            let var_name = &caps[1];
            std::env::var(var_name).map_err(|_| {
                format!(
                    "Environment variable '{}' is referenced but not set",
                    var_name
                )
            })?;
        }

        let substituted = re.replace_all(yaml, |caps: &regex::Captures| {
            std::env::var(&caps[1]).unwrap_or_default()
        });

        serde_yaml::from_str(&substituted).map_err(|e| e.to_string())
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;
        Self::from_yaml_with_env(&yaml)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("Server port must be greater than 0".to_string());
        }

        if self.server.threads == 0 {
            return Err("Server threads must be greater than 0".to_string());
        }

        if self.server.max_body_size == 0 {
            return Err("Server max_body_size must be greater than 0".to_string());
        }

        if self.fetch.timeout_seconds == 0 {
            return Err("Fetch timeout_seconds must be greater than 0".to_string());
        }

        match (&self.catalog, self.tenants.is_empty()) {
            (Some(_), false) => {
                return Err(
                    "Configure either 'catalog' (single tenant) or 'tenants', not both".to_string(),
                )
            }
            (None, true) => {
                return Err("No catalog configured: set 'catalog' or 'tenants'".to_string())
            }
            _ => {}
        }

        if let Some(source) = &self.catalog {
            validate_source(source).map_err(|e| format!("catalog: {}", e))?;
        }

        let mut seen_names = HashSet::new();
        let mut seen_keys = HashSet::new();
        for tenant in &self.tenants {
            if tenant.name.trim().is_empty() {
                return Err("Tenant name cannot be empty".to_string());
            }

            if !seen_names.insert(&tenant.name) {
                return Err(format!("Duplicate tenant name '{}'", tenant.name));
            }

            if tenant.api_key.trim().is_empty() {
                return Err(format!("Tenant '{}' has an empty api_key", tenant.name));
            }

            if !seen_keys.insert(&tenant.api_key) {
                return Err(format!(
                    "Tenant '{}' reuses an api_key already assigned to another tenant",
                    tenant.name
                ));
            }

            validate_source(&tenant.catalog)
                .map_err(|e| format!("Tenant '{}': {}", tenant.name, e))?;
        }

        Ok(())
    }

    /// True when catalogs are selected per request by API key.
    pub fn is_multi_tenant(&self) -> bool {
        !self.tenants.is_empty()
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch.timeout_seconds)
    }
}

fn validate_source(source: &CatalogSourceConfig) -> Result<(), String> {
    match source {
        CatalogSourceConfig::File { path } => {
            if path.as_os_str().is_empty() {
                return Err("file catalog path cannot be empty".to_string());
            }
        }
        CatalogSourceConfig::Remote { url, .. } => {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(format!(
                    "remote catalog url '{}' must start with http:// or https://",
                    url
                ));
            }
        }
    }
    Ok(())
}

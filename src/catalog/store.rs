//! Loaded catalogs and tenant selection.
//!
//! `CatalogStore` holds every catalog the process serves. Single-tenant
//! deployments have one default catalog and ignore API keys. Multi-tenant
//! deployments map each API key to a tenant and its catalog.

use std::collections::HashMap;
use std::sync::Arc;

use super::source::source_from_config;
use super::{AccessError, Catalog, CatalogError};
use crate::config::Config;

/// Tenant name used for single-tenant deployments.
pub const DEFAULT_TENANT: &str = "default";

/// Catalog selected for one request.
#[derive(Debug, Clone)]
pub struct TenantCatalog {
    pub tenant: String,
    pub catalog: Arc<Catalog>,
}

/// Read-only set of catalogs, loaded once at startup.
#[derive(Debug, Default)]
pub struct CatalogStore {
    default: Option<Arc<Catalog>>,
    tenants: HashMap<String, Arc<Catalog>>,
    api_keys: HashMap<String, String>,
}

impl CatalogStore {
    /// Store serving one catalog to every request.
    pub fn single(catalog: Catalog) -> Self {
        Self {
            default: Some(Arc::new(catalog)),
            ..Default::default()
        }
    }

    /// Empty multi-tenant store; add tenants with [`CatalogStore::insert_tenant`].
    pub fn multi_tenant() -> Self {
        Self::default()
    }

    pub fn insert_tenant(
        &mut self,
        name: impl Into<String>,
        api_key: impl Into<String>,
        catalog: Catalog,
    ) {
        let name = name.into();
        self.api_keys.insert(api_key.into(), name.clone());
        self.tenants.insert(name, Arc::new(catalog));
    }

    /// Load every catalog named by the configuration.
    ///
    /// The first catalog that fails to load aborts startup.
    pub async fn load(config: &Config, http_client: &reqwest::Client) -> Result<Self, CatalogError> {
        if let Some(source_config) = &config.catalog {
            let source = source_from_config(source_config, http_client);
            let catalog = source.load().await?;
            tracing::info!(
                tenant = DEFAULT_TENANT,
                source = %source.describe(),
                templates = catalog.templates.len(),
                positions = catalog.position_count(),
                designs = catalog.designs.len(),
                "Catalog loaded"
            );
            return Ok(Self::single(catalog));
        }

        let mut store = Self::multi_tenant();
        for tenant in &config.tenants {
            let source = source_from_config(&tenant.catalog, http_client);
            let catalog = source.load().await?;
            tracing::info!(
                tenant = %tenant.name,
                source = %source.describe(),
                templates = catalog.templates.len(),
                positions = catalog.position_count(),
                designs = catalog.designs.len(),
                "Catalog loaded"
            );
            store.insert_tenant(tenant.name.clone(), tenant.api_key.clone(), catalog);
        }

        Ok(store)
    }

    /// Pick the catalog for a request.
    ///
    /// Single-tenant stores ignore the key. Multi-tenant stores require a
    /// known key.
    pub fn catalog_for(&self, api_key: Option<&str>) -> Result<TenantCatalog, AccessError> {
        if let Some(catalog) = &self.default {
            return Ok(TenantCatalog {
                tenant: DEFAULT_TENANT.to_string(),
                catalog: Arc::clone(catalog),
            });
        }

        let key = api_key
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(AccessError::MissingApiKey)?;

        let tenant = self.api_keys.get(key).ok_or(AccessError::InvalidApiKey)?;
        let catalog = self.tenants.get(tenant).ok_or(AccessError::InvalidApiKey)?;

        Ok(TenantCatalog {
            tenant: tenant.clone(),
            catalog: Arc::clone(catalog),
        })
    }

    pub fn is_multi_tenant(&self) -> bool {
        self.default.is_none()
    }

    pub fn tenant_count(&self) -> usize {
        if self.default.is_some() {
            1
        } else {
            self.tenants.len()
        }
    }
}

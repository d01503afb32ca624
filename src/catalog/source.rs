//! Catalog sources.
//!
//! This module defines the `CatalogSource` trait every catalog backend
//! implements, plus the two backends the service ships with:
//!
//! - [`FileCatalogSource`] - a JSON (`.json`) or YAML document on disk
//! - [`RemoteCatalogSource`] - a JSON document served over HTTP(S), e.g. by a
//!   document store, optionally behind a bearer token
//!
//! Every loaded catalog is validated before it is returned.

use async_trait::async_trait;
use std::path::PathBuf;

use super::{Catalog, CatalogError};
use crate::config::CatalogSourceConfig;

/// Backend that produces a catalog snapshot.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Load, parse and validate the catalog.
    async fn load(&self) -> Result<Catalog, CatalogError>;

    /// Human-readable origin for logs (never includes secrets).
    fn describe(&self) -> String;
}

/// Catalog stored in a local file.
#[derive(Debug, Clone)]
pub struct FileCatalogSource {
    path: PathBuf,
}

impl FileCatalogSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn is_json(&self) -> bool {
        self.path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false)
    }
}

#[async_trait]
impl CatalogSource for FileCatalogSource {
    async fn load(&self) -> Result<Catalog, CatalogError> {
        let origin = self.describe();
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| CatalogError::Io {
                path: origin.clone(),
                source,
            })?;

        let catalog = if self.is_json() {
            Catalog::from_json(&text, &origin)?
        } else {
            Catalog::from_yaml(&text, &origin)?
        };

        catalog.validate()?;
        Ok(catalog)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Catalog served as a JSON document over HTTP(S).
#[derive(Clone)]
pub struct RemoteCatalogSource {
    url: String,
    token: Option<String>,
    http_client: reqwest::Client,
}

impl RemoteCatalogSource {
    pub fn new(url: impl Into<String>, token: Option<String>, http_client: reqwest::Client) -> Self {
        Self {
            url: url.into(),
            token,
            http_client,
        }
    }
}

#[async_trait]
impl CatalogSource for RemoteCatalogSource {
    async fn load(&self) -> Result<Catalog, CatalogError> {
        let mut request = self.http_client.get(&self.url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| CatalogError::Fetch(format!("{}: {}", self.url, e)))?;

        if !response.status().is_success() {
            return Err(CatalogError::Fetch(format!(
                "{}: HTTP request failed with status: {}",
                self.url,
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| CatalogError::Fetch(format!("{}: failed to read body: {}", self.url, e)))?;

        let catalog = Catalog::from_json(&body, &self.url)?;
        catalog.validate()?;
        Ok(catalog)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Build the backend named by a catalog source configuration.
pub fn source_from_config(
    config: &CatalogSourceConfig,
    http_client: &reqwest::Client,
) -> Box<dyn CatalogSource> {
    match config {
        CatalogSourceConfig::File { path } => Box::new(FileCatalogSource::new(path.clone())),
        CatalogSourceConfig::Remote { url, token } => Box::new(RemoteCatalogSource::new(
            url.clone(),
            token.clone(),
            http_client.clone(),
        )),
    }
}

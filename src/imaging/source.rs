//! Image source loader.
//!
//! Templates and designs name their pixels with a source string:
//!
//! - `http://...` / `https://...` - fetched over HTTP
//! - `data:image/png;base64,...` - decoded inline
//! - anything else - a local filesystem path
//!
//! Remote bodies are read straight into memory and handed to the decoder;
//! nothing is written to disk. There is no caching and no retry: every load
//! goes to the source and the first failure is returned.
//!
//! # Example
//!
//! ```ignore
//! use mockup::imaging::{HttpImageLoader, ImageLoader, ImageLoaderConfig, ImageSource};
//!
//! let loader = HttpImageLoader::new(ImageLoaderConfig::default())?;
//! let source = ImageSource::parse("https://cdn.example.com/shirt.png")?;
//! let loaded = loader.load(&source).await?;
//! ```

use super::codec::{self, LoadedImage};
use super::ImagingError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::DEFAULT_FETCH_TIMEOUT_SECS;

/// Configuration for the image loader.
#[derive(Debug, Clone)]
pub struct ImageLoaderConfig {
    /// Timeout for remote fetches.
    pub timeout: Duration,
}

impl Default for ImageLoaderConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
        }
    }
}

/// Parsed location of an image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ImageSource {
    /// Local filesystem path.
    Path(PathBuf),
    /// HTTP or HTTPS URL.
    Url(String),
    /// Base64 image bytes, optionally wrapped in a `data:` URI.
    Inline(String),
}

impl ImageSource {
    /// Parse a source string into an ImageSource.
    ///
    /// # Errors
    ///
    /// Returns error if the source string is empty.
    pub fn parse(source: &str) -> Result<Self, ImagingError> {
        let trimmed = source.trim();
        if trimmed.is_empty() {
            return Err(ImagingError::Load("Empty image source".to_string()));
        }

        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            Ok(ImageSource::Url(trimmed.to_string()))
        } else if codec::is_data_uri(trimmed) {
            Ok(ImageSource::Inline(trimmed.to_string()))
        } else {
            Ok(ImageSource::Path(PathBuf::from(trimmed)))
        }
    }

    /// Short description for logs. Inline payloads are not echoed.
    pub fn describe(&self) -> String {
        match self {
            ImageSource::Path(path) => path.display().to_string(),
            ImageSource::Url(url) => url.clone(),
            ImageSource::Inline(data) => format!("inline ({} bytes)", data.len()),
        }
    }
}

impl TryFrom<String> for ImageSource {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ImageSource::parse(&value).map_err(|e| e.to_string())
    }
}

impl From<ImageSource> for String {
    fn from(source: ImageSource) -> Self {
        match source {
            ImageSource::Path(path) => path.display().to_string(),
            ImageSource::Url(url) => url,
            ImageSource::Inline(data) => data,
        }
    }
}

/// Loads decoded pixels for an [`ImageSource`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageLoader: Send + Sync {
    /// Load and decode the image.
    ///
    /// Path and URL failures are [`ImagingError::Load`]; invalid inline
    /// bytes are [`ImagingError::Decode`].
    async fn load(&self, source: &ImageSource) -> Result<LoadedImage, ImagingError>;
}

/// Loader backed by the local filesystem and a `reqwest` client.
#[derive(Clone)]
pub struct HttpImageLoader {
    http_client: reqwest::Client,
}

impl HttpImageLoader {
    /// Create a new loader with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `ImagingError::Load` if the HTTP client cannot be created
    /// (e.g., TLS configuration issues).
    pub fn new(config: ImageLoaderConfig) -> Result<Self, ImagingError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ImagingError::Load(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { http_client })
    }

    async fn read_path(&self, path: &Path) -> Result<Vec<u8>, ImagingError> {
        tokio::fs::read(path)
            .await
            .map_err(|e| ImagingError::Load(format!("{}: {}", path.display(), e)))
    }

    async fn fetch_url(&self, url: &str) -> Result<Vec<u8>, ImagingError> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| ImagingError::Load(format!("HTTP fetch failed: {e}")))?;

        if !response.status().is_success() {
            return Err(ImagingError::Load(format!(
                "HTTP request failed with status: {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ImagingError::Load(format!("Failed to read HTTP body: {e}")))?;

        Ok(bytes.to_vec())
    }
}

/// Decode on the blocking pool.
async fn decode_blocking<F>(decode: F) -> Result<LoadedImage, ImagingError>
where
    F: FnOnce() -> Result<LoadedImage, ImagingError> + Send + 'static,
{
    tokio::task::spawn_blocking(decode)
        .await
        .map_err(|e| ImagingError::Load(format!("decode worker failed: {e}")))?
}

#[async_trait]
impl ImageLoader for HttpImageLoader {
    async fn load(&self, source: &ImageSource) -> Result<LoadedImage, ImagingError> {
        let started = std::time::Instant::now();
        let loaded = match source {
            ImageSource::Path(path) => match self.read_path(path).await {
                Ok(bytes) => {
                    let hint = path.to_string_lossy().into_owned();
                    decode_blocking(move || codec::decode_bytes(&bytes, &hint)).await
                }
                Err(e) => Err(e),
            },
            ImageSource::Url(url) => match self.fetch_url(url).await {
                Ok(bytes) => {
                    let hint = url.clone();
                    decode_blocking(move || codec::decode_bytes(&bytes, &hint)).await
                }
                Err(e) => Err(e),
            },
            ImageSource::Inline(data) => {
                let data = data.clone();
                decode_blocking(move || codec::decode(&data)).await
            }
        };

        match &loaded {
            Ok(image) => tracing::debug!(
                source = %source.describe(),
                width = image.image.width(),
                height = image.image.height(),
                format = ?image.format,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Image loaded"
            ),
            Err(e) => tracing::warn!(
                source = %source.describe(),
                error = %e,
                "Image load failed"
            ),
        }

        loaded
    }
}

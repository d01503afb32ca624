//! Request-level compositing engine.
//!
//! `Engine` sequences one request: every name is resolved against the
//! catalog before any image is loaded, then the template and design are
//! loaded, and the pixel work (mask, composite, encode) runs on the blocking
//! thread pool.
//!
//! # Example
//!
//! ```ignore
//! use mockup::engine::{DesignInput, Engine};
//!
//! let engine = Engine::new(Arc::new(HttpImageLoader::new(config)?));
//! let image = engine
//!     .paste(&catalog, "shirt-front", "chest", &DesignInput::Named("logo".into()))
//!     .await?;
//! ```

use std::sync::Arc;
use std::time::Instant;

use image::DynamicImage;

use crate::catalog::Catalog;
use crate::error::ServiceError;
use crate::imaging::{
    self, build_mask, ImageDimensions, ImageLoader, ImageSource, LoadedImage, OutlineStyle,
    Rect,
};

/// The design to paste.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DesignInput {
    /// Name of a catalog design
    Named(String),
    /// Base64 image bytes, raw or as a `data:` URI
    Inline(String),
}

impl DesignInput {
    fn describe(&self) -> String {
        match self {
            Self::Named(name) => name.clone(),
            Self::Inline(data) => format!("inline ({} bytes)", data.len()),
        }
    }
}

/// Paste and outline operations over a shared image loader.
#[derive(Clone)]
pub struct Engine {
    loader: Arc<dyn ImageLoader>,
}

impl Engine {
    pub fn new(loader: Arc<dyn ImageLoader>) -> Self {
        Self { loader }
    }

    /// Paste a design into a template position and return the base64 result.
    pub async fn paste(
        &self,
        catalog: &Catalog,
        template: &str,
        position: &str,
        design: &DesignInput,
    ) -> Result<String, ServiceError> {
        let rendered = self.paste_image(catalog, template, position, design).await?;
        encode_blocking(rendered).await
    }

    /// Outline a template position and return the base64 result.
    pub async fn outline(
        &self,
        catalog: &Catalog,
        template: &str,
        position: &str,
    ) -> Result<String, ServiceError> {
        let rendered = self.outline_image(catalog, template, position).await?;
        encode_blocking(rendered).await
    }

    /// Paste without encoding. The result keeps the template's format.
    pub async fn paste_image(
        &self,
        catalog: &Catalog,
        template: &str,
        position: &str,
        design: &DesignInput,
    ) -> Result<LoadedImage, ServiceError> {
        let started = Instant::now();

        let resolved_template = catalog.resolve_template(template)?;
        let resolved_position = catalog.resolve_position(resolved_template, position)?;
        let design_source = match design {
            DesignInput::Named(name) => catalog.resolve_design(name)?.image.clone(),
            DesignInput::Inline(data) => ImageSource::Inline(data.clone()),
        };

        let rect = resolved_position.rect();
        let negative = resolved_template.negative;

        let template_image = self.loader.load(&resolved_template.image).await?;
        let design_image = self.loader.load(&design_source).await?;

        if rect.clip(&ImageDimensions::of(&template_image.image)).is_none() {
            tracing::debug!(
                template = %template,
                position = %position,
                "Position has no visible area, returning template unchanged"
            );
            return Ok(template_image);
        }

        let LoadedImage { image, format } = template_image;
        let composited = tokio::task::spawn_blocking(move || {
            composite_design(&image, &design_image.image, rect, negative)
        })
        .await
        .map_err(|e| ServiceError::Internal(format!("paste worker failed: {}", e)))??;

        tracing::debug!(
            template = %template,
            position = %position,
            design = %design.describe(),
            negative,
            left = rect.left,
            top = rect.top,
            width = rect.width,
            height = rect.height,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Design pasted"
        );

        Ok(LoadedImage::new(composited, format))
    }

    /// Outline without encoding. The result keeps the template's format.
    pub async fn outline_image(
        &self,
        catalog: &Catalog,
        template: &str,
        position: &str,
    ) -> Result<LoadedImage, ServiceError> {
        let started = Instant::now();

        let resolved_template = catalog.resolve_template(template)?;
        let rect = catalog.resolve_position(resolved_template, position)?.rect();

        let LoadedImage { image, format } = self.loader.load(&resolved_template.image).await?;

        let style = OutlineStyle::default();
        let outlined =
            tokio::task::spawn_blocking(move || imaging::outline(&image, rect, &style))
                .await
                .map_err(|e| ServiceError::Internal(format!("outline worker failed: {}", e)))?;

        tracing::debug!(
            template = %template,
            position = %position,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Position outlined"
        );

        Ok(LoadedImage::new(outlined, format))
    }
}

/// Mask the design to `rect`'s size and paste it onto the template.
///
/// A rectangle with no visible area leaves the template untouched and skips
/// the mask render.
pub fn composite_design(
    template: &DynamicImage,
    design: &DynamicImage,
    rect: Rect,
    negative: bool,
) -> Result<DynamicImage, ServiceError> {
    if rect.clip(&ImageDimensions::of(template)).is_none() {
        return Ok(template.clone());
    }

    let mask = build_mask(design, rect.width, rect.height)?;
    Ok(imaging::paste(
        template,
        rect,
        mask.payload(negative),
        &mask.alpha,
    ))
}

async fn encode_blocking(rendered: LoadedImage) -> Result<String, ServiceError> {
    tokio::task::spawn_blocking(move || imaging::encode(&rendered.image, rendered.format))
        .await
        .map_err(|e| ServiceError::Internal(format!("encode worker failed: {}", e)))?
        .map_err(ServiceError::from)
}

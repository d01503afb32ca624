//! Catalog of templates, positions and designs.
//!
//! A catalog is the read-only snapshot every compositing call resolves names
//! against. It is loaded once (see [`source`]) and shared behind an `Arc`;
//! nothing in the request path mutates it.
//!
//! # Document Example
//!
//! ```yaml
//! templates:
//!   - name: shirt-front
//!     image: ./templates/shirt-front.png
//!     negative: false
//!     positions:
//!       - name: chest
//!         left: 300
//!         top: 200
//!         width: 200
//! aspect_ratios:
//!   - name: chest
//!     width_ratio: 1
//!     height_ratio: 1
//! designs:
//!   - name: logo
//!     image: https://cdn.example.com/logo.png
//! ```
//!
//! # Position Height
//!
//! A position may omit `height`. It is then derived on every resolution from
//! the aspect ratio entry with the same name as the position; without one (or
//! with a zero `width_ratio`) the position is square.

pub mod error;
pub mod source;
pub mod store;

pub use error::{AccessError, CatalogError, NotFound};
pub use source::{source_from_config, CatalogSource, FileCatalogSource, RemoteCatalogSource};
pub use store::{CatalogStore, TenantCatalog};

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::constants::MAX_POSITION_DIMENSION;
use crate::imaging::{ImageSource, Rect};

/// Catalog snapshot for one tenant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    pub templates: Vec<Template>,
    #[serde(default)]
    pub aspect_ratios: Vec<AspectRatio>,
    #[serde(default)]
    pub designs: Vec<Design>,
}

/// A template image with named positions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Template {
    pub name: String,
    /// Path, URL or data URI of the template image
    pub image: ImageSource,
    /// Paste the photometric inverse of designs instead of the designs
    #[serde(default)]
    pub negative: bool,
    #[serde(default)]
    pub positions: Vec<Position>,
}

/// A rectangular region of a template, as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub name: String,
    pub left: u32,
    pub top: u32,
    pub width: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

/// Named width:height ratio used to derive a missing position height.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AspectRatio {
    pub name: String,
    pub width_ratio: u32,
    pub height_ratio: u32,
}

impl AspectRatio {
    /// Height for `width` under this ratio, rounded to the nearest pixel.
    ///
    /// Returns `None` for a zero width ratio.
    pub fn height_for(&self, width: u32) -> Option<u32> {
        if self.width_ratio == 0 {
            return None;
        }
        let w = self.width_ratio as u64;
        let h = width as u64 * self.height_ratio as u64;
        Some(((2 * h + w) / (2 * w)).min(u32::MAX as u64) as u32)
    }
}

/// A design that can be pasted by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Design {
    pub name: String,
    /// Path, URL or data URI of the design image
    pub image: ImageSource,
}

/// A position with its height filled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedPosition<'a> {
    pub name: &'a str,
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

impl ResolvedPosition<'_> {
    pub fn rect(&self) -> Rect {
        Rect::new(self.left, self.top, self.width, self.height)
    }
}

impl Catalog {
    /// Parse a catalog from YAML (JSON documents parse too).
    pub fn from_yaml(yaml: &str, origin: &str) -> Result<Self, CatalogError> {
        serde_yaml::from_str(yaml).map_err(|e| CatalogError::Parse {
            origin: origin.to_string(),
            message: e.to_string(),
        })
    }

    /// Parse a catalog from JSON.
    pub fn from_json(json: &str, origin: &str) -> Result<Self, CatalogError> {
        serde_json::from_str(json).map_err(|e| CatalogError::Parse {
            origin: origin.to_string(),
            message: e.to_string(),
        })
    }

    /// Look up a template by exact name.
    pub fn resolve_template(&self, name: &str) -> Result<&Template, NotFound> {
        self.templates
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| NotFound::Template(name.to_string()))
    }

    /// Look up a design by exact name.
    pub fn resolve_design(&self, name: &str) -> Result<&Design, NotFound> {
        self.designs
            .iter()
            .find(|d| d.name == name)
            .ok_or_else(|| NotFound::Design(name.to_string()))
    }

    /// Look up a position of a resolved template and fill in its height.
    pub fn resolve_position<'a>(
        &self,
        template: &'a Template,
        name: &str,
    ) -> Result<ResolvedPosition<'a>, NotFound> {
        let position = template
            .positions
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| NotFound::Position {
                template: template.name.clone(),
                position: name.to_string(),
            })?;

        let height = position.height.unwrap_or_else(|| {
            self.aspect_ratio(&position.name)
                .and_then(|ratio| ratio.height_for(position.width))
                .unwrap_or(position.width)
        });

        Ok(ResolvedPosition {
            name: &position.name,
            left: position.left,
            top: position.top,
            width: position.width,
            height,
        })
    }

    /// Aspect ratio entry named like a position, if any.
    pub fn aspect_ratio(&self, name: &str) -> Option<&AspectRatio> {
        self.aspect_ratios.iter().find(|r| r.name == name)
    }

    /// Reject catalogs whose names cannot be resolved unambiguously, or whose
    /// positions resolve beyond [`MAX_POSITION_DIMENSION`] on either side.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut seen_templates = HashSet::new();
        for template in &self.templates {
            if template.name.trim().is_empty() {
                return Err(CatalogError::Invalid(
                    "Template name cannot be empty".to_string(),
                ));
            }
            if !seen_templates.insert(template.name.as_str()) {
                return Err(CatalogError::Invalid(format!(
                    "Duplicate template name '{}'",
                    template.name
                )));
            }

            let mut seen_positions = HashSet::new();
            for position in &template.positions {
                if position.name.trim().is_empty() {
                    return Err(CatalogError::Invalid(format!(
                        "Template '{}' has a position with an empty name",
                        template.name
                    )));
                }
                if !seen_positions.insert(position.name.as_str()) {
                    return Err(CatalogError::Invalid(format!(
                        "Template '{}': duplicate position name '{}'",
                        template.name, position.name
                    )));
                }

                let resolved = self
                    .resolve_position(template, &position.name)
                    .map_err(|e| CatalogError::Invalid(e.to_string()))?;
                if resolved.width > MAX_POSITION_DIMENSION
                    || resolved.height > MAX_POSITION_DIMENSION
                {
                    return Err(CatalogError::Invalid(format!(
                        "Template '{}': position '{}' is {}x{}, larger than {} pixels per side",
                        template.name,
                        position.name,
                        resolved.width,
                        resolved.height,
                        MAX_POSITION_DIMENSION
                    )));
                }
            }
        }

        let mut seen_designs = HashSet::new();
        for design in &self.designs {
            if design.name.trim().is_empty() {
                return Err(CatalogError::Invalid(
                    "Design name cannot be empty".to_string(),
                ));
            }
            if !seen_designs.insert(design.name.as_str()) {
                return Err(CatalogError::Invalid(format!(
                    "Duplicate design name '{}'",
                    design.name
                )));
            }
        }

        let mut seen_ratios = HashSet::new();
        for ratio in &self.aspect_ratios {
            if !seen_ratios.insert(ratio.name.as_str()) {
                return Err(CatalogError::Invalid(format!(
                    "Duplicate aspect ratio name '{}'",
                    ratio.name
                )));
            }
        }

        Ok(())
    }

    /// Total number of positions across all templates.
    pub fn position_count(&self) -> usize {
        self.templates.iter().map(|t| t.positions.len()).sum()
    }
}

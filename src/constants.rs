// Constants module - centralized default values for configuration
//
// This module defines all default values used throughout the codebase.
// Using constants instead of magic numbers keeps the defaults in one place.

// =============================================================================
// Server defaults
// =============================================================================

/// Default listen address
pub const DEFAULT_ADDRESS: &str = "0.0.0.0";

/// Default listen port
pub const DEFAULT_PORT: u16 = 8080;

/// Default number of worker threads
pub const DEFAULT_THREADS: usize = 4;

/// Default maximum request body size (10 MB)
pub const DEFAULT_MAX_BODY_SIZE: usize = 10 * 1024 * 1024;

/// Header carrying the tenant API key
pub const API_KEY_HEADER: &str = "x-api-key";

/// Application name reported by `GET /`
pub const APPLICATION_NAME: &str = "mockup";

// =============================================================================
// Fetch defaults
// =============================================================================

/// Default timeout for remote image and catalog fetches in seconds
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// Catalog limits
// =============================================================================

/// Largest width or height a catalog position may resolve to
pub const MAX_POSITION_DIMENSION: u32 = 10_000;

// =============================================================================
// Outline style
// =============================================================================

/// Safety-orange RGB used for position outlines
pub const OUTLINE_COLOR: [u8; 3] = [255, 121, 0];

/// Alpha of the outline fill (about 50%)
pub const OUTLINE_FILL_ALPHA: u8 = 128;

/// Alpha of the outline border
pub const OUTLINE_BORDER_ALPHA: u8 = 255;

/// Width of the outline border in pixels
pub const OUTLINE_BORDER_WIDTH: u32 = 3;

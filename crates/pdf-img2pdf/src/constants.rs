//! Shared constants for image-to-PDF conversion
//!
//! This module centralizes unit conversions and the numbers that drive
//! rasterization and size estimation.

// =============================================================================
// Unit Conversion
// =============================================================================

/// PDF user-space units per inch
pub const POINTS_PER_INCH: f32 = 72.0;

/// Rasterization density used to size re-encoded images
pub const RASTER_DPI: f32 = 300.0;

/// Convert inches to points
#[inline]
pub fn in_to_pt(inches: f32) -> f32 {
    inches * POINTS_PER_INCH
}

/// Convert points to whole pixels at [`RASTER_DPI`]
#[inline]
pub fn pt_to_px(pt: f32) -> u32 {
    (pt / POINTS_PER_INCH * RASTER_DPI).round().max(0.0) as u32
}

/// Convert pixels at [`RASTER_DPI`] to whole points.
///
/// Rounds independently of [`pt_to_px`], so a round trip may drift by a unit.
#[inline]
pub fn px_to_pt(px: u32) -> f32 {
    (px as f32 * POINTS_PER_INCH / RASTER_DPI).round()
}

// =============================================================================
// Encoding
// =============================================================================

/// Lowest accepted JPEG quality
pub const MIN_QUALITY: u8 = 1;

/// Highest accepted JPEG quality
pub const MAX_QUALITY: u8 = 100;

/// Default JPEG quality
pub const DEFAULT_QUALITY: u8 = 90;

/// Name under which each page's image is registered in its resources
pub const PAGE_IMAGE_NAME: &str = "Im0";

// =============================================================================
// Size Estimation
// =============================================================================

/// Fixed document overhead (header, catalog, xref, trailer)
pub const PDF_BASE_OVERHEAD_BYTES: u64 = 3000;

/// Per-page overhead (page dictionary, content stream, image dictionary)
pub const PDF_PAGE_OVERHEAD_BYTES: u64 = 1500;

//! Image placement within the content box
//!
//! Shrinking happens in pixel space (before encoding) so that no pixel data
//! is ever invented. Enlarging, when requested, happens in point space by
//! drawing the encoded image larger.

use crate::constants::px_to_pt;

use super::{PageGeometry, PixelSize, PlacedImage, Rect};

/// Calculate the pixel size an image is resampled to before encoding.
///
/// The image is scaled down uniformly until it fits `content_px`. Images that
/// already fit keep their native size. Each axis is clamped to at least one
/// pixel so extreme aspect ratios still yield an encodable surface.
pub fn compute_target_pixel_size(content_px: PixelSize, image_px: PixelSize) -> PixelSize {
    if image_px.is_empty() {
        return image_px;
    }

    let width_ratio = content_px.width as f32 / image_px.width as f32;
    let height_ratio = content_px.height as f32 / image_px.height as f32;
    let scale = 1.0_f32.min(width_ratio).min(height_ratio);

    if scale >= 1.0 {
        return image_px;
    }

    PixelSize::new(
        scale_dimension(image_px.width, scale),
        scale_dimension(image_px.height, scale),
    )
}

fn scale_dimension(px: u32, scale: f32) -> u32 {
    ((px as f32 * scale).round() as u32).clamp(1, px)
}

/// Calculate where an encoded image is drawn on its page.
///
/// The image is converted back to points at the raster density, optionally
/// enlarged to fill the content box, then centered horizontally and pushed
/// against the top margin.
pub fn compute_draw_placement(geometry: &PageGeometry, target_px: PixelSize, scale_up: bool) -> Rect {
    let mut width = px_to_pt(target_px.width);
    let mut height = px_to_pt(target_px.height);

    if scale_up {
        // A zero-point axis divides to infinity and leaves the other axis limiting
        let scale = (geometry.content_width_pt / width).min(geometry.content_height_pt / height);
        if scale.is_finite() && scale > 1.0 {
            width *= scale;
            height *= scale;
        }
    }

    // PDF y grows upward: the slack goes below the image
    let x = geometry.margin_pt + (geometry.content_width_pt - width) / 2.0;
    let y = geometry.margin_pt + (geometry.content_height_pt - height);

    Rect::new(x, y, width, height)
}

/// Run the full layout for one image
pub fn place_image(geometry: &PageGeometry, native_px: PixelSize, scale_up: bool) -> PlacedImage {
    let target_px = compute_target_pixel_size(geometry.content_px, native_px);
    let rect = compute_draw_placement(geometry, target_px, scale_up);

    PlacedImage {
        native_px,
        target_px,
        rect,
    }
}

//! Page geometry
//!
//! Turns a page format, orientation and margin into the printable content
//! box, both in points and in pixels at the raster density.

use crate::constants::{in_to_pt, pt_to_px};
use crate::types::{ConvertError, Orientation, PageFormat, Result};

use super::{PageGeometry, PixelSize};

/// Calculate the page size and printable content box.
///
/// # Arguments
/// * `format` - Catalog page format
/// * `orientation` - Portrait keeps the catalog dimensions, landscape swaps them
/// * `margin_in` - Margin applied to every side, in inches
///
/// # Errors
/// `InvalidParameter` if the margin is negative or not finite, or if it
/// leaves no printable area.
pub fn compute_content_box(
    format: PageFormat,
    orientation: Orientation,
    margin_in: f32,
) -> Result<PageGeometry> {
    if !margin_in.is_finite() || margin_in < 0.0 {
        return Err(ConvertError::InvalidParameter(format!(
            "Margin must be a non-negative number of inches, got {}",
            margin_in
        )));
    }

    let (width_in, height_in) = format.dimensions_with_orientation(orientation);
    let page_width_pt = in_to_pt(width_in);
    let page_height_pt = in_to_pt(height_in);

    let margin_pt = in_to_pt(margin_in);
    let content_width_pt = page_width_pt - 2.0 * margin_pt;
    let content_height_pt = page_height_pt - 2.0 * margin_pt;

    let content_px = PixelSize::new(pt_to_px(content_width_pt), pt_to_px(content_height_pt));

    if content_width_pt <= 0.0 || content_height_pt <= 0.0 || content_px.is_empty() {
        return Err(ConvertError::InvalidParameter(format!(
            "Margin of {}in leaves no printable area on a {} page",
            margin_in, format
        )));
    }

    Ok(PageGeometry {
        page_width_pt,
        page_height_pt,
        margin_pt,
        content_width_pt,
        content_height_pt,
        content_px,
    })
}

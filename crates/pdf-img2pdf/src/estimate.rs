use crate::constants::{PDF_BASE_OVERHEAD_BYTES, PDF_PAGE_OVERHEAD_BYTES};
use crate::convert::prepare_image;
use crate::layout::compute_content_box;
use crate::options::ConversionRequest;
use crate::types::*;

/// Estimate the size of the PDF a request would produce.
///
/// Only the first image is actually compressed; every page is assumed to
/// cost the same as that one. A request without images estimates to zero
/// bytes.
pub async fn estimate_pdf_size(request: &ConversionRequest) -> Result<SizeEstimate> {
    if request.images.is_empty() {
        return Ok(SizeEstimate {
            image_count: 0,
            sample_image_bytes: 0,
            total_bytes: 0,
        });
    }
    request.validate()?;

    let options = request.options.clone();
    let geometry = compute_content_box(options.page_format, options.orientation, options.margin_in)?;
    let first = request.images[0].clone();

    let (sample, _) =
        tokio::task::spawn_blocking(move || prepare_image(&first, &geometry, &options)).await??;

    Ok(estimate_from_sample(
        request.images.len(),
        sample.data.len() as u64,
    ))
}

/// Extrapolate a document size from one encoded image
pub fn estimate_from_sample(image_count: usize, sample_image_bytes: u64) -> SizeEstimate {
    let total_bytes = PDF_BASE_OVERHEAD_BYTES
        + image_count as u64 * (sample_image_bytes + PDF_PAGE_OVERHEAD_BYTES);

    SizeEstimate {
        image_count,
        sample_image_bytes,
        total_bytes,
    }
}

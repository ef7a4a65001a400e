//! Image-to-PDF conversion
//!
//! This module orchestrates the conversion:
//! 1. Derive the page geometry once per request
//! 2. For each image in order: decode, lay out, compress
//! 3. Embed and draw each image on its own page, reporting progress
//! 4. Serialize the finished document

mod io;

pub use io::{load_image, load_images, save_pdf};

use crate::compress::{CompressedImage, compress, decode_image, image_size};
use crate::layout::{PageGeometry, PlacedImage, compute_content_box, place_image};
use crate::options::{ConversionOptions, ConversionRequest};
use crate::progress::{CancelToken, ProgressSink, progress_percent};
use crate::render::{DocumentBuilder, document_to_bytes};
use crate::types::*;

/// A finished conversion
#[derive(Debug, Clone)]
pub struct Conversion {
    /// Serialized PDF (`application/pdf`)
    pub pdf: Vec<u8>,
    /// Geometry shared by every page
    pub geometry: PageGeometry,
    /// Layout of each page, in input order
    pub pages: Vec<PlacedImage>,
}

impl Conversion {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Main conversion function
pub async fn convert<P: ProgressSink>(
    request: &ConversionRequest,
    progress: &mut P,
) -> Result<Conversion> {
    convert_with_cancel(request, progress, &CancelToken::new()).await
}

/// Convert, stopping before the next image once `cancel` is tripped.
///
/// A cancelled conversion returns [`ConvertError::Cancelled`] and no document.
pub async fn convert_with_cancel<P: ProgressSink>(
    request: &ConversionRequest,
    progress: &mut P,
    cancel: &CancelToken,
) -> Result<Conversion> {
    request.validate()?;

    let options = &request.options;
    let geometry = compute_content_box(options.page_format, options.orientation, options.margin_in)?;
    let total = request.images.len();

    log::debug!(
        "Converting {} image(s) onto {} pages of {:.2}x{:.2}pt",
        total,
        options.page_format,
        geometry.page_width_pt,
        geometry.page_height_pt
    );

    let mut builder = DocumentBuilder::new();
    let mut pages = Vec::with_capacity(total);

    for (index, source) in request.images.iter().enumerate() {
        if cancel.is_cancelled() {
            log::warn!("Conversion cancelled after {} of {} image(s)", index, total);
            return Err(ConvertError::Cancelled);
        }

        let source = source.clone();
        let page_options = options.clone();
        let (compressed, placed) = tokio::task::spawn_blocking(move || {
            prepare_image(&source, &geometry, &page_options)
        })
        .await??;

        log::debug!(
            "Image {}/{}: {}x{}px -> {}x{}px, {} bytes",
            index + 1,
            total,
            placed.native_px.width,
            placed.native_px.height,
            placed.target_px.width,
            placed.target_px.height,
            compressed.data.len()
        );

        builder.add_image_page(&compressed, &placed.rect, &geometry);
        pages.push(placed);

        progress.report(progress_percent(index + 1, total));
    }

    let doc = builder.finish();
    let pdf = tokio::task::spawn_blocking(move || document_to_bytes(doc)).await??;

    log::info!("Converted {} image(s) into {} bytes of PDF", total, pdf.len());

    Ok(Conversion {
        pdf,
        geometry,
        pages,
    })
}

/// Decode, lay out and compress a single image
pub(crate) fn prepare_image(
    source: &ImageSource,
    geometry: &PageGeometry,
    options: &ConversionOptions,
) -> Result<(CompressedImage, PlacedImage)> {
    let decoded = decode_image(source)?;
    let placed = place_image(geometry, image_size(&decoded), options.scale_up);
    let compressed = compress(&decoded, options.quality, placed.target_px, options.greyscale)?;
    Ok((compressed, placed))
}

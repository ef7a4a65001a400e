//! Decoding, resampling and JPEG re-encoding of source images

use crate::constants::{MAX_QUALITY, MIN_QUALITY};
use crate::layout::PixelSize;
use crate::types::{ConvertError, ImageSource, Result};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ExtendedColorType, ImageDecoder, ImageError, ImageReader};
use std::io::Cursor;

/// A JPEG stream ready to embed as an image XObject
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedImage {
    pub data: Vec<u8>,
    pub size: PixelSize,
    /// Single-channel stream (DeviceGray) rather than RGB
    pub greyscale: bool,
}

/// Decode a source image into a pixel surface.
///
/// The EXIF orientation, when present, is applied so the surface is upright.
pub fn decode_image(source: &ImageSource) -> Result<DynamicImage> {
    let decode_error = |e: ImageError| ConvertError::Decode {
        name: source.name.clone(),
        source: e,
    };

    let mut decoder = ImageReader::new(Cursor::new(&source.data[..]))
        .with_guessed_format()
        .map_err(|e| decode_error(ImageError::IoError(e)))?
        .into_decoder()
        .map_err(decode_error)?;
    let orientation = decoder.orientation().map_err(decode_error)?;

    let mut image = DynamicImage::from_decoder(decoder).map_err(decode_error)?;
    image.apply_orientation(orientation);
    Ok(image)
}

/// Native pixel size of a decoded image
pub fn image_size(image: &DynamicImage) -> PixelSize {
    PixelSize::new(image.width(), image.height())
}

/// Resample `image` to exactly `target` and encode it as JPEG.
///
/// Alpha is discarded. With `greyscale` the image is reduced to luminance
/// and encoded as a single-channel stream.
pub fn compress(
    image: &DynamicImage,
    quality: u8,
    target: PixelSize,
    greyscale: bool,
) -> Result<CompressedImage> {
    if !(MIN_QUALITY..=MAX_QUALITY).contains(&quality) {
        return Err(ConvertError::InvalidParameter(format!(
            "Quality must be between {} and {}, got {}",
            MIN_QUALITY, MAX_QUALITY, quality
        )));
    }
    if target.is_empty() {
        return Err(ConvertError::Encoding(format!(
            "Cannot encode a {}x{} surface",
            target.width, target.height
        )));
    }

    let resampled;
    let surface = if image_size(image) == target {
        image
    } else {
        resampled = image.resize_exact(target.width, target.height, FilterType::Triangle);
        &resampled
    };

    let mut data = Vec::new();
    {
        let mut encoder = JpegEncoder::new_with_quality(&mut data, quality);
        let encoded = if greyscale {
            let luma = surface.to_luma8();
            encoder.encode(luma.as_raw(), luma.width(), luma.height(), ExtendedColorType::L8)
        } else {
            let rgb = surface.to_rgb8();
            encoder.encode(rgb.as_raw(), rgb.width(), rgb.height(), ExtendedColorType::Rgb8)
        };
        encoded.map_err(|e| ConvertError::Encoding(e.to_string()))?;
    }

    if data.is_empty() {
        return Err(ConvertError::Encoding(
            "Encoder produced an empty stream".to_string(),
        ));
    }

    Ok(CompressedImage {
        data,
        size: target,
        greyscale,
    })
}

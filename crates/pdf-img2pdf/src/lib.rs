pub mod compress;
mod constants;
pub mod convert;
mod estimate;
pub mod layout;
mod options;
mod progress;
pub mod render;
mod types;

pub use compress::CompressedImage;
pub use constants::{
    DEFAULT_QUALITY, MAX_QUALITY, MIN_QUALITY, POINTS_PER_INCH, RASTER_DPI, px_to_pt, pt_to_px,
};
pub use convert::{Conversion, convert, convert_with_cancel, load_image, load_images, save_pdf};
pub use estimate::{estimate_from_sample, estimate_pdf_size};
pub use layout::{PageGeometry, PixelSize, PlacedImage, Rect};
pub use options::*;
pub use progress::*;
pub use types::*;

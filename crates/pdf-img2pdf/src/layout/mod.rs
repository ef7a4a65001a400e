//! Layout calculation modules for image pages
//!
//! This module handles all the geometric calculations for placing an image
//! on a page:
//! - Page geometry (page size, margins, printable content box)
//! - Target pixel size (how far an image is resampled before encoding)
//! - Draw placement (size and offset of the image on the page)

mod geometry;
mod placement;
mod types;

pub use geometry::*;
pub use placement::*;
pub use types::*;

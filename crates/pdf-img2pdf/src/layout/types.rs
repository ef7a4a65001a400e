//! Layout data types
//!
//! These types carry the intermediate results between page geometry,
//! compression and PDF rendering.

/// Pixel dimensions of an image or surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PixelSize {
    pub width: u32,
    pub height: u32,
}

impl PixelSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True if either dimension is zero
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// True if both dimensions fit inside `other`
    pub fn fits_within(&self, other: PixelSize) -> bool {
        self.width <= other.width && self.height <= other.height
    }
}

/// A rectangular area in points
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// X position (left edge)
    pub x: f32,
    /// Y position (bottom edge)
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge x coordinate
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Top edge y coordinate
    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    /// Center x coordinate
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }
}

/// Page and content box dimensions shared by every page of a conversion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    /// Page width in points, orientation applied
    pub page_width_pt: f32,
    /// Page height in points, orientation applied
    pub page_height_pt: f32,
    /// Margin on each side in points
    pub margin_pt: f32,
    /// Printable width in points
    pub content_width_pt: f32,
    /// Printable height in points
    pub content_height_pt: f32,
    /// Printable area in pixels at the raster density
    pub content_px: PixelSize,
}

impl PageGeometry {
    /// The printable area as a rectangle in page coordinates
    pub fn content_rect(&self) -> Rect {
        Rect::new(
            self.margin_pt,
            self.margin_pt,
            self.content_width_pt,
            self.content_height_pt,
        )
    }
}

/// Final layout of one source image on its page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedImage {
    /// Decoded size of the source image
    pub native_px: PixelSize,
    /// Size the image is resampled to before encoding
    pub target_px: PixelSize,
    /// Where the image is drawn, in points
    pub rect: Rect,
}

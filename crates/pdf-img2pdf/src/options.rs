use crate::constants::{DEFAULT_QUALITY, MAX_QUALITY, MIN_QUALITY};
use crate::layout::compute_content_box;
use crate::types::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Per-conversion settings applied to every page
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ConversionOptions {
    /// JPEG quality, 1–100
    pub quality: u8,
    pub page_format: PageFormat,
    pub orientation: Orientation,
    pub greyscale: bool,
    /// Margin on every side, in inches
    pub margin_in: f32,
    /// Enlarge small images to fill the content box
    pub scale_up: bool,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            quality: DEFAULT_QUALITY,
            page_format: PageFormat::A4,
            orientation: Orientation::Landscape,
            greyscale: false,
            margin_in: 0.0,
            scale_up: false,
        }
    }
}

impl ConversionOptions {
    /// Load options from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options = serde_json::from_slice(&bytes).map_err(|e| {
            ConvertError::InvalidParameter(format!("Failed to parse config: {}", e))
        })?;
        Ok(options)
    }

    /// Save options to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(|e| {
            ConvertError::InvalidParameter(format!("Failed to serialize config: {}", e))
        })?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Set the margin from a catalog value such as `"0.25"`
    pub fn with_margin(mut self, value: &str) -> Result<Self> {
        self.margin_in = parse_margin(value)?;
        Ok(self)
    }

    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        if !(MIN_QUALITY..=MAX_QUALITY).contains(&self.quality) {
            return Err(ConvertError::InvalidParameter(format!(
                "Quality must be between {} and {}, got {}",
                MIN_QUALITY, MAX_QUALITY, self.quality
            )));
        }

        // Rejects negative margins and margins that leave no room for content
        compute_content_box(self.page_format, self.orientation, self.margin_in)?;

        Ok(())
    }
}

/// Everything needed for one conversion: the ordered images and the settings
#[derive(Debug, Clone, Default)]
pub struct ConversionRequest {
    pub images: Vec<ImageSource>,
    pub options: ConversionOptions,
}

impl ConversionRequest {
    pub fn new(images: Vec<ImageSource>, options: ConversionOptions) -> Self {
        Self { images, options }
    }

    /// Validate the request before any image is touched
    pub fn validate(&self) -> Result<()> {
        if self.images.is_empty() {
            return Err(ConvertError::EmptyInput);
        }
        self.options.validate()
    }
}

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Failed to decode image '{name}': {source}")]
    Decode {
        name: String,
        #[source]
        source: image::ImageError,
    },
    #[error("Failed to encode image: {0}")]
    Encoding(String),
    #[error("No images to convert")]
    EmptyInput,
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
    #[error("Conversion cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, ConvertError>;

/// Page orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    /// Catalog dimensions as listed
    Portrait,
    /// Width and height swapped
    #[default]
    Landscape,
}

impl Orientation {
    pub fn from_portrait_flag(portrait: bool) -> Self {
        if portrait {
            Orientation::Portrait
        } else {
            Orientation::Landscape
        }
    }

    pub fn is_portrait(self) -> bool {
        self == Orientation::Portrait
    }
}

/// Page formats offered for output pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PageFormat {
    #[default]
    A4,
    Letter,
    Legal,
    A3,
    A5,
    Tabloid,
    Executive,
    #[cfg_attr(feature = "serde", serde(rename = "4x6"))]
    Photo4x6,
    #[cfg_attr(feature = "serde", serde(rename = "5x7"))]
    Photo5x7,
    #[cfg_attr(feature = "serde", serde(rename = "8x8"))]
    Square8x8,
}

/// Every page format, in menu order
pub const PAGE_FORMATS: [PageFormat; 10] = [
    PageFormat::A4,
    PageFormat::Letter,
    PageFormat::Legal,
    PageFormat::A3,
    PageFormat::A5,
    PageFormat::Tabloid,
    PageFormat::Executive,
    PageFormat::Photo4x6,
    PageFormat::Photo5x7,
    PageFormat::Square8x8,
];

impl PageFormat {
    /// Display label
    pub fn label(self) -> &'static str {
        match self {
            PageFormat::A4 => "A4",
            PageFormat::Letter => "Letter",
            PageFormat::Legal => "Legal",
            PageFormat::A3 => "A3",
            PageFormat::A5 => "A5",
            PageFormat::Tabloid => "Tabloid",
            PageFormat::Executive => "Executive",
            PageFormat::Photo4x6 => "4x6",
            PageFormat::Photo5x7 => "5x7",
            PageFormat::Square8x8 => "8x8 Square",
        }
    }

    /// Stable identifier used in configs and on the command line
    pub fn value(self) -> &'static str {
        match self {
            PageFormat::A4 => "a4",
            PageFormat::Letter => "letter",
            PageFormat::Legal => "legal",
            PageFormat::A3 => "a3",
            PageFormat::A5 => "a5",
            PageFormat::Tabloid => "tabloid",
            PageFormat::Executive => "executive",
            PageFormat::Photo4x6 => "4x6",
            PageFormat::Photo5x7 => "5x7",
            PageFormat::Square8x8 => "8x8",
        }
    }

    /// Width and height in inches, as listed in the catalog
    pub fn dimensions_in(self) -> (f32, f32) {
        match self {
            PageFormat::A4 => (8.2678, 11.6929),
            PageFormat::Letter => (8.5, 11.0),
            PageFormat::Legal => (8.5, 14.0),
            PageFormat::A3 => (11.6929, 16.5354),
            PageFormat::A5 => (5.8464, 8.2678),
            PageFormat::Tabloid => (11.0, 17.0),
            PageFormat::Executive => (7.25, 10.5),
            PageFormat::Photo4x6 => (4.0, 6.0),
            PageFormat::Photo5x7 => (5.0, 7.0),
            PageFormat::Square8x8 => (8.0, 8.0),
        }
    }

    /// Dimensions with orientation applied.
    ///
    /// Landscape always swaps width and height; the catalog's natural
    /// aspect ratio is not consulted.
    pub fn dimensions_with_orientation(self, orientation: Orientation) -> (f32, f32) {
        let (w, h) = self.dimensions_in();
        match orientation {
            Orientation::Portrait => (w, h),
            Orientation::Landscape => (h, w),
        }
    }
}

impl fmt::Display for PageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PageFormat {
    type Err = ConvertError;

    /// Accepts either the value (`"a4"`) or the label (`"8x8 Square"`), ignoring case
    fn from_str(s: &str) -> Result<Self> {
        let needle = s.trim();
        PAGE_FORMATS
            .iter()
            .copied()
            .find(|format| {
                format.value().eq_ignore_ascii_case(needle)
                    || format.label().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| ConvertError::InvalidParameter(format!("Unknown page format '{}'", s)))
    }
}

/// A selectable page margin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarginOption {
    pub label: &'static str,
    /// Decimal inches
    pub value: &'static str,
}

pub const MARGIN_OPTIONS: [MarginOption; 9] = [
    MarginOption {
        label: "None",
        value: "0",
    },
    MarginOption {
        label: "0.25\"",
        value: "0.25",
    },
    MarginOption {
        label: "0.50\"",
        value: "0.50",
    },
    MarginOption {
        label: "0.75\"",
        value: "0.75",
    },
    MarginOption {
        label: "1.00\"",
        value: "1.00",
    },
    MarginOption {
        label: "1.25\"",
        value: "1.25",
    },
    MarginOption {
        label: "1.50\"",
        value: "1.50",
    },
    MarginOption {
        label: "1.75\"",
        value: "1.75",
    },
    MarginOption {
        label: "2.00\"",
        value: "2.00",
    },
];

impl MarginOption {
    /// Look up a catalog entry by its value
    pub fn find(value: &str) -> Option<MarginOption> {
        let value = value.trim();
        MARGIN_OPTIONS.iter().copied().find(|opt| opt.value == value)
    }

    /// Margin in inches
    pub fn inches(&self) -> Result<f32> {
        parse_inches(self.value)
    }
}

/// Parse a margin value from the catalog into inches.
///
/// Values outside the catalog are rejected even if they parse as numbers.
pub fn parse_margin(value: &str) -> Result<f32> {
    MarginOption::find(value)
        .ok_or_else(|| ConvertError::InvalidParameter(format!("Unknown margin '{}'", value)))?
        .inches()
}

fn parse_inches(value: &str) -> Result<f32> {
    let inches: f32 = value
        .trim()
        .parse()
        .map_err(|_| ConvertError::InvalidParameter(format!("Margin '{}' is not a number", value)))?;
    if !inches.is_finite() || inches < 0.0 {
        return Err(ConvertError::InvalidParameter(format!(
            "Margin must be non-negative, got {}",
            value
        )));
    }
    Ok(inches)
}

/// An encoded source image held in memory
#[derive(Debug, Clone)]
pub struct ImageSource {
    /// File name or other label used in error messages
    pub name: String,
    pub data: Arc<[u8]>,
}

impl ImageSource {
    pub fn new(name: impl Into<String>, data: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }
}

/// Estimated size of the output PDF
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeEstimate {
    /// Number of images the estimate covers
    pub image_count: usize,
    /// Encoded size of the sampled image
    pub sample_image_bytes: u64,
    /// Estimated document size
    pub total_bytes: u64,
}

impl fmt::Display for SizeEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_file_size(self.total_bytes))
    }
}

/// Render a byte count as `B`, `KB` or `MB` with two decimals
pub fn format_file_size(bytes: u64) -> String {
    let mut display = bytes as f64;
    let mut unit = "B";

    if display > 1024.0 {
        display /= 1024.0;
        unit = "KB";
    }
    if display > 1024.0 {
        display /= 1024.0;
        unit = "MB";
    }

    format!("{:.2} {}", display, unit)
}

//! Request parameter validation and normalization.
//!
//! The transport layer hands over untyped [`RawParams`]; validation runs
//! every field-level check, accumulating all failures instead of stopping at
//! the first, and produces a typed [`ParamSet`] only when nothing failed.

use serde::Deserialize;
use std::fmt;

/// Tokens accepted as boolean values, matched case-insensitively.
const TRUE_TOKENS: &[&str] = &["true", "t", "1", "yes"];
const FALSE_TOKENS: &[&str] = &["false", "f", "0", "no"];

const HORIZONTAL_TOKENS: &[&str] = &["h", "horizontal"];
const VERTICAL_TOKENS: &[&str] = &["v", "vertical"];

/// The transform operation requested by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransformMode {
    Thumbnail,
    Resize,
    Flip,
    Rotate,
}

impl TransformMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "thumbnail" => Some(Self::Thumbnail),
            "resize" => Some(Self::Resize),
            "flip" => Some(Self::Flip),
            "rotate" => Some(Self::Rotate),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Thumbnail => "thumbnail",
            Self::Resize => "resize",
            Self::Flip => "flip",
            Self::Rotate => "rotate",
        }
    }
}

impl fmt::Display for TransformMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output image formats.
///
/// `jpg` and `jpeg` encode identically but are kept distinct so the derived
/// key (and therefore the stored object name) preserves the requested
/// extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Png,
    Jpg,
    Jpeg,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "png" => Some(Self::Png),
            "jpg" => Some(Self::Jpg),
            "jpeg" => Some(Self::Jpeg),
            _ => None,
        }
    }

    /// File extension appended to derived keys.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpg => "jpg",
            Self::Jpeg => "jpeg",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpg | Self::Jpeg => "image/jpeg",
        }
    }

    /// Whether this format uses JPEG encoding.
    pub fn is_jpeg(&self) -> bool {
        matches!(self, Self::Jpg | Self::Jpeg)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Flip axis, normalized from the extended token sets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlipDirection {
    /// Mirror left-to-right.
    Horizontal,
    /// Flip top-to-bottom.
    Vertical,
}

impl FlipDirection {
    pub fn parse(s: &str) -> Option<Self> {
        let lower = s.to_ascii_lowercase();
        if HORIZONTAL_TOKENS.contains(&lower.as_str()) {
            Some(Self::Horizontal)
        } else if VERTICAL_TOKENS.contains(&lower.as_str()) {
            Some(Self::Vertical)
        } else {
            None
        }
    }

    /// Canonical short form (`h` / `v`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Horizontal => "h",
            Self::Vertical => "v",
        }
    }
}

/// Raw, untyped request parameters as received from the transport layer.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawParams {
    pub mode: Option<String>,
    pub path: Option<String>,
    pub format: Option<String>,
    pub width: Option<String>,
    pub height: Option<String>,
    pub upscale: Option<String>,
    pub quality: Option<String>,
    pub direction: Option<String>,
    pub degree: Option<String>,
}

/// A fully validated transform request.
///
/// Values of this type only exist in the valid state: every mode-specific
/// requirement has been checked and every field is range-checked. A failed
/// validation yields the accumulated error list instead.
#[derive(Clone, Debug, PartialEq)]
pub struct ParamSet {
    pub mode: TransformMode,
    /// Source image identifier on source storage.
    pub path: String,
    pub format: OutputFormat,
    /// Zero means "derive from the other dimension, preserving aspect ratio".
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub upscale: bool,
    /// Encoder quality in `1..=100`.
    pub quality: u8,
    pub direction: Option<FlipDirection>,
    pub degree: Option<f64>,
}

impl RawParams {
    /// Validate and normalize into a [`ParamSet`].
    ///
    /// All field-level checks run unconditionally and every failure is
    /// collected, in field order, so a request with three bad fields reports
    /// three errors. Mode-specific requirements are checked only once all
    /// field-level checks pass.
    pub fn validate(&self) -> Result<ParamSet, Vec<String>> {
        let mut errors = Vec::new();

        let mode = match self.mode.as_deref() {
            Some(raw) => match TransformMode::parse(raw) {
                Some(mode) => Some(mode),
                None => {
                    errors.push(format!(
                        "the 'mode' must be one of thumbnail, resize, flip, rotate (got '{raw}')"
                    ));
                    None
                }
            },
            None => {
                errors.push("you must specify the 'mode'".to_string());
                None
            }
        };

        let path = match self.path.as_deref().filter(|p| !p.is_empty()) {
            Some(p) => Some(p.to_string()),
            None => {
                errors.push("you must specify the 'path' of an image".to_string());
                None
            }
        };

        let format = match self.format.as_deref() {
            Some(raw) => match OutputFormat::parse(raw) {
                Some(format) => Some(format),
                None => {
                    errors.push(format!(
                        "the 'format' must be one of png, jpg, jpeg (got '{raw}')"
                    ));
                    None
                }
            },
            None => Some(OutputFormat::Png),
        };

        let width = parse_dimension("width", self.width.as_deref(), &mut errors);
        let height = parse_dimension("height", self.height.as_deref(), &mut errors);

        let upscale = match self.upscale.as_deref() {
            Some(raw) => {
                let lower = raw.to_ascii_lowercase();
                if TRUE_TOKENS.contains(&lower.as_str()) {
                    Some(true)
                } else if FALSE_TOKENS.contains(&lower.as_str()) {
                    Some(false)
                } else {
                    errors.push(format!(
                        "only a boolean token (true/t/1/yes or false/f/0/no) is allowed for 'upscale' (got '{raw}')"
                    ));
                    None
                }
            }
            None => Some(true),
        };

        let quality = match self.quality.as_deref() {
            Some(raw) => match raw.parse::<i64>() {
                Ok(q) if (1..=100).contains(&q) => Some(q as u8),
                Ok(_) => {
                    errors.push("the 'quality' must be between 1 and 100".to_string());
                    None
                }
                Err(_) => {
                    errors.push("only a numeric value is allowed for 'quality'".to_string());
                    None
                }
            },
            None => Some(100),
        };

        let direction = match self.direction.as_deref() {
            Some(raw) => match FlipDirection::parse(raw) {
                Some(direction) => Some(Some(direction)),
                None => {
                    errors.push(format!(
                        "the 'direction' must be one of h, horizontal, v, vertical (got '{raw}')"
                    ));
                    None
                }
            },
            None => Some(None),
        };

        let degree = match self.degree.as_deref() {
            Some(raw) => match raw.parse::<f64>() {
                Ok(d) if d.is_finite() && d >= 0.0 => Some(Some(d)),
                _ => {
                    errors.push("only a non-negative number is allowed for 'degree'".to_string());
                    None
                }
            },
            None => Some(None),
        };

        if let (
            true,
            Some(mode),
            Some(path),
            Some(format),
            Some(upscale),
            Some(quality),
            Some(direction),
            Some(degree),
        ) = (
            errors.is_empty(),
            mode,
            path,
            format,
            upscale,
            quality,
            direction,
            degree,
        ) {
            match mode {
                TransformMode::Thumbnail | TransformMode::Resize => {
                    if width.is_none() && height.is_none() {
                        errors.push(
                            "at least one of 'width' or 'height' has to be set".to_string(),
                        );
                    } else if width.unwrap_or(0) == 0 && height.unwrap_or(0) == 0 {
                        errors.push(
                            "at least one of 'width' or 'height' has to be positive".to_string(),
                        );
                    }
                }
                TransformMode::Flip => {
                    if direction.is_none() {
                        errors.push(
                            "the 'direction' has to be set to flip the image".to_string(),
                        );
                    }
                }
                TransformMode::Rotate => {
                    if degree.is_none() {
                        errors.push("the 'degree' has to be set to rotate the image".to_string());
                    }
                }
            }

            if errors.is_empty() {
                return Ok(ParamSet {
                    mode,
                    path,
                    format,
                    width,
                    height,
                    upscale,
                    quality,
                    direction,
                    degree,
                });
            }
        }

        Err(errors)
    }
}

fn parse_dimension(name: &str, raw: Option<&str>, errors: &mut Vec<String>) -> Option<u32> {
    match raw {
        Some(raw) => match raw.parse::<u32>() {
            Ok(value) => Some(value),
            Err(_) => {
                errors.push(format!(
                    "only a non-negative integer is allowed for '{name}'"
                ));
                None
            }
        },
        None => None,
    }
}

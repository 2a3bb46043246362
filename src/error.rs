//! Error types shared across the crate.
//!
//! Encoding, rendering and parsing each get their own error so a caller can
//! tell "fix your input" apart from "the renderer could not draw this".

use thiserror::Error;

use crate::payload::ContentType;
use crate::render::ErrorCorrectionLevel;

/// A request is structurally unusable for its content type.
///
/// Always recoverable: re-prompt for the named field and encode again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {content_type} request: `{field}` {reason}")]
pub struct InvalidRequest {
    /// Content type of the rejected request.
    pub content_type: ContentType,
    /// Name of the offending field.
    pub field: &'static str,
    /// Short human readable reason.
    pub reason: &'static str,
}

impl InvalidRequest {
    pub(crate) fn empty(content_type: ContentType, field: &'static str) -> Self {
        Self {
            content_type,
            field,
            reason: "must not be empty",
        }
    }
}

/// Errors raised while turning a payload into an image.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The payload does not fit in a QR symbol at the requested level.
    #[error("payload too long for error correction level {level}: {detail}")]
    CapacityExceeded {
        level: ErrorCorrectionLevel,
        detail: String,
    },

    /// The rendered image exceeds the supported side length.
    #[error("image too large: {dimension} pixels per side")]
    ImageTooLarge { dimension: u32 },

    /// Raster encoding or saving failed.
    #[error("image error")]
    Image(#[from] image::ImageError),

    /// Writing output failed.
    #[error("io error")]
    Io(#[from] std::io::Error),
}

/// Errors raised while parsing a color string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    #[error("invalid hex color `{0}`, expected #RRGGBB")]
    InvalidHex(String),

    #[error("invalid rgb color `{0}`, expected rgb(r,g,b) with components 0-255")]
    InvalidRgb(String),

    #[error("unknown color `{0}`")]
    Unknown(String),
}

/// A keyword did not match any variant of an enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} `{value}`, expected one of: {expected}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
    pub expected: &'static str,
}

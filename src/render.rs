//! Rendering of payloads into QR images.
//!
//! The symbol itself (matrix layout, Reed-Solomon, masking) comes from the
//! `qrcodegen` crate. This module sits at the boundary: it takes a payload
//! plus colors and an error correction level, and hands back SVG markup, a
//! raster image, or a console preview.

use core::fmt;
use core::str::FromStr;

use image::{ImageBuffer, RgbImage};
use qrcodegen::{QrCode, QrCodeEcc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::color::Color;
use crate::error::{ParseEnumError, RenderError};
use crate::payload::Payload;

/// Quiet zone used when none is given.
pub const DEFAULT_BORDER: u8 = 4;
/// Widest quiet zone accepted by [`RenderRequest::with_border`].
pub const MAX_BORDER: u8 = 10;
/// Largest raster side length, in pixels.
pub const MAX_DIMENSION: u32 = 10_000;

/// QR error correction level.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default, Serialize, Deserialize)]
pub enum ErrorCorrectionLevel {
    /// Tolerates ~7% erroneous codewords.
    L,
    /// Tolerates ~15% erroneous codewords.
    #[default]
    M,
    /// Tolerates ~25% erroneous codewords.
    Q,
    /// Tolerates ~30% erroneous codewords.
    H,
}

impl ErrorCorrectionLevel {
    fn to_qrcodegen(self) -> QrCodeEcc {
        match self {
            ErrorCorrectionLevel::L => QrCodeEcc::Low,
            ErrorCorrectionLevel::M => QrCodeEcc::Medium,
            ErrorCorrectionLevel::Q => QrCodeEcc::Quartile,
            ErrorCorrectionLevel::H => QrCodeEcc::High,
        }
    }
}

impl fmt::Display for ErrorCorrectionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCorrectionLevel::L => "L",
            ErrorCorrectionLevel::M => "M",
            ErrorCorrectionLevel::Q => "Q",
            ErrorCorrectionLevel::H => "H",
        };
        f.write_str(s)
    }
}

impl FromStr for ErrorCorrectionLevel {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "l" | "low" => Ok(ErrorCorrectionLevel::L),
            "m" | "medium" => Ok(ErrorCorrectionLevel::M),
            "q" | "quartile" => Ok(ErrorCorrectionLevel::Q),
            "h" | "high" => Ok(ErrorCorrectionLevel::H),
            _ => Err(ParseEnumError {
                kind: "error correction level",
                value: s.to_string(),
                expected: "L, M, Q, H",
            }),
        }
    }
}

/// Everything a renderer needs besides the payload text.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderRequest {
    pub payload: String,
    #[serde(rename = "backgroundColor")]
    pub background: Color,
    #[serde(rename = "foregroundColor")]
    pub foreground: Color,
    #[serde(rename = "errorCorrectionLevel")]
    pub error_correction: ErrorCorrectionLevel,
    /// Quiet zone in modules. Values above [`MAX_BORDER`] render as `MAX_BORDER`.
    #[serde(default = "default_border", deserialize_with = "deserialize_border")]
    pub border: u8,
}

fn default_border() -> u8 {
    DEFAULT_BORDER
}

fn deserialize_border<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let border = u64::deserialize(deserializer)?;
    Ok(border.min(u64::from(MAX_BORDER)) as u8)
}

impl Default for RenderRequest {
    fn default() -> Self {
        Self {
            payload: String::new(),
            background: Color::WHITE,
            foreground: Color::BLACK,
            error_correction: ErrorCorrectionLevel::default(),
            border: DEFAULT_BORDER,
        }
    }
}

impl RenderRequest {
    /// Border actually drawn, clamped to `0..=MAX_BORDER`.
    pub fn effective_border(&self) -> u8 {
        self.border.min(MAX_BORDER)
    }

    pub fn new(payload: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
            ..Self::default()
        }
    }

    pub fn with_colors(mut self, background: Color, foreground: Color) -> Self {
        self.background = background;
        self.foreground = foreground;
        self
    }

    pub fn with_error_correction(mut self, level: ErrorCorrectionLevel) -> Self {
        self.error_correction = level;
        self
    }

    /// Sets the quiet zone width, clamped to `0..=MAX_BORDER`.
    pub fn with_border(mut self, border: u8) -> Self {
        self.border = border.min(MAX_BORDER);
        self
    }
}

impl From<Payload> for RenderRequest {
    fn from(payload: Payload) -> Self {
        RenderRequest::new(payload.into_string())
    }
}

/// Output of a [`Renderer`].
#[derive(Clone, Debug)]
pub enum RenderedImage {
    Svg(String),
    Raster(RgbImage),
}

impl RenderedImage {
    pub fn as_svg(&self) -> Option<&str> {
        match self {
            RenderedImage::Svg(svg) => Some(svg),
            RenderedImage::Raster(_) => None,
        }
    }

    pub fn as_raster(&self) -> Option<&RgbImage> {
        match self {
            RenderedImage::Raster(img) => Some(img),
            RenderedImage::Svg(_) => None,
        }
    }
}

/// Turns a payload into an image.
///
/// Implementations report capacity problems as [`RenderError`], never as
/// [`InvalidRequest`](crate::error::InvalidRequest).
pub trait Renderer {
    fn render(&self, request: &RenderRequest) -> Result<RenderedImage, RenderError>;
}

/// Renders SVG 1.1 documents.
#[derive(Clone, Copy, Debug, Default)]
pub struct SvgRenderer;

impl Renderer for SvgRenderer {
    fn render(&self, request: &RenderRequest) -> Result<RenderedImage, RenderError> {
        let qr = encode_symbol(request)?;
        Ok(RenderedImage::Svg(to_svg_string(&qr, request)))
    }
}

/// Renders RGB images with `scale` pixels per module.
#[derive(Clone, Copy, Debug)]
pub struct RasterRenderer {
    pub scale: u32,
}

impl Default for RasterRenderer {
    fn default() -> Self {
        Self { scale: 8 }
    }
}

impl Renderer for RasterRenderer {
    fn render(&self, request: &RenderRequest) -> Result<RenderedImage, RenderError> {
        let qr = encode_symbol(request)?;
        to_image_buffer(&qr, request, self.scale).map(RenderedImage::Raster)
    }
}

fn encode_symbol(request: &RenderRequest) -> Result<QrCode, RenderError> {
    let level = request.error_correction;
    let qr = QrCode::encode_text(&request.payload, level.to_qrcodegen()).map_err(|e| {
        warn!(%level, len = request.payload.len(), "payload exceeds QR capacity");
        RenderError::CapacityExceeded {
            level,
            detail: e.to_string(),
        }
    })?;
    debug!(
        version = qr.version().value(),
        size = qr.size(),
        %level,
        "encoded QR symbol"
    );
    Ok(qr)
}

// Returns SVG code for the QR Code with the requested colors and border.
// The string always uses Unix newlines (\n), regardless of the platform.
fn to_svg_string(qr: &QrCode, request: &RenderRequest) -> String {
    let border = i32::from(request.effective_border());
    let dimension = qr.size() + border * 2;
    let mut result = String::new();
    result += "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";
    result += "<!DOCTYPE svg PUBLIC \"-//W3C//DTD SVG 1.1//EN\" \"http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd\">\n";
    result += &format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" viewBox=\"0 0 {0} {0}\" stroke=\"none\">\n",
        dimension
    );
    result += &format!(
        "\t<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>\n",
        request.background.to_css_rgb()
    );
    result += "\t<path d=\"";
    let mut first = true;
    for y in 0..qr.size() {
        for x in 0..qr.size() {
            if qr.get_module(x, y) {
                if !first {
                    result += " ";
                }
                first = false;
                result += &format!("M{},{}h1v1h-1z", x + border, y + border);
            }
        }
    }
    result += &format!("\" fill=\"{}\"/>\n", request.foreground.to_css_rgb());
    result += "</svg>\n";
    result
}

fn to_image_buffer(qr: &QrCode, request: &RenderRequest, scale: u32) -> Result<RgbImage, RenderError> {
    let scale = scale.max(1);
    let border = u32::from(request.effective_border());
    let modules = qr.size() as u32 + 2 * border;
    let side = modules.saturating_mul(scale);
    if side > MAX_DIMENSION {
        return Err(RenderError::ImageTooLarge { dimension: side });
    }

    let dark = request.foreground.to_image_rgb();
    let light = request.background.to_image_rgb();
    let mut img: RgbImage = ImageBuffer::new(side, side);
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        let qr_x = (x / scale) as i32 - border as i32;
        let qr_y = (y / scale) as i32 - border as i32;
        *pixel = if qr.get_module(qr_x, qr_y) { dark } else { light };
    }
    Ok(img)
}

/// Renders a text preview of the symbol with a two-module border.
///
/// With `ansi` set, modules are drawn as colored cells chosen from the
/// request's background brightness; otherwise `██` marks dark modules.
pub fn to_console_string(request: &RenderRequest, ansi: bool) -> Result<String, RenderError> {
    let qr = encode_symbol(request)?;
    let (dark, light) = match (ansi, request.background.is_dark()) {
        (false, _) => ("██", "  "),
        (true, false) => ("\x1b[40m  \x1b[0m", "\x1b[47m  \x1b[0m"),
        (true, true) => ("\x1b[47m  \x1b[0m", "\x1b[40m  \x1b[0m"),
    };
    let border: i32 = 2;
    let mut out = String::new();
    for y in -border..qr.size() + border {
        for x in -border..qr.size() + border {
            out += if qr.get_module(x, y) { dark } else { light };
        }
        out.push('\n');
    }
    Ok(out)
}

// Tests
#[cfg(test)]
mod tests {
    use super::*;

    fn request(payload: &str) -> RenderRequest {
        RenderRequest::new(payload).with_error_correction(ErrorCorrectionLevel::L)
    }

    #[test]
    fn test_to_svg_string() {
        let req = request("HELLO WORLD").with_colors(Color::rgb(1, 2, 3), Color::rgb(200, 100, 50));
        let svg = SvgRenderer.render(&req).unwrap();
        let svg = svg.as_svg().unwrap();

        assert!(svg.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(svg.contains("viewBox=\"0 0 29 29\""));
        assert!(svg.contains("fill=\"rgb(1,2,3)\""));
        assert!(svg.contains("fill=\"rgb(200,100,50)\""));
        assert!(svg.ends_with("</svg>\n"));
        assert!(!svg.contains("d=\" "));
    }

    #[test]
    fn test_generate_image_buffer() {
        let img = RasterRenderer { scale: 1 }.render(&request("Hello, world!")).unwrap();

        // Version 1 with a border of 4 is 29 modules wide.
        assert_eq!(img.as_raster().unwrap().dimensions(), (29, 29));
    }

    #[test]
    fn test_raster_scale_and_colors() {
        let req = request("Hello, world!")
            .with_colors(Color::rgb(250, 250, 250), Color::rgb(10, 20, 30))
            .with_border(2);
        let rendered = RasterRenderer { scale: 3 }.render(&req).unwrap();
        let img = rendered.as_raster().unwrap();
        assert_eq!(img.dimensions(), (75, 75));
        // Quiet zone is background; the top-left finder corner is dark.
        assert_eq!(*img.get_pixel(0, 0), image::Rgb([250, 250, 250]));
        assert_eq!(*img.get_pixel(6, 6), image::Rgb([10, 20, 30]));
    }

    #[test]
    fn test_raster_too_large() {
        let err = RasterRenderer { scale: 1000 }
            .render(&request("Hello, world!"))
            .unwrap_err();
        assert!(matches!(err, RenderError::ImageTooLarge { dimension: 29_000 }));
    }

    #[test]
    fn test_capacity_exceeded() {
        let req = RenderRequest::new("a".repeat(3000))
            .with_error_correction(ErrorCorrectionLevel::H);
        let err = SvgRenderer.render(&req).unwrap_err();
        assert!(matches!(
            err,
            RenderError::CapacityExceeded { level: ErrorCorrectionLevel::H, .. }
        ));
    }

    #[test]
    fn test_border_clamped() {
        assert_eq!(RenderRequest::new("x").with_border(42).border, MAX_BORDER);
        assert_eq!(RenderRequest::new("x").with_border(0).border, 0);
        assert_eq!(RenderRequest::new("x").border, DEFAULT_BORDER);
    }

    #[test]
    fn test_console_preview() {
        let out = to_console_string(&request("Hello, world!"), false).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 25);
        assert_eq!(lines[0], " ".repeat(50));
        assert!(lines[2].starts_with("    ██████████████"));
    }

    #[test]
    fn test_error_correction_level_parse() {
        assert_eq!("q".parse::<ErrorCorrectionLevel>().unwrap(), ErrorCorrectionLevel::Q);
        assert_eq!("High".parse::<ErrorCorrectionLevel>().unwrap(), ErrorCorrectionLevel::H);
        assert!("X".parse::<ErrorCorrectionLevel>().is_err());
        assert_eq!(ErrorCorrectionLevel::default(), ErrorCorrectionLevel::M);
    }

    #[test]
    fn test_render_request_json() {
        let req: RenderRequest = serde_json::from_str(
            r##"{"payload":"hi","backgroundColor":"#FFFFFF","foregroundColor":"black","errorCorrectionLevel":"Q","border":4}"##,
        )
        .unwrap();
        assert_eq!(req.background, Color::WHITE);
        assert_eq!(req.foreground, Color::BLACK);
        assert_eq!(req.error_correction, ErrorCorrectionLevel::Q);
    }

    #[test]
    fn test_render_request_json_clamps_border() {
        let req: RenderRequest = serde_json::from_str(
            r##"{"payload":"HELLO WORLD","backgroundColor":"white","foregroundColor":"black","errorCorrectionLevel":"L","border":200}"##,
        )
        .unwrap();
        assert_eq!(req.border, MAX_BORDER);

        let svg = SvgRenderer.render(&req).unwrap();
        assert!(svg.as_svg().unwrap().contains("viewBox=\"0 0 41 41\""));
    }

    #[test]
    fn test_render_request_json_default_border() {
        let req: RenderRequest = serde_json::from_str(
            r##"{"payload":"hi","backgroundColor":"white","foregroundColor":"black","errorCorrectionLevel":"M"}"##,
        )
        .unwrap();
        assert_eq!(req.border, DEFAULT_BORDER);
    }

    #[test]
    fn test_oversized_border_field_is_clamped_when_rendering() {
        let mut req = request("Hello, world!");
        req.border = 200;
        let img = RasterRenderer { scale: 1 }.render(&req).unwrap();
        assert_eq!(img.as_raster().unwrap().dimensions(), (41, 41));
    }
}

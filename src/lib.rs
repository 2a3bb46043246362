//! # qrpayload
//!
//! A Rust library for building the text that goes inside a QR code, and for rendering it.
//!
//! QR scanners act on the payload they read: `mailto:` opens a mail composer, `tel:` dials,
//! `WIFI:T:WPA;S:...;` joins a network. `qrpayload` turns typed input for each of these content
//! types into a well-formed, correctly escaped payload string, then hands it to a renderer that
//! produces SVG markup, PNG images or a console preview.
//!
//! ## Features
//!
//! - Encode free text, URLs, email, phone, SMS and WiFi credentials.
//! - Percent-encoding for query values and backslash escaping for WiFi records.
//! - Typed errors naming the field and content type that need fixing.
//! - Render with custom colors, border and error correction level (L, M, Q, H).
//! - Save to a directory without overwriting existing files.
//!
//! ## Installation
//!
//! Add to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! qrpayload = "0.1" # Replace with the latest version
//! ```
//!
//! ## Example
//!
//! Encode an SMS and render it as SVG:
//!
//! ```rust
//! use qrpayload::color::Color;
//! use qrpayload::payload::{encode, EncodingRequest};
//! use qrpayload::render::{ErrorCorrectionLevel, RenderRequest, Renderer, SvgRenderer};
//!
//! let payload = encode(&EncodingRequest::Sms {
//!     number: "+123".to_string(),
//!     body: Some("Hello World".to_string()),
//! })
//! .unwrap();
//! assert_eq!(payload.as_str(), "sms:+123?body=Hello%20World");
//!
//! let request = RenderRequest::from(payload)
//!     .with_colors(Color::WHITE, "navy".parse().unwrap())
//!     .with_error_correction(ErrorCorrectionLevel::Q);
//! let svg = SvgRenderer.render(&request).unwrap();
//! assert!(svg.as_svg().unwrap().contains("rgb(0,0,128)"));
//! ```
//!
//! ## Modules
//!
//! - [`payload`]: Content-to-payload encoding.
//! - [`render`]: The renderer boundary and its `qrcodegen` backed implementations.
//! - [`color`]: Color parsing.
//! - [`output`]: Saving rendered images.
//! - [`error`]: Error types.

#![forbid(unsafe_code)]

pub mod color;
pub mod error;
pub mod output;
pub mod payload;
pub mod render;

pub use error::{InvalidRequest, RenderError};
pub use payload::{encode, ContentType, EncodingRequest, Payload, WifiSecurity};

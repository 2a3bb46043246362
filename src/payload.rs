//! Content-to-payload encoding.
//!
//! Turns a typed [`EncodingRequest`] into the text that QR scanners interpret:
//! `mailto:`, `tel:`, `sms:`, `WIFI:` records, plain URLs and free text.
//! Encoding is pure: the same request always produces the same [`Payload`].
//!
//! # Example
//!
//! ```rust
//! use qrpayload::payload::{encode, EncodingRequest, WifiSecurity};
//!
//! let request = EncodingRequest::Wifi {
//!     ssid: "Home;Net".to_string(),
//!     password: "secret".to_string(),
//!     security: WifiSecurity::Wpa,
//!     hidden: false,
//! };
//! let payload = encode(&request).unwrap();
//! assert_eq!(payload.as_str(), "WIFI:T:WPA;S:Home\\;Net;P:secret;H:false;");
//! ```

use core::fmt;
use core::str::FromStr;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{InvalidRequest, ParseEnumError};

/// Characters left unescaped in query values: ASCII alphanumerics and `-_.!~*'()`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Semantic category of the data being encoded.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Text,
    Url,
    Email,
    Phone,
    Sms,
    Wifi,
}

impl ContentType {
    /// All content types, in menu order.
    pub const ALL: [ContentType; 6] = [
        ContentType::Text,
        ContentType::Url,
        ContentType::Email,
        ContentType::Phone,
        ContentType::Sms,
        ContentType::Wifi,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ContentType::Text => "text",
            ContentType::Url => "url",
            ContentType::Email => "email",
            ContentType::Phone => "phone",
            ContentType::Sms => "sms",
            ContentType::Wifi => "wifi",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authentication scheme advertised in a WiFi record.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub enum WifiSecurity {
    #[default]
    #[serde(rename = "WPA", alias = "wpa")]
    Wpa,
    #[serde(rename = "WEP", alias = "wep")]
    Wep,
    /// Open network, written as `nopass`.
    #[serde(rename = "nopass", alias = "none", alias = "None")]
    None,
}

impl WifiSecurity {
    /// The `T:` code scanners expect.
    pub fn code(self) -> &'static str {
        match self {
            WifiSecurity::Wpa => "WPA",
            WifiSecurity::Wep => "WEP",
            WifiSecurity::None => "nopass",
        }
    }
}

impl fmt::Display for WifiSecurity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for WifiSecurity {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "wpa" => Ok(WifiSecurity::Wpa),
            "wep" => Ok(WifiSecurity::Wep),
            "nopass" | "none" => Ok(WifiSecurity::None),
            _ => Err(ParseEnumError {
                kind: "wifi security",
                value: s.to_string(),
                expected: "WPA, WEP, nopass",
            }),
        }
    }
}

/// Structured input for one encode call, keyed by content type.
///
/// Serializes as an internally tagged object, e.g.
/// `{"type":"sms","number":"+123","body":"hi"}`.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EncodingRequest {
    Text {
        body: String,
    },
    Url {
        value: String,
    },
    Email {
        address: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        subject: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        body: Option<String>,
    },
    Phone {
        number: String,
    },
    Sms {
        number: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        body: Option<String>,
    },
    Wifi {
        ssid: String,
        #[serde(default)]
        password: String,
        #[serde(default)]
        security: WifiSecurity,
        #[serde(default)]
        hidden: bool,
    },
}

impl EncodingRequest {
    pub fn content_type(&self) -> ContentType {
        match self {
            EncodingRequest::Text { .. } => ContentType::Text,
            EncodingRequest::Url { .. } => ContentType::Url,
            EncodingRequest::Email { .. } => ContentType::Email,
            EncodingRequest::Phone { .. } => ContentType::Phone,
            EncodingRequest::Sms { .. } => ContentType::Sms,
            EncodingRequest::Wifi { .. } => ContentType::Wifi,
        }
    }

    /// Shorthand for [`encode`].
    pub fn encode(&self) -> Result<Payload, InvalidRequest> {
        encode(self)
    }
}

/// The encoded text handed to a renderer.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Payload(String);

impl Payload {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Payload {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<Payload> for String {
    fn from(payload: Payload) -> Self {
        payload.0
    }
}

/// Encodes a request into its scanner-compatible payload.
///
/// # Errors
///
/// Returns [`InvalidRequest`] when a field the grammar needs is empty:
/// the email address, the phone or SMS number, or the WiFi SSID.
/// Text and URL requests never fail.
pub fn encode(request: &EncodingRequest) -> Result<Payload, InvalidRequest> {
    let content_type = request.content_type();
    let text = match request {
        EncodingRequest::Text { body } => body.clone(),
        EncodingRequest::Url { value } => encode_url(value),
        EncodingRequest::Email {
            address,
            subject,
            body,
        } => {
            require(content_type, "address", address)?;
            encode_email(address, subject.as_deref(), body.as_deref())
        }
        EncodingRequest::Phone { number } => {
            require(content_type, "number", number)?;
            format!("tel:{}", number)
        }
        EncodingRequest::Sms { number, body } => {
            require(content_type, "number", number)?;
            encode_sms(number, body.as_deref())
        }
        EncodingRequest::Wifi {
            ssid,
            password,
            security,
            hidden,
        } => {
            require(content_type, "ssid", ssid)?;
            format!(
                "WIFI:T:{};S:{};P:{};H:{};",
                security.code(),
                escape_wifi(ssid),
                escape_wifi(password),
                hidden
            )
        }
    };
    debug!(%content_type, len = text.len(), "encoded payload");
    Ok(Payload(text))
}

fn require(content_type: ContentType, field: &'static str, value: &str) -> Result<(), InvalidRequest> {
    if value.is_empty() {
        return Err(InvalidRequest::empty(content_type, field));
    }
    Ok(())
}

fn encode_url(value: &str) -> String {
    if value.starts_with("http://") || value.starts_with("https://") {
        value.to_string()
    } else {
        format!("https://{}", value)
    }
}

fn encode_email(address: &str, subject: Option<&str>, body: Option<&str>) -> String {
    let params: Vec<String> = [("subject", subject), ("body", body)]
        .into_iter()
        .filter_map(|(key, value)| match value {
            Some(v) if !v.is_empty() => Some(format!("{}={}", key, encode_component(v))),
            _ => None,
        })
        .collect();

    let mut mailto = format!("mailto:{}", address);
    if !params.is_empty() {
        mailto.push('?');
        mailto.push_str(&params.join("&"));
    }
    mailto
}

fn encode_sms(number: &str, body: Option<&str>) -> String {
    match body {
        Some(b) if !b.is_empty() => format!("sms:{}?body={}", number, encode_component(b)),
        _ => format!("sms:{}", number),
    }
}

fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

/// Backslash-escapes the characters the WIFI grammar reserves: `\ ; , "`.
pub fn escape_wifi(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | ';' | ',' | '"') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

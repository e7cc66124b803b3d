//! Base64 and UTF-8 conversions shared by every mechanism.
//!
//! The wire alphabet is standard base64 (RFC 4648 §4) with `=` padding;
//! the host protocol is responsible for any line wrapping.

use crate::SaslResult;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Encodes bytes to standard base64.
pub fn b64_encode(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Encodes the UTF-8 bytes of a string to standard base64.
pub fn b64_encode_str(s: &str) -> String {
    STANDARD.encode(s.as_bytes())
}

/// Decodes standard base64.
///
/// # Errors
///
/// `SaslError::MalformedInput` on invalid characters or bad padding.
pub fn b64_decode(s: &str) -> SaslResult<Vec<u8>> {
    Ok(STANDARD.decode(s)?)
}

/// Converts decoded bytes into a `String`.
///
/// # Errors
///
/// `SaslError::Utf8` if the bytes are not valid UTF-8.
pub fn utf8_decode(bytes: Vec<u8>) -> SaslResult<String> {
    Ok(String::from_utf8(bytes)?)
}

/// Decodes standard base64 into a `String`.
///
/// # Errors
///
/// `SaslError::MalformedInput` or `SaslError::Utf8`.
pub fn b64_decode_utf8(s: &str) -> SaslResult<String> {
    utf8_decode(b64_decode(s)?)
}

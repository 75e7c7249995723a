//! Value codecs: reversible number ↔ opaque token mappings.
//!
//! Every codec marks its tokens with a prefix and accepts the legacy
//! passthrough format (a bare decimal number) on decode, so records written
//! before a codec was introduced, or by another codec generation, still read.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::{DecodeError, EncodeError};

/// Converts plaintext values to stored tokens and back.
///
/// Contract: `decode(encode(v)) == v` for every finite `v`, and `decode`
/// accepts any token without this codec's marker by parsing it directly as
/// a number.
pub trait ValueCodec: Send + Sync {
    /// Short name used in configuration and logs.
    fn name(&self) -> &'static str;

    fn encode(&self, value: f64) -> Result<String, EncodeError>;

    fn decode(&self, token: &str) -> Result<f64, DecodeError>;
}

/// Parse a passthrough token as a bare finite number.
pub fn decode_plain(token: &str) -> Result<f64, DecodeError> {
    let trimmed = token.trim();
    if trimmed.is_empty() {
        return Err(DecodeError::Empty);
    }
    let value: f64 = trimmed
        .parse()
        .map_err(|_| DecodeError::NotANumber(trimmed.to_string()))?;
    if !value.is_finite() {
        return Err(DecodeError::NonFinite);
    }
    Ok(value)
}

/// Reference codec: the decimal text of the value, base64-encoded behind
/// the `FHE-` marker.
///
/// This provides no confidentiality. It stands in for a real cryptosystem
/// and fixes the token format existing stored records use.
#[derive(Clone, Copy, Debug, Default)]
pub struct MarkerCodec;

impl MarkerCodec {
    pub const MARKER: &'static str = "FHE-";
}

impl ValueCodec for MarkerCodec {
    fn name(&self) -> &'static str {
        "marker"
    }

    fn encode(&self, value: f64) -> Result<String, EncodeError> {
        if !value.is_finite() {
            return Err(EncodeError::NonFinite);
        }
        // `Display` for f64 prints the shortest text that parses back exactly.
        Ok(format!("{}{}", Self::MARKER, STANDARD.encode(value.to_string())))
    }

    fn decode(&self, token: &str) -> Result<f64, DecodeError> {
        let Some(payload) = token.strip_prefix(Self::MARKER) else {
            return decode_plain(token);
        };
        let bytes = STANDARD
            .decode(payload.trim())
            .map_err(|e| DecodeError::Base64(e.to_string()))?;
        let text = String::from_utf8(bytes).map_err(|_| DecodeError::Utf8)?;
        decode_plain(&text)
    }
}

use base64::Engine;
use serde::{Deserialize, Serialize};

/// A self-describing binary document reference of the form
/// `data:<mime-type>;base64,<payload>`.
///
/// The payload stays base64-encoded; the MIME type is passed through to the
/// backend without further validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataUri {
    pub mime_type: String,
    /// Base64 payload, still encoded.
    pub data: String,
}

impl DataUri {
    /// Parse a `data:` URI, checking shape and payload decodability only.
    pub fn parse(raw: &str) -> Result<Self, String> {
        let rest = raw
            .strip_prefix("data:")
            .ok_or_else(|| "expected a data: URI".to_string())?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| "data URI has no payload separator".to_string())?;
        let mime_type = header
            .strip_suffix(";base64")
            .ok_or_else(|| "data URI must declare base64 encoding".to_string())?;
        if mime_type.is_empty() {
            return Err("data URI has no MIME type".to_string());
        }
        base64::engine::general_purpose::STANDARD
            .decode(payload)
            .map_err(|e| format!("data URI payload is not valid base64: {e}"))?;
        Ok(Self {
            mime_type: mime_type.to_string(),
            data: payload.to_string(),
        })
    }
}

impl std::fmt::Display for DataUri {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "data:{};base64,{}", self.mime_type, self.data)
    }
}

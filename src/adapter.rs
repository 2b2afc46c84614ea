// Plaintext preprocessing contract. The source corpus couples shape
// detection (text/binary/JSON/CSV/base64) directly to the crypto engine;
// per this spec's re-architecture notes, preprocessing is treated as an
// external collaborator here. The core only ever sees opaque bytes — this
// tagged enum is the seam, not an implementation of content-aware
// encoding beyond UTF-8/raw passthrough.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdapterError {
    #[error("invalid UTF-8 in text adapter: {0}")]
    InvalidUtf8(String),
    #[error("invalid base64: {0}")]
    InvalidBase64(String),
    #[error("invalid JSON: {0}")]
    InvalidJson(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlaintextAdapter {
    Text(&'static str),
    Binary,
    Json,
    Base64,
}

impl PlaintextAdapter {
    pub fn to_bytes(&self, input: &str) -> Result<Vec<u8>, AdapterError> {
        match self {
            PlaintextAdapter::Text(_) | PlaintextAdapter::Json => Ok(input.as_bytes().to_vec()),
            PlaintextAdapter::Binary => Ok(input.as_bytes().to_vec()),
            PlaintextAdapter::Base64 => {
                use base64::{engine::general_purpose::STANDARD, Engine as _};
                STANDARD
                    .decode(input)
                    .map_err(|e| AdapterError::InvalidBase64(e.to_string()))
            }
        }
    }

    pub fn from_bytes(&self, bytes: &[u8]) -> Result<String, AdapterError> {
        match self {
            PlaintextAdapter::Text(_) | PlaintextAdapter::Binary => {
                String::from_utf8(bytes.to_vec()).map_err(|e| AdapterError::InvalidUtf8(e.to_string()))
            }
            PlaintextAdapter::Json => {
                serde_json::from_slice::<serde_json::Value>(bytes)
                    .map_err(|e| AdapterError::InvalidJson(e.to_string()))?;
                String::from_utf8(bytes.to_vec()).map_err(|e| AdapterError::InvalidUtf8(e.to_string()))
            }
            PlaintextAdapter::Base64 => {
                use base64::{engine::general_purpose::STANDARD, Engine as _};
                Ok(STANDARD.encode(bytes))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_passthrough_roundtrip() {
        let adapter = PlaintextAdapter::Text("utf-8");
        let bytes = adapter.to_bytes("hello").unwrap();
        assert_eq!(bytes, b"hello");
        assert_eq!(adapter.from_bytes(&bytes).unwrap(), "hello");
    }

    #[test]
    fn base64_roundtrip() {
        let adapter = PlaintextAdapter::Base64;
        let bytes = adapter.to_bytes("aGVsbG8=").unwrap();
        assert_eq!(bytes, b"hello");
        assert_eq!(adapter.from_bytes(&bytes).unwrap(), "aGVsbG8=");
    }

    #[test]
    fn json_rejects_malformed_input() {
        let adapter = PlaintextAdapter::Json;
        assert!(adapter.from_bytes(b"{not json").is_err());
        assert!(adapter.from_bytes(b"{\"a\":1}").is_ok());
    }
}

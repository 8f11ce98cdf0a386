//! Repository content DTOs

use serde::{Deserialize, Serialize};

/// Encoding label the forge uses for regular file payloads
pub const BASE64_ENCODING: &str = "base64";

/// Response of the contents endpoint for a single path
///
/// For regular files `encoding` is `base64` and `content` carries the
/// payload. Directories come back as arrays and fail to decode into this type;
/// symlinks and submodules have no base64 payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentEntry {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,

    #[serde(default)]
    pub path: Option<String>,

    #[serde(default)]
    pub encoding: Option<String>,

    #[serde(default)]
    pub content: Option<String>,
}

impl ContentEntry {
    /// The base64 payload, if this entry carries one
    pub fn base64_payload(&self) -> Option<&str> {
        match (self.encoding.as_deref(), self.content.as_deref()) {
            (Some(BASE64_ENCODING), Some(content)) => Some(content),
            _ => None,
        }
    }
}

//! Binary payloads exchanged with the AI service as `data:` URIs.
//!
//! Images and audio clips travel as base64 inside a [`DataUri`]; the résumé
//! record stores the enhanced photo the same way so templates can inline it
//! directly into `<img src>`.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("not a base64 data URI")]
    NotADataUri,

    #[error("unsupported file type: {0}")]
    UnsupportedType(String),

    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// A base64 `data:<mime>;base64,<payload>` value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DataUri {
    mime_type: String,
    data: String,
}

impl DataUri {
    /// Wraps raw bytes, encoding them as base64.
    pub fn from_bytes(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: STANDARD.encode(bytes),
        }
    }

    /// Wraps an already base64-encoded payload (as returned by the API).
    pub fn from_base64(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    /// Reads a file and guesses its MIME type from the extension.
    pub async fn from_file(path: &Path) -> Result<Self, MediaError> {
        let mime_type = mime_type_for_path(path)?;
        let bytes = tokio::fs::read(path).await.map_err(|source| MediaError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self::from_bytes(mime_type, &bytes))
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// The base64 payload without the `data:` prefix.
    pub fn base64_data(&self) -> &str {
        &self.data
    }

    pub fn decode(&self) -> Result<Vec<u8>, MediaError> {
        Ok(STANDARD.decode(self.data.as_bytes())?)
    }
}

impl fmt::Display for DataUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "data:{};base64,{}", self.mime_type, self.data)
    }
}

impl FromStr for DataUri {
    type Err = MediaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s.strip_prefix("data:").ok_or(MediaError::NotADataUri)?;
        let (header, data) = rest.split_once(',').ok_or(MediaError::NotADataUri)?;
        let mime_type = header
            .strip_suffix(";base64")
            .ok_or(MediaError::NotADataUri)?;
        if mime_type.is_empty() {
            return Err(MediaError::NotADataUri);
        }
        Ok(Self::from_base64(mime_type, data))
    }
}

impl TryFrom<String> for DataUri {
    type Error = MediaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DataUri> for String {
    fn from(value: DataUri) -> Self {
        value.to_string()
    }
}

/// Maps a file extension to the MIME type the Gemini API expects.
pub fn mime_type_for_path(path: &Path) -> Result<&'static str, MediaError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let mime = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "heic" => "image/heic",
        "webm" => "audio/webm",
        "ogg" | "oga" | "opus" => "audio/ogg",
        "mp3" => "audio/mp3",
        "wav" => "audio/wav",
        "m4a" | "aac" => "audio/aac",
        "flac" => "audio/flac",
        _ => return Err(MediaError::UnsupportedType(path.display().to_string())),
    };
    Ok(mime)
}

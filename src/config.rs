//! Configuration loaded from `cvgenius.toml`.
//!
//! Every key is optional. `GEMINI_API_KEY` (or the older `API_KEY`) takes
//! precedence over the file for the credential.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::gemini::client::API_BASE_URL;
use crate::template::TemplateId;

pub const DEFAULT_CONFIG_FILE: &str = "cvgenius.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct CvConfig {
    /// Gemini API key.
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Model used for extraction and rewriting.
    #[serde(default = "default_text_model")]
    pub text_model: String,

    /// Model used for headshot editing.
    #[serde(default = "default_image_model")]
    pub image_model: String,

    /// Language assumed for text input when detection is ambiguous.
    #[serde(default = "default_language")]
    pub language: String,

    /// Template selected at session start and after a restart.
    #[serde(default)]
    pub default_template: TemplateId,

    #[serde(default)]
    pub export: ExportConfig,

    #[serde(default)]
    pub audio: AudioConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub output_dir: PathBuf,
    /// Prefix of exported file names, followed by the sanitized full name.
    pub file_prefix: String,
    /// Chrome/Chromium binary used for PNG export; autodetected when unset.
    pub chrome_executable: Option<PathBuf>,
    /// Device scale factor of the PNG capture.
    pub scale: f64,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            file_prefix: "curriculo".to_string(),
            chrome_executable: None,
            scale: 2.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub ffmpeg_path: PathBuf,
    /// ffmpeg input format (`-f`), e.g. `pulse`, `avfoundation`, `dshow`.
    pub input_format: String,
    /// ffmpeg input device (`-i`).
    pub input_device: String,
}

impl Default for AudioConfig {
    fn default() -> Self {
        let (input_format, input_device) = if cfg!(target_os = "macos") {
            ("avfoundation", ":0")
        } else if cfg!(target_os = "windows") {
            ("dshow", "audio=default")
        } else {
            ("pulse", "default")
        };
        Self {
            ffmpeg_path: PathBuf::from("ffmpeg"),
            input_format: input_format.to_string(),
            input_device: input_device.to_string(),
        }
    }
}

fn default_api_base_url() -> String {
    API_BASE_URL.to_string()
}

fn default_text_model() -> String {
    "gemini-3-flash-preview".to_string()
}

fn default_image_model() -> String {
    "gemini-2.5-flash-image".to_string()
}

fn default_language() -> String {
    "pt-BR".to_string()
}

impl Default for CvConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base_url: default_api_base_url(),
            text_model: default_text_model(),
            image_model: default_image_model(),
            language: default_language(),
            default_template: TemplateId::default(),
            export: ExportConfig::default(),
            audio: AudioConfig::default(),
        }
    }
}

impl CvConfig {
    /// Loads `path`, or `cvgenius.toml` in the current directory when `None`.
    /// A missing file yields the defaults; a malformed one is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            toml::from_str::<CvConfig>(&contents)
                .with_context(|| format!("invalid configuration in {}", path.display()))?
        } else {
            Self::default()
        };

        if let Some(key) = env_api_key() {
            config.api_key = key;
        }

        Ok(config)
    }

    /// The API key, or an error telling the user how to provide one.
    pub fn require_api_key(&self) -> Result<&str> {
        if self.api_key.trim().is_empty() {
            anyhow::bail!(
                "no Gemini API key configured: set GEMINI_API_KEY or api_key in {DEFAULT_CONFIG_FILE}"
            );
        }
        Ok(&self.api_key)
    }
}

fn env_api_key() -> Option<String> {
    ["GEMINI_API_KEY", "API_KEY"]
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .find(|key| !key.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let config = CvConfig::default();
        assert_eq!(config.text_model, "gemini-3-flash-preview");
        assert_eq!(config.image_model, "gemini-2.5-flash-image");
        assert_eq!(config.language, "pt-BR");
        assert_eq!(config.default_template, TemplateId::Modern);
        assert_eq!(config.export.file_prefix, "curriculo");
        assert_eq!(config.export.scale, 2.0);
        assert_eq!(config.audio.ffmpeg_path, PathBuf::from("ffmpeg"));
    }

    #[test]
    fn deserialize_partial_toml() {
        let toml_str = r#"
            api_key = "test-123"
            default_template = "tech"

            [export]
            output_dir = "out"
        "#;
        let config: CvConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.api_key, "test-123");
        assert_eq!(config.default_template, TemplateId::Tech);
        assert_eq!(config.export.output_dir, PathBuf::from("out"));
        assert_eq!(config.export.file_prefix, "curriculo");
        assert_eq!(config.text_model, "gemini-3-flash-preview");
    }

    #[test]
    fn unknown_template_is_rejected() {
        let result = toml::from_str::<CvConfig>(r#"default_template = "baroque""#);
        assert!(result.is_err());
    }

    #[test]
    fn load_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = CvConfig::load(Some(&dir.path().join("missing.toml"))).unwrap();
        assert_eq!(config.language, "pt-BR");
    }

    #[test]
    fn load_reports_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cvgenius.toml");
        std::fs::write(&path, "language = [").unwrap();
        let err = CvConfig::load(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("invalid configuration"));
    }

    #[test]
    fn blank_key_is_rejected() {
        let config = CvConfig {
            api_key: "  ".into(),
            ..CvConfig::default()
        };
        assert!(config.require_api_key().is_err());
    }
}

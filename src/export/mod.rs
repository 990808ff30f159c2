//! Export of the rendered résumé to files.

pub mod document;
pub mod raster;

use std::fmt;

use thiserror::Error;

pub use document::render_document;
pub use raster::{ChromeRasterizer, Rasterizer};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("browser error: {0}")]
    Browser(String),

    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    /// Full-resolution image of the selected template.
    Png,
    /// Word-compatible document.
    Doc,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Doc => "doc",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Builds `<prefix>-<name>.<ext>` from the résumé's full name.
///
/// The name is lowercased, whitespace runs become a single `-`, and anything
/// other than alphanumerics, `-` and `_` is dropped. An empty result leaves
/// just `<prefix>.<ext>`.
pub fn output_file_name(prefix: &str, full_name: &str, format: ExportFormat) -> String {
    let slug = full_name
        .split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
                .flat_map(char::to_lowercase)
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    if slug.is_empty() {
        format!("{prefix}.{}", format.extension())
    } else {
        format!("{prefix}-{slug}.{}", format.extension())
    }
}

//! Stateless résumé rendering.
//!
//! [`render`] maps a record and a [`TemplateId`] to a standalone HTML page
//! (fixed 800px width, letter-height minimum) with inline CSS, so the same
//! output can be previewed in a browser, rasterized, or saved as-is.

mod layouts;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::resume::ResumeData;

/// Page width in CSS pixels shared by every template and the rasterizer.
pub const PAGE_WIDTH_PX: u32 = 800;
/// Minimum page height (US letter at 96 dpi).
pub const PAGE_HEIGHT_PX: u32 = 1056;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum TemplateId {
    Classic,
    #[default]
    Modern,
    Creative,
    Minimalist,
    Executive,
    Tech,
}

impl TemplateId {
    pub const ALL: [TemplateId; 6] = [
        TemplateId::Classic,
        TemplateId::Modern,
        TemplateId::Creative,
        TemplateId::Minimalist,
        TemplateId::Executive,
        TemplateId::Tech,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TemplateId::Classic => "classic",
            TemplateId::Modern => "modern",
            TemplateId::Creative => "creative",
            TemplateId::Minimalist => "minimalist",
            TemplateId::Executive => "executive",
            TemplateId::Tech => "tech",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            TemplateId::Classic => "serif header rule, photo on the right, two-column footer",
            TemplateId::Modern => "dark sidebar with photo, contact and skills",
            TemplateId::Creative => "bold indigo headings and skill bars",
            TemplateId::Minimalist => "centered, light, generous whitespace",
            TemplateId::Executive => "dark banner header with a side panel",
            TemplateId::Tech => "terminal-styled monospace on dark background",
        }
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown template '{0}' (expected one of: classic, modern, creative, minimalist, executive, tech)")]
pub struct UnknownTemplate(pub String);

impl FromStr for TemplateId {
    type Err = UnknownTemplate;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TemplateId::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownTemplate(s.to_string()))
    }
}

/// Renders `data` with `template` into a complete HTML document.
pub fn render(data: &ResumeData, template: TemplateId) -> String {
    let mut body = String::new();
    // Writing into a String cannot fail.
    let _ = match template {
        TemplateId::Classic => layouts::classic(&mut body, data),
        TemplateId::Modern => layouts::modern(&mut body, data),
        TemplateId::Creative => layouts::creative(&mut body, data),
        TemplateId::Minimalist => layouts::minimalist(&mut body, data),
        TemplateId::Executive => layouts::executive(&mut body, data),
        TemplateId::Tech => layouts::tech(&mut body, data),
    };

    let title = if data.full_name.trim().is_empty() {
        "Resume".to_string()
    } else {
        escape(&data.full_name)
    };

    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n\
         <style>{base}{extra}</style>\n</head>\n<body>\n\
         <div id=\"resume\" class=\"page {template}\">\n{body}</div>\n</body>\n</html>\n",
        base = layouts::BASE_CSS,
        extra = layouts::css(template),
    )
}

/// Escapes text for HTML element content and double-quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

//! The AI collaborator: résumé extraction, rewriting and photo enhancement.
//!
//! [`ResumeAi`] is the seam the wizard depends on. [`GeminiResumeAi`] is the
//! production implementation; it shapes prompts and the response schema and
//! decodes the model output into a [`ResumePatch`].

use serde_json::{Value, json};
use thiserror::Error;
use tracing::{debug, warn};

use crate::gemini::{ContentGenerator, GeminiError, GenerateContentRequest, Part};
use crate::media::DataUri;
use crate::resume::{ResumeData, ResumePatch, Tone};

#[derive(Debug, Error)]
pub enum AiError {
    #[error(transparent)]
    Service(#[from] GeminiError),

    #[error("malformed AI response: {0}")]
    Malformed(String),

    #[error("failed to encode request: {0}")]
    Encode(#[source] serde_json::Error),
}

/// One of the three acquisition modes handed to extraction.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionInput {
    Text(String),
    Image(DataUri),
    Audio(DataUri),
}

impl ExtractionInput {
    pub fn label(&self) -> &'static str {
        match self {
            ExtractionInput::Text(_) => "text",
            ExtractionInput::Image(_) => "image",
            ExtractionInput::Audio(_) => "audio",
        }
    }
}

pub trait ResumeAi {
    /// Structured extraction from free text, a scanned page or a voice clip.
    async fn extract(&self, input: &ExtractionInput) -> Result<ResumePatch, AiError>;

    /// Rewrites the whole record in the given tone, keeping its structure.
    async fn improve(&self, data: &ResumeData, tone: Tone) -> Result<ResumePatch, AiError>;

    /// Turns a casual photo into a professional headshot.
    async fn enhance_photo(&self, photo: &DataUri) -> Result<DataUri, AiError>;
}

/// JSON schema sent as `responseSchema`, mirroring [`ResumePatch`].
pub fn resume_schema() -> Value {
    let string = json!({ "type": "STRING" });
    json!({
        "type": "OBJECT",
        "properties": {
            "fullName": string,
            "jobTitle": string,
            "summary": string,
            "experiences": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "company": string,
                        "position": string,
                        "period": string,
                        "description": string,
                    },
                },
            },
            "education": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "institution": string,
                        "degree": string,
                        "year": string,
                    },
                },
            },
            "skills": { "type": "ARRAY", "items": string },
            "contact": {
                "type": "OBJECT",
                "properties": {
                    "email": string,
                    "phone": string,
                    "linkedin": string,
                    "location": string,
                },
            },
        },
    })
}

const IMAGE_PROMPT: &str = "OCR this image and extract resume data structured as JSON.";
const AUDIO_PROMPT: &str = "Listen to this professional background description and extract the \
     resume data structured as JSON. Detect the language automatically.";
const PHOTO_PROMPT: &str = "Edit this photo to look like a professional headshot. Adjust lighting, \
     ensure a professional crop focusing on the face, and replace the background with a neutral, \
     slightly blurred office or plain gray studio background.";

pub struct GeminiResumeAi<C> {
    client: C,
    text_model: String,
    image_model: String,
    language: String,
}

impl<C: ContentGenerator> GeminiResumeAi<C> {
    pub fn new(client: C, text_model: String, image_model: String, language: String) -> Self {
        Self {
            client,
            text_model,
            image_model,
            language,
        }
    }

    fn extraction_request(&self, input: &ExtractionInput) -> GenerateContentRequest {
        let parts = match input {
            ExtractionInput::Text(text) => vec![Part::text(format!(
                "Extract resume data from this text. Detect language (default {}): {text}",
                self.language
            ))],
            ExtractionInput::Image(image) => vec![Part::inline(image), Part::text(IMAGE_PROMPT)],
            ExtractionInput::Audio(audio) => vec![Part::inline(audio), Part::text(AUDIO_PROMPT)],
        };
        GenerateContentRequest::from_parts(parts).with_json_schema(resume_schema())
    }

    fn improvement_request(
        &self,
        data: &ResumeData,
        tone: Tone,
    ) -> Result<GenerateContentRequest, AiError> {
        // The photo is irrelevant to rewriting and can be megabytes of base64.
        let mut payload = data.clone();
        payload.photo_url = None;
        let serialized =
            serde_json::to_string(&payload).map_err(AiError::Encode)?;
        let prompt = format!(
            "Rewrite the following resume data to be more professional, impact-oriented, and \
             following a {tone} tone. Keep the same structure. Data: {serialized}"
        );
        Ok(GenerateContentRequest::from_parts(vec![Part::text(prompt)])
            .with_json_schema(resume_schema()))
    }
}

impl<C: ContentGenerator> ResumeAi for GeminiResumeAi<C> {
    async fn extract(&self, input: &ExtractionInput) -> Result<ResumePatch, AiError> {
        let req = self.extraction_request(input);
        let resp = self.client.generate_content(&self.text_model, &req).await?;
        parse_patch(&resp.text())
    }

    async fn improve(&self, data: &ResumeData, tone: Tone) -> Result<ResumePatch, AiError> {
        let req = self.improvement_request(data, tone)?;
        let resp = self.client.generate_content(&self.text_model, &req).await?;
        parse_patch(&resp.text())
    }

    async fn enhance_photo(&self, photo: &DataUri) -> Result<DataUri, AiError> {
        let req = GenerateContentRequest::from_parts(vec![Part::inline(photo), Part::text(PHOTO_PROMPT)]);
        let resp = self.client.generate_content(&self.image_model, &req).await?;
        match resp.first_inline_data() {
            Some(image) => Ok(image.to_data_uri()),
            None => {
                warn!("image model returned no image part, keeping the submitted photo");
                Ok(photo.clone())
            }
        }
    }
}

/// Decodes model output into a patch. Empty output is an empty patch.
pub fn parse_patch(text: &str) -> Result<ResumePatch, AiError> {
    let body = strip_code_fence(text.trim());
    if body.is_empty() {
        warn!("AI returned empty content, nothing to merge");
        return Ok(ResumePatch::default());
    }
    let patch: ResumePatch =
        serde_json::from_str(body).map_err(|e| AiError::Malformed(e.to_string()))?;
    debug!(fields = ?patch.present_fields(), "decoded resume patch");
    Ok(patch)
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

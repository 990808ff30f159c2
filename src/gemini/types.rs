//! Request and response bodies for `models/{model}:generateContent`.
//!
//! Field names follow the REST API's camelCase JSON. Only the subset used
//! by résumé extraction, rewriting and photo editing is modelled; unknown
//! response fields are ignored.

use serde::{Deserialize, Serialize};

use crate::media::DataUri;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

impl GenerateContentRequest {
    /// A single-turn request made of the given parts.
    pub fn from_parts(parts: Vec<Part>) -> Self {
        Self {
            contents: vec![Content {
                role: Some("user".into()),
                parts,
            }],
            generation_config: None,
        }
    }

    /// Asks for `application/json` output constrained by `schema`.
    pub fn with_json_schema(mut self, schema: serde_json::Value) -> Self {
        self.generation_config = Some(GenerationConfig {
            response_mime_type: Some("application/json".into()),
            response_schema: Some(schema),
        });
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// One piece of content: either text or inline base64 bytes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }

    pub fn inline(data: &DataUri) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: data.mime_type().to_string(),
                data: data.base64_data().to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

impl InlineData {
    pub fn to_data_uri(&self) -> DataUri {
        DataUri::from_base64(self.mime_type.clone(), self.data.clone())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_metadata: Option<UsageMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_feedback: Option<PromptFeedback>,
}

/// Present when the prompt itself was rejected by safety filters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
}

impl GenerateContentResponse {
    /// The block reason when the prompt was refused and nothing was generated.
    pub fn block_reason(&self) -> Option<&str> {
        if !self.candidates.is_empty() {
            return None;
        }
        self.prompt_feedback.as_ref()?.block_reason.as_deref()
    }

    fn first_parts(&self) -> &[Part] {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| c.parts.as_slice())
            .unwrap_or_default()
    }

    /// Concatenated text of the first candidate; empty when there is none.
    pub fn text(&self) -> String {
        self.first_parts()
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect()
    }

    /// The first inline binary part of the first candidate.
    pub fn first_inline_data(&self) -> Option<&InlineData> {
        self.first_parts().iter().find_map(|p| p.inline_data.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_uses_api_field_names() {
        let photo = DataUri::from_bytes("image/jpeg", b"img");
        let req = GenerateContentRequest::from_parts(vec![Part::inline(&photo), Part::text("OCR")])
            .with_json_schema(serde_json::json!({"type": "OBJECT"}));
        let json = serde_json::to_value(&req).unwrap();

        let parts = &json["contents"][0]["parts"];
        assert_eq!(parts[0]["inlineData"]["mimeType"], "image/jpeg");
        assert_eq!(parts[0]["inlineData"]["data"], "aW1n");
        assert!(parts[0].get("text").is_none());
        assert_eq!(parts[1]["text"], "OCR");
        assert_eq!(json["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(json["generationConfig"]["responseSchema"]["type"], "OBJECT");
    }

    #[test]
    fn request_without_schema_omits_generation_config() {
        let req = GenerateContentRequest::from_parts(vec![Part::text("hi")]);
        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("generationConfig").is_none());
    }

    #[test]
    fn response_text_joins_parts_of_first_candidate() {
        let api_json = r#"{
            "candidates": [
                {"content": {"role": "model", "parts": [{"text": "{\"fullName\":"}, {"text": "\"Ana\"}"}]}, "finishReason": "STOP"},
                {"content": {"parts": [{"text": "ignored"}]}}
            ],
            "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 5}
        }"#;
        let resp: GenerateContentResponse = serde_json::from_str(api_json).unwrap();
        assert_eq!(resp.text(), r#"{"fullName":"Ana"}"#);
        assert_eq!(resp.usage_metadata.unwrap().prompt_token_count, 12);
    }

    #[test]
    fn response_finds_inline_image() {
        let api_json = r#"{
            "candidates": [{"content": {"parts": [
                {"text": "Here is your headshot"},
                {"inlineData": {"mimeType": "image/png", "data": "cG5n"}}
            ]}}]
        }"#;
        let resp: GenerateContentResponse = serde_json::from_str(api_json).unwrap();
        let image = resp.first_inline_data().unwrap();
        assert_eq!(image.to_data_uri().to_string(), "data:image/png;base64,cG5n");
    }

    #[test]
    fn empty_response_has_no_text() {
        let resp: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(resp.text(), "");
        assert!(resp.first_inline_data().is_none());
        assert!(resp.block_reason().is_none());
    }

    #[test]
    fn block_reason_only_without_candidates() {
        let blocked: GenerateContentResponse =
            serde_json::from_str(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#).unwrap();
        assert_eq!(blocked.block_reason(), Some("SAFETY"));

        let answered: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"{}"}]}}],"promptFeedback":{"blockReason":"OTHER"}}"#,
        )
        .unwrap();
        assert!(answered.block_reason().is_none());
    }
}

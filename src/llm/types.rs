use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};

/// One piece of a multimodal prompt, sent to the model in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    Text(String),
    Image { mime_type: String, data: Vec<u8> },
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn image(mime_type: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self::Image {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    pub fn mime_type(&self) -> Option<&str> {
        match self {
            Self::Text(_) => None,
            Self::Image { mime_type, .. } => Some(mime_type.as_str()),
        }
    }

    pub(crate) fn to_request_part(&self) -> RequestPart {
        match self {
            Self::Text(text) => RequestPart::Text { text: text.clone() },
            Self::Image { mime_type, data } => RequestPart::InlineData {
                inline_data: InlineData {
                    mime_type: mime_type.clone(),
                    data: STANDARD.encode(data),
                },
            },
        }
    }
}

// Wire types for the `generateContent` REST method. Vertex AI and the Gemini
// API share the same request and response shape.

#[derive(Debug, Serialize)]
pub(crate) struct GenerateContentRequest {
    pub contents: Vec<RequestContent>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RequestContent {
    pub role: String,
    pub parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub(crate) enum RequestPart {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<ResponseContent>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

/// Only text parts matter here; anything else the model emits is ignored.
#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate, or `None` when it has none.
    pub fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();

        if text.is_empty() { None } else { Some(text) }
    }

    /// Explains why no text came back, for error reporting.
    pub fn missing_text_reason(&self) -> String {
        if let Some(reason) = self
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
        {
            return format!("Prompt blocked by the model: {}", reason);
        }

        match self
            .candidates
            .first()
            .and_then(|c| c.finish_reason.as_deref())
        {
            Some("SAFETY") => "Response blocked by safety filters".to_string(),
            Some(reason) if reason != "STOP" => {
                format!("Model returned no text (finish reason: {})", reason)
            }
            _ => "Model returned no text".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_image_part_serializes_as_inline_data() {
        let part = Part::image("image/png", vec![1u8, 2, 3]).to_request_part();
        let value = serde_json::to_value(&part).unwrap();

        assert_eq!(
            value,
            json!({"inlineData": {"mimeType": "image/png", "data": "AQID"}})
        );
    }

    #[test]
    fn test_text_part_serializes_as_text() {
        let value = serde_json::to_value(Part::text("hello").to_request_part()).unwrap();
        assert_eq!(value, json!({"text": "hello"}));
    }

    #[test]
    fn test_response_text_joins_parts_of_first_candidate() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [
                {
                    "content": {"role": "model", "parts": [{"text": "[{\"a\":"}, {"text": "1}]"}]},
                    "finishReason": "STOP"
                },
                {"content": {"parts": [{"text": "ignored"}]}}
            ],
            "usageMetadata": {"promptTokenCount": 10}
        }))
        .unwrap();

        assert_eq!(response.text().as_deref(), Some("[{\"a\":1}]"));
    }

    #[test]
    fn test_response_without_candidates_reports_block_reason() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "promptFeedback": {"blockReason": "PROHIBITED_CONTENT"}
        }))
        .unwrap();

        assert_eq!(response.text(), None);
        assert_eq!(
            response.missing_text_reason(),
            "Prompt blocked by the model: PROHIBITED_CONTENT"
        );
    }

    #[test]
    fn test_safety_finish_reason_is_reported() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{"finishReason": "SAFETY"}]
        }))
        .unwrap();

        assert_eq!(response.text(), None);
        assert_eq!(
            response.missing_text_reason(),
            "Response blocked by safety filters"
        );
    }

    #[test]
    fn test_non_text_parts_are_ignored() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"parts": [{"functionCall": {"name": "x"}}]}, "finishReason": "STOP"}]
        }))
        .unwrap();

        assert_eq!(response.text(), None);
        assert_eq!(response.missing_text_reason(), "Model returned no text");
    }
}

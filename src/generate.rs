//! Generation dispatch against the Gemini `generateContent` API
//!
//! One round trip per call; no retries, no streaming. Failures funnel
//! through [`normalize`] into a task-shape-correct fallback value.

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::task::{GenerationRequest, GenerationResult, ResponseShape, StructuredResult, TaskKind};
use crate::{Error, Result};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// One content block on the wire (request or response side)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Content {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// One part of a content block: text or inline binary data
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Part {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub inline_data: Option<InlineData>,
}

impl Part {
    pub(crate) fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }
}

/// Base64-encoded binary payload (synthesized audio)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct InlineData {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub mime_type: Option<String>,
    pub data: String,
}

/// Output-shape constraints for a generation call
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_modalities: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speech_config: Option<serde_json::Value>,
}

/// Request body for `generateContent`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

impl GenerateContentRequest {
    /// Single-turn user prompt with no shape constraint
    pub(crate) fn prompt(text: &str) -> Self {
        Self {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part::text(text)],
            }],
            system_instruction: None,
            generation_config: None,
        }
    }
}

/// Response body for `generateContent`
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

impl GenerateContentResponse {
    /// Text of the first candidate part
    pub(crate) fn into_text(self) -> Result<String> {
        self.into_first_part()?
            .text
            .ok_or_else(|| Error::Generation("response part carried no text".to_string()))
    }

    /// Inline data payload of the first candidate part
    pub(crate) fn into_inline_data(self) -> Result<InlineData> {
        self.into_first_part()?
            .inline_data
            .ok_or_else(|| Error::Generation("response part carried no inline data".to_string()))
    }

    fn into_first_part(self) -> Result<Part> {
        self.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .ok_or_else(|| Error::Generation("empty response from API".to_string()))
    }
}

/// JSON schema for the {text, percentage, emoji} structured result
fn structured_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "OBJECT",
        "properties": {
            "text": { "type": "STRING", "description": "The generated content." },
            "percentage": {
                "type": "INTEGER",
                "description": "A percentage score for the content (e.g., believability, sincerity)."
            },
            "emoji": {
                "type": "STRING",
                "description": "A single emoji that fits the tone of the content."
            }
        },
        "required": ["text", "percentage", "emoji"]
    })
}

/// Raw structured payload before range clamping
#[derive(Debug, Deserialize)]
struct RawStructured {
    text: String,
    percentage: i64,
    emoji: String,
}

/// Parse a structured-shape candidate text into a result
///
/// The model is asked for a 0-100 integer but not trusted; out-of-range
/// values are clamped rather than failing the call.
///
/// # Errors
///
/// Returns `Error::Schema` when the payload is not the requested JSON shape.
pub fn parse_structured(payload: &str) -> Result<StructuredResult> {
    let raw: RawStructured =
        serde_json::from_str(payload).map_err(|e| Error::Schema(e.to_string()))?;

    if raw.emoji.is_empty() {
        return Err(Error::Schema("emoji field is empty".to_string()));
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let percentage = raw.percentage.clamp(0, 100) as u8;

    Ok(StructuredResult {
        text: raw.text,
        percentage,
        emoji: raw.emoji,
    })
}

/// Deterministic task-shape-correct fallback for a failed call
#[must_use]
pub fn fallback(kind: TaskKind) -> GenerationResult {
    let text = format!("Sorry, I encountered an error in {kind}. Please try again.");
    match kind.shape() {
        ResponseShape::Structured => GenerationResult::Structured(StructuredResult {
            text,
            percentage: 0,
            emoji: "\u{1F61E}".to_string(),
        }),
        ResponseShape::Plain => GenerationResult::Plain(text),
    }
}

/// Convert any dispatch failure into a displayable fallback value
///
/// The single point where failures become user-visible text. Logs the
/// underlying error and never raises.
#[must_use]
pub fn normalize(error: &Error, kind: TaskKind) -> GenerationResult {
    tracing::error!(task = %kind, error = %error, "generation failed");
    fallback(kind)
}

/// Dispatches prompts to the generative API
#[derive(Debug, Clone)]
pub struct GenerationClient {
    client: reqwest::Client,
    config: Config,
}

impl GenerationClient {
    /// Create a new generation client
    ///
    /// # Errors
    ///
    /// Returns error if the API key is missing.
    pub fn new(config: Config) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(Error::Config(
                "API key required for generation".to_string(),
            ));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            config,
        })
    }

    pub(crate) const fn config(&self) -> &Config {
        &self.config
    }

    /// One `generateContent` round trip against the named model
    pub(crate) async fn post_generate(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        let url = format!("{API_BASE}/{model}:generateContent");
        tracing::debug!(model, "dispatching generation request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "generation request failed");
                e
            })?;

        let status = response.status();
        tracing::debug!(status = %status, "received response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "generation API error");
            return Err(Error::Generation(format!("API error {status}: {body}")));
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "failed to parse response");
            e
        })?;

        Ok(parsed)
    }

    /// Dispatch a request and return the typed result
    ///
    /// # Errors
    ///
    /// Returns error on invalid parameters, transport failure, or a
    /// malformed structured payload.
    pub async fn dispatch(&self, request: &GenerationRequest) -> Result<GenerationResult> {
        request.validate()?;

        let kind = request.kind();
        let instruction = crate::prompt::build_prompt(request);
        let model = match kind {
            TaskKind::Roadmap => &self.config.roadmap_model,
            _ => &self.config.text_model,
        };

        let mut wire = GenerateContentRequest::prompt(&instruction);
        if kind.shape() == ResponseShape::Structured {
            wire.generation_config = Some(GenerationConfig {
                response_mime_type: Some("application/json".to_string()),
                response_schema: Some(structured_schema()),
                ..GenerationConfig::default()
            });
        }

        let text = self.post_generate(model, &wire).await?.into_text()?;

        let result = match kind.shape() {
            ResponseShape::Structured => GenerationResult::Structured(parse_structured(&text)?),
            ResponseShape::Plain => GenerationResult::Plain(text),
        };

        tracing::info!(task = %kind, "generation complete");
        Ok(result)
    }

    /// Dispatch a request, converting any failure into the task's fallback
    ///
    /// Never fails; the UI renders whatever comes back.
    pub async fn generate(&self, request: &GenerationRequest) -> GenerationResult {
        match self.dispatch(request).await {
            Ok(result) => result,
            Err(e) => normalize(&e, request.kind()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_payload_parses() {
        let result =
            parse_structured(r#"{"text":"Dog ate it","percentage":72,"emoji":"🐶"}"#).unwrap();
        assert_eq!(result.text, "Dog ate it");
        assert_eq!(result.percentage, 72);
        assert_eq!(result.emoji, "🐶");
    }

    #[test]
    fn out_of_range_percentage_is_clamped() {
        let high = parse_structured(r#"{"text":"t","percentage":250,"emoji":"🙂"}"#).unwrap();
        assert_eq!(high.percentage, 100);

        let low = parse_structured(r#"{"text":"t","percentage":-5,"emoji":"🙂"}"#).unwrap();
        assert_eq!(low.percentage, 0);
    }

    #[test]
    fn truncated_payload_is_a_schema_error() {
        let err = parse_structured(r#"{"text":"half"#).unwrap_err();
        assert!(matches!(err, Error::Schema(_)));
    }

    #[test]
    fn missing_field_is_a_schema_error() {
        let err = parse_structured(r#"{"text":"t","percentage":50}"#).unwrap_err();
        assert!(matches!(err, Error::Schema(_)));
    }

    #[test]
    fn candidate_text_is_extracted() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"hello"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(response.into_text().unwrap(), "hello");
    }

    #[test]
    fn empty_candidates_is_a_generation_error() {
        let response: GenerateContentResponse = serde_json::from_str(r"{}").unwrap();
        assert!(matches!(
            response.into_text().unwrap_err(),
            Error::Generation(_)
        ));
    }

    #[test]
    fn fallback_is_shape_correct_and_idempotent() {
        let a = fallback(TaskKind::Excuse);
        let b = fallback(TaskKind::Excuse);
        assert_eq!(a, b);
        match a {
            GenerationResult::Structured(s) => {
                assert_eq!(s.percentage, 0);
                assert_eq!(s.emoji, "😞");
                assert!(s.text.contains("excuse"));
            }
            GenerationResult::Plain(_) => panic!("excuse fallback must be structured"),
        }

        match fallback(TaskKind::Roadmap) {
            GenerationResult::Plain(text) => assert!(text.contains("roadmap")),
            GenerationResult::Structured(_) => panic!("roadmap fallback must be plain"),
        }
    }

    #[test]
    fn structured_request_serializes_camel_case() {
        let mut wire = GenerateContentRequest::prompt("hi");
        wire.generation_config = Some(GenerationConfig {
            response_mime_type: Some("application/json".to_string()),
            response_schema: Some(structured_schema()),
            ..GenerationConfig::default()
        });

        let json = serde_json::to_value(&wire).unwrap();
        assert_eq!(
            json["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(
            json["generationConfig"]["responseSchema"]["required"][1],
            "percentage"
        );
        assert!(json.get("systemInstruction").is_none());
    }
}

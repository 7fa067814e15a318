//! Gemini `generateContent` client for face-shape classification.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::analysis::AnalysisClient;
use crate::capture::EncodedImage;
use crate::config::Settings;
use crate::domain::AnalysisResult;
use crate::error::AnalysisError;

// Defensive hygiene only; there is no retry or backoff policy.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const REJECTION_BODY_EXCERPT: usize = 300;

const ANALYSIS_PROMPT: &str = "You are a professional portrait photographer. \
Analyze the face in this selfie. Classify the face shape as one of: Oval, \
Round, Square, Heart, Triangle, Long, Diamond, Unknown. Briefly explain the \
classification, describe the most flattering lighting for this face, and \
suggest 3 to 5 specific selfie poses tailored to the face shape. Respond \
with JSON only.";

pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    /// Missing key is reported per-call so the UI can show it as a normal
    /// analysis failure instead of refusing to start.
    api_key: Option<String>,
}

impl GeminiClient {
    pub fn from_settings(settings: &Settings) -> Result<Self, AnalysisError> {
        let api_key = settings.resolve_api_key();
        if api_key.is_none() {
            tracing::warn!("no API key configured; analysis calls will fail until one is set");
        }

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            api_key,
        })
    }

    fn request_body(image: &EncodedImage) -> serde_json::Value {
        json!({
            "contents": [{
                "parts": [
                    {
                        "inlineData": {
                            "mimeType": image.mime(),
                            "data": image.base64_payload(),
                        }
                    },
                    { "text": ANALYSIS_PROMPT }
                ]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": response_schema(),
            }
        })
    }
}

#[async_trait]
impl AnalysisClient for GeminiClient {
    async fn analyze(&self, image: &EncodedImage) -> Result<AnalysisResult, AnalysisError> {
        let api_key = self.api_key.as_deref().ok_or(AnalysisError::MissingApiKey)?;
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        tracing::info!(model = %self.model, bytes = image.bytes().len(), "submitting analysis");

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&Self::request_body(image))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(AnalysisError::ServiceRejected {
                status: status.as_u16(),
                body: excerpt(&body),
            });
        }

        parse_response(&body)
    }
}

/// Schema handed to the service so the reply mirrors [`AnalysisResult`].
fn response_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "faceShape": {
                "type": "STRING",
                "enum": ["Oval", "Round", "Square", "Heart", "Triangle", "Long", "Diamond", "Unknown"]
            },
            "reasoning": { "type": "STRING" },
            "bestLighting": { "type": "STRING" },
            "poseSuggestions": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "title": { "type": "STRING" },
                        "description": { "type": "STRING" },
                        "difficulty": { "type": "STRING", "enum": ["Easy", "Medium", "Pro"] },
                        "bestAngle": { "type": "STRING" },
                        "tags": { "type": "ARRAY", "items": { "type": "STRING" } }
                    },
                    "required": ["title", "description", "difficulty", "bestAngle", "tags"]
                }
            }
        },
        "required": ["faceShape", "reasoning", "bestLighting", "poseSuggestions"]
    })
}

#[derive(Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    parts: Option<Vec<TextPart>>,
}

#[derive(Deserialize)]
struct TextPart {
    text: Option<String>,
}

/// Digs the JSON payload out of the candidate envelope and decodes it.
fn parse_response(body: &str) -> Result<AnalysisResult, AnalysisError> {
    let response: GenerateResponse = serde_json::from_str(body)
        .map_err(|e| AnalysisError::MalformedResponse(format!("response envelope: {e}")))?;

    let text = response
        .candidates
        .and_then(|mut candidates| candidates.drain(..).next())
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts)
        .and_then(|mut parts| parts.drain(..).next())
        .and_then(|part| part.text)
        .ok_or_else(|| {
            AnalysisError::MalformedResponse("no candidate text in response".to_string())
        })?;

    serde_json::from_str(&text)
        .map_err(|e| AnalysisError::MalformedResponse(format!("result payload: {e}")))
}

fn excerpt(body: &str) -> String {
    let trimmed = body.trim();
    match trimmed.char_indices().nth(REJECTION_BODY_EXCERPT) {
        Some((idx, _)) => format!("{}...", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FaceShape;

    fn envelope(payload: &str) -> String {
        serde_json::to_string(&json!({
            "candidates": [{ "content": { "parts": [{ "text": payload }] } }]
        }))
        .unwrap()
    }

    #[test]
    fn parses_a_well_formed_response() {
        let payload = r#"{
            "faceShape": "Round",
            "reasoning": "Cheek width close to face length.",
            "bestLighting": "Butterfly lighting from slightly above.",
            "poseSuggestions": [{
                "title": "Chin Forward",
                "description": "Push your chin slightly toward the lens.",
                "difficulty": "Easy",
                "bestAngle": "Eye level",
                "tags": ["slimming"]
            }]
        }"#;

        let result = parse_response(&envelope(payload)).unwrap();
        assert_eq!(result.face_shape, FaceShape::Round);
        assert_eq!(result.pose_suggestions.len(), 1);
    }

    #[test]
    fn unknown_label_in_payload_maps_to_unknown_shape() {
        let payload = r#"{
            "faceShape": "Pentagonal",
            "reasoning": "r",
            "bestLighting": "l",
            "poseSuggestions": []
        }"#;
        let result = parse_response(&envelope(payload)).unwrap();
        assert_eq!(result.face_shape, FaceShape::Unknown);
    }

    #[test]
    fn empty_candidates_is_malformed() {
        let err = parse_response(r#"{"candidates": []}"#).unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedResponse(_)));
    }

    #[test]
    fn non_json_candidate_text_is_malformed() {
        let err = parse_response(&envelope("I could not analyze this image.")).unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedResponse(_)));
    }

    #[test]
    fn garbage_body_is_malformed() {
        assert!(matches!(
            parse_response("<html>502</html>"),
            Err(AnalysisError::MalformedResponse(_))
        ));
    }

    #[test]
    fn excerpt_truncates_long_bodies() {
        let long = "x".repeat(1000);
        assert!(excerpt(&long).len() < 400);
        assert_eq!(excerpt("short"), "short");
    }
}

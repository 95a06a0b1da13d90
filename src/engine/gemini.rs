use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::engine::error::ContentError;

const API_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent";

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<RequestContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

#[derive(Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    response_mime_type: &'static str,
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
    parts: Option<Vec<ResponsePart>>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: Option<ApiErrorDetail>,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: Option<String>,
}

/// Anything that can turn a prompt into generated text. The production
/// implementation talks to Gemini; tests substitute a canned one.
pub trait ContentFetcher {
    fn fetch(&self, api_key: &str, prompt: &str) -> Result<String, ContentError>;
}

pub struct GeminiClient {
    client: Client,
}

impl GeminiClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

impl Default for GeminiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentFetcher for GeminiClient {
    /// One blocking round trip. No retry and no explicit timeout: the
    /// engine worker is serial, so a hung request stalls only the loading
    /// screen of the session that issued it.
    fn fetch(&self, api_key: &str, prompt: &str) -> Result<String, ContentError> {
        let request = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
            },
        };

        let response = self
            .client
            .post(format!("{API_URL}?key={api_key}"))
            .json(&request)
            .send()
            .map_err(|e| ContentError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            // The error body usually carries a useful message; fall back to
            // the bare status when it does not parse.
            let message = response
                .json::<ApiErrorBody>()
                .ok()
                .and_then(|body| body.error)
                .and_then(|detail| detail.message)
                .unwrap_or_else(|| format!("HTTP status {}", status.as_u16()));
            return Err(ContentError::Transport(message));
        }

        let envelope: GenerateResponse =
            response.json().map_err(|_| ContentError::Envelope)?;
        first_candidate_text(envelope).ok_or(ContentError::Envelope)
    }
}

fn first_candidate_text(envelope: GenerateResponse) -> Option<String> {
    envelope
        .candidates?
        .into_iter()
        .next()?
        .content?
        .parts?
        .into_iter()
        .next()?
        .text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_the_first_text_part() {
        let envelope: GenerateResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"hello"},{"text":"ignored"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(first_candidate_text(envelope).as_deref(), Some("hello"));
    }

    #[test]
    fn malformed_envelopes_yield_nothing() {
        for raw in [
            r#"{}"#,
            r#"{"candidates":[]}"#,
            r#"{"candidates":[{"content":{"parts":[]}}]}"#,
            r#"{"candidates":[{"content":{"parts":[{}]}}]}"#,
        ] {
            let envelope: GenerateResponse = serde_json::from_str(raw).unwrap();
            assert!(first_candidate_text(envelope).is_none(), "raw: {raw}");
        }
    }

    #[test]
    fn request_body_matches_the_wire_format() {
        let request = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart {
                    text: "count to 5".into(),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
            },
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "count to 5");
        assert_eq!(
            json["generationConfig"]["response_mime_type"],
            "application/json"
        );
    }
}

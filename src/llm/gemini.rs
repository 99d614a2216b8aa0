//! Google Gemini client for structured JSON completions
//!
//! Requests JSON response mode so the model returns a single JSON object as
//! its candidate text, which is then parsed into a `serde_json::Value`. Per
//! the [`LanguageModel`] contract every failure path logs and returns `None`.

use super::LanguageModel;
use crate::config::ModelConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Client for the Gemini `generateContent` endpoint
pub struct GeminiClient {
    client: Client,
    endpoint: String,
    model: String,
    api_key: String,
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

impl GeminiClient {
    /// Create a client from model configuration and a resolved API key
    pub fn new(config: &ModelConfig, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: api_key.into(),
        }
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }

    /// The raw candidate text of the first response candidate, if any
    fn candidate_text(response: GenerateContentResponse) -> Option<String> {
        response
            .candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()
            .map(|part| part.text)
            .filter(|text| !text.is_empty())
    }
}

#[async_trait]
impl LanguageModel for GeminiClient {
    async fn structured_completion(&self, prompt: &str) -> Option<Value> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
            },
        };

        let response = match self
            .client
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .timeout(REQUEST_TIMEOUT)
            .json(&request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Gemini request failed: {}", e);
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("Gemini returned {}: {}", status, body);
            return None;
        }

        let parsed: GenerateContentResponse = match response.json().await {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Could not decode Gemini response: {}", e);
                return None;
            }
        };

        let text = Self::candidate_text(parsed)?;
        match serde_json::from_str(&text) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Gemini candidate was not valid JSON: {}", e);
                None
            }
        }
    }

    fn name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_construction() {
        let config = ModelConfig::default();
        let client = GeminiClient::new(&config, "key");
        assert_eq!(
            client.url(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }

    #[test]
    fn test_url_trims_trailing_slash() {
        let config = ModelConfig {
            endpoint: "https://example.test/v1beta/".to_string(),
            model: "gemini-1.5-flash".to_string(),
            ..Default::default()
        };
        let client = GeminiClient::new(&config, "key");
        assert_eq!(
            client.url(),
            "https://example.test/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }

    #[test]
    fn test_candidate_text_empty_response() {
        let response = GenerateContentResponse { candidates: vec![] };
        assert!(GeminiClient::candidate_text(response).is_none());
    }

    #[test]
    fn test_candidate_text_extracts_first_part() {
        let response: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [
                { "content": { "parts": [ { "text": "{\"insight\": \"x\"}" } ] } }
            ]
        }))
        .unwrap();
        assert_eq!(
            GeminiClient::candidate_text(response).unwrap(),
            "{\"insight\": \"x\"}"
        );
    }

    #[test]
    fn test_candidate_text_missing_content() {
        let response: GenerateContentResponse =
            serde_json::from_value(serde_json::json!({ "candidates": [ {} ] })).unwrap();
        assert!(GeminiClient::candidate_text(response).is_none());
    }
}

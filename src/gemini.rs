//! Gemini API client for question generation
//!
//! One request, one reply: a fixed system instruction plus a single user
//! message, answered with plain text. Uses a long-lived reqwest::Client.

use crate::config::{Config, GenerationSettings};
use crate::error::AdvisorError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, info};

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Anything that can turn a system instruction and a user message into text.
///
/// The question source only needs this much from a model, which keeps the
/// network out of its tests.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, system_prompt: &str, user_message: &str) -> crate::Result<String>;
}

/// Reusable Gemini client (connection-pooled)
pub struct GeminiClient {
    client: Client,
    api_key: String,
    endpoint: String,
    settings: GenerationSettings,
}

impl GeminiClient {
    pub fn new(config: &Config) -> crate::Result<Self> {
        let api_key = config
            .gemini_api_key
            .clone()
            .filter(|_| config.has_valid_api_key())
            .ok_or(AdvisorError::MissingApiKey)?;

        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(2)
            .build()?;

        Ok(Self {
            client,
            api_key,
            endpoint: format!("{}/{}:generateContent", BASE_URL, config.gemini_model),
            settings: config.generation,
        })
    }

    fn build_request(&self, system_prompt: &str, user_message: &str) -> GeminiRequest {
        GeminiRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: user_message.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: self.settings.temperature,
                top_p: self.settings.top_p,
                max_output_tokens: self.settings.max_output_tokens,
            },
            system_instruction: SystemInstruction {
                parts: vec![Part {
                    text: system_prompt.to_string(),
                }],
            },
        }
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, system_prompt: &str, user_message: &str) -> crate::Result<String> {
        let url = format!("{}?key={}", self.endpoint, self.api_key);
        let request = self.build_request(system_prompt, user_message);

        info!(endpoint = %self.endpoint, "Calling Gemini API");

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                // The URL carries the API key
                let e = e.without_url();
                error!("Gemini API request failed: {}", e);
                AdvisorError::Gemini(format!("request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!(%status, "Gemini API error response: {}", error_text);
            return Err(AdvisorError::Gemini(format!("{}: {}", status, error_text)));
        }

        let gemini_response: GeminiResponse = response.json().await.map_err(|e| {
            let e = e.without_url();
            error!("Failed to parse Gemini response: {}", e);
            AdvisorError::Gemini(format!("unreadable response body: {}", e))
        })?;

        extract_text(gemini_response)
    }
}

/// Pull the reply text out of the first candidate
fn extract_text(response: GeminiResponse) -> crate::Result<String> {
    if let Some(usage) = &response.usage_metadata {
        info!(
            prompt_tokens = usage.prompt_token_count,
            reply_tokens = usage.candidates_token_count,
            "Gemini response received"
        );
    }

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| AdvisorError::Gemini("No response from Gemini API".to_string()))?;

    if let Some(reason) = candidate.finish_reason.as_deref() {
        if reason != "STOP" {
            info!(finish_reason = reason, "Gemini reply did not finish cleanly");
        }
    }

    candidate
        .content
        .and_then(|c| c.parts.into_iter().next())
        .map(|p| p.text)
        .ok_or_else(|| AdvisorError::Gemini("Empty response from Gemini".to_string()))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
    system_instruction: SystemInstruction,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Serialize)]
struct SystemInstruction {
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: i32,
    #[serde(default)]
    candidates_token_count: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> GeminiClient {
        GeminiClient::new(&Config::default().with_api_key("test-key")).unwrap()
    }

    #[test]
    fn test_client_requires_valid_key() {
        assert!(matches!(
            GeminiClient::new(&Config::default()),
            Err(AdvisorError::MissingApiKey)
        ));
        assert!(matches!(
            GeminiClient::new(&Config::default().with_api_key("your_gemini_api_key_here")),
            Err(AdvisorError::MissingApiKey)
        ));
    }

    #[test]
    fn test_endpoint_uses_configured_model() {
        let mut config = Config::default().with_api_key("test-key");
        config.gemini_model = "gemini-2.0-flash".to_string();
        let client = GeminiClient::new(&config).unwrap();
        assert!(client.endpoint.ends_with("/gemini-2.0-flash:generateContent"));
    }

    #[test]
    fn test_request_serialization() {
        let request = test_client().build_request("You are a stock analyst", "User goal: find dividend stocks");

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "User goal: find dividend stocks");
        assert_eq!(json["systemInstruction"]["parts"][0]["text"], "You are a stock analyst");
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 500);
        assert!(json["generationConfig"]["topP"].is_number());
        assert!(json["generationConfig"]["temperature"].is_number());
    }

    #[test]
    fn test_extract_text_from_first_candidate() {
        let response: GeminiResponse = serde_json::from_str(
            r#"{
                "candidates": [
                    {"content": {"role": "model", "parts": [{"text": "[]"}]}, "finishReason": "STOP"},
                    {"content": {"role": "model", "parts": [{"text": "ignored"}]}}
                ],
                "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 3}
            }"#,
        )
        .unwrap();

        assert_eq!(extract_text(response).unwrap(), "[]");
    }

    #[test]
    fn test_extract_text_rejects_empty_replies() {
        let no_candidates: GeminiResponse = serde_json::from_str("{}").unwrap();
        assert!(matches!(extract_text(no_candidates), Err(AdvisorError::Gemini(_))));

        let no_parts: GeminiResponse =
            serde_json::from_str(r#"{"candidates": [{"finishReason": "SAFETY"}]}"#).unwrap();
        assert!(matches!(extract_text(no_parts), Err(AdvisorError::Gemini(_))));
    }
}

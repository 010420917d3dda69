//! Generative language client
//!
//! Client for the Gemini `generateContent` REST endpoint.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{AppError, AppResult};

/// Client for the generative text service
#[derive(Clone)]
pub struct GeminiClient {
    api_endpoint: String,
    api_key: String,
    model: String,
    http_client: Client,
}

/// Request body for `generateContent`
#[derive(Debug, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Part {
    #[serde(default)]
    pub text: String,
}

/// Response from `generateContent`
#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<Content>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content.parts.iter().map(|p| p.text.as_str()).collect();
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }
}

impl GeminiClient {
    /// Create a new generative text client
    pub fn new(
        api_endpoint: String,
        api_key: String,
        model: String,
        timeout: Duration,
    ) -> AppResult<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_endpoint: api_endpoint.trim_end_matches('/').to_string(),
            api_key,
            model,
            http_client,
        })
    }

    /// Send a single-turn prompt and return the generated text
    pub async fn generate(&self, prompt: &str) -> AppResult<String> {
        let url = format!("{}/models/{}:generateContent", self.api_endpoint, self.model);
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        let response = self
            .http_client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::Advisory(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Advisory(format!(
                "API returned {}: {}",
                status, body
            )));
        }

        let result: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AppError::Advisory(format!("Failed to parse response: {}", e)))?;

        result
            .text()
            .ok_or_else(|| AppError::Advisory("Response contained no text".to_string()))
    }
}

//! Advisory text generation
//!
//! Asks a generative provider for short, practical advice and falls back to a
//! local template whenever the provider is unavailable.

use async_trait::async_trait;
use shared::{Advisory, AdvisorySource, ExtremeCondition};
use std::sync::Arc;
use std::time::Duration;

use crate::config::AdvisoryConfig;
use crate::error::AppResult;
use crate::external::GeminiClient;

/// Text generation backend
#[async_trait]
pub trait AdvisoryProvider: Send + Sync {
    async fn generate(&self, prompt: &str) -> AppResult<String>;
}

#[async_trait]
impl AdvisoryProvider for GeminiClient {
    async fn generate(&self, prompt: &str) -> AppResult<String> {
        GeminiClient::generate(self, prompt).await
    }
}

/// Produces an advisory for every query; never fails
#[derive(Clone)]
pub struct AdvisoryService {
    provider: Option<Arc<dyn AdvisoryProvider>>,
}

impl AdvisoryService {
    pub fn new(provider: Option<Arc<dyn AdvisoryProvider>>) -> Self {
        Self { provider }
    }

    /// Gemini-backed when a key is configured, template-only otherwise
    pub fn from_config(config: &AdvisoryConfig) -> AppResult<Self> {
        let key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty());

        let provider = match key {
            Some(key) => {
                let client = GeminiClient::new(
                    config.api_endpoint.clone(),
                    key.to_string(),
                    config.model.clone(),
                    Duration::from_secs(config.timeout_secs),
                )?;
                Some(Arc::new(client) as Arc<dyn AdvisoryProvider>)
            }
            None => None,
        };

        Ok(Self::new(provider))
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    pub async fn generate(
        &self,
        location: &str,
        purpose: &str,
        conditions: &[ExtremeCondition],
    ) -> Advisory {
        let Some(provider) = &self.provider else {
            tracing::debug!("No advisory credential configured, using fallback");
            return Advisory {
                text: fallback_text(location, purpose, conditions, true),
                source: AdvisorySource::FallbackNoCredential,
            };
        };

        let prompt = build_prompt(location, purpose, conditions);
        match provider.generate(&prompt).await {
            Ok(text) if !text.trim().is_empty() => Advisory {
                text: text.trim().to_string(),
                source: AdvisorySource::Generated,
            },
            Ok(_) => {
                tracing::warn!(location, "Advisory provider returned empty text");
                Advisory {
                    text: fallback_text(location, purpose, conditions, false),
                    source: AdvisorySource::FallbackError,
                }
            }
            Err(e) => {
                tracing::warn!(location, error = %e, "Advisory generation failed");
                Advisory {
                    text: fallback_text(location, purpose, conditions, false),
                    source: AdvisorySource::FallbackError,
                }
            }
        }
    }
}

fn condition_list(conditions: &[ExtremeCondition]) -> String {
    conditions
        .iter()
        .map(|c| c.label())
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn build_prompt(location: &str, purpose: &str, conditions: &[ExtremeCondition]) -> String {
    format!(
        "You are a wise weather advisor with local knowledge. Provide brief, practical advice \
         (2-3 sentences) for someone planning a {} in {}, considering these weather concerns: {}. \
         Be culturally sensitive and give actionable tips.",
        purpose,
        location,
        condition_list(conditions)
    )
}

/// Local advice template; the safety sentence is only added when no provider is configured
pub fn fallback_text(
    location: &str,
    purpose: &str,
    conditions: &[ExtremeCondition],
    with_safety_note: bool,
) -> String {
    let mut text = format!(
        "For your {} in {}, please be prepared for {} conditions. Ensure you have appropriate \
         gear, stay hydrated, and monitor weather updates regularly.",
        purpose.to_lowercase(),
        location,
        condition_list(conditions).to_lowercase()
    );
    if with_safety_note {
        text.push_str(" Safety should always be your top priority.");
    }
    text
}

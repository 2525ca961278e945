//! HTTP completion client for OpenAI-compatible chat completion APIs.

use crate::config::EnhancementConfig;
use crate::enhancer::{CompletionClient, CompletionError};
use async_trait::async_trait;

const SYSTEM_PROMPT: &str = "You are a QA engineer who writes precise, natural Gherkin test scenarios.";

pub struct HttpCompletionClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl HttpCompletionClient {
    /// Build a client from the enhancement config, reading the API key
    /// from the configured environment variable.
    pub fn from_config(config: &EnhancementConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.clone(),
            api_key: std::env::var(&config.api_key_env).ok(),
            model: config.model.clone(),
        }
    }

    fn endpoint(&self) -> String {
        if self.base_url.ends_with('/') {
            format!("{}chat/completions", self.base_url)
        } else {
            format!("{}/chat/completions", self.base_url)
        }
    }
}

#[async_trait]
impl CompletionClient for HttpCompletionClient {
    async fn complete(
        &self,
        prompt: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, CompletionError> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or(CompletionError::MissingCredentials)?;

        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": prompt }
            ],
            "max_tokens": max_tokens,
            "temperature": temperature,
        });

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| CompletionError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(CompletionError::Request(format!(
                "API error ({}): {}",
                status, text
            )));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| CompletionError::InvalidResponse(e.to_string()))?;

        json["choices"][0]["message"]["content"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| {
                CompletionError::InvalidResponse("missing choices[0].message.content".to_string())
            })
    }
}

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;

use crate::prompt::{self, ChatMessage};

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";
const DEFAULT_GEMINI_MODEL: &str = "gemini-pro";

/// Common interface for hosted completion backends.
///
/// Implementations send the prompt once and return the first choice's
/// content verbatim. No retry, no backoff; a failure is the caller's
/// problem.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Send the message sequence and return the generated text.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String>;

    /// Provider name for error messages and display.
    fn name(&self) -> &'static str;
}

fn http_client() -> Client {
    Client::builder()
        .timeout(Duration::from_secs(60))
        .connect_timeout(Duration::from_secs(10))
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// OpenAI chat-completions backend.
pub struct OpenAiProvider {
    client: Client,
    api_token: String,
    model: String,
}

impl OpenAiProvider {
    pub fn new(api_token: String, model: String) -> Self {
        let model = if model.trim().is_empty() {
            DEFAULT_OPENAI_MODEL.to_string()
        } else {
            model
        };
        Self {
            client: http_client(),
            api_token,
            model,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        let body = json!({
            "model": self.model,
            "messages": messages.iter().map(|m| json!({
                "role": m.role.as_str(),
                "content": m.content,
            })).collect::<Vec<_>>(),
        });

        let response = self
            .client
            .post(OPENAI_API_URL)
            .header("Authorization", format!("Bearer {}", self.api_token))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    anyhow!("Request to OpenAI timed out. Try again in a moment.")
                } else if e.is_connect() {
                    anyhow!("Failed to connect to OpenAI: {}. Check your network connection.", e)
                } else {
                    anyhow!("OpenAI request failed: {}", e)
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_json: serde_json::Value = response.json().await.unwrap_or_default();
            let detail = error_json["error"]["message"]
                .as_str()
                .unwrap_or("no detail provided");
            return Err(anyhow!("OpenAI returned {}: {}", status, detail));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| anyhow!("Failed to parse OpenAI response: {}", e))?;

        let content = json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| anyhow!("Unexpected response format from OpenAI"))?;

        Ok(content.to_string())
    }

    fn name(&self) -> &'static str {
        "OpenAI"
    }
}

/// Google Gemini backend. Gemini takes a single text prompt, so the
/// message sequence is flattened into a transcript before sending.
pub struct GeminiProvider {
    client: Client,
    api_key: String,
    model: String,
}

impl GeminiProvider {
    pub fn new(api_key: String, model: String) -> Self {
        let model = if model.trim().is_empty() {
            DEFAULT_GEMINI_MODEL.to_string()
        } else {
            model
        };
        Self {
            client: http_client(),
            api_key,
            model,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl CompletionProvider for GeminiProvider {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        let body = json!({
            "contents": [{
                "parts": [{ "text": prompt::render_transcript(messages) }]
            }]
        });

        let url = format!(
            "{}/{}:generateContent?key={}",
            GEMINI_API_BASE, self.model, self.api_key
        );

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    anyhow!("Request to Gemini timed out. Try again in a moment.")
                } else if e.is_connect() {
                    anyhow!("Failed to connect to Gemini: {}. Check your network connection.", e)
                } else {
                    anyhow!("Gemini request failed: {}", e)
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_json: serde_json::Value = response.json().await.unwrap_or_default();
            let detail = error_json["error"]["message"]
                .as_str()
                .unwrap_or("no detail provided");
            return Err(anyhow!("Gemini returned {}: {}", status, detail));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| anyhow!("Failed to parse Gemini response: {}", e))?;

        let content = json["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .ok_or_else(|| anyhow!("Unexpected response format from Gemini"))?;

        Ok(content.to_string())
    }

    fn name(&self) -> &'static str {
        "Gemini"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openai_provider_defaults_model() {
        let provider = OpenAiProvider::new("tok".to_string(), String::new());
        assert_eq!(provider.model(), "gpt-3.5-turbo");
        assert_eq!(provider.name(), "OpenAI");
    }

    #[test]
    fn test_openai_provider_keeps_configured_model() {
        let provider = OpenAiProvider::new("tok".to_string(), "gpt-4o".to_string());
        assert_eq!(provider.model(), "gpt-4o");
    }

    #[test]
    fn test_gemini_provider_defaults_model() {
        let provider = GeminiProvider::new("key".to_string(), "  ".to_string());
        assert_eq!(provider.model(), "gemini-pro");
        assert_eq!(provider.name(), "Gemini");
    }

    #[test]
    fn test_gemini_provider_keeps_configured_model() {
        let provider = GeminiProvider::new("key".to_string(), "gemini-1.5-flash".to_string());
        assert_eq!(provider.model(), "gemini-1.5-flash");
    }
}

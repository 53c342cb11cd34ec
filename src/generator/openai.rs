//! OpenAI Chat Completions client implementation
//!
//! Implements the [`Generator`] trait against an OpenAI-style
//! chat-completions endpoint, with bounded retry for transient errors.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::{GenerationRequest, Generator, GeneratorError, RawResponse, TokenUsage};
use crate::config::GeneratorConfig;

/// Maximum number of retries for transient errors
const MAX_RETRIES: u32 = 3;

/// Initial backoff delay for retries
const INITIAL_BACKOFF_MS: u64 = 1000;

/// Check if an HTTP status code is retryable
fn is_retryable_status(status: u16) -> bool {
    matches!(status, 408 | 429 | 500 | 502 | 503 | 504)
}

/// OpenAI API client
pub struct OpenAiGenerator {
    model: String,
    api_key: String,
    base_url: String,
    http: Client,
    max_tokens: u32,
    temperature: f32,
}

impl OpenAiGenerator {
    /// Create a new client from configuration
    ///
    /// Reads the API key from the environment variable named in config.
    pub fn from_config(config: &GeneratorConfig) -> Result<Self, GeneratorError> {
        debug!(model = %config.model, base_url = %config.base_url, "from_config: called");
        let api_key = config
            .get_api_key()
            .map_err(|e| GeneratorError::InvalidResponse(e.to_string()))?;

        let timeout = Duration::from_millis(config.timeout_ms);
        let http = Client::builder().timeout(timeout).build().map_err(GeneratorError::Network)?;

        Ok(Self {
            model: config.model.clone(),
            api_key,
            base_url: config.base_url.clone(),
            http,
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }

    /// Build the request body for the chat completions API
    fn build_request_body(&self, request: &GenerationRequest) -> serde_json::Value {
        debug!(%self.model, %request.max_tokens, "build_request_body: called");

        let messages = vec![
            serde_json::json!({
                "role": "system",
                "content": request.system_prompt,
            }),
            serde_json::json!({
                "role": "user",
                "content": request.user_prompt,
            }),
        ];

        let max_tokens = request.max_tokens.min(self.max_tokens);

        let mut body = serde_json::json!({
            "model": self.model,
            "messages": messages,
            "temperature": self.temperature,
        });

        // GPT-5.x and o1/o3 models use max_completion_tokens instead of max_tokens
        let uses_completion_tokens =
            self.model.starts_with("gpt-5") || self.model.starts_with("o1") || self.model.starts_with("o3");
        if uses_completion_tokens {
            body["max_completion_tokens"] = serde_json::json!(max_tokens);
        } else {
            body["max_tokens"] = serde_json::json!(max_tokens);
        }

        body
    }

    /// Extract the response text from the API response
    fn parse_response(&self, api_response: ChatResponse) -> Result<RawResponse, GeneratorError> {
        debug!(choice_count = api_response.choices.len(), "parse_response: called");
        let choice = api_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| GeneratorError::InvalidResponse("response contained no choices".to_string()))?;

        let text = choice
            .message
            .content
            .ok_or_else(|| GeneratorError::InvalidResponse("response choice had no content".to_string()))?;

        let usage = api_response
            .usage
            .map(|u| TokenUsage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
            })
            .unwrap_or_default();

        Ok(RawResponse { text, usage })
    }
}

#[async_trait]
impl Generator for OpenAiGenerator {
    async fn complete(&self, request: GenerationRequest) -> Result<RawResponse, GeneratorError> {
        debug!(%self.model, %request.max_tokens, "complete: called");
        let url = format!("{}/v1/chat/completions", self.base_url);
        let body = self.build_request_body(&request);

        let mut last_error = None;
        for attempt in 0..=MAX_RETRIES {
            if attempt > 0 {
                let backoff = INITIAL_BACKOFF_MS * 2u64.pow(attempt - 1);
                warn!(attempt, backoff_ms = backoff, "complete: retrying after transient error");
                tokio::time::sleep(Duration::from_millis(backoff)).await;
            }

            let response = match self
                .http
                .post(url.clone())
                .bearer_auth(&self.api_key)
                .header("content-type", "application/json")
                .json(&body)
                .send()
                .await
            {
                Ok(r) => r,
                Err(e) => {
                    debug!(attempt, error = %e, "complete: network error");
                    last_error = Some(GeneratorError::Network(e));
                    continue;
                }
            };

            let status = response.status().as_u16();

            if status == 429 {
                debug!("complete: rate limited (429)");
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse::<u64>().ok())
                    .unwrap_or(60);

                return Err(GeneratorError::RateLimited {
                    retry_after: Duration::from_secs(retry_after),
                });
            }

            if is_retryable_status(status) && attempt < MAX_RETRIES {
                let text = response.text().await.unwrap_or_default();
                debug!(attempt, status, "complete: retryable error");
                last_error = Some(GeneratorError::Api { status, message: text });
                continue;
            }

            if !response.status().is_success() {
                debug!(%status, "complete: API error");
                let text = response.text().await.unwrap_or_default();
                return Err(GeneratorError::Api { status, message: text });
            }

            debug!("complete: success");
            let api_response: ChatResponse = response.json().await?;
            return self.parse_response(api_response);
        }

        Err(last_error.unwrap_or_else(|| GeneratorError::InvalidResponse("max retries exceeded".to_string())))
    }
}

// OpenAI API response types

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    prompt_tokens: u64,
    completion_tokens: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(model: &str, max_tokens: u32) -> OpenAiGenerator {
        OpenAiGenerator {
            model: model.to_string(),
            api_key: "test-key".to_string(),
            base_url: "https://api.openai.com".to_string(),
            http: Client::new(),
            max_tokens,
            temperature: 0.2,
        }
    }

    fn sample_request(max_tokens: u32) -> GenerationRequest {
        GenerationRequest {
            system_prompt: "You build websites".to_string(),
            user_prompt: "a bakery landing page".to_string(),
            max_tokens,
        }
    }

    #[test]
    fn test_build_request_body_basic() {
        let client = test_client("gpt-4", 8192);
        let body = client.build_request_body(&sample_request(1000));

        assert_eq!(body["model"], "gpt-4");
        assert_eq!(body["max_tokens"], 1000);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "a bakery landing page");
        assert!((body["temperature"].as_f64().unwrap() - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_max_tokens_capped_to_client_limit() {
        let client = test_client("gpt-4", 1000);
        let body = client.build_request_body(&sample_request(5000));

        assert_eq!(body["max_tokens"], 1000);
    }

    #[test]
    fn test_newer_models_use_max_completion_tokens() {
        let client = test_client("gpt-5-mini", 8192);
        let body = client.build_request_body(&sample_request(1000));

        assert_eq!(body["max_completion_tokens"], 1000);
        assert!(body.get("max_tokens").is_none());
    }

    #[test]
    fn test_parse_response_extracts_text_and_usage() {
        let client = test_client("gpt-4", 8192);
        let api_response = ChatResponse {
            choices: vec![ChatChoice {
                message: ChatMessage {
                    content: Some("[HTML_START]...".to_string()),
                },
            }],
            usage: Some(ChatUsage {
                prompt_tokens: 12,
                completion_tokens: 34,
            }),
        };

        let raw = client.parse_response(api_response).unwrap();
        assert_eq!(raw.text, "[HTML_START]...");
        assert_eq!(raw.usage.input_tokens, 12);
        assert_eq!(raw.usage.output_tokens, 34);
    }

    #[test]
    fn test_parse_response_without_choices_is_invalid() {
        let client = test_client("gpt-4", 8192);
        let api_response = ChatResponse {
            choices: vec![],
            usage: None,
        };

        let result = client.parse_response(api_response);
        assert!(matches!(result, Err(GeneratorError::InvalidResponse(_))));
    }
}

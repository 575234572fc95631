//! Live adapter for the `LlmClient` port using the Anthropic messages API.
//!
//! Owns the transient-fault retry policy: rate limits, server errors, and
//! connection failures are retried with bounded exponential backoff before
//! a terminal error is surfaced to the caller.

use std::env;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::ports::llm::{CompletionRequest, CompletionResponse, LlmClient, LlmFuture};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Attempts per request, counting the first.
const MAX_ATTEMPTS: u32 = 3;
/// Backoff before the second attempt; doubles per retry.
const BASE_BACKOFF: Duration = Duration::from_millis(500);

/// Live LLM client that calls the Anthropic Claude API.
pub struct AnthropicClient {
    client: Client,
}

impl AnthropicClient {
    /// Creates a new live client.
    #[must_use]
    pub fn new() -> Self {
        Self { client: Client::new() }
    }
}

impl Default for AnthropicClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Request body sent to the Anthropic messages API.
#[derive(Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<AnthropicMessage<'a>>,
}

/// A single message in the Anthropic API request.
#[derive(Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Top-level response from the Anthropic messages API.
#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
    usage: Usage,
}

/// A content block in the Anthropic response.
#[derive(Deserialize)]
struct ContentBlock {
    text: String,
}

/// Token usage reported by the Anthropic API.
#[derive(Deserialize)]
struct Usage {
    input_tokens: u32,
    output_tokens: u32,
}

/// Error response from the Anthropic API.
#[derive(Deserialize)]
struct AnthropicError {
    error: AnthropicErrorDetail,
}

/// Detail inside an Anthropic error response.
#[derive(Deserialize)]
struct AnthropicErrorDetail {
    message: String,
}

/// Outcome of a single API attempt.
enum Attempt {
    Done(CompletionResponse),
    /// Worth retrying: rate limit, server error, or connection failure.
    Transient(String),
    Fatal(String),
}

impl LlmClient for AnthropicClient {
    fn complete(&self, request: &CompletionRequest) -> LlmFuture<'_> {
        let model = request.model.clone();
        let prompt = request.prompt.clone();
        let max_tokens = request.max_tokens;

        Box::pin(async move {
            let api_key = env::var("ANTHROPIC_API_KEY").map_err(|_| {
                Box::<dyn std::error::Error + Send + Sync>::from(
                    "ANTHROPIC_API_KEY environment variable not set",
                )
            })?;

            let mut backoff = BASE_BACKOFF;
            for attempt in 1..=MAX_ATTEMPTS {
                match self.send_once(&api_key, &model, &prompt, max_tokens).await {
                    Attempt::Done(response) => return Ok(response),
                    Attempt::Transient(msg) if attempt < MAX_ATTEMPTS => {
                        log::warn!(
                            "generation request failed ({msg}), retrying in {}ms",
                            backoff.as_millis()
                        );
                        tokio::time::sleep(backoff).await;
                        backoff *= 2;
                    }
                    Attempt::Transient(msg) | Attempt::Fatal(msg) => return Err(msg.into()),
                }
            }
            unreachable!("retry loop always returns")
        })
    }
}

impl AnthropicClient {
    async fn send_once(&self, api_key: &str, model: &str, prompt: &str, max_tokens: u32) -> Attempt {
        let body = AnthropicRequest {
            model,
            max_tokens,
            messages: vec![AnthropicMessage { role: "user", content: prompt }],
        };

        let response = match self
            .client
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return Attempt::Transient(format!("Anthropic API request failed: {e}")),
        };

        let status = response.status();
        let response_text = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                return Attempt::Transient(format!("failed to read Anthropic API response: {e}"))
            }
        };

        if !status.is_success() {
            let msg = serde_json::from_str::<AnthropicError>(&response_text)
                .map(|e| e.error.message)
                .unwrap_or(response_text);
            let msg = format!("Anthropic API error ({}): {msg}", status.as_u16());
            if status.as_u16() == 429 || status.is_server_error() {
                return Attempt::Transient(msg);
            }
            return Attempt::Fatal(msg);
        }

        let api_response: AnthropicResponse = match serde_json::from_str(&response_text) {
            Ok(parsed) => parsed,
            Err(e) => return Attempt::Fatal(format!("failed to parse Anthropic API response: {e}")),
        };

        let text = api_response.content.into_iter().map(|block| block.text).collect::<String>();

        Attempt::Done(CompletionResponse {
            text,
            prompt_tokens: api_response.usage.input_tokens,
            completion_tokens: api_response.usage.output_tokens,
        })
    }
}

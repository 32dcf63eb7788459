/// LLM client: the single point of entry for all generative-AI calls.
///
/// Services depend on `dyn LlmProvider` only. The concrete backend (OpenAI or Gemini)
/// is chosen once at startup from `AI_PROVIDER`.
///
/// Every call is attempted exactly once. Timeouts come from the shared HTTP client and
/// surface as `LlmError::Http`.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;

pub mod gemini;
pub mod openai;
pub mod prompts;
#[cfg(test)]
pub mod scripted;

pub use gemini::GeminiClient;
pub use openai::OpenAiClient;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("No JSON object found in model response")]
    NoJsonObject,
}

/// One prompt/response exchange with a model.
#[derive(Debug, Clone, Copy)]
pub struct CompletionRequest<'a> {
    pub system: &'a str,
    pub prompt: &'a str,
    /// Ask the provider for a JSON-only response where it supports that.
    pub json_output: bool,
    pub temperature: f32,
}

#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Short backend name for logs, e.g. "openai".
    fn name(&self) -> &'static str;

    /// Returns the model's text. A response without text content is an empty string.
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, LlmError>;

    /// Calls the model and parses the first balanced JSON object in its reply.
    /// The model may wrap the object in prose or code fences.
    async fn complete_json(&self, request: CompletionRequest<'_>) -> Result<Value, LlmError> {
        let text = self.complete(request).await?;
        let object = extract_json_object(&text).ok_or(LlmError::NoJsonObject)?;
        Ok(serde_json::from_str(object)?)
    }
}

/// Builds the HTTP client shared by all calls to one provider.
pub(crate) fn http_client(timeout: Duration) -> Result<Client, LlmError> {
    Ok(Client::builder().timeout(timeout).build()?)
}

/// Reads `{"error": {"message": ...}}` from a failed response, falling back to the raw body.
pub(crate) fn api_error_message(body: String) -> String {
    serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or(body)
}

/// Returns the first balanced `{...}` object in `text`.
///
/// Braces inside JSON string literals (including escaped quotes) do not count toward
/// nesting. An opening brace that never closes is skipped in favour of the next one.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let bytes = text.as_bytes();
    let mut search_from = 0;

    while let Some(offset) = text[search_from..].find('{') {
        let start = search_from + offset;
        let mut depth = 0usize;
        let mut in_string = false;
        let mut escaped = false;

        for (i, &b) in bytes.iter().enumerate().skip(start) {
            if in_string {
                match b {
                    _ if escaped => escaped = false,
                    b'\\' => escaped = true,
                    b'"' => in_string = false,
                    _ => {}
                }
                continue;
            }
            match b {
                b'"' => in_string = true,
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(&text[start..=i]);
                    }
                }
                _ => {}
            }
        }

        // Never closed from here; retry from the next opening brace.
        search_from = start + 1;
    }

    None
}

//! Generative Language API client implementation using reqwest.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{CONTENT_TYPE, HeaderValue, RETRY_AFTER};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::GenerationError;
use crate::domain::config::GatewayConfig;
use crate::ports::TextGenerator;

const X_GOOG_API_KEY: &str = "x-goog-api-key";
const DEFAULT_STATUS_MESSAGE: &str = "Generation request failed";

/// HTTP transport for the `generateContent` endpoint.
///
/// This client performs a single request per call. Retry behavior is
/// implemented by [`super::RetryingTextGenerator`].
pub struct HttpGeminiClient {
    api_key: String,
    endpoint: Url,
    client: Client,
}

impl std::fmt::Debug for HttpGeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpGeminiClient")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl HttpGeminiClient {
    pub fn new(api_key: String, config: &GatewayConfig) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                GenerationError::unavailable(format!("Failed to create HTTP client: {}", e), None)
            })?;

        Ok(Self { api_key, endpoint: endpoint_url(config)?, client })
    }

    fn send_request(&self, request: &ApiRequest) -> Result<String, GenerationError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(X_GOOG_API_KEY, &self.api_key)
            .header(CONTENT_TYPE, "application/json")
            .json(request)
            .send()
            .map_err(|e| GenerationError::unavailable(format!("HTTP request failed: {}", e), None))?;

        let status = response.status();
        let retry_after_ms = response.headers().get(RETRY_AFTER).and_then(parse_retry_after_ms);
        let body_text = response.text().unwrap_or_default();

        if status.is_success() {
            let api_response: ApiResponse = serde_json::from_str(&body_text).map_err(|e| {
                GenerationError::unavailable(
                    format!("Failed to parse response: {}", e),
                    Some(status.as_u16()),
                )
            })?;
            return api_response.into_text(status.as_u16());
        }

        let mut message = extract_error_message(&body_text).unwrap_or_else(|| {
            if !body_text.trim().is_empty() {
                body_text.clone()
            } else if status.as_u16() == 429 {
                "Rate limited".to_string()
            } else if status.is_server_error() {
                "Server error".to_string()
            } else {
                DEFAULT_STATUS_MESSAGE.to_string()
            }
        });

        if let Some(value) = retry_after_ms {
            message.push_str(&format!(" (retry_after_ms={})", value));
        }

        Err(GenerationError::unavailable(message, Some(status.as_u16())))
    }
}

impl TextGenerator for HttpGeminiClient {
    fn generate(&self, instruction: &str) -> Result<String, GenerationError> {
        if instruction.trim().is_empty() {
            return Err(GenerationError::EmptyInstruction);
        }

        let request = ApiRequest {
            contents: vec![Content { parts: vec![Part { text: instruction.to_string() }] }],
        };
        self.send_request(&request)
    }
}

/// `{api_url}/models/{model}:generateContent`
fn endpoint_url(config: &GatewayConfig) -> Result<Url, GenerationError> {
    let base = config.api_url.as_str().trim_end_matches('/');
    let raw = format!("{}/models/{}:generateContent", base, config.model.trim());
    Url::parse(&raw).map_err(|e| {
        GenerationError::unavailable(format!("Invalid endpoint '{}': {}", raw, e), None)
    })
}

#[derive(Debug, Serialize)]
struct ApiRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

impl ApiResponse {
    /// Text of the first candidate, parts joined in order.
    fn into_text(self, status: u16) -> Result<String, GenerationError> {
        let block_reason = self.prompt_feedback.and_then(|feedback| feedback.block_reason);
        let Some(candidate) = self.candidates.into_iter().next() else {
            let message = match block_reason {
                Some(reason) => format!("No candidates returned (blocked: {})", reason),
                None => "No candidates returned".to_string(),
            };
            return Err(GenerationError::unavailable(message, Some(status)));
        };

        let text: String = candidate
            .content
            .map(|content| content.parts.into_iter().map(|part| part.text).collect())
            .unwrap_or_default();
        if text.is_empty() {
            return Err(GenerationError::unavailable("Candidate contained no text", Some(status)));
        }
        Ok(text)
    }
}

fn extract_error_message(body: &str) -> Option<String> {
    if body.trim().is_empty() {
        return None;
    }

    let parsed = serde_json::from_str::<serde_json::Value>(body).ok()?;

    if let Some(msg) = parsed
        .get("error")
        .and_then(|error| error.get("message"))
        .and_then(|message| message.as_str())
    {
        return Some(msg.to_string());
    }

    parsed.get("message").and_then(|message| message.as_str()).map(ToOwned::to_owned)
}

fn parse_retry_after_ms(value: &HeaderValue) -> Option<u64> {
    let raw = value.to_str().ok()?.trim();
    let seconds = raw.parse::<u64>().ok()?;
    Some(seconds.saturating_mul(1000))
}

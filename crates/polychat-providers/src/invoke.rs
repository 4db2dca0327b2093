//! Provider invokers — one outbound HTTP POST per dispatch.
//!
//! Each invoker resolves the endpoint from the registry descriptor
//! (substituting `{model}` where the template carries it), attaches the API
//! key on exactly one transport, sends the dialect's request body, and
//! extracts the reply text from the dialect's response envelope. Non-2xx
//! statuses surface as [`DispatchError::Upstream`] with the raw body; a 2xx
//! envelope missing the expected reply path is a
//! [`DispatchError::MalformedResponse`], never an empty string. No retries.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use polychat_core::error::DispatchError;
use polychat_core::types::{ChatTurn, ModelConfig};

use crate::format::{CoherePayload, CohereTurn, Content};
use crate::registry::{AuthMode, Provider};

/// Sampling temperature sent to dialects that take it.
pub const TEMPERATURE: f64 = 0.7;
/// Output token budget sent to dialects that take it.
pub const MAX_OUTPUT_TOKENS: u32 = 2000;
/// Per-call timeout. When it elapses the dispatch fails with `Timeout` and
/// retains no partial state.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

// ─────────────────────────────────────────────
// ProviderClient
// ─────────────────────────────────────────────

/// Shared HTTP client for all providers (connection-pooled, 60 s timeout).
///
/// An endpoint override routes every call to a fixed URL template instead of
/// the registry's — used by tests and local proxies.
#[derive(Clone, Debug)]
pub struct ProviderClient {
    http: reqwest::Client,
    endpoint_override: Option<String>,
}

impl ProviderClient {
    /// Create a client that talks to the registry's real endpoints.
    pub fn new() -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");
        ProviderClient {
            http,
            endpoint_override: None,
        }
    }

    /// Create a client with a fixed endpoint template in place of the
    /// registry's. The template may contain a `{model}` placeholder.
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        let mut client = Self::new();
        client.endpoint_override = Some(endpoint.into());
        client
    }

    /// Resolve the URL for one call, substituting `{model}` when present.
    fn endpoint_for(&self, provider: Provider, model: &str) -> String {
        let template = self
            .endpoint_override
            .as_deref()
            .unwrap_or(provider.descriptor().endpoint);
        template.replace("{model}", model)
    }

    /// Issue the single outbound POST and validate the HTTP status.
    async fn execute<B: Serialize + ?Sized>(
        &self,
        provider: Provider,
        config: &ModelConfig,
        body: &B,
    ) -> Result<reqwest::Response, DispatchError> {
        let descriptor = provider.descriptor();
        let url = self.endpoint_for(provider, &config.model);

        let mut request = self
            .http
            .post(&url)
            .headers(provider.headers(&config.api_key));
        if descriptor.auth == AuthMode::QueryParam {
            request = request.query(&[("key", config.api_key.as_str())]);
        }

        let response = request.json(body).send().await.map_err(|e| {
            error!(provider = descriptor.id, error = %e, "HTTP request failed");
            if e.is_timeout() {
                DispatchError::Timeout
            } else {
                DispatchError::Connection(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            error!(
                provider = descriptor.id,
                status = %status,
                "upstream rejected the request"
            );
            return Err(DispatchError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }
}

impl Default for ProviderClient {
    fn default() -> Self {
        Self::new()
    }
}

// ─────────────────────────────────────────────
// OpenAI-compatible dialect
// ─────────────────────────────────────────────

#[derive(Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    messages: &'a [ChatTurn],
    temperature: f64,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct OpenAiResponse {
    #[serde(default)]
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

#[derive(Deserialize)]
struct OpenAiMessage {
    content: Option<String>,
}

/// Call an OpenAI-compatible `/chat/completions` endpoint
/// (OpenAI, Mistral, Groq, OpenRouter).
pub async fn openai_chat(
    client: &ProviderClient,
    provider: Provider,
    config: &ModelConfig,
    messages: &[ChatTurn],
) -> Result<String, DispatchError> {
    debug!(
        provider = provider.descriptor().id,
        model = %config.model,
        messages = messages.len(),
        "calling chat completions"
    );

    let body = OpenAiRequest {
        model: &config.model,
        messages,
        temperature: TEMPERATURE,
        max_tokens: MAX_OUTPUT_TOKENS,
    };

    let response = client.execute(provider, config, &body).await?;
    let envelope: OpenAiResponse = response
        .json()
        .await
        .map_err(|e| DispatchError::malformed(provider.id(), e.to_string()))?;

    envelope
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| {
            DispatchError::malformed(provider.id(), "missing `choices[0].message.content`")
        })
}

// ─────────────────────────────────────────────
// Anthropic dialect
// ─────────────────────────────────────────────

#[derive(Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    messages: &'a [ChatTurn],
    max_tokens: u32,
    temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    #[serde(default)]
    content: Vec<AnthropicBlock>,
}

#[derive(Deserialize)]
struct AnthropicBlock {
    text: Option<String>,
}

/// Call the Anthropic messages endpoint. The `system` string rides a
/// dedicated top-level field and is omitted entirely when empty.
pub async fn anthropic_chat(
    client: &ProviderClient,
    config: &ModelConfig,
    messages: &[ChatTurn],
    system: &str,
) -> Result<String, DispatchError> {
    let provider = Provider::Anthropic;
    debug!(
        provider = provider.descriptor().id,
        model = %config.model,
        messages = messages.len(),
        has_system = !system.is_empty(),
        "calling messages endpoint"
    );

    let body = AnthropicRequest {
        model: &config.model,
        messages,
        max_tokens: MAX_OUTPUT_TOKENS,
        temperature: TEMPERATURE,
        system: (!system.is_empty()).then_some(system),
    };

    let response = client.execute(provider, config, &body).await?;
    let envelope: AnthropicResponse = response
        .json()
        .await
        .map_err(|e| DispatchError::malformed(provider.id(), e.to_string()))?;

    envelope
        .content
        .into_iter()
        .next()
        .and_then(|block| block.text)
        .ok_or_else(|| DispatchError::malformed(provider.id(), "missing `content[0].text`"))
}

// ─────────────────────────────────────────────
// Gemini dialect
// ─────────────────────────────────────────────

#[derive(Serialize)]
struct GeminiRequest<'a> {
    contents: &'a [Content],
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    #[serde(default)]
    content: GeminiCandidateContent,
}

#[derive(Default, Deserialize)]
struct GeminiCandidateContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Deserialize)]
struct GeminiPart {
    text: Option<String>,
}

/// Call the Gemini generateContent endpoint. The model id is part of the
/// URL, and the API key travels as a `?key=` query parameter.
pub async fn gemini_chat(
    client: &ProviderClient,
    config: &ModelConfig,
    contents: &[Content],
) -> Result<String, DispatchError> {
    let provider = Provider::Google;
    debug!(
        provider = provider.descriptor().id,
        model = %config.model,
        contents = contents.len(),
        "calling generateContent"
    );

    let body = GeminiRequest { contents };

    let response = client.execute(provider, config, &body).await?;
    let envelope: GeminiResponse = response
        .json()
        .await
        .map_err(|e| DispatchError::malformed(provider.id(), e.to_string()))?;

    envelope
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content.parts.into_iter().next())
        .and_then(|part| part.text)
        .ok_or_else(|| {
            DispatchError::malformed(provider.id(), "missing `candidates[0].content.parts[0].text`")
        })
}

// ─────────────────────────────────────────────
// Cohere dialect
// ─────────────────────────────────────────────

#[derive(Serialize)]
struct CohereRequest<'a> {
    model: &'a str,
    message: &'a str,
    chat_history: &'a [CohereTurn],
}

#[derive(Deserialize)]
struct CohereResponse {
    text: Option<String>,
}

/// Call the Cohere chat endpoint. The reply lives at the top-level `text`.
pub async fn cohere_chat(
    client: &ProviderClient,
    config: &ModelConfig,
    payload: &CoherePayload,
) -> Result<String, DispatchError> {
    let provider = Provider::Cohere;
    debug!(
        provider = provider.descriptor().id,
        model = %config.model,
        history = payload.chat_history.len(),
        "calling chat endpoint"
    );

    let body = CohereRequest {
        model: &config.model,
        message: &payload.message,
        chat_history: &payload.chat_history,
    };

    let response = client.execute(provider, config, &body).await?;
    let envelope: CohereResponse = response
        .json()
        .await
        .map_err(|e| DispatchError::malformed(provider.id(), e.to_string()))?;

    envelope
        .text
        .ok_or_else(|| DispatchError::malformed(provider.id(), "missing `text`"))
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

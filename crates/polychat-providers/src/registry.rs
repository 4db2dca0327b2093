//! Provider registry — static descriptors for all 7 supported providers.
//!
//! Each [`ProviderDescriptor`] describes how to reach one provider: endpoint
//! URL template, how the API key travels, which wire dialect it speaks, and
//! the model catalog. The registry is constant for the process lifetime;
//! there is no runtime registration.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use serde::Serialize;
use tracing::warn;

// ─────────────────────────────────────────────
// Provider — the closed set of supported backends
// ─────────────────────────────────────────────

/// A supported provider. Adding a backend means adding a variant here and
/// letting the compiler point at every match that needs a new arm.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Provider {
    OpenAi,
    Anthropic,
    Google,
    Mistral,
    Cohere,
    Groq,
    OpenRouter,
}

impl Provider {
    /// All providers, in catalog order.
    pub const ALL: [Provider; 7] = [
        Provider::OpenAi,
        Provider::Anthropic,
        Provider::Google,
        Provider::Mistral,
        Provider::Cohere,
        Provider::Groq,
        Provider::OpenRouter,
    ];

    /// Resolve a provider from its id. Exact match on the lowercase id —
    /// callers normalize casing before lookup.
    pub fn from_id(id: &str) -> Option<Provider> {
        Provider::ALL.iter().copied().find(|p| p.id() == id)
    }

    /// Canonical lowercase id (e.g. `"openrouter"`).
    pub fn id(&self) -> &'static str {
        self.descriptor().id
    }

    /// The static descriptor for this provider.
    pub fn descriptor(&self) -> &'static ProviderDescriptor {
        match self {
            Provider::OpenAi => &OPENAI,
            Provider::Anthropic => &ANTHROPIC,
            Provider::Google => &GOOGLE,
            Provider::Mistral => &MISTRAL,
            Provider::Cohere => &COHERE,
            Provider::Groq => &GROQ,
            Provider::OpenRouter => &OPENROUTER,
        }
    }

    /// Request headers for this provider, given the caller's API key.
    ///
    /// A pure mapping from credential to headers — no stored closures, so the
    /// registry stays plain data. When `AuthMode::QueryParam` the key is NOT
    /// placed in any header; it rides the URL instead, never both.
    pub fn headers(&self, api_key: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();

        match self {
            Provider::OpenAi | Provider::Mistral | Provider::Groq | Provider::Cohere => {
                insert_bearer(&mut headers, api_key, self.descriptor().id);
            }
            Provider::OpenRouter => {
                insert_bearer(&mut headers, api_key, self.descriptor().id);
                headers.insert(
                    HeaderName::from_static("http-referer"),
                    HeaderValue::from_static("http://localhost:5173"),
                );
            }
            Provider::Anthropic => {
                match HeaderValue::from_str(api_key) {
                    Ok(mut value) => {
                        value.set_sensitive(true);
                        headers.insert(HeaderName::from_static("x-api-key"), value);
                    }
                    Err(_) => warn!(
                        provider = self.descriptor().id,
                        "api key contains characters not valid in a header value"
                    ),
                }
                headers.insert(
                    HeaderName::from_static("anthropic-version"),
                    HeaderValue::from_static("2023-06-01"),
                );
            }
            // Key travels as a URL query parameter; no auth header at all.
            Provider::Google => {}
        }

        headers
    }
}

/// Insert `Authorization: Bearer <key>`, marked sensitive so it is redacted
/// from debug output.
fn insert_bearer(headers: &mut HeaderMap, api_key: &str, provider_id: &'static str) {
    match HeaderValue::from_str(&format!("Bearer {api_key}")) {
        Ok(mut value) => {
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }
        Err(_) => warn!(
            provider = provider_id,
            "api key contains characters not valid in a header value"
        ),
    }
}

// ─────────────────────────────────────────────
// Descriptor types
// ─────────────────────────────────────────────

/// How the API key reaches the provider: exactly one transport per provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthMode {
    /// Key travels in a request header.
    Header,
    /// Key travels as a `?key=` URL query parameter.
    QueryParam,
}

/// Which request/response JSON shape the provider speaks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dialect {
    /// Flat `messages` array, reply at `choices[0].message.content`.
    OpenAi,
    /// `messages` plus a separate top-level `system` string, reply at
    /// `content[0].text`.
    Anthropic,
    /// Nested `contents[].parts[].text`, reply at
    /// `candidates[0].content.parts[0].text`.
    Gemini,
    /// `message` + `chat_history`, reply at the top-level `text`.
    Cohere,
}

/// Static metadata for one provider. One instance per supported provider,
/// constant for the process lifetime.
#[derive(Clone, Debug)]
pub struct ProviderDescriptor {
    /// Canonical lowercase id (e.g. `"openai"`).
    pub id: &'static str,
    /// Human-readable name for catalogs and logs.
    pub display_name: &'static str,
    /// Endpoint URL; may contain a `{model}` placeholder.
    pub endpoint: &'static str,
    /// How the API key travels.
    pub auth: AuthMode,
    /// Which wire dialect this provider speaks.
    pub dialect: Dialect,
    /// Known models for the catalog endpoints.
    pub models: &'static [ModelInfo],
}

/// One entry in a provider's model catalog.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub struct ModelInfo {
    pub id: &'static str,
    pub name: &'static str,
}

/// Find a descriptor by exact id match.
pub fn lookup(id: &str) -> Option<&'static ProviderDescriptor> {
    Provider::from_id(id).map(|p| p.descriptor())
}

// ─────────────────────────────────────────────
// The catalog
// ─────────────────────────────────────────────

static OPENAI: ProviderDescriptor = ProviderDescriptor {
    id: "openai",
    display_name: "OpenAI",
    endpoint: "https://api.openai.com/v1/chat/completions",
    auth: AuthMode::Header,
    dialect: Dialect::OpenAi,
    models: &[
        ModelInfo { id: "gpt-4o", name: "GPT-4o" },
        ModelInfo { id: "gpt-4o-mini", name: "GPT-4o Mini" },
        ModelInfo { id: "gpt-4-turbo", name: "GPT-4 Turbo" },
        ModelInfo { id: "gpt-4", name: "GPT-4" },
        ModelInfo { id: "gpt-3.5-turbo", name: "GPT-3.5 Turbo" },
    ],
};

static ANTHROPIC: ProviderDescriptor = ProviderDescriptor {
    id: "anthropic",
    display_name: "Anthropic (Claude)",
    endpoint: "https://api.anthropic.com/v1/messages",
    auth: AuthMode::Header,
    dialect: Dialect::Anthropic,
    models: &[
        ModelInfo { id: "claude-3-5-sonnet-20241022", name: "Claude 3.5 Sonnet" },
        ModelInfo { id: "claude-3-opus-20240229", name: "Claude 3 Opus" },
        ModelInfo { id: "claude-3-sonnet-20240229", name: "Claude 3 Sonnet" },
        ModelInfo { id: "claude-3-haiku-20240307", name: "Claude 3 Haiku" },
    ],
};

static GOOGLE: ProviderDescriptor = ProviderDescriptor {
    id: "google",
    display_name: "Google (Gemini)",
    endpoint: "https://generativelanguage.googleapis.com/v1beta/models/{model}:generateContent",
    auth: AuthMode::QueryParam,
    dialect: Dialect::Gemini,
    models: &[
        ModelInfo { id: "gemini-2.0-flash-exp", name: "Gemini 2.0 Flash" },
        ModelInfo { id: "gemini-1.5-pro", name: "Gemini 1.5 Pro" },
        ModelInfo { id: "gemini-1.5-flash", name: "Gemini 1.5 Flash" },
        ModelInfo { id: "gemini-pro", name: "Gemini Pro" },
    ],
};

static MISTRAL: ProviderDescriptor = ProviderDescriptor {
    id: "mistral",
    display_name: "Mistral AI",
    endpoint: "https://api.mistral.ai/v1/chat/completions",
    auth: AuthMode::Header,
    dialect: Dialect::OpenAi,
    models: &[
        ModelInfo { id: "mistral-large-latest", name: "Mistral Large" },
        ModelInfo { id: "mistral-medium-latest", name: "Mistral Medium" },
        ModelInfo { id: "mistral-small-latest", name: "Mistral Small" },
        ModelInfo { id: "open-mistral-7b", name: "Mistral 7B" },
        ModelInfo { id: "open-mixtral-8x7b", name: "Mixtral 8x7B" },
    ],
};

static COHERE: ProviderDescriptor = ProviderDescriptor {
    id: "cohere",
    display_name: "Cohere",
    endpoint: "https://api.cohere.ai/v1/chat",
    auth: AuthMode::Header,
    dialect: Dialect::Cohere,
    models: &[
        ModelInfo { id: "command-r-plus", name: "Command R+" },
        ModelInfo { id: "command-r", name: "Command R" },
        ModelInfo { id: "command", name: "Command" },
        ModelInfo { id: "command-light", name: "Command Light" },
    ],
};

static GROQ: ProviderDescriptor = ProviderDescriptor {
    id: "groq",
    display_name: "Groq",
    endpoint: "https://api.groq.com/openai/v1/chat/completions",
    auth: AuthMode::Header,
    dialect: Dialect::OpenAi,
    models: &[
        ModelInfo { id: "llama-3.3-70b-versatile", name: "Llama 3.3 70B" },
        ModelInfo { id: "llama-3.1-70b-versatile", name: "Llama 3.1 70B" },
        ModelInfo { id: "llama-3.1-8b-instant", name: "Llama 3.1 8B" },
        ModelInfo { id: "mixtral-8x7b-32768", name: "Mixtral 8x7B" },
        ModelInfo { id: "gemma2-9b-it", name: "Gemma 2 9B" },
    ],
};

static OPENROUTER: ProviderDescriptor = ProviderDescriptor {
    id: "openrouter",
    display_name: "OpenRouter",
    endpoint: "https://openrouter.ai/api/v1/chat/completions",
    auth: AuthMode::Header,
    dialect: Dialect::OpenAi,
    models: &[
        ModelInfo { id: "anthropic/claude-3.5-sonnet", name: "Claude 3.5 Sonnet" },
        ModelInfo { id: "openai/gpt-4-turbo", name: "GPT-4 Turbo" },
        ModelInfo { id: "google/gemini-pro-1.5", name: "Gemini Pro 1.5" },
        ModelInfo { id: "meta-llama/llama-3.1-70b-instruct", name: "Llama 3.1 70B" },
        ModelInfo { id: "mistralai/mistral-large", name: "Mistral Large" },
    ],
};

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

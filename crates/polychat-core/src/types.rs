//! Normalized chat types — the single message shape every provider dialect
//! is translated from and back into.
//!
//! A conversation is an ordered `Vec<ChatTurn>` produced by the caller plus
//! one new message. The adapter layer never mutates history; it only reads
//! it to build a provider-specific wire payload.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────
// Roles and turns
// ─────────────────────────────────────────────

/// Who spoke a turn.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One message in a conversation, tagged with a role.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    /// Create a system turn.
    pub fn system(content: impl Into<String>) -> Self {
        ChatTurn {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Create a user turn.
    pub fn user(content: impl Into<String>) -> Self {
        ChatTurn {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create an assistant turn.
    pub fn assistant(content: impl Into<String>) -> Self {
        ChatTurn {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

// ─────────────────────────────────────────────
// Model selection
// ─────────────────────────────────────────────

/// Which provider, model, and credential to use for one dispatch.
///
/// The `api_key` is an opaque secret: it is forwarded verbatim to exactly one
/// outbound call and is never logged, cached, or echoed in responses.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ModelConfig {
    pub provider: String,
    pub model: String,
    pub api_key: String,
}

// ─────────────────────────────────────────────
// Request / reply
// ─────────────────────────────────────────────

/// Inbound chat request: a new message, the target model, and prior history.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ChatRequest {
    pub message: String,
    pub config: ModelConfig,
    #[serde(default)]
    pub history: Vec<ChatTurn>,
}

/// The sole externally observable result of a successful dispatch.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ChatReply {
    pub response: String,
    pub model: String,
    pub provider: String,
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

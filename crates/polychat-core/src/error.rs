//! Failure taxonomy for a chat dispatch.
//!
//! Formatters are total and never fail; every failure originates either in
//! the dispatcher's provider lookup or in the single outbound HTTP call.
//! The gateway renders each variant as a `(status, message)` pair.

use thiserror::Error;

/// Everything that can go wrong between accepting a normalized request and
/// returning a normalized reply.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Requested provider id matches no registry entry. Raised before any
    /// network activity.
    #[error("unsupported provider: {provider}")]
    UnsupportedProvider { provider: String },

    /// Upstream returned a non-2xx status. Carries the original status code
    /// and raw body so the caller can diagnose the upstream failure.
    #[error("upstream returned {status}: {body}")]
    Upstream { status: u16, body: String },

    /// Upstream returned 2xx but the expected reply-text path was absent.
    /// The contract with the provider was violated, so this is distinct
    /// from an application-level rejection.
    #[error("{provider} returned an unexpected response shape: {detail}")]
    MalformedResponse {
        provider: &'static str,
        detail: String,
    },

    /// Upstream did not respond within the per-call budget.
    #[error("upstream request timed out")]
    Timeout,

    /// Connection-level failure before any HTTP status was received.
    #[error("failed to reach upstream: {0}")]
    Connection(String),
}

impl DispatchError {
    /// Shorthand for a malformed-envelope failure.
    pub fn malformed(provider: &'static str, detail: impl Into<String>) -> Self {
        DispatchError::MalformedResponse {
            provider,
            detail: detail.into(),
        }
    }

    /// The HTTP status this failure maps to at the service boundary.
    ///
    /// Upstream rejections pass their status through; bad provider ids are a
    /// client error; everything else is an internal error.
    pub fn status_code(&self) -> u16 {
        match self {
            DispatchError::UnsupportedProvider { .. } => 400,
            DispatchError::Upstream { status, .. } => *status,
            DispatchError::MalformedResponse { .. }
            | DispatchError::Timeout
            | DispatchError::Connection(_) => 500,
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

//! Dispatcher — routes one normalized request to the right adapter pair.
//!
//! The provider id is normalized (trimmed, lowercased) exactly once, here at
//! the entry boundary; formatters and invokers never see unnormalized ids.
//! An unknown id fails before any network activity. Each dispatch is
//! stateless and independent — concurrent dispatches share nothing but the
//! client's connection pool.

use tracing::debug;

use polychat_core::error::DispatchError;
use polychat_core::types::{ChatReply, ChatTurn, ModelConfig};

use crate::format;
use crate::invoke::{self, ProviderClient};
use crate::registry::{Dialect, Provider};

/// Entry point for the adapter layer: selects the formatter+invoker pair for
/// a provider and runs the single round trip.
#[derive(Clone, Debug, Default)]
pub struct Dispatcher {
    client: ProviderClient,
}

impl Dispatcher {
    /// Dispatcher against the registry's real endpoints.
    pub fn new() -> Self {
        Dispatcher {
            client: ProviderClient::new(),
        }
    }

    /// Dispatcher with a fixed endpoint template (tests, local proxies).
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Dispatcher {
            client: ProviderClient::with_endpoint(endpoint),
        }
    }

    /// Route one chat request and return the normalized reply.
    ///
    /// Fails with [`DispatchError::UnsupportedProvider`] before any outbound
    /// call when the id matches no registry entry; otherwise the invoker's
    /// typed failure propagates unchanged.
    pub async fn dispatch(
        &self,
        config: &ModelConfig,
        history: &[ChatTurn],
        message: &str,
    ) -> Result<ChatReply, DispatchError> {
        let id = config.provider.trim().to_lowercase();
        let provider =
            Provider::from_id(&id).ok_or_else(|| DispatchError::UnsupportedProvider {
                provider: config.provider.clone(),
            })?;

        debug!(
            provider = provider.descriptor().id,
            model = %config.model,
            turns = history.len(),
            "dispatching chat request"
        );

        let response = match provider.descriptor().dialect {
            Dialect::OpenAi => {
                let messages = format::flat_turns(history, message);
                invoke::openai_chat(&self.client, provider, config, &messages).await?
            }
            Dialect::Anthropic => {
                let (messages, system) = format::split_system(history, message);
                invoke::anthropic_chat(&self.client, config, &messages, &system).await?
            }
            Dialect::Gemini => {
                let contents = format::gemini_contents(history, message);
                invoke::gemini_chat(&self.client, config, &contents).await?
            }
            Dialect::Cohere => {
                let payload = format::cohere_payload(history, message);
                invoke::cohere_chat(&self.client, config, &payload).await?
            }
        };

        Ok(ChatReply {
            response,
            model: config.model.clone(),
            provider: id,
        })
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{any, body_partial_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(provider: &str, model: &str) -> ModelConfig {
        ModelConfig {
            provider: provider.to_string(),
            model: model.to_string(),
            api_key: "test-key".to_string(),
        }
    }

    fn openai_reply(text: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": text}}]
        }))
    }

    #[tokio::test]
    async fn test_dispatch_openai_empty_history() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(body_partial_json(json!({
                "messages": [{"role": "user", "content": "hello"}]
            })))
            .respond_with(openai_reply("Hi!"))
            .mount(&mock_server)
            .await;

        let dispatcher = Dispatcher::with_endpoint(mock_server.uri());
        let config = config_for("openai", "gpt-4o");

        let reply = dispatcher.dispatch(&config, &[], "hello").await.unwrap();
        assert_eq!(reply.response, "Hi!");
        assert_eq!(reply.model, "gpt-4o");
        assert_eq!(reply.provider, "openai");
    }

    #[tokio::test]
    async fn test_dispatch_is_case_insensitive() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(openai_reply("ok"))
            .expect(3)
            .mount(&mock_server)
            .await;

        let dispatcher = Dispatcher::with_endpoint(mock_server.uri());

        for spelling in ["openai", "OpenAI", "OPENAI"] {
            let config = config_for(spelling, "gpt-4o");
            let reply = dispatcher.dispatch(&config, &[], "hello").await.unwrap();
            // The reply echoes the normalized id, whatever the request casing.
            assert_eq!(reply.provider, "openai");
        }
    }

    #[tokio::test]
    async fn test_dispatch_anthropic_splits_system() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(body_partial_json(json!({
                "system": "Be terse",
                "messages": [
                    {"role": "user", "content": "hi"},
                    {"role": "user", "content": "again"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "content": [{"type": "text", "text": "done"}]
            })))
            .mount(&mock_server)
            .await;

        let dispatcher = Dispatcher::with_endpoint(mock_server.uri());
        let config = config_for("anthropic", "claude-3-haiku-20240307");
        let history = vec![ChatTurn::system("Be terse"), ChatTurn::user("hi")];

        let reply = dispatcher.dispatch(&config, &history, "again").await.unwrap();
        assert_eq!(reply.response, "done");
    }

    #[tokio::test]
    async fn test_dispatch_upstream_error_no_retry() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let dispatcher = Dispatcher::with_endpoint(mock_server.uri());
        let config = config_for("openai", "gpt-4o");

        let err = dispatcher.dispatch(&config, &[], "hello").await.unwrap_err();
        match err {
            DispatchError::Upstream { status, body } => {
                assert_eq!(status, 401);
                assert_eq!(body, "unauthorized");
            }
            other => panic!("expected Upstream, got {other:?}"),
        }
        // expect(1) verifies on drop that exactly one call went out.
    }

    #[tokio::test]
    async fn test_dispatch_unknown_provider_makes_no_calls() {
        let mock_server = MockServer::start().await;

        Mock::given(any())
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let dispatcher = Dispatcher::with_endpoint(mock_server.uri());
        let config = config_for("nonexistent", "some-model");

        let err = dispatcher.dispatch(&config, &[], "hello").await.unwrap_err();
        match err {
            DispatchError::UnsupportedProvider { provider } => {
                assert_eq!(provider, "nonexistent");
            }
            other => panic!("expected UnsupportedProvider, got {other:?}"),
        }
        // expect(0) verifies on drop that no request reached the server.
    }

    #[tokio::test]
    async fn test_dispatch_trims_provider_id() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(openai_reply("ok"))
            .mount(&mock_server)
            .await;

        let dispatcher = Dispatcher::with_endpoint(mock_server.uri());
        let config = config_for("  groq ", "llama-3.1-8b-instant");

        let reply = dispatcher.dispatch(&config, &[], "hello").await.unwrap();
        assert_eq!(reply.provider, "groq");
    }
}

//! Chat relay — single-call client for the conversational service.
//!
//! One attempt per message, no retry: on failure the pipeline replies
//! with an apology and the user resends to try again.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::error::{ConfigError, RelayError};

/// Conversational-response service: text in, text out, may fail.
#[async_trait]
pub trait ChatRelay: Send + Sync {
    /// Generate a reply for the query.
    ///
    /// Fails with [`RelayError::EmptyQuery`] for whitespace-only input
    /// (callers are expected to pre-check) and with
    /// [`RelayError::Upstream`] when the call fails or the service
    /// returns an empty reply.
    async fn respond(&self, query: &str) -> Result<String, RelayError>;
}

/// Connection settings for the HTTP relay.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Endpoint the query is POSTed to.
    pub endpoint: String,
    /// Optional bearer token.
    pub token: Option<SecretString>,
}

impl RelayConfig {
    /// Build from `WARDEN_RELAY_URL` / `WARDEN_RELAY_TOKEN`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let endpoint = std::env::var("WARDEN_RELAY_URL")
            .map_err(|_| ConfigError::MissingEnvVar("WARDEN_RELAY_URL".to_string()))?;
        let token = std::env::var("WARDEN_RELAY_TOKEN")
            .ok()
            .map(SecretString::from);
        Ok(Self { endpoint, token })
    }
}

/// Wire format of a relay response body.
#[derive(Debug, Deserialize)]
struct RelayReply {
    reply: String,
}

/// HTTP implementation of [`ChatRelay`].
pub struct HttpRelay {
    config: RelayConfig,
    client: reqwest::Client,
}

impl HttpRelay {
    pub fn new(config: RelayConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl ChatRelay for HttpRelay {
    async fn respond(&self, query: &str) -> Result<String, RelayError> {
        if query.trim().is_empty() {
            return Err(RelayError::EmptyQuery);
        }

        let body = serde_json::json!({ "input": query });
        let mut request = self.client.post(&self.config.endpoint).json(&body);
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await.map_err(|e| RelayError::Upstream {
            reason: format!("request failed: {e}"),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RelayError::Upstream {
                reason: format!("status {status}"),
            });
        }

        let parsed: RelayReply = response.json().await.map_err(|e| RelayError::Upstream {
            reason: format!("invalid response body: {e}"),
        })?;

        let reply = parsed.reply.trim();
        if reply.is_empty() {
            return Err(RelayError::Upstream {
                reason: "empty reply from service".to_string(),
            });
        }
        Ok(reply.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_query_is_rejected_before_any_io() {
        // The endpoint is unroutable; an empty query must fail fast
        // without touching it.
        let relay = HttpRelay::new(RelayConfig {
            endpoint: "http://192.0.2.1/relay".to_string(),
            token: None,
        });
        assert!(matches!(
            relay.respond("   \n\t ").await,
            Err(RelayError::EmptyQuery)
        ));
    }

    #[test]
    fn reply_body_parses() {
        let parsed: RelayReply = serde_json::from_str(r#"{"reply": "hello"}"#).unwrap();
        assert_eq!(parsed.reply, "hello");
    }
}

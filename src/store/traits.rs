//! Unified `Store` trait — async persistence interface for community
//! configs and banned words.

use async_trait::async_trait;

use crate::error::StoreError;

/// Per-community configuration row.
///
/// Created lazily by the first mutating command for a community; never
/// deleted by this subsystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommunityConfig {
    /// Stable external community ID.
    pub community_id: String,
    /// Channel the bot converses in. Absent until `setchannel`/`setup`.
    pub response_channel: Option<String>,
    /// Channels exempt from the link-spam ban policy. Set semantics.
    pub exception_channels: Vec<String>,
}

impl CommunityConfig {
    /// Whether a channel is in the link-exception set.
    pub fn is_exception(&self, channel: &str) -> bool {
        self.exception_channels.iter().any(|c| c == channel)
    }
}

/// Backend-agnostic persistence trait.
#[async_trait]
pub trait Store: Send + Sync {
    // ── Community configs ───────────────────────────────────────────

    /// Look up a community's config.
    async fn find_community(&self, community_id: &str)
        -> Result<Option<CommunityConfig>, StoreError>;

    /// Bind the response channel, creating the config row if needed.
    async fn bind_response_channel(
        &self,
        community_id: &str,
        channel_id: &str,
    ) -> Result<(), StoreError>;

    /// Add a channel to the exception set, creating the config row if
    /// needed. Adding an already-present channel is a no-op.
    async fn add_exception_channel(
        &self,
        community_id: &str,
        channel_id: &str,
    ) -> Result<(), StoreError>;

    /// All known community configs.
    async fn list_communities(&self) -> Result<Vec<CommunityConfig>, StoreError>;

    // ── Banned words ────────────────────────────────────────────────

    /// All persisted custom banned words.
    async fn list_words(&self) -> Result<Vec<String>, StoreError>;

    /// Persist one banned word. Idempotent.
    async fn add_word(&self, word: &str) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exception_lookup() {
        let config = CommunityConfig {
            community_id: "g1".to_string(),
            response_channel: None,
            exception_channels: vec!["c1".to_string(), "c2".to_string()],
        };
        assert!(config.is_exception("c1"));
        assert!(!config.is_exception("c3"));
    }
}

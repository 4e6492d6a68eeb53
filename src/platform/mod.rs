//! Chat-platform abstraction — pure I/O, no pipeline logic.
//!
//! The pipeline talks to the platform only through this trait. A real
//! gateway wraps the platform's API; the console gateway in
//! [`console`] drives the binary locally.

pub mod console;

use std::pin::Pin;
use std::time::Duration;

use async_trait::async_trait;
use futures::Stream;

use crate::error::PlatformError;
use crate::pipeline::types::InboundMessage;

/// Stream of inbound message events from a gateway.
pub type MessageStream = Pin<Box<dyn Stream<Item = InboundMessage> + Send>>;

/// Moderation and messaging primitives the pipeline invokes.
///
/// Every call is a single request/response against the platform; the
/// pipeline decides what failures mean.
#[async_trait]
pub trait ChatPlatform: Send + Sync {
    /// Delete the given message.
    async fn delete_message(&self, message: &InboundMessage) -> Result<(), PlatformError>;

    /// Apply a timeout penalty to the message's author.
    async fn timeout_author(
        &self,
        message: &InboundMessage,
        duration: Duration,
        reason: &str,
    ) -> Result<(), PlatformError>;

    /// Ban the message's author from its community.
    async fn ban_author(&self, message: &InboundMessage, reason: &str) -> Result<(), PlatformError>;

    /// Send text to a channel.
    async fn send_text(&self, channel: &str, text: &str) -> Result<(), PlatformError>;

    /// Create a text channel in a community. Returns the new channel ID.
    async fn create_channel(&self, community: &str, name: &str) -> Result<String, PlatformError>;

    /// Whether the actor has the administrator capability in the community.
    async fn has_administrator(&self, community: &str, actor: &str) -> Result<bool, PlatformError>;

    /// Whether a channel reference resolves to a real channel in the community.
    async fn channel_exists(&self, community: &str, channel: &str) -> Result<bool, PlatformError>;
}

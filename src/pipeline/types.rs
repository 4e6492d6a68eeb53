//! Shared types for the message pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Inbound message ─────────────────────────────────────────────────

/// One inbound message event, normalized from the platform's native
/// form by the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundMessage {
    /// Platform-native message ID.
    pub id: String,
    /// Community (guild/server) the message was posted in. `None` for
    /// direct messages.
    pub community: Option<String>,
    /// Channel the message was posted in (or the DM channel).
    pub channel: String,
    /// Author identity (stable platform ID).
    pub author: String,
    /// Human-readable author name, if the platform provides one.
    pub author_name: Option<String>,
    /// Message text.
    pub content: String,
    /// Whether the author is a bot account. Bot messages are ignored
    /// before any processing.
    pub from_bot: bool,
    /// When the message was received.
    pub received_at: DateTime<Utc>,
}

impl InboundMessage {
    /// A direct message (no community context).
    pub fn direct(id: &str, author: &str, content: &str) -> Self {
        Self {
            id: id.to_string(),
            community: None,
            channel: format!("dm-{author}"),
            author: author.to_string(),
            author_name: None,
            content: content.to_string(),
            from_bot: false,
            received_at: Utc::now(),
        }
    }

    /// A message posted in a community channel.
    pub fn in_community(id: &str, community: &str, channel: &str, author: &str, content: &str) -> Self {
        Self {
            id: id.to_string(),
            community: Some(community.to_string()),
            channel: channel.to_string(),
            author: author.to_string(),
            author_name: None,
            content: content.to_string(),
            from_bot: false,
            received_at: Utc::now(),
        }
    }

    /// Name to address the author by in notices.
    pub fn author_display(&self) -> &str {
        self.author_name.as_deref().unwrap_or(&self.author)
    }
}

// ── Disposition ─────────────────────────────────────────────────────

/// Which arm of the pipeline handled a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    /// Bot-authored or whitespace-only input. No reply, no log noise.
    Ignored,
    /// Silenced by channel eligibility, or prefixed text with no
    /// recognized command name.
    Dropped,
    /// Profanity gate fired: message deleted, author timed out.
    TimedOut,
    /// Link gate fired: message deleted, author banned.
    Banned,
    /// A recognized command ran (including its user-facing failures).
    Command { name: &'static str },
    /// The relay answered and the reply was sent.
    Relayed,
    /// The relay failed; the apology reply was sent instead.
    RelayFailed,
}

impl Disposition {
    /// Short label for logging.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ignored => "ignored",
            Self::Dropped => "dropped",
            Self::TimedOut => "timed_out",
            Self::Banned => "banned",
            Self::Command { .. } => "command",
            Self::Relayed => "relayed",
            Self::RelayFailed => "relay_failed",
        }
    }
}

// ── Processed message ───────────────────────────────────────────────

/// Result of processing one message through the pipeline.
#[derive(Debug, Clone)]
pub struct ProcessedMessage {
    /// The original inbound message.
    pub message: InboundMessage,
    /// Which arm fired.
    pub disposition: Disposition,
    /// When processing completed.
    pub processed_at: DateTime<Utc>,
}

// ── Announcement outcome ────────────────────────────────────────────

/// Per-target outcome of a global announcement fan-out.
///
/// Individual delivery failures are collected here instead of being
/// swallowed; one failed community never stops the loop.
#[derive(Debug, Clone, Default)]
pub struct AnnounceOutcome {
    /// Communities the announcement reached.
    pub delivered: usize,
    /// Communities skipped for having no bound channel.
    pub skipped: usize,
    /// Failed deliveries: (community ID, reason).
    pub failed: Vec<(String, String)>,
}

impl AnnounceOutcome {
    /// One-line summary for the confirmation reply.
    pub fn summary(&self) -> String {
        if self.failed.is_empty() {
            format!("Announcement sent to {} communities.", self.delivered)
        } else {
            format!(
                "Announcement sent to {} communities ({} failed).",
                self.delivered,
                self.failed.len()
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direct_message_has_no_community() {
        let msg = InboundMessage::direct("m1", "alice", "hello");
        assert_eq!(msg.community, None);
        assert!(!msg.from_bot);
    }

    #[test]
    fn author_display_prefers_name() {
        let mut msg = InboundMessage::in_community("m1", "g1", "c1", "123", "hi");
        assert_eq!(msg.author_display(), "123");
        msg.author_name = Some("Alice".to_string());
        assert_eq!(msg.author_display(), "Alice");
    }

    #[test]
    fn disposition_labels() {
        assert_eq!(Disposition::TimedOut.label(), "timed_out");
        assert_eq!(Disposition::Command { name: "help" }.label(), "command");
    }

    #[test]
    fn announce_summary_mentions_failures() {
        let mut outcome = AnnounceOutcome {
            delivered: 3,
            skipped: 1,
            failed: vec![],
        };
        assert_eq!(outcome.summary(), "Announcement sent to 3 communities.");
        outcome.failed.push(("g9".to_string(), "send failed".to_string()));
        assert!(outcome.summary().contains("1 failed"));
    }
}

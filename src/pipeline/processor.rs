//! Message pipeline — moderation gates, command dispatch, relay fallthrough.
//!
//! **Core invariant: gates run in a fixed order and short-circuit.**
//! A message that is both profane and carries a banned link only ever
//! hits the timeout path. Moderation side effects that fail are logged
//! and the remaining actions for that message are still attempted; no
//! failure here stops the event stream.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info, warn};

use crate::commands::{self, Command, ParseOutcome};
use crate::config::BotConfig;
use crate::error::{CommandError, PipelineError, StoreError};
use crate::filter::WordFilter;
use crate::links;
use crate::pipeline::types::{AnnounceOutcome, Disposition, InboundMessage, ProcessedMessage};
use crate::platform::ChatPlatform;
use crate::relay::ChatRelay;
use crate::store::{CommunityConfig, Store};

/// Reply sent when the relay fails.
const RELAY_APOLOGY: &str = "Bot error, please try again!";

/// Message pipeline — the per-message decision procedure.
pub struct MessagePipeline {
    config: BotConfig,
    store: Arc<dyn Store>,
    filter: Arc<WordFilter>,
    platform: Arc<dyn ChatPlatform>,
    relay: Arc<dyn ChatRelay>,
}

impl MessagePipeline {
    /// Create a new pipeline over the injected collaborators.
    pub fn new(
        config: BotConfig,
        store: Arc<dyn Store>,
        filter: Arc<WordFilter>,
        platform: Arc<dyn ChatPlatform>,
        relay: Arc<dyn ChatRelay>,
    ) -> Self {
        Self {
            config,
            store,
            filter,
            platform,
            relay,
        }
    }

    /// Load persisted custom words into the live filter. Called once at
    /// startup; returns how many entries were loaded.
    pub async fn load_filter(&self) -> Result<usize, StoreError> {
        let words = self.store.list_words().await?;
        let count = words.len();
        self.filter.load(words);
        info!(count, "Custom banned words loaded");
        Ok(count)
    }

    /// Process one inbound message to completion.
    ///
    /// Every per-message failure mode degrades to a reply or a log line
    /// inside; only store faults surface as `Err`, for the event loop
    /// to log and move past.
    pub async fn process(&self, message: InboundMessage) -> Result<ProcessedMessage, PipelineError> {
        let disposition = self.dispatch(&message).await?;
        info!(
            id = %message.id,
            author = %message.author,
            disposition = disposition.label(),
            "Message processed"
        );
        Ok(ProcessedMessage {
            message,
            disposition,
            processed_at: Utc::now(),
        })
    }

    async fn dispatch(&self, msg: &InboundMessage) -> Result<Disposition, PipelineError> {
        if msg.from_bot {
            return Ok(Disposition::Ignored);
        }

        // Direct messages bypass config lookup and every gate.
        let Some(community) = msg.community.clone() else {
            return Ok(self.relay_reply(msg).await);
        };

        let config = self.store.find_community(&community).await?;
        let is_command_shaped = msg.content.starts_with(self.config.prefix);

        // Gate 1: a bound response channel silences all other channels,
        // except for prefixed commands.
        if let Some(bound) = config.as_ref().and_then(|c| c.response_channel.as_deref()) {
            if bound != msg.channel && !is_command_shaped {
                debug!(id = %msg.id, channel = %msg.channel, "Message outside bound channel");
                return Ok(Disposition::Dropped);
            }
        }

        // Gate 2: profanity.
        if self.filter.is_profane(&msg.content) {
            return Ok(self.punish_profanity(msg).await);
        }

        // Gate 3: links. Any one of {media link, admin author, exception
        // channel} suppresses the ban.
        if links::contains_link(&msg.content) && !links::is_allowed_media(&msg.content) {
            let is_admin = self.is_admin(&community, &msg.author).await;
            let in_exception = config
                .as_ref()
                .is_some_and(|c| c.is_exception(&msg.channel));

            if !is_admin && !in_exception {
                return Ok(self.punish_link_spam(msg).await);
            }
        }

        // Step 4: commands.
        match Command::parse(&msg.content, self.config.prefix) {
            ParseOutcome::Parsed(command) => {
                let name = command.spec().name;
                self.run_command(msg, &community, command).await?;
                return Ok(Disposition::Command { name });
            }
            ParseOutcome::Usage(spec) => {
                self.reply(msg, &format!("Usage: `{}`", spec.usage)).await;
                return Ok(Disposition::Command { name: spec.name });
            }
            ParseOutcome::Unknown => {
                debug!(id = %msg.id, "Prefixed message with no matching command");
                return Ok(Disposition::Dropped);
            }
            ParseOutcome::NotCommand => {}
        }

        // Step 5: plain text in the bound channel goes to the relay.
        if let Some(bound) = config.as_ref().and_then(|c| c.response_channel.as_deref()) {
            if bound == msg.channel {
                return Ok(self.relay_reply(msg).await);
            }
        }
        Ok(Disposition::Dropped)
    }

    // ── Moderation actions ──────────────────────────────────────────

    async fn punish_profanity(&self, msg: &InboundMessage) -> Disposition {
        info!(id = %msg.id, author = %msg.author, "Profanity gate triggered");

        if let Err(e) = self.platform.delete_message(msg).await {
            warn!(id = %msg.id, error = %e, "Failed to delete message");
        }
        if let Err(e) = self
            .platform
            .timeout_author(msg, self.config.timeout_duration, "Inappropriate language")
            .await
        {
            warn!(author = %msg.author, error = %e, "Failed to time out author");
        }
        let notice = format!(
            "{} has been timed out for using inappropriate language.",
            msg.author_display()
        );
        self.reply(msg, &notice).await;
        Disposition::TimedOut
    }

    async fn punish_link_spam(&self, msg: &InboundMessage) -> Disposition {
        info!(id = %msg.id, author = %msg.author, "Link gate triggered");

        if let Err(e) = self.platform.delete_message(msg).await {
            warn!(id = %msg.id, error = %e, "Failed to delete message");
        }
        if let Err(e) = self.platform.ban_author(msg, "Link spam").await {
            warn!(author = %msg.author, error = %e, "Failed to ban author");
        }
        let notice = format!("{} has been banned for link spamming.", msg.author_display());
        self.reply(msg, &notice).await;
        Disposition::Banned
    }

    // ── Relay ───────────────────────────────────────────────────────

    async fn relay_reply(&self, msg: &InboundMessage) -> Disposition {
        let query = msg.content.trim();
        if query.is_empty() {
            return Disposition::Ignored;
        }

        match self.relay.respond(query).await {
            Ok(reply) => {
                self.reply(msg, &reply).await;
                Disposition::Relayed
            }
            Err(e) => {
                error!(id = %msg.id, error = %e, "Relay call failed");
                self.reply(msg, RELAY_APOLOGY).await;
                Disposition::RelayFailed
            }
        }
    }

    // ── Command handlers ────────────────────────────────────────────

    async fn run_command(
        &self,
        msg: &InboundMessage,
        community: &str,
        command: Command,
    ) -> Result<(), PipelineError> {
        debug!(id = %msg.id, command = command.spec().name, "Dispatching command");
        match command {
            Command::SetChannel { channel } => self.set_channel(msg, community, &channel).await,
            Command::AddBadWord { word } => self.add_bad_word(msg, &word).await,
            Command::Setup => self.setup(msg, community).await,
            Command::AddChannelException { channel } => {
                self.add_channel_exception(msg, community, &channel).await
            }
            Command::SendGlobalAnnounce { text } => self.send_global_announce(msg, &text).await,
            Command::Help { topic } => {
                self.reply(msg, &commands::render_help(topic.as_deref())).await;
                Ok(())
            }
        }
    }

    /// Resolve a channel reference, or reply "invalid channel".
    async fn resolve_channel(
        &self,
        msg: &InboundMessage,
        community: &str,
        reference: &str,
    ) -> Option<String> {
        let channel = commands::strip_channel_decorations(reference);
        let exists = match self.platform.channel_exists(community, &channel).await {
            Ok(exists) => exists,
            Err(e) => {
                warn!(channel = %channel, error = %e, "Channel resolution failed");
                false
            }
        };
        if exists {
            Some(channel)
        } else {
            let failure = CommandError::InvalidReference(channel);
            self.reply(msg, &failure.to_string()).await;
            None
        }
    }

    async fn set_channel(
        &self,
        msg: &InboundMessage,
        community: &str,
        reference: &str,
    ) -> Result<(), PipelineError> {
        let Some(channel) = self.resolve_channel(msg, community, reference).await else {
            return Ok(());
        };
        self.store.bind_response_channel(community, &channel).await?;
        self.reply(msg, &format!("Response channel set to #{channel}.")).await;
        Ok(())
    }

    async fn add_bad_word(&self, msg: &InboundMessage, word: &str) -> Result<(), PipelineError> {
        let word = word.to_lowercase();
        self.store.add_word(&word).await?;
        self.filter.add_word(&word);
        self.reply(msg, &format!("Added new banned word: {word}")).await;
        Ok(())
    }

    async fn setup(&self, msg: &InboundMessage, community: &str) -> Result<(), PipelineError> {
        if !self.is_admin(community, &msg.author).await {
            self.reply(msg, &CommandError::AdministratorRequired.to_string())
                .await;
            return Ok(());
        }

        let channel = match self
            .platform
            .create_channel(community, &self.config.setup_channel_name)
            .await
        {
            Ok(channel) => channel,
            Err(e) => {
                error!(community = %community, error = %e, "Channel creation failed");
                self.reply(msg, "Failed to create the chat channel.").await;
                return Ok(());
            }
        };

        self.store.bind_response_channel(community, &channel).await?;
        self.reply(msg, &format!("AI chat channel created: #{channel}")).await;
        Ok(())
    }

    async fn add_channel_exception(
        &self,
        msg: &InboundMessage,
        community: &str,
        reference: &str,
    ) -> Result<(), PipelineError> {
        let Some(channel) = self.resolve_channel(msg, community, reference).await else {
            return Ok(());
        };
        self.store.add_exception_channel(community, &channel).await?;
        self.reply(msg, &format!("Channel #{channel} is now a link exception channel."))
            .await;
        Ok(())
    }

    async fn send_global_announce(
        &self,
        msg: &InboundMessage,
        text: &str,
    ) -> Result<(), PipelineError> {
        let is_owner = self.config.owner_id.as_deref() == Some(msg.author.as_str());
        if !is_owner {
            self.reply(msg, &CommandError::OwnerRequired.to_string()).await;
            return Ok(());
        }

        let outcome = self.announce(text).await?;
        self.reply(msg, &outcome.summary()).await;
        Ok(())
    }

    /// Deliver an announcement to every community with a bound channel.
    ///
    /// Failures are collected per target; one failed community never
    /// stops the loop.
    pub async fn announce(&self, text: &str) -> Result<AnnounceOutcome, PipelineError> {
        let communities = self.store.list_communities().await?;
        let body = format!("📢 **Announcement:** {text}");
        let mut outcome = AnnounceOutcome::default();

        for CommunityConfig {
            community_id,
            response_channel,
            ..
        } in communities
        {
            let Some(channel) = response_channel else {
                outcome.skipped += 1;
                continue;
            };
            match self.platform.send_text(&channel, &body).await {
                Ok(()) => outcome.delivered += 1,
                Err(e) => {
                    warn!(community = %community_id, error = %e, "Announcement delivery failed");
                    outcome.failed.push((community_id, e.to_string()));
                }
            }
        }

        info!(
            delivered = outcome.delivered,
            skipped = outcome.skipped,
            failed = outcome.failed.len(),
            "Announcement fan-out complete"
        );
        Ok(outcome)
    }

    /// Capability check. A failed check counts as not-admin.
    async fn is_admin(&self, community: &str, actor: &str) -> bool {
        match self.platform.has_administrator(community, actor).await {
            Ok(is_admin) => is_admin,
            Err(e) => {
                warn!(actor = %actor, error = %e, "Administrator check failed");
                false
            }
        }
    }

    /// Send a reply into the message's channel, logging on failure.
    async fn reply(&self, msg: &InboundMessage, text: &str) {
        if let Err(e) = self.platform.send_text(&msg.channel, text).await {
            warn!(channel = %msg.channel, error = %e, "Failed to send reply");
        }
    }
}

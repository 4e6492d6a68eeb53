//! Console gateway — stdin/stdout platform for local runs.
//!
//! Lines typed on stdin become direct messages, which the pipeline
//! routes straight to the relay. Moderation primitives print what they
//! would have done; there is nothing to delete or ban locally.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use futures::stream;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::error::PlatformError;
use crate::pipeline::types::InboundMessage;
use crate::platform::{ChatPlatform, MessageStream};

/// Console platform — prints actions, answers sends on stdout.
pub struct ConsolePlatform;

impl ConsolePlatform {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConsolePlatform {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatPlatform for ConsolePlatform {
    async fn delete_message(&self, message: &InboundMessage) -> Result<(), PlatformError> {
        eprintln!("[moderation] would delete message {}", message.id);
        Ok(())
    }

    async fn timeout_author(
        &self,
        message: &InboundMessage,
        duration: Duration,
        reason: &str,
    ) -> Result<(), PlatformError> {
        eprintln!(
            "[moderation] would time out {} for {}s ({reason})",
            message.author_display(),
            duration.as_secs()
        );
        Ok(())
    }

    async fn ban_author(&self, message: &InboundMessage, reason: &str) -> Result<(), PlatformError> {
        eprintln!(
            "[moderation] would ban {} ({reason})",
            message.author_display()
        );
        Ok(())
    }

    async fn send_text(&self, _channel: &str, text: &str) -> Result<(), PlatformError> {
        println!("\n{text}\n");
        eprint!("> ");
        Ok(())
    }

    async fn create_channel(&self, _community: &str, _name: &str) -> Result<String, PlatformError> {
        Err(PlatformError::Unsupported("create_channel".to_string()))
    }

    async fn has_administrator(&self, _community: &str, _actor: &str) -> Result<bool, PlatformError> {
        Ok(false)
    }

    async fn channel_exists(&self, _community: &str, _channel: &str) -> Result<bool, PlatformError> {
        Ok(true)
    }
}

/// Read stdin lines into a stream of direct messages.
pub fn stdin_stream() -> MessageStream {
    let (tx, rx) = tokio::sync::mpsc::unbounded_channel();

    tokio::spawn(async move {
        static NEXT_ID: AtomicU64 = AtomicU64::new(1);

        let stdin = tokio::io::stdin();
        let reader = BufReader::new(stdin);
        let mut lines = reader.lines();

        eprint!("> ");

        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    let line = line.trim().to_string();
                    if line.is_empty() {
                        eprint!("> ");
                        continue;
                    }
                    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
                    let msg = InboundMessage::direct(&format!("console-{id}"), "local-user", &line);
                    if tx.send(msg).is_err() {
                        break;
                    }
                }
                Ok(None) => break, // EOF
                Err(e) => {
                    tracing::error!(error = %e, "Error reading stdin");
                    break;
                }
            }
        }
    });

    let stream = stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|msg| (msg, rx))
    });

    Box::pin(stream)
}

//! Error types for Chat Warden.

/// Top-level error type for the bot.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    #[error("Relay error: {0}")]
    Relay(#[from] RelayError),

    #[error("Command error: {0}")]
    Command(#[from] CommandError),

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Persistence errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to open store: {0}")]
    Open(String),

    #[error("Query failed: {0}")]
    Query(String),
}

/// Chat-platform action errors.
///
/// None of these are fatal to the pipeline — moderation actions that
/// fail are logged and the remaining actions for the message are still
/// attempted.
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("Platform action {action} failed: {reason}")]
    ActionFailed { action: String, reason: String },

    #[error("Failed to send to channel {channel}: {reason}")]
    SendFailed { channel: String, reason: String },

    #[error("Channel creation failed: {0}")]
    CreateChannel(String),

    #[error("Platform action {0} is not supported by this gateway")]
    Unsupported(String),
}

/// Conversational-relay errors.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("Query is empty")]
    EmptyQuery,

    #[error("Upstream relay failed: {reason}")]
    Upstream { reason: String },
}

/// User-facing command failures. Non-fatal; the `Display` text is the
/// reply sent back to the invoking user.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Invalid channel: {0}")]
    InvalidReference(String),

    #[error("You need administrator permissions to use this command.")]
    AdministratorRequired,

    #[error("You do not have permission to use this command.")]
    OwnerRequired,
}

/// Pipeline-level errors.
///
/// Per-message failure modes (moderation action errors, relay errors)
/// degrade to a reply or a log line inside the pipeline; only store
/// faults surface here, so the event loop can log and move on.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Result type alias for the bot.
pub type Result<T> = std::result::Result<T, Error>;

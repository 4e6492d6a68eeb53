//! Runtime configuration.

use std::time::Duration;

use crate::error::ConfigError;

/// Bot configuration.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Command prefix character.
    pub prefix: char,
    /// Owner identity for `sendglobalannounce`. When unset, the command
    /// is denied for everyone.
    pub owner_id: Option<String>,
    /// Timeout penalty applied by the profanity gate.
    pub timeout_duration: Duration,
    /// Name given to the channel created by `setup`.
    pub setup_channel_name: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            prefix: '!',
            owner_id: None,
            timeout_duration: Duration::from_secs(600), // 10 minutes
            setup_channel_name: "ai-chat".to_string(),
        }
    }
}

impl BotConfig {
    /// Build configuration from `WARDEN_*` environment variables.
    ///
    /// Everything is optional; unset variables fall back to the
    /// defaults above.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let prefix = match std::env::var("WARDEN_PREFIX") {
            Ok(s) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => c,
                    _ => {
                        return Err(ConfigError::InvalidValue {
                            key: "WARDEN_PREFIX".to_string(),
                            message: "must be a single character".to_string(),
                        });
                    }
                }
            }
            Err(_) => defaults.prefix,
        };

        let owner_id = std::env::var("WARDEN_OWNER_ID")
            .ok()
            .filter(|s| !s.trim().is_empty());

        let timeout_duration = match std::env::var("WARDEN_TIMEOUT_SECS") {
            Ok(s) => {
                let secs: u64 = s.parse().map_err(|_| ConfigError::InvalidValue {
                    key: "WARDEN_TIMEOUT_SECS".to_string(),
                    message: format!("not a number of seconds: {s}"),
                })?;
                Duration::from_secs(secs)
            }
            Err(_) => defaults.timeout_duration,
        };

        let setup_channel_name =
            std::env::var("WARDEN_SETUP_CHANNEL").unwrap_or(defaults.setup_channel_name);

        Ok(Self {
            prefix,
            owner_id,
            timeout_duration,
            setup_channel_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = BotConfig::default();
        assert_eq!(config.prefix, '!');
        assert_eq!(config.owner_id, None);
        assert_eq!(config.timeout_duration, Duration::from_secs(600));
        assert_eq!(config.setup_channel_name, "ai-chat");
    }
}

//! Command parsing, the command table, and help rendering.
//!
//! Dispatch is a closed enum — one variant per command, with the
//! argument arity encoded in the variant's fields. Parsing never talks
//! to the platform or the store; handlers live in the pipeline.

/// Static definition of one command: name, description, usage line.
#[derive(Debug, PartialEq, Eq)]
pub struct CommandSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
}

/// All recognized commands, in help-rendering order.
pub const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "setchannel",
        description: "Sets the channel the bot responds in.",
        usage: "!setchannel <channel>",
    },
    CommandSpec {
        name: "addbadword",
        description: "Adds a word to the list of banned words.",
        usage: "!addbadword <word>",
    },
    CommandSpec {
        name: "setup",
        description: "Creates an AI chat channel for the bot to use.",
        usage: "!setup",
    },
    CommandSpec {
        name: "addchannelexception",
        description: "Adds a channel to the list of link exception channels.",
        usage: "!addchannelexception <channel>",
    },
    CommandSpec {
        name: "sendglobalannounce",
        description: "Sends an announcement to every community with a bound channel.",
        usage: "!sendglobalannounce <message>",
    },
    CommandSpec {
        name: "help",
        description: "Shows the list of commands or details of a specific command.",
        usage: "!help [command]",
    },
];

/// Look up a command definition by name.
pub fn spec_for(name: &str) -> Option<&'static CommandSpec> {
    COMMANDS.iter().find(|spec| spec.name == name)
}

/// A parsed, dispatchable command with its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SetChannel { channel: String },
    AddBadWord { word: String },
    Setup,
    AddChannelException { channel: String },
    SendGlobalAnnounce { text: String },
    Help { topic: Option<String> },
}

impl Command {
    /// The command's definition in the static table.
    pub fn spec(&self) -> &'static CommandSpec {
        let name = match self {
            Self::SetChannel { .. } => "setchannel",
            Self::AddBadWord { .. } => "addbadword",
            Self::Setup => "setup",
            Self::AddChannelException { .. } => "addchannelexception",
            Self::SendGlobalAnnounce { .. } => "sendglobalannounce",
            Self::Help { .. } => "help",
        };
        spec_for(name).expect("every variant is in COMMANDS")
    }
}

/// Result of routing raw message text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// Text does not start with the prefix — not the router's business.
    NotCommand,
    /// Prefixed, but no recognized command name. Dropped silently: it
    /// must reach neither a handler nor the relay.
    Unknown,
    /// Recognized name, wrong argument count. Reply with the usage line.
    Usage(&'static CommandSpec),
    /// A dispatchable command.
    Parsed(Command),
}

impl Command {
    /// Route raw message text.
    ///
    /// Splitting is whitespace-only; there is no quoting.
    pub fn parse(text: &str, prefix: char) -> ParseOutcome {
        let Some(rest) = text.strip_prefix(prefix) else {
            return ParseOutcome::NotCommand;
        };

        let mut parts = rest.split_whitespace();
        let Some(name) = parts.next() else {
            // A bare prefix with nothing after it.
            return ParseOutcome::Unknown;
        };
        let args: Vec<&str> = parts.collect();

        match name {
            "setchannel" => match args.as_slice() {
                [channel] => ParseOutcome::Parsed(Command::SetChannel {
                    channel: (*channel).to_string(),
                }),
                _ => usage("setchannel"),
            },
            "addbadword" => match args.as_slice() {
                [word] => ParseOutcome::Parsed(Command::AddBadWord {
                    word: (*word).to_string(),
                }),
                _ => usage("addbadword"),
            },
            "setup" => match args.as_slice() {
                [] => ParseOutcome::Parsed(Command::Setup),
                _ => usage("setup"),
            },
            "addchannelexception" => match args.as_slice() {
                [channel] => ParseOutcome::Parsed(Command::AddChannelException {
                    channel: (*channel).to_string(),
                }),
                _ => usage("addchannelexception"),
            },
            "sendglobalannounce" => {
                if args.is_empty() {
                    usage("sendglobalannounce")
                } else {
                    ParseOutcome::Parsed(Command::SendGlobalAnnounce {
                        text: args.join(" "),
                    })
                }
            }
            "help" => match args.as_slice() {
                [] => ParseOutcome::Parsed(Command::Help { topic: None }),
                [topic] => ParseOutcome::Parsed(Command::Help {
                    topic: Some((*topic).to_string()),
                }),
                _ => usage("help"),
            },
            _ => ParseOutcome::Unknown,
        }
    }
}

fn usage(name: &str) -> ParseOutcome {
    ParseOutcome::Usage(spec_for(name).expect("known command name"))
}

/// Strip platform mention decoration from a channel reference.
///
/// `<#123456>` and `123456` both resolve to `123456`.
pub fn strip_channel_decorations(reference: &str) -> String {
    reference
        .chars()
        .filter(|c| !matches!(c, '<' | '@' | '#' | '>'))
        .collect()
}

/// Render the full command list.
fn render_command_list() -> String {
    COMMANDS
        .iter()
        .map(|spec| format!("`{}`: {}", spec.name, spec.description))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render the help reply: the full list, or one command's details, or
/// a not-found notice followed by the full list.
pub fn render_help(topic: Option<&str>) -> String {
    match topic {
        None => format!(
            "**Commands**\n{}\n\nUse `!help <command>` for more details on a specific command.",
            render_command_list()
        ),
        Some(name) => match spec_for(name) {
            Some(spec) => format!("**{}**\n{}\nUsage: `{}`", spec.name, spec.description, spec.usage),
            None => format!(
                "Command `{}` not found.\n\nAvailable commands:\n{}",
                name,
                render_command_list()
            ),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_prefixed_text_is_not_a_command() {
        assert_eq!(Command::parse("hello there", '!'), ParseOutcome::NotCommand);
        assert_eq!(
            Command::parse("setchannel 123", '!'),
            ParseOutcome::NotCommand
        );
    }

    #[test]
    fn unknown_command_is_silently_unknown() {
        assert_eq!(Command::parse("!frobnicate", '!'), ParseOutcome::Unknown);
        assert_eq!(Command::parse("!", '!'), ParseOutcome::Unknown);
    }

    #[test]
    fn parses_setchannel() {
        assert_eq!(
            Command::parse("!setchannel <#42>", '!'),
            ParseOutcome::Parsed(Command::SetChannel {
                channel: "<#42>".to_string()
            })
        );
    }

    #[test]
    fn wrong_arity_yields_usage() {
        match Command::parse("!setchannel", '!') {
            ParseOutcome::Usage(spec) => assert_eq!(spec.name, "setchannel"),
            other => panic!("expected Usage, got {other:?}"),
        }
        match Command::parse("!setchannel a b", '!') {
            ParseOutcome::Usage(spec) => assert_eq!(spec.name, "setchannel"),
            other => panic!("expected Usage, got {other:?}"),
        }
        match Command::parse("!setup now", '!') {
            ParseOutcome::Usage(spec) => assert_eq!(spec.name, "setup"),
            other => panic!("expected Usage, got {other:?}"),
        }
        match Command::parse("!sendglobalannounce", '!') {
            ParseOutcome::Usage(spec) => assert_eq!(spec.name, "sendglobalannounce"),
            other => panic!("expected Usage, got {other:?}"),
        }
    }

    #[test]
    fn announce_joins_remaining_args() {
        assert_eq!(
            Command::parse("!sendglobalannounce maintenance at   9pm", '!'),
            ParseOutcome::Parsed(Command::SendGlobalAnnounce {
                text: "maintenance at 9pm".to_string()
            })
        );
    }

    #[test]
    fn parses_help_variants() {
        assert_eq!(
            Command::parse("!help", '!'),
            ParseOutcome::Parsed(Command::Help { topic: None })
        );
        assert_eq!(
            Command::parse("!help setup", '!'),
            ParseOutcome::Parsed(Command::Help {
                topic: Some("setup".to_string())
            })
        );
    }

    #[test]
    fn custom_prefix_is_honored() {
        assert_eq!(
            Command::parse("?setup", '?'),
            ParseOutcome::Parsed(Command::Setup)
        );
        assert_eq!(Command::parse("!setup", '?'), ParseOutcome::NotCommand);
    }

    #[test]
    fn strips_channel_decorations() {
        assert_eq!(strip_channel_decorations("<#123456>"), "123456");
        assert_eq!(strip_channel_decorations("123456"), "123456");
        assert_eq!(strip_channel_decorations("<@#>"), "");
    }

    #[test]
    fn every_variant_has_a_spec() {
        let commands = [
            Command::SetChannel {
                channel: "c".to_string(),
            },
            Command::AddBadWord {
                word: "w".to_string(),
            },
            Command::Setup,
            Command::AddChannelException {
                channel: "c".to_string(),
            },
            Command::SendGlobalAnnounce {
                text: "t".to_string(),
            },
            Command::Help { topic: None },
        ];
        for command in &commands {
            assert!(spec_for(command.spec().name).is_some());
        }
        assert_eq!(COMMANDS.len(), 6);
    }

    #[test]
    fn help_renders_full_list() {
        let help = render_help(None);
        for spec in COMMANDS {
            assert!(help.contains(spec.name), "missing {}", spec.name);
        }
    }

    #[test]
    fn help_renders_single_command() {
        let help = render_help(Some("setchannel"));
        assert!(help.contains("!setchannel <channel>"));
        assert!(!help.contains("addbadword"));
    }

    #[test]
    fn help_unknown_topic_lists_everything() {
        let help = render_help(Some("nope"));
        assert!(help.contains("not found"));
        for spec in COMMANDS {
            assert!(help.contains(spec.name), "missing {}", spec.name);
        }
    }
}

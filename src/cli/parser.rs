//! Command-line argument parsing.
//!
//! Defines the CLI structure using clap derive macros.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{CONFIG_ENV, DEFAULT_CONFIG_PATH};

/// VPLink: Discord to Virtual Paradise relay.
///
/// Runs the relay's markup sanitizer, chunker, and timestamp formatter
/// on text given as an argument, read from a file, or piped on stdin.
#[derive(Parser, Debug)]
#[command(name = "vplink")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the configuration file.
    ///
    /// Defaults to `data/config.toml`. A missing file means defaults.
    #[arg(short, long, env = CONFIG_ENV, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json).
    #[arg(long, default_value = "text", global = true)]
    pub format: String,

    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert Discord markup to plain text.
    Sanitize {
        /// Message markup (reads stdin if omitted).
        text: Option<String>,

        /// Read the text from a file instead of the argument or stdin.
        #[arg(short, long, conflicts_with = "text")]
        file: Option<PathBuf>,

        /// JSON directory snapshot used to resolve mentions.
        #[arg(short, long)]
        directory: Option<PathBuf>,

        /// Reference time for relative timestamps, in Unix seconds.
        #[arg(long, allow_negative_numbers = true)]
        now: Option<i64>,
    },

    /// Split text into Virtual Paradise sized segments.
    Chunk {
        /// Text to split (reads stdin if omitted).
        text: Option<String>,

        /// Read the text from a file instead of the argument or stdin.
        #[arg(short, long, conflicts_with = "text")]
        file: Option<PathBuf>,

        /// Segment budget in bytes (default: relay.max_segment_bytes).
        #[arg(short, long)]
        max_bytes: Option<usize>,
    },

    /// Render a Unix timestamp the way a timestamp tag is rendered.
    Timestamp {
        /// Seconds since the Unix epoch.
        #[arg(allow_negative_numbers = true)]
        seconds: i64,

        /// Format character (t, T, d, D, f, F, R).
        #[arg(short, long)]
        style: Option<char>,

        /// Reference time for the relative style, in Unix seconds.
        #[arg(long, allow_negative_numbers = true)]
        now: Option<i64>,
    },

    /// Run a Discord message through the full relay pipeline.
    Relay {
        /// Message markup (reads stdin if omitted).
        text: Option<String>,

        /// Read the text from a file instead of the argument or stdin.
        #[arg(short, long, conflicts_with = "text")]
        file: Option<PathBuf>,

        /// Author username.
        #[arg(short, long)]
        author: String,

        /// Author is a bot.
        #[arg(long)]
        bot: bool,

        /// Message is a reply.
        #[arg(long)]
        reply: bool,

        /// Attachment URL (repeatable).
        #[arg(long = "attachment")]
        attachments: Vec<String>,

        /// JSON directory snapshot used to resolve mentions.
        #[arg(short, long)]
        directory: Option<PathBuf>,

        /// Reference time for relative timestamps, in Unix seconds.
        #[arg(long, allow_negative_numbers = true)]
        now: Option<i64>,
    },

    /// Format a world chat line as it is posted to Discord.
    Discord {
        /// Chat line (reads stdin if omitted).
        text: Option<String>,

        /// Avatar name.
        #[arg(short, long)]
        author: String,
    },

    /// Show the effective configuration.
    #[command(name = "config")]
    ShowConfig,
}

impl Cli {
    /// Returns the configuration path, using the default if not specified.
    #[must_use]
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parse() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_config_path() {
        let cli = Cli {
            config: None,
            verbose: false,
            format: "text".to_string(),
            command: Commands::ShowConfig,
        };
        assert_eq!(cli.config_path(), PathBuf::from(DEFAULT_CONFIG_PATH));
    }

    #[test]
    fn test_custom_config_path() {
        let cli = Cli {
            config: Some(PathBuf::from("/custom/config.toml")),
            verbose: false,
            format: "text".to_string(),
            command: Commands::ShowConfig,
        };
        assert_eq!(cli.config_path(), PathBuf::from("/custom/config.toml"));
    }

    #[test]
    fn test_parse_relay() {
        let cli = Cli::try_parse_from([
            "vplink",
            "relay",
            "hello",
            "--author",
            "avery",
            "--attachment",
            "https://a",
            "--attachment",
            "https://b",
            "--reply",
        ])
        .unwrap();

        let Commands::Relay {
            text,
            author,
            reply,
            attachments,
            bot,
            ..
        } = cli.command
        else {
            unreachable!("expected the relay command");
        };
        assert_eq!(text.as_deref(), Some("hello"));
        assert_eq!(author, "avery");
        assert!(reply);
        assert!(!bot);
        assert_eq!(attachments, ["https://a", "https://b"]);
    }

    #[test]
    fn test_parse_negative_timestamp() {
        let cli = Cli::try_parse_from(["vplink", "timestamp", "-86400", "--style", "d"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Timestamp {
                seconds: -86400,
                style: Some('d'),
                now: None
            }
        ));
    }

    #[test]
    fn test_parse_file_input() {
        let cli = Cli::try_parse_from(["vplink", "sanitize", "--file", "message.txt"]).unwrap();
        let Commands::Sanitize { text, file, .. } = cli.command else {
            unreachable!("expected the sanitize command");
        };
        assert!(text.is_none());
        assert_eq!(file, Some(PathBuf::from("message.txt")));
    }

    #[test]
    fn test_file_conflicts_with_text() {
        let result = Cli::try_parse_from(["vplink", "chunk", "abc", "--file", "message.txt"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_format_after_subcommand() {
        let cli = Cli::try_parse_from(["vplink", "chunk", "abc", "--format", "json"]).unwrap();
        assert_eq!(cli.format, "json");
    }
}

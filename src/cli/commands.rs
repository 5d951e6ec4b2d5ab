//! CLI command implementations.
//!
//! Contains the business logic for each CLI command.

use chrono::{DateTime, Utc};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

use crate::chunking::{ByteChunker, Chunker};
use crate::cli::output::{
    OutputFormat, format_json, format_line, format_plain_text, format_relayed,
    format_rendered_timestamp, format_segments,
};
use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::{InboundMessage, RelayedMessage};
use crate::directory::{Member, MemoryDirectory};
use crate::error::{CommandError, Result};
use crate::io::{read_input, text_or_stdin};
use crate::markup::{Sanitizer, TagResolver, TimestampFormat, format_timestamp_at};
use crate::relay::{MemoryTarget, RelayPipeline, dispatch, to_discord};

/// User ID the CLI bridge posts as. Never matches a command-line author.
const CLI_BRIDGE_USER_ID: u64 = u64::MAX;

/// Executes the CLI command.
///
/// # Arguments
///
/// * `cli` - Parsed CLI arguments.
///
/// # Returns
///
/// Result with output string on success.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded or the command
/// fails to execute.
pub async fn execute(cli: &Cli) -> Result<String> {
    let format = OutputFormat::parse(&cli.format);
    let config = Config::load(&cli.config_path())?;

    match &cli.command {
        Commands::Sanitize {
            text,
            file,
            directory,
            now,
        } => {
            let content = read_input(text.as_deref(), file.as_deref())?;
            cmd_sanitize(
                &config,
                &content,
                directory.as_deref(),
                *now,
                format,
            )
            .await
        }
        Commands::Chunk {
            text,
            file,
            max_bytes,
        } => {
            let content = read_input(text.as_deref(), file.as_deref())?;
            cmd_chunk(&config, &content, *max_bytes, format)
        }
        Commands::Timestamp {
            seconds,
            style,
            now,
        } => cmd_timestamp(*seconds, *style, *now, format),
        Commands::Relay {
            text,
            file,
            author,
            bot,
            reply,
            attachments,
            directory,
            now,
        } => {
            let content = read_input(text.as_deref(), file.as_deref())?;
            let request = RelayRequest {
                content: &content,
                author,
                bot: *bot,
                reply: *reply,
                attachments,
                directory: directory.as_deref(),
                now: *now,
            };
            cmd_relay(config, &request, format).await
        }
        Commands::Discord { text, author } => cmd_discord(text.as_deref(), author, format),
        Commands::ShowConfig => cmd_show_config(&config, format),
    }
}

fn load_directory(path: Option<&Path>) -> Result<MemoryDirectory> {
    match path {
        Some(path) => {
            let directory = MemoryDirectory::load(path)?;
            debug!(path = %path.display(), records = directory.len(), "directory loaded");
            Ok(directory)
        }
        None => Ok(MemoryDirectory::new()),
    }
}

fn reference_time(now: Option<i64>) -> Result<DateTime<Utc>> {
    now.map_or_else(|| Ok(Utc::now()), |seconds| instant(seconds, "--now"))
}

fn instant(seconds: i64, name: &str) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(seconds, 0).ok_or_else(|| {
        CommandError::InvalidArgument(format!("{name}: {seconds} is out of range")).into()
    })
}

async fn cmd_sanitize(
    config: &Config,
    content: &str,
    directory: Option<&Path>,
    now: Option<i64>,
    format: OutputFormat,
) -> Result<String> {
    let directory = load_directory(directory)?;
    let now = reference_time(now)?;

    let sanitizer = Sanitizer::with_resolver(TagResolver::with_policy(config.display_name_policy()?));
    let plain = sanitizer.sanitize_at(&directory, content, now).await;
    Ok(format_plain_text(&plain, format))
}

fn cmd_chunk(
    config: &Config,
    content: &str,
    max_bytes: Option<usize>,
    format: OutputFormat,
) -> Result<String> {
    let chunker = max_bytes.map_or_else(|| config.chunker(), ByteChunker::with_limit);
    let segments = chunker.chunk(content)?;
    Ok(format_segments(&segments, chunker.max_bytes(), format))
}

fn cmd_timestamp(
    seconds: i64,
    style: Option<char>,
    now: Option<i64>,
    format: OutputFormat,
) -> Result<String> {
    let at = instant(seconds, "seconds")?;
    let now = reference_time(now)?;
    let timestamp_format = style.map_or(TimestampFormat::None, TimestampFormat::from_char);

    let rendered = format_timestamp_at(at, timestamp_format, now);
    Ok(format_rendered_timestamp(seconds, style, &rendered, format))
}

/// Arguments of the `relay` command.
struct RelayRequest<'a> {
    content: &'a str,
    author: &'a str,
    bot: bool,
    reply: bool,
    attachments: &'a [String],
    directory: Option<&'a Path>,
    now: Option<i64>,
}

async fn cmd_relay(config: Config, request: &RelayRequest<'_>, format: OutputFormat) -> Result<String> {
    let directory = load_directory(request.directory)?;
    let now = reference_time(request.now)?;
    let chat = config.chat;
    let channel_id = config.discord.channel_id;

    let author = directory_member(&directory, request.author).bot(request.bot);
    let message = request
        .attachments
        .iter()
        .fold(InboundMessage::new(author, channel_id, request.content), |m, url| {
            m.attachment(url.as_str())
        })
        .reply(request.reply);

    let pipeline = RelayPipeline::builder()
        .directory(Arc::new(directory))
        .config(config)
        .build()?;

    if !pipeline.accept(&message, CLI_BRIDGE_USER_ID) {
        return Ok(format_relayed(None, &chat, format));
    }

    let relayed = pipeline.to_virtual_paradise_at(&message, now).await?;
    let target = MemoryTarget::new();
    dispatch(&target, &relayed).await?;
    let sent: Vec<RelayedMessage> = target.into_sent();
    Ok(format_relayed(Some(&sent), &chat, format))
}

/// Uses the directory's record when the author's username is known there,
/// so nicknames and global names apply.
fn directory_member(directory: &MemoryDirectory, username: &str) -> Member {
    directory
        .find_by_username(username)
        .cloned()
        .unwrap_or_else(|| Member::new(0, username))
}

fn cmd_discord(text: Option<&str>, author: &str, format: OutputFormat) -> Result<String> {
    let content = text_or_stdin(text)?;
    let message = RelayedMessage::from_author(author, content.trim());
    Ok(format_line(&to_discord(&message), format))
}

fn cmd_show_config(config: &Config, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => toml::to_string_pretty(config)
            .map_err(|e| CommandError::OutputFormat(e.to_string()).into()),
        OutputFormat::Json => Ok(format_json(config)),
    }
}

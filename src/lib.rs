//! # VPLink
//!
//! Relay core for a Discord to Virtual Paradise chat bridge.
//!
//! Discord messages carry markup: mention tags, timestamp tags, and
//! backslash-escaped formatting. Virtual Paradise chat is plain text with a
//! 255-byte limit per message. VPLink converts one into the other.
//!
//! ## Features
//!
//! - **Markup sanitizing**: mentions resolved through an async [`Directory`],
//!   timestamps rendered as absolute UTC text or relative phrases
//! - **Chunking**: byte-bounded segments that never split a UTF-8 character
//! - **Relay pipeline**: acceptance filtering, attachments, display names,
//!   and ordered dispatch to a [`RelayTarget`]
//! - **Configuration**: TOML with defaults for every field
//!
//! ## Example
//!
//! ```
//! use vplink::directory::{Member, MemoryDirectory};
//! use vplink::markup::Sanitizer;
//! use vplink::chunking::chunk_text;
//!
//! let directory = MemoryDirectory::new().with_member(Member::new(42, "avery"));
//! let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! let plain = rt.block_on(Sanitizer::new().sanitize(&directory, "hey <@42>!"));
//! assert_eq!(plain, "hey @avery!");
//!
//! let segments = chunk_text(&plain);
//! assert_eq!(segments.len(), 1);
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]

pub mod chunking;
pub mod cli;
pub mod config;
pub mod core;
pub mod directory;
pub mod error;
pub mod io;
pub mod logging;
pub mod markup;
pub mod relay;

// Re-export commonly used types at crate root
pub use error::{Error, Result};

// Re-export core domain types
pub use crate::core::{InboundMessage, MAX_SEGMENT_BYTES, MessageSegment, RelayedMessage};

// Re-export configuration
pub use config::Config;

// Re-export directory types
pub use directory::{Directory, DisplayNamePolicy, Member, MemoryDirectory};

// Re-export markup types
pub use markup::{PlainTextBuilder, Sanitizer, TagResolver, TimestampFormat};

// Re-export chunking types
pub use chunking::{ByteChunker, Chunker};

// Re-export relay types
pub use relay::{AvatarRoster, RelayPipeline, RelayTarget, dispatch};

// Re-export CLI types
pub use cli::{Cli, Commands, OutputFormat};

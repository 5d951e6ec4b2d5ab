//! Core domain models for VPLink.
//!
//! This module contains the data structures passed between the pipeline and
//! its collaborators: outbound segments and relayed messages. These are pure
//! domain models with no I/O dependencies.

pub mod message;
pub mod segment;

pub use message::{InboundMessage, RelayedMessage};
pub use segment::{MAX_SEGMENT_BYTES, MessageSegment};

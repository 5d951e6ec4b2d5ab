//! The bridge between Discord and Virtual Paradise.
//!
//! [`RelayPipeline`] filters and converts Discord messages into world chat
//! lines. [`to_discord`] formats world chat for Discord. [`dispatch`] sends
//! a batch to a [`RelayTarget`] in order. [`AvatarRoster`] tracks who is in
//! the world and produces arrival and departure notices.

pub mod avatar;
pub mod pipeline;
pub mod target;

pub use avatar::{Avatar, AvatarRoster, arrival_notice, departure_notice};
pub use pipeline::{RelayPipeline, RelayPipelineBuilder, to_discord};
pub use target::{MemoryTarget, RelayTarget, dispatch};

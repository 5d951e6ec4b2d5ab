//! CLI layer for VPLink.
//!
//! Exposes the relay pipeline's stages as subcommands so markup, chunking,
//! and timestamp rendering can be checked from a shell.

pub mod commands;
pub mod output;
pub mod parser;

pub use commands::execute;
pub use output::OutputFormat;
pub use parser::{Cli, Commands};

//! Error types for VPLink operations.
//!
//! This module provides the error hierarchy using `thiserror` for the
//! caller-facing failures of the relay: configuration, chunking limits,
//! directory loading, relay dispatch, I/O, and CLI commands.
//!
//! Malformed markup is never an error. Tag parse and lookup failures are
//! downgraded to literal text inside the sanitizer and do not surface here.

use thiserror::Error;

/// Result type alias for VPLink operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for VPLink operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors (loading, validation, pipeline wiring).
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Chunking-related errors (segment limits).
    #[error("chunking error: {0}")]
    Chunking(#[from] ChunkingError),

    /// Directory errors (snapshot loading, lookup backends).
    #[error("directory error: {0}")]
    Directory(#[from] DirectoryError),

    /// Relay dispatch errors.
    #[error("relay error: {0}")]
    Relay(#[from] RelayError),

    /// I/O errors (file operations).
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// CLI command errors.
    #[error("command error: {0}")]
    Command(#[from] CommandError),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file could not be parsed.
    #[error("failed to parse configuration: {0}")]
    Parse(String),

    /// A configuration value is out of range or inconsistent.
    #[error("invalid value for {key}: {reason}")]
    InvalidValue {
        /// Dotted key of the offending value.
        key: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// A required collaborator was not supplied to a builder.
    #[error("missing required component: {0}")]
    MissingComponent(&'static str),
}

/// Chunking-specific errors for segment splitting.
#[derive(Error, Debug)]
pub enum ChunkingError {
    /// Segment limit exceeds the wire maximum.
    #[error("segment size {size} exceeds maximum {max}")]
    ChunkTooLarge {
        /// Requested segment size.
        size: usize,
        /// Maximum allowed size.
        max: usize,
    },

    /// Invalid chunk configuration.
    #[error("invalid chunk configuration: {reason}")]
    InvalidConfig {
        /// Reason the configuration is invalid.
        reason: String,
    },
}

/// Directory-specific errors.
#[derive(Error, Debug)]
pub enum DirectoryError {
    /// The lookup backend failed (network, gateway cache, etc.).
    #[error("lookup failed: {0}")]
    Lookup(String),

    /// A directory snapshot could not be decoded.
    #[error("invalid directory snapshot: {0}")]
    Snapshot(String),
}

/// Relay-specific errors.
#[derive(Error, Debug)]
pub enum RelayError {
    /// A relay target rejected or failed to deliver a message.
    #[error("failed to send segment {index}: {reason}")]
    SendFailed {
        /// Index of the segment that failed.
        index: usize,
        /// Reason for failure.
        reason: String,
    },
}

/// I/O-specific errors for file operations.
#[derive(Error, Debug)]
pub enum IoError {
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path to the file that was not found.
        path: String,
    },

    /// Failed to read file.
    #[error("failed to read file: {path}: {reason}")]
    ReadFailed {
        /// Path to the file.
        path: String,
        /// Reason for failure.
        reason: String,
    },

    /// Generic I/O error wrapper.
    #[error("I/O error: {0}")]
    Generic(String),
}

/// CLI command-specific errors.
#[derive(Error, Debug)]
pub enum CommandError {
    /// Invalid argument provided.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Output format error.
    #[error("output format error: {0}")]
    OutputFormat(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(IoError::Generic(err.to_string()))
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

impl From<serde_json::Error> for DirectoryError {
    fn from(err: serde_json::Error) -> Self {
        Self::Snapshot(err.to_string())
    }
}

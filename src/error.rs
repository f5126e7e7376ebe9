//! Error types for Vendo
//!
//! Uses `thiserror` for library errors. Parse and extraction failures always
//! carry the offending raw string so the caller can report it verbatim.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Vendo operations
pub type VendoResult<T> = Result<T, VendoError>;

/// Main error type for Vendo operations
#[derive(Error, Debug)]
pub enum VendoError {
    /// A `:L...` suffix matched the position trigger but none of the accepted
    /// shapes. Never downgraded to "no position" - a typo like `:L5XYZ` would
    /// otherwise silently vendor an unintended region.
    #[error("malformed position specifier in '{raw}'")]
    MalformedPositionSpec { raw: String },

    /// Structurally valid position that is semantically impossible
    /// (line 0, end before start, numeric overflow).
    #[error("invalid position in '{raw}': {reason}")]
    InvalidPosition { raw: String, reason: String },

    /// The spec addresses a line past the end of the content.
    /// A data-time failure, not a parse-time one.
    #[error("line {start} out of range: content has {lines} line(s)")]
    LineOutOfRange { start: u32, lines: usize },

    /// Invalid vendor configuration
    #[error("invalid config {file}: {message}")]
    Config { file: PathBuf, message: String },

    /// Invalid exclude pattern in a directory mapping
    #[error("invalid exclude pattern '{pattern}' in mapping '{from}': {message}")]
    InvalidExclude {
        pattern: String,
        from: String,
        message: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

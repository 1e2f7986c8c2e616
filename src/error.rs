//! Error types for output extraction, table parsing and adjacency parsing.
//!
//! This module defines every error the parsers and the device façade can
//! return. Data-shape errors carry enough context (line number, expected
//! token, pattern) to diagnose drift in a vendor's output format.

use thiserror::Error;

use crate::adjacency::TokenKind;

/// Errors that can occur while turning raw CLI output into structured data.
#[derive(Error, Debug)]
pub enum ShapeError {
    /// No line of the output satisfied the extraction pattern.
    #[error("no match for pattern {pattern}")]
    NoMatch { pattern: String },

    /// The extraction pattern itself is invalid.
    ///
    /// This is a programming error, not a data error: the pattern failed to
    /// compile, has no named group, or lacks a group the caller relies on.
    #[error("malformed pattern {pattern}: {reason}")]
    MalformedPattern { pattern: String, reason: String },

    /// No template is registered for the exact (command, vendor) pair.
    #[error("no template for command '{command}' on vendor '{vendor}'")]
    TemplateNotFound { command: String, vendor: String },

    /// A header-shaped line appeared after the table header was consumed.
    ///
    /// Non-fatal: the table parser records it as a warning and continues.
    #[error("header repeated at line {line}: {text}")]
    AmbiguousHeader { line: usize, text: String },

    /// A template is self-inconsistent and was rejected when the index was built.
    #[error("malformed template for command '{command}' on vendor '{vendor}': {reason}")]
    MalformedTemplate {
        command: String,
        vendor: String,
        reason: String,
    },

    /// The template index document could not be decoded.
    #[error("invalid template index: {0}")]
    InvalidTemplateIndex(String),

    /// A character outside every token shape was found.
    #[error("unexpected character {found:?} at line {line} (offset {offset})")]
    LexError {
        line: usize,
        offset: usize,
        found: char,
    },

    /// The token stream violated the adjacency record grammar.
    #[error("line {line}: expected {expected}, found {found}")]
    ParseError {
        line: usize,
        expected: TokenKind,
        found: String,
    },

    /// The transport failed to return output for a command.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// A device's output did not have the shape expected for its vendor.
    #[error("output of '{command}' did not match the expected format for {vendor}")]
    UnexpectedFormat {
        vendor: String,
        command: String,
        #[source]
        source: Box<ShapeError>,
    },
}

impl ShapeError {
    /// Returns true for errors caused by the device output rather than by
    /// a defective pattern or template.
    pub fn is_data_error(&self) -> bool {
        match self {
            ShapeError::NoMatch { .. }
            | ShapeError::TemplateNotFound { .. }
            | ShapeError::AmbiguousHeader { .. }
            | ShapeError::LexError { .. }
            | ShapeError::ParseError { .. } => true,
            ShapeError::UnexpectedFormat { source, .. } => source.is_data_error(),
            ShapeError::MalformedPattern { .. }
            | ShapeError::MalformedTemplate { .. }
            | ShapeError::InvalidTemplateIndex(_)
            | ShapeError::Transport(_) => false,
        }
    }
}

/// Errors raised by a transport while fetching command output.
#[derive(Error, Debug)]
pub enum TransportError {
    /// The device rejected the command or the session failed.
    #[error("command '{command}' failed: {message}")]
    CommandFailed { command: String, message: String },

    /// The transport has no output for the command.
    #[error("no output available for command '{0}'")]
    NoOutput(String),

    /// Recorded transport data could not be decoded.
    #[error("recording decode error: {0}")]
    Decode(String),

    /// Internal transport state could not be accessed.
    #[error("transport state error: {0}")]
    State(String),
}

/// Result type alias using `ShapeError`.
pub type Result<T> = std::result::Result<T, ShapeError>;

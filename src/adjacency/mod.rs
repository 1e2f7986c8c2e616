//! Grammar-driven parsing of IS-IS adjacency listings.
//!
//! The grammar has one record rule, repeated zero or more times:
//!
//! ```text
//! listing := (record? EOL)*
//! record  := INTERFACE HOSTNAME HOLD LEVEL
//! ```
//!
//! [`tokenize`] turns text into a [`TokenStream`] and [`parse`] walks the
//! stream into [`AdjacencyRecord`]s. The walker is strictly positional: a
//! missing, misplaced or extra field is an error, never a guess.

mod lexer;
mod token;
mod walker;

pub use lexer::tokenize;
pub use token::{Token, TokenKind, TokenStream};
pub use walker::{AdjacencyRecord, parse};

use crate::error::Result;

/// Tokenize and parse an adjacency listing in one call.
pub fn parse_adjacency(text: &str) -> Result<Vec<AdjacencyRecord>> {
    parse(&tokenize(text)?)
}

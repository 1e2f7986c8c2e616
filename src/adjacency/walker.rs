//! Assembles adjacency records from a token stream.

use log::trace;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ShapeError};

use super::token::{Token, TokenKind, TokenStream};

/// One IS-IS adjacency, with every field kept as the raw token text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AdjacencyRecord {
    pub interface: String,
    pub hostname: String,
    pub hold: String,
    pub level: String,
}

/// Walk a token stream into adjacency records.
///
/// Each record must be exactly interface, hostname, hold and level followed
/// by an end of line. Empty lines separate records and produce nothing.
///
/// Tokens are classified by position before they reach the walker, so a
/// missing field shows up at the end of the line: `ge-0/0/1 23 2` lexes as
/// interface, hostname, hold and fails expecting a level.
pub fn parse(tokens: &TokenStream) -> Result<Vec<AdjacencyRecord>> {
    let mut iter = tokens.iter().peekable();
    let mut records = Vec::new();

    loop {
        while iter.next_if(|t| t.kind == TokenKind::Eol).is_some() {}
        let Some(first) = iter.peek() else {
            break;
        };
        let line = first.line;

        let interface = expect(&mut iter, TokenKind::Interface, line)?;
        let hostname = expect(&mut iter, TokenKind::Hostname, line)?;
        let hold = expect(&mut iter, TokenKind::Hold, line)?;
        let level = expect(&mut iter, TokenKind::Level, line)?;
        expect(&mut iter, TokenKind::Eol, line)?;

        trace!("line {line}: adjacency {} via {}", hostname.text, interface.text);
        records.push(AdjacencyRecord {
            interface: interface.text.clone(),
            hostname: hostname.text.clone(),
            hold: hold.text.clone(),
            level: level.text.clone(),
        });
    }
    Ok(records)
}

fn expect<'a>(
    iter: &mut impl Iterator<Item = &'a Token>,
    expected: TokenKind,
    line: usize,
) -> Result<&'a Token> {
    match iter.next() {
        Some(token) if token.kind == expected => Ok(token),
        Some(token) => Err(ShapeError::ParseError {
            line: token.line,
            expected,
            found: token.to_string(),
        }),
        None => Err(ShapeError::ParseError {
            line,
            expected,
            found: "end of input".to_string(),
        }),
    }
}

//! Token types for adjacency listings.

use std::fmt;

/// Token kinds of the adjacency grammar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Device interface name such as `ge-0/0/1.0`.
    Interface,
    /// Neighbor system name.
    Hostname,
    /// Hold time in seconds.
    Hold,
    /// IS-IS level: 1, 2 or 3.
    Level,
    /// End of a logical line.
    Eol,
}

impl TokenKind {
    /// Field order of one adjacency record.
    pub const RECORD: [TokenKind; 4] = [
        TokenKind::Interface,
        TokenKind::Hostname,
        TokenKind::Hold,
        TokenKind::Level,
    ];
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Interface => "interface",
            TokenKind::Hostname => "hostname",
            TokenKind::Hold => "hold time",
            TokenKind::Level => "level",
            TokenKind::Eol => "end of line",
        };
        f.write_str(name)
    }
}

/// A classified lexical unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Exact source text; empty for a synthesized final `Eol`.
    pub text: String,
    /// 1-based line number.
    pub line: usize,
    /// Byte offset of the first character.
    pub offset: usize,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Eol => write!(f, "{}", self.kind),
            kind => write!(f, "{kind} '{}'", self.text),
        }
    }
}

/// Ordered token sequence produced by the lexer.
///
/// The stream can be iterated any number of times.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    pub(crate) fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    pub fn as_slice(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Token kinds in order.
    pub fn kinds(&self) -> Vec<TokenKind> {
        self.tokens.iter().map(|t| t.kind).collect()
    }
}

impl<'a> IntoIterator for &'a TokenStream {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

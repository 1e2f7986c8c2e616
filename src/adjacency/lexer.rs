//! Hand-written lexer for adjacency listings.
//!
//! Input is split into whitespace-separated words. Each word is classified
//! by its position on the line and by its shape:
//!
//! | kind      | shape                                                  |
//! |-----------|--------------------------------------------------------|
//! | Interface | ASCII letter first, then `[A-Za-z0-9/._:-]`, one digit |
//! | Hostname  | ASCII alphanumeric first, then `[A-Za-z0-9._-]`        |
//! | Hold      | ASCII digits                                           |
//! | Level     | `1`, `2` or `3`                                        |
//!
//! The word at position N is given the Nth record kind when it fits that
//! shape. Anything else is classified by shape alone, so a field in the
//! wrong place still produces a token and the walker can report it.

use log::trace;

use crate::error::{Result, ShapeError};

use super::token::{Token, TokenKind, TokenStream};

/// Tokenize an adjacency listing.
///
/// All-or-nothing: the first character outside every token shape fails the
/// whole call.
pub fn tokenize(text: &str) -> Result<TokenStream> {
    Lexer::new(text).run()
}

struct Lexer<'src> {
    source: &'src str,
    pos: usize,
    line: usize,
    /// Words seen on the current line.
    column: usize,
    tokens: Vec<Token>,
}

impl<'src> Lexer<'src> {
    fn new(source: &'src str) -> Self {
        Self {
            source,
            pos: 0,
            line: 1,
            column: 0,
            tokens: Vec::new(),
        }
    }

    fn run(mut self) -> Result<TokenStream> {
        while let Some(c) = self.peek() {
            match c {
                ' ' | '\t' | '\r' => self.pos += 1,
                '\n' => {
                    self.push(TokenKind::Eol, "\n", self.pos);
                    self.pos += 1;
                    self.line += 1;
                    self.column = 0;
                }
                _ => self.word()?,
            }
        }

        if self.column > 0 {
            self.push(TokenKind::Eol, "", self.pos);
        }
        trace!("tokenized {} lines into {} tokens", self.line, self.tokens.len());
        Ok(TokenStream::new(self.tokens))
    }

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn push(&mut self, kind: TokenKind, text: &str, offset: usize) {
        self.tokens.push(Token {
            kind,
            text: text.to_string(),
            line: self.line,
            offset,
        });
    }

    fn error(&self, offset: usize, found: char) -> ShapeError {
        ShapeError::LexError {
            line: self.line,
            offset,
            found,
        }
    }

    /// Consume one word and emit its token.
    fn word(&mut self) -> Result<()> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if matches!(c, ' ' | '\t' | '\r' | '\n') {
                break;
            }
            if !is_word_char(c) {
                return Err(self.error(self.pos, c));
            }
            self.pos += c.len_utf8();
        }

        let source = self.source;
        let word = &source[start..self.pos];
        let kind = classify(word, self.column).ok_or_else(|| {
            let (at, found) = misfit(word);
            self.error(start + at, found)
        })?;
        self.push(kind, word, start);
        self.column += 1;
        Ok(())
    }
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '/' | '.' | '_' | ':' | '-')
}

fn fits(kind: TokenKind, word: &str) -> bool {
    let mut chars = word.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    match kind {
        TokenKind::Interface => {
            first.is_ascii_alphabetic()
                && word.chars().any(|c| c.is_ascii_digit())
                && chars.all(is_word_char)
        }
        TokenKind::Hostname => {
            first.is_ascii_alphanumeric()
                && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        }
        TokenKind::Hold => word.chars().all(|c| c.is_ascii_digit()),
        TokenKind::Level => matches!(word, "1" | "2" | "3"),
        TokenKind::Eol => false,
    }
}

/// First character of `word` that breaks the Hostname shape, with its byte
/// index in `word`. A word that fits no shape never fits Hostname either.
fn misfit(word: &str) -> (usize, char) {
    let mut chars = word.char_indices();
    match chars.next() {
        Some((at, c)) if !c.is_ascii_alphanumeric() => return (at, c),
        None => return (0, '\0'),
        _ => {}
    }
    chars
        .find(|&(_, c)| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')))
        .unwrap_or((0, '\0'))
}

fn classify(word: &str, position: usize) -> Option<TokenKind> {
    if let Some(&expected) = TokenKind::RECORD.get(position) {
        if fits(expected, word) {
            return Some(expected);
        }
    }
    [
        TokenKind::Level,
        TokenKind::Hold,
        TokenKind::Interface,
        TokenKind::Hostname,
    ]
    .into_iter()
    .find(|kind| fits(*kind, word))
}

//! Single-shot field extraction with named-group regular expressions.
//!
//! A [`FieldPattern`] is compiled once, in multi-line mode, and then applied
//! to raw command output to pull out scalar fields such as a hardware model
//! or a version tuple.

use indexmap::IndexMap;
use log::trace;
use regex::{Regex, RegexBuilder};

use crate::error::{Result, ShapeError};

/// Named groups captured by the first match of a [`FieldPattern`].
///
/// Keys appear in the order the groups are declared in the pattern.
pub type FieldMatch = IndexMap<String, String>;

/// A compiled extraction rule with at least one named capture group.
#[derive(Debug, Clone)]
pub struct FieldPattern {
    source: String,
    regex: Regex,
}

impl FieldPattern {
    /// Compiles `pattern` in multi-line mode.
    ///
    /// Fails with [`ShapeError::MalformedPattern`] if the pattern does not
    /// compile or declares no named group.
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = RegexBuilder::new(pattern)
            .multi_line(true)
            .build()
            .map_err(|e| malformed(pattern, e.to_string()))?;

        if regex.capture_names().flatten().next().is_none() {
            return Err(malformed(pattern, "pattern has no named group".to_string()));
        }

        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    /// Compiles `pattern` and checks that every name in `groups` is declared.
    pub fn with_groups(pattern: &str, groups: &[&str]) -> Result<Self> {
        let compiled = Self::new(pattern)?;
        for group in groups {
            if !compiled.group_names().any(|name| name == *group) {
                return Err(malformed(pattern, format!("missing group '{group}'")));
            }
        }
        Ok(compiled)
    }

    /// The pattern text as written by the caller.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Names of the capture groups, in declaration order.
    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.regex.capture_names().flatten()
    }

    /// Returns true if any line of `text` satisfies the pattern.
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// Returns the named groups of the first match in `text`.
    ///
    /// Groups that did not take part in the match are left out.
    pub fn extract(&self, text: &str) -> Result<FieldMatch> {
        let caps = self.regex.captures(text).ok_or_else(|| ShapeError::NoMatch {
            pattern: self.source.clone(),
        })?;

        let mut fields = FieldMatch::new();
        for name in self.group_names() {
            if let Some(m) = caps.name(name) {
                fields.insert(name.to_string(), m.as_str().to_string());
            }
        }
        trace!("pattern {} matched {:?}", self.source, fields);
        Ok(fields)
    }
}

/// Compiles `pattern` and extracts the first match from `text`.
pub fn extract(pattern: &str, text: &str) -> Result<FieldMatch> {
    FieldPattern::new(pattern)?.extract(text)
}

fn malformed(pattern: &str, reason: String) -> ShapeError {
    ShapeError::MalformedPattern {
        pattern: pattern.to_string(),
        reason,
    }
}

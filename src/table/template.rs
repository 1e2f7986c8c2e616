//! Declarative row templates and their compiled form.
//!
//! A template names the columns of one vendor/command table, gives each a
//! value regex, and lists the line rules that combine those values. Rules
//! reference values as `${name}`:
//!
//! ```text
//! values:  mac = [0-9a-f]{2}(?::[0-9a-f]{2}){5}
//!          address = \d+\.\d+\.\d+\.\d+
//! rule:    ${mac}\s+${address}
//! ```
//!
//! Every regex is compiled when the template is built so that a broken
//! template is rejected before any output is parsed.

use std::ops::Range;

use log::trace;
use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ShapeError};

use super::TableRow;

/// Header detection rule for a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct HeaderSpec {
    /// Regex identifying the header line.
    pub pattern: String,
    /// Number of lines making up the header, starting at the matching line.
    #[serde(default = "default_header_lines")]
    pub lines: usize,
}

fn default_header_lines() -> usize {
    1
}

/// One named column of a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ValueSpec {
    /// Column name used as the row key.
    pub name: String,
    /// Regex matching the column's text.
    pub pattern: String,
    /// Rows where this column is empty are dropped.
    #[serde(default)]
    pub required: bool,
}

/// Template for one (command, vendor) pair, as written in the index document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TemplateSpec {
    /// Exact command string the template applies to.
    pub command: String,
    /// Exact vendor name the template applies to.
    pub vendor: String,
    /// Optional header rule; without it every line is a data candidate.
    #[serde(default)]
    pub header: Option<HeaderSpec>,
    /// Columns, in output order.
    pub values: Vec<ValueSpec>,
    /// Line rules, tried in order.
    pub rules: Vec<String>,
}

#[derive(Debug, Clone)]
struct HeaderRule {
    regex: Regex,
    lines: usize,
}

#[derive(Debug, Clone)]
struct Column {
    name: String,
    required: bool,
}

/// A validated, compiled [`TemplateSpec`].
#[derive(Debug, Clone)]
pub struct RowTemplate {
    command: String,
    vendor: String,
    header: Option<HeaderRule>,
    columns: Vec<Column>,
    rules: Vec<Regex>,
}

impl RowTemplate {
    /// Validates and compiles a template.
    pub fn compile(spec: &TemplateSpec) -> Result<Self> {
        let fail = |reason: String| ShapeError::MalformedTemplate {
            command: spec.command.clone(),
            vendor: spec.vendor.clone(),
            reason,
        };

        if spec.values.is_empty() {
            return Err(fail("template declares no values".to_string()));
        }
        if spec.rules.is_empty() {
            return Err(fail("template declares no rules".to_string()));
        }

        let mut columns: Vec<Column> = Vec::with_capacity(spec.values.len());
        for value in &spec.values {
            if !is_identifier(&value.name) {
                return Err(fail(format!("invalid value name '{}'", value.name)));
            }
            if columns.iter().any(|c| c.name == value.name) {
                return Err(fail(format!("duplicate value '{}'", value.name)));
            }
            Regex::new(&value.pattern)
                .map_err(|e| fail(format!("value '{}' has invalid pattern: {e}", value.name)))?;
            columns.push(Column {
                name: value.name.clone(),
                required: value.required,
            });
        }

        let mut rules = Vec::with_capacity(spec.rules.len());
        for (i, rule) in spec.rules.iter().enumerate() {
            let expanded = expand_rule(rule, &spec.values).map_err(|reason| {
                fail(format!("rule[{i}] '{rule}': {reason}"))
            })?;
            let regex = Regex::new(&format!("^(?:{expanded})$"))
                .map_err(|e| fail(format!("rule[{i}] '{rule}' does not compile: {e}")))?;
            rules.push(regex);
        }

        let header = match &spec.header {
            Some(h) => {
                if h.lines == 0 {
                    return Err(fail("header must span at least one line".to_string()));
                }
                let regex = Regex::new(&h.pattern)
                    .map_err(|e| fail(format!("header pattern does not compile: {e}")))?;
                Some(HeaderRule {
                    regex,
                    lines: h.lines,
                })
            }
            None => None,
        };

        Ok(Self {
            command: spec.command.clone(),
            vendor: spec.vendor.clone(),
            header,
            columns,
            rules,
        })
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn vendor(&self) -> &str {
        &self.vendor
    }

    /// Column names in output order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Returns true if `line` has the shape of this table's header.
    pub fn is_header(&self, line: &str) -> bool {
        self.header
            .as_ref()
            .is_some_and(|h| h.regex.is_match(line))
    }

    /// Line indices of the first header block, if the header appears.
    pub(crate) fn header_block(&self, lines: &[&str]) -> Option<Range<usize>> {
        let header = self.header.as_ref()?;
        let at = lines.iter().position(|l| header.regex.is_match(l))?;
        Some(at..at + header.lines)
    }

    /// Applies the line rules to one line; the first matching rule wins.
    ///
    /// Returns `None` when no rule matches or a required column is empty.
    pub fn match_line(&self, line: &str) -> Option<TableRow> {
        let caps = self.rules.iter().find_map(|rule| rule.captures(line))?;

        let mut row = TableRow::with_capacity(self.columns.len());
        for column in &self.columns {
            let value = caps.name(&column.name).map_or("", |m| m.as_str());
            if column.required && value.is_empty() {
                trace!("dropping row missing required value '{}': {line}", column.name);
                return None;
            }
            row.insert(column.name.clone(), value.to_string());
        }
        Some(row)
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Replaces each `${name}` in `rule` with a named group wrapping the value's pattern.
fn expand_rule(rule: &str, values: &[ValueSpec]) -> std::result::Result<String, String> {
    let mut out = String::with_capacity(rule.len() * 2);
    let mut rest = rule;
    let mut placeholders = 0;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after
            .find('}')
            .ok_or_else(|| "unterminated placeholder".to_string())?;
        let name = &after[..end];
        let value = values
            .iter()
            .find(|v| v.name == name)
            .ok_or_else(|| format!("undefined value '{name}'"))?;
        out.push_str(&format!("(?P<{}>{})", value.name, value.pattern));
        placeholders += 1;
        rest = &after[end + 1..];
    }
    out.push_str(rest);

    if placeholders == 0 {
        return Err("rule references no values".to_string());
    }
    Ok(out)
}

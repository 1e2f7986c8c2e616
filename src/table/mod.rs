//! Template-driven parsing of tabular CLI output.
//!
//! A [`TemplateIndex`] maps each exact (command, vendor) pair to a compiled
//! [`RowTemplate`]. Parsing skips the table header, applies the template's
//! line rules to every remaining line, and keeps the rows that match.
//!
//! # Header policy
//!
//! Header detection is pattern-based. The first header line is skipped,
//! together with the following `lines - 1` lines of the header block. Every
//! other line is a data candidate, including lines before the header and all
//! lines when the header never appears. Any other header-shaped line is
//! reported as [`ShapeError::AmbiguousHeader`], skipped, and parsing
//! continues.
//!
//! Lines that match no rule (blank lines, footers, truncated rows) are
//! skipped as well.

mod index;
mod template;

pub use index::{TemplateIndex, TemplateIndexDocument, template_index_schema_json};
pub use template::{HeaderSpec, RowTemplate, TemplateSpec, ValueSpec};

use indexmap::IndexMap;
use log::{debug, trace, warn};

use crate::error::{Result, ShapeError};

/// One parsed table line: column name to value, in template column order.
pub type TableRow = IndexMap<String, String>;

/// Rows parsed from a table together with non-fatal warnings.
#[derive(Debug, Default)]
pub struct ParsedTable {
    pub rows: Vec<TableRow>,
    /// Only [`ShapeError::AmbiguousHeader`] is reported here.
    pub warnings: Vec<ShapeError>,
}

impl RowTemplate {
    /// Parse a whole table blob with this template.
    pub fn parse(&self, text: &str) -> ParsedTable {
        let lines: Vec<&str> = text.lines().collect();
        let header = self.header_block(&lines).unwrap_or_default();
        let mut table = ParsedTable::default();

        for (idx, raw) in lines.iter().enumerate() {
            if header.contains(&idx) {
                continue;
            }
            let line = raw.trim_end();
            if line.is_empty() {
                continue;
            }
            if self.is_header(line) {
                warn!(
                    "{} / {}: extra header at line {}, skipping",
                    self.command(),
                    self.vendor(),
                    idx + 1
                );
                table.warnings.push(ShapeError::AmbiguousHeader {
                    line: idx + 1,
                    text: line.to_string(),
                });
                continue;
            }
            match self.match_line(line) {
                Some(row) => table.rows.push(row),
                None => trace!("line {} skipped: {line}", idx + 1),
            }
        }
        table
    }
}

impl TemplateIndex {
    /// Parse `text` with the template registered for (command, vendor).
    pub fn parse(&self, command: &str, vendor: &str, text: &str) -> Result<ParsedTable> {
        let template = self.get(command, vendor)?;
        debug!("parsing '{command}' output with {vendor} template");
        Ok(template.parse(text))
    }
}

/// Parse tabular output into rows using the template for (command, vendor).
///
/// Fails only with [`ShapeError::TemplateNotFound`]; header repeats are
/// logged and parsing continues.
pub fn parse_table(
    command: &str,
    vendor: &str,
    text: &str,
    templates: &TemplateIndex,
) -> Result<Vec<TableRow>> {
    Ok(templates.parse(command, vendor, text)?.rows)
}

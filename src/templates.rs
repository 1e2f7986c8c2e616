//! Predefined table templates.
//!
//! The built-in template index is embedded from `templates/index.json` and
//! compiled once per process. This module also exposes a small catalog of
//! the built-in templates for tooling that wants to list what is supported.

use std::sync::Arc;

use log::debug;
use once_cell::sync::OnceCell;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ShapeError};
use crate::table::TemplateIndex;

/// Template index document shipped with the crate.
pub const BUILTIN_INDEX_JSON: &str = include_str!("../templates/index.json");

static BUILTIN: OnceCell<Arc<TemplateIndex>> = OnceCell::new();

/// Metadata for a built-in table template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TemplateMetadata {
    pub command: String,
    pub vendor: String,
    pub columns: Vec<String>,
}

/// Compile a fresh copy of the built-in template index.
pub fn load_builtin_index() -> Result<TemplateIndex> {
    TemplateIndex::from_json(BUILTIN_INDEX_JSON)
}

/// Shared built-in template index, compiled on first use.
pub fn builtin_index() -> Result<Arc<TemplateIndex>> {
    BUILTIN
        .get_or_try_init(|| {
            debug!("compiling built-in template index");
            load_builtin_index().map(Arc::new)
        })
        .cloned()
}

/// Returns metadata for all built-in templates.
pub fn template_catalog() -> Result<Vec<TemplateMetadata>> {
    let index = builtin_index()?;
    let mut catalog = Vec::with_capacity(index.len());
    for (command, vendor) in index.keys() {
        catalog.push(template_metadata(command, vendor)?);
    }
    Ok(catalog)
}

/// Returns metadata for one built-in template by exact (command, vendor).
pub fn template_metadata(command: &str, vendor: &str) -> Result<TemplateMetadata> {
    let index = builtin_index()?;
    let template = index.get(command, vendor)?;
    Ok(TemplateMetadata {
        command: template.command().to_string(),
        vendor: template.vendor().to_string(),
        columns: template.columns().map(str::to_string).collect(),
    })
}

/// Exports the built-in catalog as pretty JSON.
pub fn template_catalog_json() -> Result<String> {
    let catalog = template_catalog()?;
    serde_json::to_string_pretty(&catalog)
        .map_err(|e| ShapeError::InvalidTemplateIndex(format!("encode catalog json: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CISCO_VENDOR, JUNIPER_SHOW_ARP, JUNIPER_VENDOR};
    use crate::table::parse_table;

    #[test]
    fn builtin_index_compiles() {
        let index = load_builtin_index().expect("built-in index should compile");
        assert!(index.contains(JUNIPER_SHOW_ARP, JUNIPER_VENDOR));
        assert!(index.contains("show ip arp", CISCO_VENDOR));
    }

    #[test]
    fn builtin_index_is_shared() {
        let a = builtin_index().expect("index");
        let b = builtin_index().expect("index");
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn catalog_lists_every_builtin_template() {
        let catalog = template_catalog().expect("catalog");
        assert_eq!(catalog.len(), builtin_index().expect("index").len());
        assert!(catalog
            .iter()
            .any(|m| m.command == JUNIPER_SHOW_ARP && m.vendor == JUNIPER_VENDOR));
    }

    #[test]
    fn metadata_lists_columns_in_order() {
        let meta = template_metadata(JUNIPER_SHOW_ARP, JUNIPER_VENDOR).expect("metadata");
        assert_eq!(meta.columns, vec!["mac", "address", "interface", "flags"]);
    }

    #[test]
    fn metadata_lookup_is_case_sensitive() {
        let err = template_metadata(JUNIPER_SHOW_ARP, "juniper").expect_err("should fail");
        assert!(matches!(err, ShapeError::TemplateNotFound { .. }));
    }

    #[test]
    fn catalog_json_is_valid() {
        let json = template_catalog_json().expect("json");
        let catalog: Vec<TemplateMetadata> = serde_json::from_str(&json).expect("parse json");
        assert!(!catalog.is_empty());
    }

    #[test]
    fn juniper_arp_skips_malformed_rows() {
        let index = builtin_index().expect("index");
        let text = "MAC Address       Address         Interface                Flags
00:05:86:71:4a:01 10.0.0.1        ge-0/0/0.0               none
00:05:86:71:4a:03 10.0.0.3
00:05:86:71:4a:02 10.0.0.2        ge-0/0/1.0               permanent remote
Total entries: 2
";
        let rows = parse_table(JUNIPER_SHOW_ARP, JUNIPER_VENDOR, text, &index).expect("parse");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["address"], "10.0.0.1");
        assert_eq!(rows[1]["interface"], "ge-0/0/1.0");
        assert_eq!(rows[1]["flags"], "permanent remote");
    }

    #[test]
    fn juniper_arp_keeps_row_printed_before_header() {
        let index = builtin_index().expect("index");
        let text = "00:05:86:71:4a:01 10.0.0.1        ge-0/0/0.0               none
MAC Address       Address         Interface                Flags
00:05:86:71:4a:02 10.0.0.2        ge-0/0/1.0               none
";
        let parsed = index
            .parse(JUNIPER_SHOW_ARP, JUNIPER_VENDOR, text)
            .expect("parse");
        let addresses: Vec<&str> = parsed.rows.iter().map(|r| r["address"].as_str()).collect();
        assert_eq!(addresses, vec!["10.0.0.1", "10.0.0.2"]);
        assert!(parsed.warnings.is_empty());
    }

    #[test]
    fn cisco_arp_handles_incomplete_entries() {
        let index = builtin_index().expect("index");
        let text = "Protocol  Address          Age (min)  Hardware Addr   Type   Interface
Internet  10.0.0.1                -   0050.56c0.0001  ARPA   GigabitEthernet0/0
Internet  10.0.0.9                0   Incomplete      ARPA
";
        let rows = parse_table("show ip arp", CISCO_VENDOR, text, &index).expect("parse");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["age"], "-");
        assert_eq!(rows[1]["mac"], "Incomplete");
        assert_eq!(rows[1]["interface"], "");
    }
}

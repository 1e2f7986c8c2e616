//! Template index keyed by exact (command, vendor) pairs.

use std::path::Path;

use indexmap::IndexMap;
use log::debug;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::config::TEMPLATE_INDEX_VERSION;
use crate::error::{Result, ShapeError};

use super::template::{RowTemplate, TemplateSpec};

/// Serialized form of a template index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TemplateIndexDocument {
    /// Document format version.
    pub version: u32,
    /// Templates, one per (command, vendor) pair.
    pub templates: Vec<TemplateSpec>,
}

/// Read-only collection of compiled row templates.
///
/// Built once, validated eagerly, then shared between callers. Lookups are
/// exact on both the command and the vendor string.
#[derive(Debug, Default)]
pub struct TemplateIndex {
    templates: IndexMap<String, IndexMap<String, RowTemplate>>,
}

impl TemplateIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self {
            templates: IndexMap::new(),
        }
    }

    /// Build an index from a decoded document, compiling every template.
    pub fn from_document(document: &TemplateIndexDocument) -> Result<Self> {
        if document.version != TEMPLATE_INDEX_VERSION {
            return Err(ShapeError::InvalidTemplateIndex(format!(
                "unsupported version {} (expected {TEMPLATE_INDEX_VERSION})",
                document.version
            )));
        }

        let mut index = Self::new();
        for spec in &document.templates {
            index.register(spec)?;
        }
        debug!("template index loaded with {} templates", index.len());
        Ok(index)
    }

    /// Build an index from a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        let document: TemplateIndexDocument = serde_json::from_str(json)
            .map_err(|e| ShapeError::InvalidTemplateIndex(format!("decode error: {e}")))?;
        Self::from_document(&document)
    }

    /// Build an index from a JSON document on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            ShapeError::InvalidTemplateIndex(format!("read {}: {e}", path.display()))
        })?;
        Self::from_json(&json)
    }

    /// Compile and add one template.
    ///
    /// A second template for the same (command, vendor) pair is rejected.
    pub fn register(&mut self, spec: &TemplateSpec) -> Result<()> {
        if self.contains(&spec.command, &spec.vendor) {
            return Err(ShapeError::MalformedTemplate {
                command: spec.command.clone(),
                vendor: spec.vendor.clone(),
                reason: "duplicate template".to_string(),
            });
        }
        let template = RowTemplate::compile(spec)?;
        self.templates
            .entry(spec.command.clone())
            .or_default()
            .insert(spec.vendor.clone(), template);
        Ok(())
    }

    /// Look up the template for an exact (command, vendor) pair.
    pub fn get(&self, command: &str, vendor: &str) -> Result<&RowTemplate> {
        self.templates
            .get(command)
            .and_then(|by_vendor| by_vendor.get(vendor))
            .ok_or_else(|| ShapeError::TemplateNotFound {
                command: command.to_string(),
                vendor: vendor.to_string(),
            })
    }

    /// Check if a template is registered for the pair.
    pub fn contains(&self, command: &str, vendor: &str) -> bool {
        self.templates
            .get(command)
            .is_some_and(|by_vendor| by_vendor.contains_key(vendor))
    }

    /// All (command, vendor) keys in registration order.
    pub fn keys(&self) -> impl Iterator<Item = (&str, &str)> {
        self.templates.iter().flat_map(|(command, by_vendor)| {
            by_vendor
                .keys()
                .map(move |vendor| (command.as_str(), vendor.as_str()))
        })
    }

    pub fn len(&self) -> usize {
        self.templates.values().map(IndexMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// JSON Schema of the template index document, pretty printed.
pub fn template_index_schema_json() -> Result<String> {
    let schema = schemars::schema_for!(TemplateIndexDocument);
    serde_json::to_string_pretty(&schema)
        .map_err(|e| ShapeError::InvalidTemplateIndex(format!("encode schema json: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL_INDEX: &str = r#"{
        "version": 1,
        "templates": [
            {
                "command": "show ip arp",
                "vendor": "Cisco",
                "values": [{"name": "address", "pattern": "\\S+"}],
                "rules": ["Internet\\s+${address}.*"]
            },
            {
                "command": "show ip arp",
                "vendor": "Arista",
                "values": [{"name": "address", "pattern": "\\S+"}],
                "rules": ["${address}.*"]
            }
        ]
    }"#;

    #[test]
    fn lookup_is_exact_on_both_keys() {
        let index = TemplateIndex::from_json(SMALL_INDEX).expect("index");
        assert!(index.get("show ip arp", "Cisco").is_ok());
        assert!(index.get("show ip arp", "cisco").is_err());
        assert!(index.get("show ip arp ", "Cisco").is_err());
        assert!(index.get("show ip", "Cisco").is_err());
    }

    #[test]
    fn missing_pair_reports_template_not_found() {
        let index = TemplateIndex::from_json(SMALL_INDEX).expect("index");
        let err = index.get("show arp", "Juniper").expect_err("missing");
        match err {
            ShapeError::TemplateNotFound { command, vendor } => {
                assert_eq!(command, "show arp");
                assert_eq!(vendor, "Juniper");
            }
            other => panic!("unexpected error type: {other}"),
        }
    }

    #[test]
    fn keys_follow_registration_order() {
        let index = TemplateIndex::from_json(SMALL_INDEX).expect("index");
        assert_eq!(
            index.keys().collect::<Vec<_>>(),
            vec![("show ip arp", "Cisco"), ("show ip arp", "Arista")]
        );
        assert_eq!(index.len(), 2);
        assert!(!index.is_empty());
    }

    #[test]
    fn duplicate_pair_is_rejected() {
        let mut document: TemplateIndexDocument =
            serde_json::from_str(SMALL_INDEX).expect("document");
        document.templates.push(document.templates[0].clone());
        let err = TemplateIndex::from_document(&document).expect_err("duplicate");
        assert!(matches!(err, ShapeError::MalformedTemplate { .. }));
    }

    #[test]
    fn unsupported_version_is_rejected() {
        let json = r#"{"version": 2, "templates": []}"#;
        let err = TemplateIndex::from_json(json).expect_err("version");
        assert!(matches!(err, ShapeError::InvalidTemplateIndex(_)));
    }

    #[test]
    fn undecodable_document_is_rejected() {
        let err = TemplateIndex::from_json("{\"version\": 1}").expect_err("decode");
        assert!(matches!(err, ShapeError::InvalidTemplateIndex(_)));
    }

    #[test]
    fn missing_file_is_reported() {
        let err = TemplateIndex::from_path("/nonexistent/clishape/index.json").expect_err("read");
        assert!(matches!(err, ShapeError::InvalidTemplateIndex(_)));
    }

    #[test]
    fn schema_json_describes_document() {
        let json = template_index_schema_json().expect("schema");
        let value: serde_json::Value = serde_json::from_str(&json).expect("parse schema");
        assert!(value.to_string().contains("templates"));
    }
}

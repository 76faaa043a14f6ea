//! Layout storage keyed by name
//!
//! The registry holds the raw layout records the resolution engine walks.
//! Lookup is by exact name; writes are last-write-wins per name. Records can
//! be built in code or loaded from a TOML `[layouts]` table.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors that can occur when loading layouts from a file
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read layouts file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse layouts TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// A stored layout record
///
/// `parent` names the layout this one nests inside (absent for a root
/// layout). `content` is the raw template body, holding at most one body
/// tag. `data` is auxiliary data merged into the shared context when a chain
/// containing this record is resolved; the engine never mutates it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LayoutRecord {
    /// Name of the parent layout, if any
    #[serde(default, rename = "layout")]
    pub parent: Option<String>,

    /// Raw template body
    #[serde(default)]
    pub content: String,

    /// Auxiliary data associated with this layout
    #[serde(default)]
    pub data: Map<String, Value>,
}

impl LayoutRecord {
    /// Create a root record with the given content
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            parent: None,
            content: content.into(),
            data: Map::new(),
        }
    }

    /// Set the parent layout name
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Replace the record's data map
    pub fn with_data(mut self, data: Map<String, Value>) -> Self {
        self.data = data;
        self
    }

    /// Insert a single data value
    pub fn with_value(mut self, key: impl Into<String>, value: Value) -> Self {
        self.data.insert(key.into(), value);
        self
    }
}

/// TOML structure for deserializing a layouts file
#[derive(Deserialize)]
struct TomlLayouts {
    #[serde(default)]
    layouts: HashMap<String, LayoutRecord>,
}

/// Name-keyed store of layout records
#[derive(Debug, Clone, Default)]
pub struct LayoutRegistry {
    layouts: HashMap<String, LayoutRecord>,
}

impl LayoutRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a registry from a TOML file with a `[layouts]` table
    pub fn from_file(path: &Path) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load a registry from a TOML string
    ///
    /// ```toml
    /// [layouts.base]
    /// content = "<html>{{ body }}</html>"
    ///
    /// [layouts.page]
    /// layout = "base"
    /// content = "<h1>{{ body }}</h1>"
    /// ```
    pub fn from_toml_str(content: &str) -> Result<Self, LoadError> {
        let parsed: TomlLayouts = toml::from_str(content)?;
        Ok(Self {
            layouts: parsed.layouts,
        })
    }

    /// Store a record under `name`, replacing any existing record
    pub fn set(&mut self, name: impl Into<String>, record: LayoutRecord) {
        self.layouts.insert(name.into(), record);
    }

    /// Store several records at once, last write per name winning
    pub fn extend<I>(&mut self, records: I)
    where
        I: IntoIterator<Item = (String, LayoutRecord)>,
    {
        self.layouts.extend(records);
    }

    /// Get a record by name
    pub fn get(&self, name: &str) -> Option<&LayoutRecord> {
        self.layouts.get(name)
    }

    /// Check whether a record exists
    pub fn contains(&self, name: &str) -> bool {
        self.layouts.contains_key(name)
    }

    /// All stored names
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.layouts.keys().map(|s| s.as_str())
    }

    /// All stored records with their names
    pub fn records(&self) -> impl Iterator<Item = (&str, &LayoutRecord)> {
        self.layouts.iter().map(|(name, record)| (name.as_str(), record))
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    /// Whether the registry holds no records
    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_and_get() {
        let mut registry = LayoutRegistry::new();
        registry.set("base", LayoutRecord::new("<html>{{ body }}</html>"));

        assert!(registry.contains("base"));
        let record = registry.get("base").expect("Should be stored");
        assert_eq!(record.content, "<html>{{ body }}</html>");
        assert!(record.parent.is_none());
    }

    #[test]
    fn test_last_write_wins() {
        let mut registry = LayoutRegistry::new();
        registry.set("a", LayoutRecord::new("first"));
        registry.set("a", LayoutRecord::new("second"));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("a").expect("Should be stored").content, "second");
    }

    #[test]
    fn test_bulk_extend() {
        let mut registry = LayoutRegistry::new();
        registry.extend([
            ("a".to_string(), LayoutRecord::new("A")),
            ("b".to_string(), LayoutRecord::new("B").with_parent("a")),
        ]);

        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.get("b").expect("Should be stored").parent.as_deref(),
            Some("a")
        );
    }

    #[test]
    fn test_record_builder() {
        let record = LayoutRecord::new("{{ body }}")
            .with_parent("base")
            .with_value("title", json!("Home"));

        assert_eq!(record.parent.as_deref(), Some("base"));
        assert_eq!(record.data.get("title"), Some(&json!("Home")));
    }

    #[test]
    fn test_from_toml_str() {
        let toml_str = r#"
[layouts.base]
content = "<html>{{ body }}</html>"

[layouts.page]
layout = "base"
content = "<h1>{{ body }}</h1>"

[layouts.page.data]
title = "Home"
"#;
        let registry = LayoutRegistry::from_toml_str(toml_str).expect("Should parse");

        assert_eq!(registry.len(), 2);
        let page = registry.get("page").expect("Should be stored");
        assert_eq!(page.parent.as_deref(), Some("base"));
        assert_eq!(page.data.get("title"), Some(&json!("Home")));
    }

    #[test]
    fn test_from_toml_str_without_layouts_table() {
        let registry = LayoutRegistry::from_toml_str("").expect("Should parse");
        assert!(registry.is_empty());
    }

    #[test]
    fn test_invalid_toml_error() {
        let result = LayoutRegistry::from_toml_str("this is not valid toml {{{{");
        assert!(matches!(result, Err(LoadError::Parse(_))));
    }
}

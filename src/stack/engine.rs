//! Layout stack flattening and content injection
//!
//! The engine folds a root-first ancestor chain into one template string.
//! The running content starts as the bare body tag; at each layer the tag
//! occurrences in the running content are replaced by that layer's raw
//! content, so every layout ends up nested inside its parent. The data
//! carried by each layer merges into a single context along the way, and the
//! final inject step substitutes the caller's page content for the remaining
//! tag.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::registry::{LayoutRecord, LayoutRegistry, LoadError};
use crate::tag::{make_pattern, make_tag, StackOptions, TagError, TagPattern};

use super::chain::resolve_chain;
use super::context::{flatten_into, merge_into, strip_reserved, FLATTEN_KEY};
use super::error::StackError;

/// Result of flattening a layout stack
#[derive(Debug, Clone)]
pub struct StackOutput {
    /// The flattened template, `None` when the start name resolved to no chain
    pub content: Option<String>,

    /// Data accumulated across the chain, leaf values overriding root values
    pub data: Map<String, Value>,

    /// The matching pattern in effect for this call
    pub pattern: TagPattern,

    /// The literal tag the fold started from
    pub tag: String,
}

/// Result of injecting page content into a flattened stack
#[derive(Debug, Clone)]
pub struct Injection {
    /// Content with the remaining body tag replaced
    pub content: String,

    /// Data accumulated across the chain
    pub data: Map<String, Value>,
}

/// TOML structure for deserializing an engine configuration file
#[derive(Deserialize)]
struct TomlEngine {
    #[serde(default)]
    options: StackOptions,
    #[serde(default)]
    layouts: HashMap<String, LayoutRecord>,
}

/// Resolves chains of nested layouts into a single flattened template
///
/// The engine owns a [`LayoutRegistry`] and the instance-level options that
/// per-call options may override. Each call constructs its own chain,
/// pattern, and context, and the returned context belongs to the caller;
/// nothing mutable is retained between calls.
#[derive(Debug, Clone)]
pub struct LayoutEngine {
    registry: LayoutRegistry,
    options: StackOptions,
    default_tag: String,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutEngine {
    /// Create an engine with library-default options and an empty registry
    pub fn new() -> Self {
        Self {
            registry: LayoutRegistry::new(),
            options: StackOptions::default(),
            default_tag: make_tag(&StackOptions::default()),
        }
    }

    /// Set the instance-level options
    ///
    /// The fallback tag is prebaked from these options. Should they compute
    /// an empty tag, the library-default tag stands in.
    pub fn with_options(mut self, options: StackOptions) -> Self {
        let tag = make_tag(&options);
        self.default_tag = if tag.is_empty() {
            make_tag(&StackOptions::default())
        } else {
            tag
        };
        self.options = options;
        self
    }

    /// Replace the engine's registry
    pub fn with_registry(mut self, registry: LayoutRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Load an engine from a TOML file with `[options]` and `[layouts]` tables
    pub fn from_file(path: &Path) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load an engine from a TOML string
    ///
    /// ```toml
    /// [options]
    /// delims = ["<%", "%>"]
    ///
    /// [layouts.base]
    /// content = "<html><% body %></html>"
    /// ```
    pub fn from_toml_str(content: &str) -> Result<Self, LoadError> {
        let parsed: TomlEngine = toml::from_str(content)?;
        let mut registry = LayoutRegistry::new();
        registry.extend(parsed.layouts);
        Ok(Self::new()
            .with_options(parsed.options)
            .with_registry(registry))
    }

    /// The layout store backing this engine
    pub fn registry(&self) -> &LayoutRegistry {
        &self.registry
    }

    /// Mutable access to the layout store
    pub fn registry_mut(&mut self) -> &mut LayoutRegistry {
        &mut self.registry
    }

    /// The prebaked tag used when call options compute an empty tag
    pub fn default_tag(&self) -> &str {
        &self.default_tag
    }

    /// Store a layout record under `name`
    pub fn set_layout(&mut self, name: impl Into<String>, record: LayoutRecord) {
        self.registry.set(name, record);
    }

    /// Store several layout records at once
    pub fn set_layouts<I>(&mut self, records: I)
    where
        I: IntoIterator<Item = (String, LayoutRecord)>,
    {
        self.registry.extend(records);
    }

    /// Get a stored layout record by name
    pub fn get_layout(&self, name: &str) -> Option<&LayoutRecord> {
        self.registry.get(name)
    }

    /// Flatten the layout chain starting at `name` with instance options
    pub fn stack(&self, name: &str) -> Result<StackOutput, StackError> {
        self.stack_with(name, &StackOptions::default())
    }

    /// Flatten the layout chain starting at `name` with per-call overrides
    ///
    /// The chain is folded root to leaf. The running content starts as the
    /// bare body tag, and each layer's raw content replaces the tag
    /// occurrences in it, so each layout lands inside its parent; a layer
    /// whose content carries no tag passes through unchanged and ends the
    /// nesting there. Layer data merges into the returned context as each
    /// layer is visited.
    pub fn stack_with(
        &self,
        name: &str,
        options: &StackOptions,
    ) -> Result<StackOutput, StackError> {
        let chain = resolve_chain(&self.registry, name)?;
        let call = self.options.layered(options);

        let mut tag = make_tag(&call);
        if tag.is_empty() {
            tag = self.default_tag.clone();
        }
        let pattern = make_pattern(&call)?;

        if chain.is_empty() {
            return Ok(StackOutput {
                content: None,
                data: Map::new(),
                pattern,
                tag,
            });
        }

        let mut data = Map::new();
        if let Some(locals) = &self.options.locals {
            merge_into(&mut data, locals);
        }
        if let Some(locals) = &options.locals {
            merge_into(&mut data, locals);
        }

        let mut content = tag.clone();
        for layer in &chain {
            let record = match self.registry.get(layer) {
                Some(record) => record,
                None => continue,
            };
            merge_into(&mut data, &record.data);
            flatten_into(&mut data, FLATTEN_KEY);
            strip_reserved(&mut data);
            content = pattern.replace(&content, &record.content);
        }

        Ok(StackOutput {
            content: Some(content),
            data,
            pattern,
            tag,
        })
    }

    /// Flatten the chain for `name` and substitute `body` for the remaining tag
    pub fn inject(&self, body: &str, name: &str) -> Result<Injection, StackError> {
        self.inject_with(body, name, &StackOptions::default())
    }

    /// [`inject`](Self::inject) with per-call overrides
    ///
    /// When `name` resolves to no chain, `body` passes through unchanged and
    /// the accumulated data is empty.
    pub fn inject_with(
        &self,
        body: &str,
        name: &str,
        options: &StackOptions,
    ) -> Result<Injection, StackError> {
        let stacked = self.stack_with(name, options)?;
        let content = match &stacked.content {
            Some(flattened) => stacked.pattern.replace(flattened, body),
            None => body.to_string(),
        };
        Ok(Injection {
            content,
            data: stacked.data,
        })
    }

    /// Replace body tag occurrences in `content` with `replacement`
    ///
    /// A standalone substitution using the engine's options; the chain
    /// machinery is not involved.
    pub fn replace_tag(&self, replacement: &str, content: &str) -> Result<String, TagError> {
        self.replace_tag_with(replacement, content, &StackOptions::default())
    }

    /// [`replace_tag`](Self::replace_tag) with per-call overrides
    pub fn replace_tag_with(
        &self,
        replacement: &str,
        content: &str,
        options: &StackOptions,
    ) -> Result<String, TagError> {
        let call = self.options.layered(options);
        let pattern = make_pattern(&call)?;
        Ok(pattern.replace(content, replacement))
    }
}

//! Shared data context accumulation
//!
//! Each resolution call accumulates one context map across the chain. Merges
//! are shallow and last-write-wins, so data from inner layers overrides data
//! from outer ones. Keys that describe resolution machinery rather than
//! template-consumable data are stripped after every merge step.

use serde_json::{Map, Value};

/// Keys describing resolution machinery, removed from the context after each
/// merge step
pub const RESERVED_KEYS: [&str; 5] = ["content", "delims", "layout", "data", "locals"];

/// Key whose nested map the engine hoists to the top level
pub(crate) const FLATTEN_KEY: &str = "data";

/// Shallow-merge `source` into `context`, source keys overriding existing ones
pub fn merge_into(context: &mut Map<String, Value>, source: &Map<String, Value>) {
    for (key, value) in source {
        context.insert(key.clone(), value.clone());
    }
}

/// Hoist the nested map stored under `key` to the top level
///
/// Flattens a single level: when `context[key]` is an object, its entries
/// are inlined into `context` with hoisted entries winning any collision,
/// and the key itself is removed. Any other value under `key` stays put.
pub fn flatten_into(context: &mut Map<String, Value>, key: &str) {
    if !matches!(context.get(key), Some(Value::Object(_))) {
        return;
    }
    if let Some(Value::Object(nested)) = context.remove(key) {
        for (nested_key, value) in nested {
            context.insert(nested_key, value);
        }
    }
}

/// Remove resolution-machinery keys from the context
pub fn strip_reserved(context: &mut Map<String, Value>) {
    for key in RESERVED_KEYS {
        context.remove(key);
    }
}

//! Parent-chain traversal
//!
//! Walks parent references from a starting layout name, producing the
//! root-first sequence of ancestor names. A missing record ends the walk; a
//! revisited name is reported as a cycle instead of looping forever.

use std::collections::HashSet;

use crate::registry::{LayoutRecord, LayoutRegistry};

use super::error::StackError;

/// Parent markers treated as "no parent"
const ABSENT_MARKERS: [&str; 5] = ["", "false", "none", "nil", "null"];

/// Whether a parent reference means the layout is a root
///
/// Absent references, empty strings, and a small closed set of false-like
/// markers (matched case-insensitively) all end the chain.
pub fn is_absent_reference(reference: Option<&str>) -> bool {
    match reference {
        None => true,
        Some(value) => ABSENT_MARKERS
            .iter()
            .any(|marker| value.eq_ignore_ascii_case(marker)),
    }
}

/// Resolve the ancestor chain for `start`, root first
///
/// The walk follows `parent` references while the current name has a stored
/// record. A start name with no record yields an empty chain, and a missing
/// parent ends the chain where it stands; neither is an error. Revisiting a
/// name fails with [`StackError::CircularReference`] naming the cycle in
/// walk order.
pub fn resolve_chain(registry: &LayoutRegistry, start: &str) -> Result<Vec<String>, StackError> {
    let mut walked: Vec<String> = Vec::new();
    let mut visited: HashSet<String> = HashSet::new();

    let mut cursor = if is_absent_reference(Some(start)) {
        None
    } else {
        Some(start.to_string())
    };

    while let Some(name) = cursor {
        let record = match registry.get(&name) {
            Some(record) => record,
            None => break,
        };
        if !visited.insert(name.clone()) {
            walked.push(name);
            return Err(StackError::CircularReference { chain: walked });
        }
        walked.push(name);
        cursor = next_parent(record);
    }

    walked.reverse();
    Ok(walked)
}

fn next_parent(record: &LayoutRecord) -> Option<String> {
    match record.parent.as_deref() {
        Some(parent) if !is_absent_reference(Some(parent)) => Some(parent.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with_chain() -> LayoutRegistry {
        let mut registry = LayoutRegistry::new();
        registry.set("c", LayoutRecord::new("C"));
        registry.set("b", LayoutRecord::new("B").with_parent("c"));
        registry.set("a", LayoutRecord::new("A").with_parent("b"));
        registry
    }

    #[test]
    fn test_chain_is_root_first() {
        let registry = registry_with_chain();
        let chain = resolve_chain(&registry, "a").expect("Should resolve");
        assert_eq!(chain, vec!["c", "b", "a"]);
    }

    #[test]
    fn test_missing_start_yields_empty_chain() {
        let registry = registry_with_chain();
        let chain = resolve_chain(&registry, "missing").expect("Should resolve");
        assert!(chain.is_empty());
    }

    #[test]
    fn test_missing_parent_ends_chain() {
        let mut registry = LayoutRegistry::new();
        registry.set("a", LayoutRecord::new("A").with_parent("gone"));

        let chain = resolve_chain(&registry, "a").expect("Should resolve");
        assert_eq!(chain, vec!["a"]);
    }

    #[test]
    fn test_sentinel_parent_ends_chain() {
        let mut registry = LayoutRegistry::new();
        registry.set("root", LayoutRecord::new("R"));
        registry.set("a", LayoutRecord::new("A").with_parent("none"));
        registry.set("b", LayoutRecord::new("B").with_parent("FALSE"));

        assert_eq!(
            resolve_chain(&registry, "a").expect("Should resolve"),
            vec!["a"]
        );
        assert_eq!(
            resolve_chain(&registry, "b").expect("Should resolve"),
            vec!["b"]
        );
    }

    #[test]
    fn test_self_cycle_is_error() {
        let mut registry = LayoutRegistry::new();
        registry.set("a", LayoutRecord::new("A").with_parent("a"));

        let result = resolve_chain(&registry, "a");
        match result {
            Err(StackError::CircularReference { chain }) => {
                assert_eq!(chain, vec!["a", "a"]);
            }
            other => panic!("Expected CircularReference, got {:?}", other),
        }
    }

    #[test]
    fn test_mutual_cycle_is_error() {
        let mut registry = LayoutRegistry::new();
        registry.set("a", LayoutRecord::new("A").with_parent("b"));
        registry.set("b", LayoutRecord::new("B").with_parent("a"));

        let result = resolve_chain(&registry, "a");
        match result {
            Err(StackError::CircularReference { chain }) => {
                assert_eq!(chain, vec!["a", "b", "a"]);
            }
            other => panic!("Expected CircularReference, got {:?}", other),
        }
    }

    #[test]
    fn test_is_absent_reference() {
        assert!(is_absent_reference(None));
        assert!(is_absent_reference(Some("")));
        assert!(is_absent_reference(Some("false")));
        assert!(is_absent_reference(Some("None")));
        assert!(is_absent_reference(Some("NULL")));
        assert!(!is_absent_reference(Some("base")));
        assert!(!is_absent_reference(Some("0"))); // only named markers end the chain
    }
}

//! Layout stack resolution
//!
//! A layout may name a parent layout; resolving a page walks those parent
//! references up to the root, folds the chain into one flattened template,
//! and merges each layer's data into a single context. [`LayoutEngine`] is
//! the entry point; the chain walk and context accumulation are exposed for
//! callers that need the pieces individually.

mod chain;
mod context;
mod engine;
mod error;

pub use chain::{is_absent_reference, resolve_chain};
pub use context::{flatten_into, merge_into, strip_reserved, RESERVED_KEYS};
pub use engine::{Injection, LayoutEngine, StackOutput};
pub use error::StackError;

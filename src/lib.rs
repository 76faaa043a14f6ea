//! Layout stack resolution for template pipelines
//!
//! A layout is a named template that may nest inside a parent layout and
//! reserves a body tag (default `{{ body }}`) for its inner content. This
//! crate resolves a page's layout chain into a single flattened template
//! plus one merged data context, ready for a downstream rendering engine.
//! Template expressions are never interpreted here; the only syntax this
//! crate understands is the body tag itself.
//!
//! # Example
//!
//! ```rust
//! use layout_stack::{LayoutEngine, LayoutRecord};
//!
//! let mut engine = LayoutEngine::new();
//! engine.set_layout("base", LayoutRecord::new("<html>{{ body }}</html>"));
//! engine.set_layout(
//!     "page",
//!     LayoutRecord::new("<h1>{{ body }}</h1>").with_parent("base"),
//! );
//!
//! let page = engine.inject("Hello", "page").unwrap();
//! assert_eq!(page.content, "<html><h1>Hello</h1></html>");
//! ```

pub mod registry;
pub mod stack;
pub mod tag;

pub use registry::{LayoutRecord, LayoutRegistry, LoadError};
pub use stack::{
    is_absent_reference, resolve_chain, Injection, LayoutEngine, StackError, StackOutput,
};
pub use tag::{make_pattern, make_tag, MatchFlags, StackOptions, TagError, TagPattern};

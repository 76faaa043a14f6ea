//! Error types for layout stack resolution

use thiserror::Error;

use crate::tag::TagError;

/// Errors that can occur while resolving a layout stack
#[derive(Debug, Error)]
pub enum StackError {
    /// A layout reappears among its own ancestors
    #[error("circular layout reference: {}", chain.join(" -> "))]
    CircularReference { chain: Vec<String> },

    /// The body tag pattern could not be built
    #[error("body tag error: {0}")]
    Tag(#[from] TagError),
}

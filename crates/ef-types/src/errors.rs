//! # Error Types
//!
//! Errors raised while building identifiers.

use thiserror::Error;

/// Errors that can occur while parsing or validating a path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// The path contained no segments.
    #[error("Empty path")]
    Empty,

    /// A segment between two separators was empty (e.g. `col//doc`).
    #[error("Empty segment in path: {path}")]
    EmptySegment { path: String },

    /// A document path must name a collection and a document id, repeatedly.
    #[error("Invalid document path: {path} has {segments} segments, expected an even number")]
    NotADocument { path: String, segments: usize },

    /// Project or database identifier was blank.
    #[error("Invalid database id: {field} must not be empty")]
    InvalidDatabaseId { field: &'static str },
}

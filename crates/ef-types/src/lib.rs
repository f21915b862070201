//! # Shared Types Crate
//!
//! Identifiers used across the diagnostics workspace.
//!
//! ## Design Principles
//!
//! - **Relative vs. qualified paths**: callers hold `DocumentReference`s with a
//!   path relative to the database root (`col/doc`). The server and the Bloom
//!   filters it sends use fully-qualified resource names
//!   (`projects/{p}/databases/{d}/documents/col/doc`). `DatabaseId` is the only
//!   place that joins the two.
//! - **Validated at construction**: a `DocumentReference` always has an even,
//!   non-zero number of non-empty segments.

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod entities;
pub mod errors;

pub use entities::{
    qualified_document_name, DatabaseId, DocumentPath, DocumentReference,
    ResourcePath, DEFAULT_DATABASE,
};
pub use errors::PathError;

//! # Core Identifiers
//!
//! - **Database**: `DatabaseId` (project + database)
//! - **Paths**: `ResourcePath`, `DocumentReference`
//! - **Capability**: `DocumentPath`, anything that can name a document by its
//!   database-relative path

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::PathError;

/// Name of the database a project gets when none is specified.
pub const DEFAULT_DATABASE: &str = "(default)";

/// Identifies one database inside one project.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseId {
    /// Project that owns the database.
    pub project_id: String,
    /// Database name within the project.
    pub database: String,
}

impl DatabaseId {
    /// Create a database id, rejecting blank components.
    pub fn new(project_id: impl Into<String>, database: impl Into<String>) -> Result<Self, PathError> {
        let project_id = project_id.into();
        let database = database.into();

        if project_id.trim().is_empty() {
            return Err(PathError::InvalidDatabaseId { field: "project_id" });
        }
        if database.trim().is_empty() {
            return Err(PathError::InvalidDatabaseId { field: "database" });
        }

        Ok(Self { project_id, database })
    }

    /// The `(default)` database of a project.
    pub fn default_for(project_id: impl Into<String>) -> Result<Self, PathError> {
        Self::new(project_id, DEFAULT_DATABASE)
    }

    /// Whether this is the project's default database.
    #[must_use]
    pub fn is_default_database(&self) -> bool {
        self.database == DEFAULT_DATABASE
    }

    /// Fully-qualified resource name of a document, as the server spells it.
    #[must_use]
    pub fn document_name(&self, relative_path: &str) -> String {
        qualified_document_name(&self.project_id, &self.database, relative_path)
    }
}

impl fmt::Display for DatabaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "projects/{}/databases/{}", self.project_id, self.database)
    }
}

/// `projects/{project_id}/databases/{database}/documents/{relative_path}`
///
/// No normalization is applied to `relative_path`; the result must match the
/// exact strings the server hashed into its Bloom filter.
#[must_use]
pub fn qualified_document_name(project_id: &str, database: &str, relative_path: &str) -> String {
    format!("projects/{project_id}/databases/{database}/documents/{relative_path}")
}

/// A slash-separated path of non-empty segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ResourcePath {
    segments: Vec<String>,
}

impl ResourcePath {
    /// Parse `a/b/c`. Leading and trailing slashes are ignored, `//` is not.
    pub fn parse(path: &str) -> Result<Self, PathError> {
        if path.contains("//") {
            return Err(PathError::EmptySegment {
                path: path.to_string(),
            });
        }

        let segments: Vec<String> = path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self { segments })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Last segment, if any.
    #[must_use]
    pub fn last_segment(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// The path without its last segment.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        if self.segments.is_empty() {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// Append one segment.
    pub fn child(&self, segment: impl Into<String>) -> Result<Self, PathError> {
        let segment = segment.into();
        if segment.is_empty() || segment.contains('/') {
            return Err(PathError::EmptySegment {
                path: format!("{self}/{segment}"),
            });
        }
        let mut segments = self.segments.clone();
        segments.push(segment);
        Ok(Self { segments })
    }

    /// Documents live at even depths (collection/doc, collection/doc/sub/doc).
    #[must_use]
    pub fn is_document_path(&self) -> bool {
        !self.segments.is_empty() && self.segments.len() % 2 == 0
    }

    /// Segments joined with `/`.
    #[must_use]
    pub fn canonical_string(&self) -> String {
        self.segments.join("/")
    }
}

impl fmt::Display for ResourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical_string())
    }
}

/// Anything that can name a document by its database-relative path.
///
/// The membership predicate exposed to diagnostic callers accepts any
/// implementor, so callers can pass their own handle types.
pub trait DocumentPath {
    /// Path relative to the database's documents root, e.g. `rooms/eros`.
    fn document_path(&self) -> &str;
}

impl<T: DocumentPath + ?Sized> DocumentPath for &T {
    fn document_path(&self) -> &str {
        (**self).document_path()
    }
}

/// A reference to a single document by its database-relative path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocumentReference {
    path: String,
}

impl DocumentReference {
    /// Create a reference from a slash-separated path such as `col/doc`.
    pub fn new(path: &str) -> Result<Self, PathError> {
        let parsed = ResourcePath::parse(path)?;
        Self::from_resource_path(&parsed)
    }

    /// Create a reference from a parsed path.
    pub fn from_resource_path(path: &ResourcePath) -> Result<Self, PathError> {
        if path.is_empty() {
            return Err(PathError::Empty);
        }
        if !path.is_document_path() {
            return Err(PathError::NotADocument {
                path: path.canonical_string(),
                segments: path.len(),
            });
        }
        Ok(Self {
            path: path.canonical_string(),
        })
    }

    /// Database-relative path of the document.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The document's id (last path segment).
    #[must_use]
    pub fn id(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or_default()
    }

    /// Path of the collection containing this document.
    #[must_use]
    pub fn collection_path(&self) -> &str {
        self.path.rsplit_once('/').map_or("", |(parent, _)| parent)
    }
}

impl DocumentPath for DocumentReference {
    fn document_path(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for DocumentReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

impl TryFrom<String> for DocumentReference {
    type Error = PathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<DocumentReference> for String {
    fn from(value: DocumentReference) -> Self {
        value.path
    }
}

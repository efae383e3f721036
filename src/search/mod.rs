//! Search collaborator boundary
//!
//! Query parsing, matching and document storage live behind [`SearchBackend`].
//! Request handlers never touch a backend directly; they go through a
//! [`SearchHandle`], which serializes access and keeps the blocking work off
//! the async runtime.
//!
//! # Backends
//!
//! - [`MemoryIndex`]: JSON-lines documents held in memory, with a small
//!   boolean query language (see [`query`])

mod handle;
mod memory;
pub mod query;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::render::DocumentRecord;

pub use handle::SearchHandle;
pub use memory::MemoryIndex;

/// Errors raised at the search boundary
#[derive(Debug, Error)]
pub enum SearchError {
    /// Malformed boolean query
    #[error("{0}")]
    QuerySyntax(String),

    /// Required query input missing
    #[error("{0}")]
    EmptyInput(String),

    /// Index could not be read
    #[error("Index error: {0}")]
    Index(String),

    #[error("Search timed out after {0} seconds")]
    Timeout(u64),

    #[error("Search task failed: {0}")]
    Join(String),
}

impl SearchError {
    /// Whether the caller's input is at fault, as opposed to the index
    pub fn is_query_error(&self) -> bool {
        matches!(self, SearchError::QuerySyntax(_) | SearchError::EmptyInput(_))
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;

/// Index statistics, reported by EInfo and the ClinicalTrials.gov version endpoint
#[derive(Debug, Clone)]
pub struct IndexInfo {
    pub name: String,
    pub document_count: usize,
    pub last_update: DateTime<Utc>,
}

/// A searchable document index
///
/// Implementations may be bound to a thread-affine native runtime, so only
/// `Send` is required: the handle guarantees a single caller at a time.
pub trait SearchBackend: Send {
    /// Parse `raw` and return its canonical string form
    ///
    /// `field`, when given, restricts every term of the query to that field.
    /// The parsed tree stays inside the backend.
    fn normalize_query(&self, raw: &str, field: Option<&str>) -> Result<String>;

    /// Number of documents matching a normalized query
    fn total_match_count(&self, query: &str) -> Result<usize>;

    /// Up to `max_hits` matching documents, in index order
    fn search(&self, query: &str, max_hits: usize) -> Result<Vec<DocumentRecord>>;

    /// Documents for the given UIDs, in request order; unknown UIDs are skipped
    fn fetch(&self, ids: &[String]) -> Result<Vec<DocumentRecord>>;

    fn info(&self) -> IndexInfo;
}

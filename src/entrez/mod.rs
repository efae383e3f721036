//! Entrez E-utilities compatible endpoints
//!
//! Each operation resolves its request against the PubMed [`SearchHandle`]
//! and returns a record ready to render. Malformed or missing queries are not
//! transport errors here: they come back as `ERROR` records, answered with a
//! 200 status like NCBI does.

pub mod efetch;
pub mod einfo;
pub mod esearch;
pub mod esummary;

use serde::Deserialize;

pub use efetch::efetch;
pub use einfo::einfo;
pub use esearch::esearch;
pub use esummary::esummary;

use crate::error::{AppError, Result};
use crate::paging::PageWindow;
use crate::render::{DocumentRecord, ResultKind, ResultRecord, RetMode};
use crate::search::{SearchError, SearchHandle};

/// Databases served under `/entrez/eutils`
pub const DATABASES: &[&str] = &["pubmed"];

fn default_retstart() -> i64 {
    0
}

fn default_retmax() -> i64 {
    20
}

fn default_json() -> RetMode {
    RetMode::Json
}

fn default_xml() -> RetMode {
    RetMode::Xml
}

pub(crate) fn is_supported_db(db: &str) -> bool {
    DATABASES.iter().any(|name| name.eq_ignore_ascii_case(db.trim()))
}

pub(crate) fn invalid_db_message(db: &str) -> String {
    format!("Invalid db name specified: {}", db)
}

/// Parameters shared by EFetch and ESummary
#[derive(Debug, Clone, Deserialize)]
pub struct UidParams {
    /// Comma-separated UIDs
    #[serde(default)]
    pub id: String,
    #[serde(default = "default_json")]
    pub retmode: RetMode,
    #[serde(default = "default_retstart")]
    pub retstart: i64,
    #[serde(default = "default_retmax")]
    pub retmax: i64,
}

impl UidParams {
    /// Trimmed non-empty UIDs in request order
    pub fn uids(&self) -> Vec<String> {
        self.id
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// The requested page of UIDs
    pub fn page(&self) -> Vec<String> {
        let uids = self.uids();
        PageWindow::new(uids.len(), self.retstart, self.retmax)
            .slice(&uids)
            .to_vec()
    }
}

/// Turn query-level failures into `ERROR` records, pass everything else on
pub(crate) fn query_failure(
    retmode: RetMode,
    kind: ResultKind,
    err: SearchError,
) -> Result<ResultRecord> {
    if err.is_query_error() {
        tracing::debug!("Query rejected: {}", err);
        Ok(ResultRecord::error(retmode, kind, err.to_string()))
    } else {
        Err(AppError::Search(err))
    }
}

/// UIDs resolved through the handle, in request order
pub(crate) async fn fetch_page(
    handle: &SearchHandle,
    page: Vec<String>,
) -> std::result::Result<Vec<DocumentRecord>, SearchError> {
    if page.is_empty() {
        return Ok(Vec::new());
    }
    handle.run(move |backend| backend.fetch(&page)).await
}

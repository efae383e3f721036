//! Application state management

use std::path::Path;
use std::sync::Arc;

use crate::config::Config;
use crate::search::{MemoryIndex, SearchHandle};

/// ID field of PubMed documents
pub const PUBMED_ID_FIELD: &str = "id";
/// ID field of ClinicalTrials.gov studies
pub const CTGOV_ID_FIELD: &str = "nct_id";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    pubmed: SearchHandle,
    ctgov: SearchHandle,
}

impl AppState {
    pub fn new(pubmed: SearchHandle, ctgov: SearchHandle) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                pubmed,
                ctgov,
            }),
        }
    }

    /// Load both indexes from the configured paths
    ///
    /// An index that cannot be loaded is replaced by an empty one so the
    /// server still starts.
    pub fn load(config: &Config) -> Self {
        let timeout = config.search.timeout();
        let pubmed = load_index("pubmed", PUBMED_ID_FIELD, &config.index.pubmed_path);
        let ctgov = load_index("ctgov", CTGOV_ID_FIELD, &config.index.ctgov_path);

        Self::new(
            SearchHandle::with_timeout(pubmed, timeout),
            SearchHandle::with_timeout(ctgov, timeout),
        )
    }

    /// Get the PubMed search handle
    pub fn pubmed(&self) -> &SearchHandle {
        &self.inner.pubmed
    }

    /// Get the ClinicalTrials.gov search handle
    pub fn ctgov(&self) -> &SearchHandle {
        &self.inner.ctgov
    }
}

fn load_index(name: &str, id_field: &str, path: &Path) -> MemoryIndex {
    match MemoryIndex::load(name, id_field, path) {
        Ok(index) => {
            if index.is_empty() {
                tracing::warn!("{} index at {} has no documents", name, path.display());
            }
            index
        }
        Err(e) => {
            tracing::warn!("Failed to load {} index: {}. Serving an empty index", name, e);
            MemoryIndex::new(name, id_field, Vec::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_load_falls_back_to_empty_index() {
        let mut pubmed = tempfile::NamedTempFile::new().unwrap();
        writeln!(pubmed, r#"{{"id": "1", "title": "aspirin"}}"#).unwrap();

        let mut config = Config::default();
        config.index.pubmed_path = pubmed.path().to_path_buf();
        config.index.ctgov_path = "/nonexistent/ctgov".into();

        let state = AppState::load(&config);
        assert_eq!(state.pubmed().info().await.unwrap().document_count, 1);
        assert_eq!(state.ctgov().info().await.unwrap().document_count, 0);
    }
}

//! ESearch: boolean query to a page of UIDs

use serde::Deserialize;

use super::{
    default_retmax, default_retstart, default_xml, invalid_db_message, is_supported_db,
    query_failure,
};
use crate::error::Result;
use crate::paging::{self, PageWindow};
use crate::render::{
    ESearchResult, FieldValue, ResultKind, ResultRecord, RetMode, TranslationSet, TrecRun,
};
use crate::search::SearchHandle;
use crate::state::PUBMED_ID_FIELD;

/// Answer to a request without a search term
pub const EMPTY_TERM_MESSAGE: &str = "Empty term and query_key - nothing todo";

#[derive(Debug, Clone, Deserialize)]
pub struct ESearchParams {
    pub term: Option<String>,
    #[serde(default = "default_retstart")]
    pub retstart: i64,
    #[serde(default = "default_retmax")]
    pub retmax: i64,
    #[serde(default = "default_xml")]
    pub retmode: RetMode,
    /// Restrict every query atom to this field
    pub field: Option<String>,
    #[serde(default = "default_db")]
    pub db: String,
    #[serde(default = "default_trecqid")]
    pub trecqid: String,
    #[serde(default = "default_trectag")]
    pub trectag: String,
}

fn default_db() -> String {
    "pubmed".to_string()
}

fn default_trecqid() -> String {
    TrecRun::default().query_id
}

fn default_trectag() -> String {
    TrecRun::default().tag
}

/// Run a search and build the page of matching UIDs
pub async fn esearch(handle: &SearchHandle, params: ESearchParams) -> Result<ResultRecord> {
    let ESearchParams {
        term,
        retstart,
        retmax,
        retmode,
        field,
        db,
        trecqid,
        trectag,
    } = params;

    let Some(term) = term.filter(|t| !t.trim().is_empty()) else {
        return Ok(ResultRecord::error(retmode, ResultKind::Search, EMPTY_TERM_MESSAGE));
    };

    if !is_supported_db(&db) {
        return Ok(ResultRecord::error(
            retmode,
            ResultKind::ESearch,
            invalid_db_message(&db),
        ));
    }

    tracing::debug!(
        "ESearch term={:?} field={:?} retstart={} retmax={}",
        term,
        field,
        retstart,
        retmax
    );

    let raw = term.clone();
    let outcome = handle
        .run(move |backend| {
            let normalized = backend.normalize_query(&raw, field.as_deref())?;
            let total = backend.total_match_count(&normalized)?;
            let window = PageWindow::new(total, retstart, retmax);
            let hits = backend.search(&normalized, window.end)?;
            let ids = window
                .slice(&hits)
                .iter()
                .filter_map(|doc| doc.get(PUBMED_ID_FIELD).and_then(FieldValue::first_scalar))
                .map(str::to_string)
                .collect::<Vec<_>>();
            Ok((normalized, total, ids))
        })
        .await;

    let (normalized, count, idlist) = match outcome {
        Ok(found) => found,
        Err(e) => return query_failure(retmode, ResultKind::Search, e),
    };

    Ok(ResultRecord::ESearch(ESearchResult {
        retmode,
        count,
        retmax: paging::non_negative(retmax),
        retstart: paging::non_negative(retstart),
        idlist,
        querytranslation: normalized.clone(),
        translationset: TranslationSet {
            from: term,
            to: normalized,
        },
        trec: TrecRun {
            query_id: trecqid,
            tag: trectag,
        },
    }))
}

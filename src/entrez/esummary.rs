//! ESummary: lightweight summaries for a list of UIDs

use super::efetch::EMPTY_ID_MESSAGE;
use super::{fetch_page, query_failure, UidParams};
use crate::error::Result;
use crate::paging;
use crate::render::{DocumentRecord, ESummaryResult, FieldValue, ResultKind, ResultRecord};
use crate::search::SearchHandle;

/// Authors kept per summary
pub const MAX_AUTHORS: usize = 5;

/// Summary field and the document field it is read from
const PROJECTION: &[(&str, &str)] = &[
    ("id", "id"),
    ("title", "title"),
    ("authors", "authors"),
    ("journal", "journal"),
    ("pubdate", "date"),
    ("pubtype", "publication_type"),
];

pub async fn esummary(handle: &SearchHandle, params: UidParams) -> Result<ResultRecord> {
    if params.uids().is_empty() {
        return Ok(ResultRecord::error(
            params.retmode,
            ResultKind::ESummary,
            EMPTY_ID_MESSAGE,
        ));
    }

    let page = params.page();
    tracing::debug!("ESummary {} of {} UIDs", page.len(), params.uids().len());

    match fetch_page(handle, page).await {
        Ok(documents) => Ok(ResultRecord::ESummary(ESummaryResult {
            retmode: params.retmode,
            retstart: paging::non_negative(params.retstart),
            retmax: paging::non_negative(params.retmax),
            summaries: documents.iter().map(to_summary).collect(),
        })),
        Err(e) => query_failure(params.retmode, ResultKind::ESummary, e),
    }
}

/// Project a document onto the summary fields; absent fields are omitted
pub fn to_summary(document: &DocumentRecord) -> DocumentRecord {
    PROJECTION
        .iter()
        .filter_map(|&(name, source)| {
            let value = document.get(source)?;
            let value = match (name, value) {
                ("authors", FieldValue::Sequence(authors)) => {
                    FieldValue::Sequence(authors.iter().take(MAX_AUTHORS).cloned().collect())
                }
                _ => value.clone(),
            };
            Some((name.to_string(), value))
        })
        .collect()
}

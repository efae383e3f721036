//! EFetch: full documents for a list of UIDs

use super::{fetch_page, query_failure, UidParams};
use crate::error::Result;
use crate::render::{EFetchResult, ResultKind, ResultRecord};
use crate::search::SearchHandle;

/// Answer to a request without any UID
pub const EMPTY_ID_MESSAGE: &str = "Empty id list - nothing todo";

/// Fetch the requested page of documents, in request order
///
/// UIDs missing from the index are skipped.
pub async fn efetch(handle: &SearchHandle, params: UidParams) -> Result<ResultRecord> {
    if params.uids().is_empty() {
        return Ok(ResultRecord::error(
            params.retmode,
            ResultKind::EFetch,
            EMPTY_ID_MESSAGE,
        ));
    }

    let page = params.page();
    tracing::debug!("EFetch {} of {} UIDs", page.len(), params.uids().len());

    match fetch_page(handle, page).await {
        Ok(articles) => Ok(ResultRecord::EFetch(EFetchResult {
            retmode: params.retmode,
            articles,
        })),
        Err(e) => query_failure(params.retmode, ResultKind::EFetch, e),
    }
}

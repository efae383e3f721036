//! Entrez E-utilities routes
//!
//! Served under `/entrez/eutils`, against the PubMed index.

use axum::{
    extract::{Query, State},
    routing::get,
    Router,
};

use crate::entrez::{self, einfo::EInfoParams, esearch::ESearchParams, UidParams};
use crate::error::Result;
use crate::render::Rendered;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/esearch.fcgi", get(esearch))
        .route("/efetch.fcgi", get(efetch))
        .route("/esummary.fcgi", get(esummary))
        .route("/einfo.fcgi", get(einfo))
}

async fn esearch(
    State(state): State<AppState>,
    Query(params): Query<ESearchParams>,
) -> Result<Rendered> {
    let record = entrez::esearch(state.pubmed(), params).await?;
    Ok(record.render()?)
}

async fn efetch(
    State(state): State<AppState>,
    Query(params): Query<UidParams>,
) -> Result<Rendered> {
    let record = entrez::efetch(state.pubmed(), params).await?;
    Ok(record.render()?)
}

async fn esummary(
    State(state): State<AppState>,
    Query(params): Query<UidParams>,
) -> Result<Rendered> {
    let record = entrez::esummary(state.pubmed(), params).await?;
    Ok(record.render()?)
}

async fn einfo(
    State(state): State<AppState>,
    Query(params): Query<EInfoParams>,
) -> Result<Rendered> {
    let result = entrez::einfo(state.pubmed(), params).await?;
    Ok(result.render()?)
}

//! ClinicalTrials.gov v2 routes

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};

use crate::ctgov::{self, StudiesParams, StudyParams, StudyResponse, VersionResponse};
use crate::error::Result;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/version", get(version))
        .route("/studies", get(studies))
        .route("/studies/:nct_id", get(study))
}

async fn version(State(state): State<AppState>) -> Result<Json<VersionResponse>> {
    Ok(Json(ctgov::version(state.ctgov()).await?))
}

async fn studies(
    State(state): State<AppState>,
    Query(params): Query<StudiesParams>,
) -> Result<StudyResponse> {
    ctgov::studies(state.ctgov(), params).await
}

async fn study(
    State(state): State<AppState>,
    Path(nct_id): Path<String>,
    Query(params): Query<StudyParams>,
) -> Result<StudyResponse> {
    ctgov::study(state.ctgov(), &nct_id, params).await
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::Value;

    use crate::ctgov::STUDY_NOT_FOUND;
    use crate::routes::tests::get;

    #[tokio::test]
    async fn test_version() {
        let (status, content_type, body) = get("/ct/api/v2/version").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type, "application/json");
        let value: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["apiVersion"], "2.0.3");
    }

    #[tokio::test]
    async fn test_studies() {
        let (status, content_type, body) =
            get("/ct/api/v2/studies?query.term=migraine&pageSize=2").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type, "application/json");

        let value: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["totalCount"], 3);
        assert_eq!(value["studies"].as_array().unwrap().len(), 2);
        assert_eq!(value["nextPageToken"], "2");
    }

    #[tokio::test]
    async fn test_studies_text_format() {
        let (status, content_type, body) =
            get("/ct/api/v2/studies?query.term=stroke&format=csv").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type, "text/plain");
        assert!(body.starts_with('{'));
    }

    #[tokio::test]
    async fn test_studies_bad_requests() {
        for uri in [
            "/ct/api/v2/studies",
            "/ct/api/v2/studies?query.term=migraine&pageToken=next",
            "/ct/api/v2/studies?query.term=%28migraine",
        ] {
            let (status, _, _) = get(uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        }
    }

    #[tokio::test]
    async fn test_single_study() {
        let (status, _, body) = get("/ct/api/v2/studies/NCT00000002").await;
        assert_eq!(status, StatusCode::OK);
        let value: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(
            value["protocolSection"]["statusModule"]["overallStatus"],
            "RECRUITING"
        );
    }

    #[tokio::test]
    async fn test_unknown_study() {
        let (status, content_type, body) = get("/ct/api/v2/studies/NCT12345678").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(content_type, "text/plain");
        assert_eq!(body, STUDY_NOT_FOUND);
    }
}

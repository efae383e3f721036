//! ClinicalTrials.gov v2 compatible endpoints

pub mod studies;

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::Value;

pub use studies::{studies, study, StudiesParams, StudyParams};

use crate::error::Result;
use crate::render::mime;
use crate::search::SearchHandle;

/// API version reported by `/version`
pub const API_VERSION: &str = "2.0.3";

/// Body of an unknown study lookup
pub const STUDY_NOT_FOUND: &str = "Parameter `nctId` has incorrect format or NCT number not found";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionResponse {
    pub api_version: &'static str,
    pub data_timestamp: String,
}

/// API version and the load time of the study index
pub async fn version(handle: &SearchHandle) -> Result<VersionResponse> {
    let info = handle.info().await?;
    Ok(VersionResponse {
        api_version: API_VERSION,
        data_timestamp: info.last_update.format("%Y-%m-%dT%H:%M:%S").to_string(),
    })
}

/// A study endpoint answer
///
/// `format=json` is served as `application/json`; any other format gets the
/// same JSON body as `text/plain`.
#[derive(Debug, Clone, PartialEq)]
pub enum StudyResponse {
    Found { media_type: &'static str, body: Value },
    NotFound,
}

impl StudyResponse {
    pub fn found(format: &str, body: Value) -> Self {
        StudyResponse::Found {
            media_type: media_type(format),
            body,
        }
    }
}

fn media_type(format: &str) -> &'static str {
    if format.trim().eq_ignore_ascii_case("json") {
        mime::JSON
    } else {
        mime::TEXT
    }
}

fn default_format() -> String {
    "json".to_string()
}

impl IntoResponse for StudyResponse {
    fn into_response(self) -> Response {
        match self {
            StudyResponse::Found { media_type, body } => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, media_type)],
                body.to_string(),
            )
                .into_response(),
            StudyResponse::NotFound => (
                StatusCode::NOT_FOUND,
                [(header::CONTENT_TYPE, mime::TEXT)],
                STUDY_NOT_FOUND,
            )
                .into_response(),
        }
    }
}

//! Study search and single-study lookup

use serde::Deserialize;
use serde_json::{json, Value};

use super::{default_format, StudyResponse};
use crate::error::{AppError, Result};
use crate::paging::PageWindow;
use crate::render::{DocumentRecord, FieldValue};
use crate::search::SearchHandle;

#[derive(Debug, Clone, Deserialize)]
pub struct StudiesParams {
    #[serde(rename = "query.term")]
    pub query_term: Option<String>,
    #[serde(rename = "pageSize", default = "default_page_size")]
    pub page_size: i64,
    /// Decimal offset of the page, as handed out in `nextPageToken`
    #[serde(rename = "pageToken")]
    pub page_token: Option<String>,
    #[serde(default = "default_format")]
    pub format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StudyParams {
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_page_size() -> i64 {
    10
}

/// Search studies and return one page of them
pub async fn studies(handle: &SearchHandle, params: StudiesParams) -> Result<StudyResponse> {
    let term = params
        .query_term
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Parameter `query.term` is required".to_string()))?;

    let start = match params.page_token.as_deref() {
        None => 0,
        Some(token) => token
            .trim()
            .parse::<i64>()
            .map_err(|_| AppError::BadRequest(format!("Invalid pageToken: {}", token)))?,
    };
    let page_size = params.page_size;

    tracing::debug!("Studies query={:?} start={} size={}", term, start, page_size);

    let (total, next, page) = handle
        .run(move |backend| {
            let query = backend.normalize_query(&term, None)?;
            let total = backend.total_match_count(&query)?;
            let window = PageWindow::new(total, start, page_size);
            let hits = backend.search(&query, window.end)?;
            Ok((total, window.next_start(total), window.slice(&hits).to_vec()))
        })
        .await?;

    let studies: Vec<Value> = page.iter().map(study_summary).collect();
    let mut body = json!({
        "totalCount": total,
        "studies": studies,
    });
    if let Some(next) = next {
        body["nextPageToken"] = Value::String(next.to_string());
    }

    Ok(StudyResponse::found(&params.format, body))
}

/// Look up one study by NCT number
pub async fn study(
    handle: &SearchHandle,
    nct_id: &str,
    params: StudyParams,
) -> Result<StudyResponse> {
    let ids = vec![nct_id.trim().to_string()];
    let mut found = handle.run(move |backend| backend.fetch(&ids)).await?;

    if found.is_empty() {
        tracing::debug!("Study {} not found", nct_id);
        return Ok(StudyResponse::NotFound);
    }

    let study = found.swap_remove(0);
    Ok(StudyResponse::found(&params.format, study_detail(&study)))
}

/// First element of a stored field, `null` when absent
fn first(study: &DocumentRecord, field: &str) -> Value {
    study
        .get(field)
        .and_then(FieldValue::first_scalar)
        .map_or(Value::Null, |v| Value::String(v.to_string()))
}

fn study_summary(study: &DocumentRecord) -> Value {
    json!({
        "protocolSection": {
            "identificationModule": {
                "nctId": first(study, "nct_id"),
                "briefTitle": first(study, "brief_title"),
            },
            "statusModule": {
                "overallStatus": first(study, "overall_status"),
            },
        },
        "hasResults": null,
    })
}

fn study_detail(study: &DocumentRecord) -> Value {
    json!({
        "protocolSection": {
            "identificationModule": {
                "nctId": first(study, "nct_id"),
                "briefTitle": first(study, "brief_title"),
                "officialTitle": first(study, "official_title"),
            },
            "statusModule": {
                "overallStatus": first(study, "overall_status"),
            },
            "descriptionModule": {
                "briefSummary": first(study, "brief_summary"),
            },
        },
        "hasResults": null,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ctgov::tests::ctgov_handle;

    fn params(term: Option<&str>, size: i64, token: Option<&str>) -> StudiesParams {
        StudiesParams {
            query_term: term.map(str::to_string),
            page_size: size,
            page_token: token.map(str::to_string),
            format: "json".to_string(),
        }
    }

    fn body(response: StudyResponse) -> Value {
        match response {
            StudyResponse::Found { body, .. } => body,
            StudyResponse::NotFound => panic!("expected a study body"),
        }
    }

    fn nct_ids(body: &Value) -> Vec<&str> {
        body["studies"]
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["protocolSection"]["identificationModule"]["nctId"].as_str().unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_studies_first_page() {
        let response = studies(&ctgov_handle(), params(Some("migraine"), 2, None))
            .await
            .unwrap();
        let body = body(response);
        assert_eq!(body["totalCount"], 3);
        assert_eq!(nct_ids(&body), ["NCT00000001", "NCT00000002"]);
        assert_eq!(body["nextPageToken"], "2");
        assert_eq!(
            body["studies"][0],
            json!({
                "protocolSection": {
                    "identificationModule": {
                        "nctId": "NCT00000001",
                        "briefTitle": "Aspirin in migraine"
                    },
                    "statusModule": {"overallStatus": "COMPLETED"}
                },
                "hasResults": null
            })
        );
    }

    #[tokio::test]
    async fn test_studies_last_page() {
        let response = studies(&ctgov_handle(), params(Some("migraine"), 2, Some("2")))
            .await
            .unwrap();
        let body = body(response);
        assert_eq!(nct_ids(&body), ["NCT00000003"]);
        assert!(body.get("nextPageToken").is_none());
    }

    #[tokio::test]
    async fn test_studies_past_end() {
        let response = studies(&ctgov_handle(), params(Some("migraine"), 10, Some("7")))
            .await
            .unwrap();
        let body = body(response);
        assert_eq!(body["totalCount"], 3);
        assert!(nct_ids(&body).is_empty());
    }

    #[tokio::test]
    async fn test_studies_format() {
        let mut p = params(Some("stroke"), 10, None);
        p.format = "csv".to_string();
        let response = studies(&ctgov_handle(), p).await.unwrap();
        assert!(matches!(
            response,
            StudyResponse::Found { media_type: "text/plain", .. }
        ));
    }

    #[tokio::test]
    async fn test_studies_bad_input() {
        let missing = studies(&ctgov_handle(), params(None, 10, None)).await;
        assert!(matches!(missing, Err(AppError::BadRequest(_))));

        let token = studies(&ctgov_handle(), params(Some("migraine"), 10, Some("abc"))).await;
        assert!(matches!(token, Err(AppError::BadRequest(_))));

        let query = studies(&ctgov_handle(), params(Some("(migraine"), 10, None)).await;
        assert!(matches!(query, Err(AppError::Search(ref e)) if e.is_query_error()));
    }

    #[tokio::test]
    async fn test_single_study() {
        let params = StudyParams {
            format: "json".to_string(),
        };
        let response = study(&ctgov_handle(), "NCT00000004", params).await.unwrap();
        let body = body(response);
        let section = &body["protocolSection"];
        assert_eq!(
            section["identificationModule"]["officialTitle"],
            "Official: Statins after stroke"
        );
        assert_eq!(
            section["descriptionModule"]["briefSummary"],
            "Summary of Statins after stroke"
        );
        assert_eq!(body["hasResults"], Value::Null);
    }

    #[tokio::test]
    async fn test_unknown_study() {
        let params = StudyParams {
            format: "json".to_string(),
        };
        let response = study(&ctgov_handle(), "NCT99999999", params).await.unwrap();
        assert_eq!(response, StudyResponse::NotFound);
    }
}

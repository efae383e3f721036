//! Route modules for Orbit Server

pub mod ctgov;
pub mod entrez;
pub mod health;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the full application router
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/health", health::router())
        .nest("/entrez/eutils", entrez::router())
        .nest("/ct/api/v2", ctgov::router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
pub(crate) mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        Router,
    };
    use tower::ServiceExt;

    use super::app;
    use crate::ctgov::tests::ctgov_handle;
    use crate::entrez::tests::pubmed_handle;
    use crate::state::AppState;

    pub(crate) fn test_app() -> Router {
        app(AppState::new(pubmed_handle(), ctgov_handle()))
    }

    /// Status, content type and body of a GET request
    pub(crate) async fn get(uri: &str) -> (StatusCode, String, String) {
        let response = test_app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .map(|v| v.to_str().unwrap().to_string())
            .unwrap_or_default();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, content_type, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let (status, _, _) = get("/entrez/eutils/elink.fcgi").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}

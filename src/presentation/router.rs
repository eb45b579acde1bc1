// Route table
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    get_analytics, get_charts, get_dashboard, health_check, list_comments, list_issues,
};
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/api/issues", get(list_issues))
        .route("/api/issues/:id/comments", get(list_comments))
        .route("/api/analytics", get(get_analytics))
        .route("/api/analytics/charts", get(get_charts))
        .route("/api/dashboard", get(get_dashboard))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::issue_repository::{IssueDataSource, IssueFilter};
    use crate::domain::comment::Comment;
    use crate::domain::issue::Issue;
    use crate::error::DataSourceError;
    use crate::infrastructure::fixture_source::{FixtureDataSource, Fixtures};
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    fn app(fixtures: Fixtures) -> Router {
        let source = Arc::new(FixtureDataSource::new(fixtures).unwrap());
        build_router(Arc::new(AppState::new(source)))
    }

    async fn get_json(router: Router, uri: &str) -> (StatusCode, Value) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    struct TimingOutSource;

    #[async_trait]
    impl IssueDataSource for TimingOutSource {
        async fn list_issues(&self, _filter: &IssueFilter) -> Result<Vec<Issue>, DataSourceError> {
            Err(DataSourceError::Timeout {
                url: "http://backend/api/issues".to_string(),
            })
        }

        async fn list_comments(&self, _issue_id: &str) -> Result<Vec<Comment>, DataSourceError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_health_check() {
        let response = app(Fixtures::default())
            .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_analytics_endpoint() {
        let (status, body) = get_json(app(Fixtures::sample()), "/api/analytics").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totalIssues"], 3);
        assert_eq!(body["resolvedIssues"], 1);
        assert_eq!(body["pendingIssues"], 1);
        assert_eq!(body["avgResolutionTime"], 6.0);
        assert_eq!(body["issuesByCategory"]["utilities"], 0);
        assert_eq!(body["issuesByPriority"]["medium"], 2);
    }

    #[tokio::test]
    async fn test_analytics_window() {
        let (status, body) = get_json(
            app(Fixtures::sample()),
            "/api/analytics?from=2025-09-13T00:00:00Z&to=2025-09-30T00:00:00Z",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totalIssues"], 2);
        assert_eq!(body["resolvedIssues"], 0);
    }

    #[tokio::test]
    async fn test_inverted_window_is_bad_request() {
        let (status, body) = get_json(
            app(Fixtures::sample()),
            "/api/analytics?from=2025-09-30T00:00:00Z&to=2025-09-01T00:00:00Z",
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "bad_request");
    }

    #[tokio::test]
    async fn test_malformed_query_is_json_bad_request() {
        for uri in [
            "/api/analytics?from=garbage",
            "/api/dashboard?days=soon",
            "/api/issues?status=closed",
            "/api/issues/1/comments?viewer=mayor",
        ] {
            let (status, body) = get_json(app(Fixtures::sample()), uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(body["error"], "bad_request", "{uri}");
            assert!(body["message"].as_str().is_some_and(|m| !m.is_empty()), "{uri}");
        }
    }

    #[tokio::test]
    async fn test_days_window() {
        // Sample issues are from September 2025, long before "now".
        let (status, body) = get_json(app(Fixtures::sample()), "/api/analytics?days=7").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totalIssues"], 0);

        let (status, _) = get_json(
            app(Fixtures::sample()),
            "/api/analytics?days=7&from=2025-09-01T00:00:00Z",
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_charts_endpoint_has_stable_keys() {
        let (_, body) = get_json(app(Fixtures::default()), "/api/analytics/charts").await;

        let labels: Vec<&str> = body["category"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["label"].as_str().unwrap())
            .collect();
        assert_eq!(
            labels,
            vec!["infrastructure", "safety", "environment", "utilities", "other"]
        );
        assert_eq!(body["priority"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_issue_listing_filters() {
        let (status, body) = get_json(
            app(Fixtures::sample()),
            "/api/issues?status=in-progress&assignedTo=2",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let issues = body.as_array().unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0]["title"], "Pothole on Main Street");
    }

    #[tokio::test]
    async fn test_comment_visibility() {
        let (_, body) = get_json(app(Fixtures::sample()), "/api/issues/1/comments").await;
        assert_eq!(body.as_array().unwrap().len(), 1);

        let (_, body) = get_json(
            app(Fixtures::sample()),
            "/api/issues/1/comments?viewer=authority",
        )
        .await;
        assert_eq!(body.as_array().unwrap().len(), 2);
    }

    struct InvalidRecordSource;

    #[async_trait]
    impl IssueDataSource for InvalidRecordSource {
        async fn list_issues(&self, _filter: &IssueFilter) -> Result<Vec<Issue>, DataSourceError> {
            let mut issues = Fixtures::sample().issues;
            issues[2].resolved_at = None;
            Ok(issues)
        }

        async fn list_comments(&self, _issue_id: &str) -> Result<Vec<Comment>, DataSourceError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_invalid_record_is_unprocessable() {
        let router = build_router(Arc::new(AppState::new(Arc::new(InvalidRecordSource))));
        let (status, body) = get_json(router, "/api/dashboard").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "validation");
    }

    #[tokio::test]
    async fn test_timeout_is_gateway_timeout() {
        let router = build_router(Arc::new(AppState::new(Arc::new(TimingOutSource))));
        let (status, body) = get_json(router, "/api/analytics").await;

        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(body["error"], "data_source_timeout");
    }

    #[tokio::test]
    async fn test_dashboard() {
        let (status, body) = get_json(app(Fixtures::sample()), "/api/dashboard").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["tiles"].as_array().unwrap().len(), 6);
        assert_eq!(body["tiles"][1]["id"], "in-progress-issues");
        assert_eq!(body["tiles"][1]["value"], 1.0);
        assert_eq!(body["charts"][0]["id"], "issues-by-category");
        assert_eq!(body["charts"][1]["kind"], "pie");
    }
}

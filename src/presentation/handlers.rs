// HTTP request handlers
use crate::application::analytics_service::ChartSeries;
use crate::application::issue_repository::IssueFilter;
use crate::domain::analytics::Analytics;
use crate::domain::comment::Comment;
use crate::domain::dashboard::Dashboard;
use crate::domain::issue::{Issue, IssueCategory, IssuePriority, IssueStatus};
use crate::domain::user::RoleKind;
use crate::domain::window::TimeWindow;
use crate::infrastructure::http_response::ApiError;
use crate::presentation::app_state::AppState;
use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
pub struct RangeQuery {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    /// Shorthand for the last N days up to now; excludes `from`/`to`.
    pub days: Option<i64>,
}

impl RangeQuery {
    fn window(&self) -> Result<Option<TimeWindow>, ApiError> {
        if let Some(days) = self.days {
            if self.from.is_some() || self.to.is_some() {
                return Err(ApiError::BadRequest(
                    "`days` cannot be combined with `from`/`to`".to_string(),
                ));
            }
            if days < 0 {
                return Err(ApiError::BadRequest("`days` must not be negative".to_string()));
            }
            return Ok(Some(TimeWindow::last_days(days, Utc::now())));
        }
        if self.from.is_none() && self.to.is_none() {
            return Ok(None);
        }
        Ok(Some(TimeWindow::new(self.from, self.to)?))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueQuery {
    pub status: Option<IssueStatus>,
    pub category: Option<IssueCategory>,
    pub priority: Option<IssuePriority>,
    pub citizen_id: Option<String>,
    pub assigned_to: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl IssueQuery {
    fn into_filter(self) -> Result<IssueFilter, ApiError> {
        let window = RangeQuery {
            from: self.from,
            to: self.to,
            days: None,
        }
        .window()?;

        Ok(IssueFilter {
            status: self.status,
            category: self.category,
            priority: self.priority,
            citizen_id: self.citizen_id,
            assigned_to: self.assigned_to,
            window,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct CommentQuery {
    pub viewer: Option<RoleKind>,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

pub async fn list_issues(
    query: Result<Query<IssueQuery>, QueryRejection>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Issue>>, ApiError> {
    let Query(query) = query?;
    let filter = query.into_filter()?;
    let issues = state.issue_service.list_issues(&filter).await?;
    Ok(Json(issues))
}

/// Comments on an issue; internal notes only when `viewer=authority`
pub async fn list_comments(
    Path(id): Path<String>,
    query: Result<Query<CommentQuery>, QueryRejection>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Comment>>, ApiError> {
    let Query(query) = query?;
    let viewer = query.viewer.unwrap_or(RoleKind::Citizen);
    let comments = state.issue_service.comments(&id, viewer).await?;
    Ok(Json(comments))
}

pub async fn get_analytics(
    range: Result<Query<RangeQuery>, QueryRejection>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Analytics>, ApiError> {
    let Query(range) = range?;
    let analytics = state.analytics_service.analytics(range.window()?).await?;
    Ok(Json(analytics))
}

pub async fn get_charts(
    range: Result<Query<RangeQuery>, QueryRejection>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<ChartSeries>, ApiError> {
    let Query(range) = range?;
    let charts = state.analytics_service.charts(range.window()?).await?;
    Ok(Json(charts))
}

pub async fn get_dashboard(
    range: Result<Query<RangeQuery>, QueryRejection>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Dashboard>, ApiError> {
    let Query(range) = range?;
    let dashboard = state.analytics_service.dashboard(range.window()?).await?;
    Ok(Json(dashboard))
}

// Analytics service - Use cases for dashboard figures and charts
use crate::application::issue_repository::{IssueDataSource, IssueFilter};
use crate::application::metrics::{compute_analytics, group_for_chart};
use crate::domain::analytics::Analytics;
use crate::domain::chart::{ChartData, ChartKind, ChartPoint, TileData};
use crate::domain::dashboard::Dashboard;
use crate::domain::window::TimeWindow;
use crate::error::MetricsError;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub category: Vec<ChartPoint>,
    pub priority: Vec<ChartPoint>,
}

#[derive(Clone)]
pub struct AnalyticsService {
    source: Arc<dyn IssueDataSource>,
}

impl AnalyticsService {
    pub fn new(source: Arc<dyn IssueDataSource>) -> Self {
        Self { source }
    }

    /// Derive analytics from the current issue collection.
    ///
    /// When listing fails for an all-time request, the source's precomputed
    /// snapshot is used instead if it has one. A failed listing never turns
    /// into zeroed figures.
    pub async fn analytics(&self, window: Option<TimeWindow>) -> Result<Analytics, MetricsError> {
        let window = window.filter(|w| !w.is_unbounded());

        let issues = match self.source.list_issues(&IssueFilter::all()).await {
            Ok(issues) => issues,
            Err(e) if window.is_none() => {
                tracing::warn!("Listing issues failed, trying analytics snapshot: {}", e);
                return match self.source.get_analytics().await {
                    Ok(Some(snapshot)) => {
                        snapshot.validate()?;
                        tracing::info!("Serving precomputed analytics snapshot");
                        Ok(snapshot)
                    }
                    Ok(None) => Err(e.into()),
                    Err(snapshot_err) => {
                        tracing::error!("Analytics snapshot unavailable: {}", snapshot_err);
                        Err(e.into())
                    }
                };
            }
            Err(e) => return Err(e.into()),
        };

        tracing::debug!("Computing analytics over {} issues", issues.len());
        Ok(compute_analytics(&issues, window.as_ref())?)
    }

    pub async fn charts(&self, window: Option<TimeWindow>) -> Result<ChartSeries, MetricsError> {
        let analytics = self.analytics(window).await?;
        Ok(ChartSeries {
            category: group_for_chart(&analytics.issues_by_category),
            priority: group_for_chart(&analytics.issues_by_priority),
        })
    }

    pub async fn dashboard(&self, window: Option<TimeWindow>) -> Result<Dashboard, MetricsError> {
        let title = match window.as_ref().and_then(|w| w.start()) {
            Some(start) => format!("Issue analytics since {}", start.format("%Y-%m-%d")),
            None => "Issue analytics".to_string(),
        };

        let analytics = self.analytics(window).await?;
        let tiles = build_tiles(&analytics);
        let charts = vec![
            ChartData::new(
                "issues-by-category",
                "Issues by Category",
                ChartKind::Bar,
                group_for_chart(&analytics.issues_by_category),
            ),
            ChartData::new(
                "issues-by-priority",
                "Issues by Priority",
                ChartKind::Pie,
                group_for_chart(&analytics.issues_by_priority),
            ),
        ];

        Ok(Dashboard::new(title, analytics, tiles, charts))
    }
}

fn build_tiles(analytics: &Analytics) -> Vec<TileData> {
    let mut tiles = vec![
        TileData::new("total-issues", "Total Issues", "", analytics.total_issues as f64, 0),
        TileData::new(
            "in-progress-issues",
            "In Progress",
            "",
            analytics.in_progress_issues() as f64,
            0,
        ),
        TileData::new("resolved-issues", "Resolved", "", analytics.resolved_issues as f64, 0),
        TileData::new("pending-issues", "Pending", "", analytics.pending_issues as f64, 0),
        TileData::new("resolution-rate", "Resolution Rate", "%", analytics.resolution_rate(), 1),
        TileData::new(
            "avg-resolution-time",
            "Avg Resolution Time",
            "days",
            analytics.avg_resolution_time,
            1,
        ),
    ];

    if let Some(rate) = analytics.satisfaction_rate {
        tiles.push(TileData::new("satisfaction-rate", "Satisfaction", "%", rate, 0));
    }

    tiles
}

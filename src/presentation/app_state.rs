// Application state for HTTP handlers
use crate::application::analytics_service::AnalyticsService;
use crate::application::issue_repository::IssueDataSource;
use crate::application::issue_service::IssueService;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub analytics_service: AnalyticsService,
    pub issue_service: IssueService,
}

impl AppState {
    pub fn new(source: Arc<dyn IssueDataSource>) -> Self {
        Self {
            analytics_service: AnalyticsService::new(source.clone()),
            issue_service: IssueService::new(source),
        }
    }
}

// Data source trait for issue data access
use crate::domain::analytics::Analytics;
use crate::domain::comment::Comment;
use crate::domain::issue::{Issue, IssueCategory, IssuePriority, IssueStatus};
use crate::domain::window::TimeWindow;
use crate::error::DataSourceError;
use async_trait::async_trait;
use chrono::SecondsFormat;

/// Narrows `list_issues`. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IssueFilter {
    pub status: Option<IssueStatus>,
    pub category: Option<IssueCategory>,
    pub priority: Option<IssuePriority>,
    pub citizen_id: Option<String>,
    pub assigned_to: Option<String>,
    pub window: Option<TimeWindow>,
}

impl IssueFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn matches(&self, issue: &Issue) -> bool {
        self.status.is_none_or(|s| issue.status == s)
            && self.category.is_none_or(|c| issue.category == c)
            && self.priority.is_none_or(|p| issue.priority == p)
            && self
                .citizen_id
                .as_deref()
                .is_none_or(|id| issue.citizen_id == id)
            && self
                .assigned_to
                .as_deref()
                .is_none_or(|id| issue.assigned_to.as_deref() == Some(id))
            && self.window.is_none_or(|w| w.contains(issue.created_at))
    }

    /// Query-string pairs in the backend's parameter names.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(status) = self.status {
            pairs.push(("status", status.to_string()));
        }
        if let Some(category) = self.category {
            pairs.push(("category", category.to_string()));
        }
        if let Some(priority) = self.priority {
            pairs.push(("priority", priority.to_string()));
        }
        if let Some(citizen_id) = &self.citizen_id {
            pairs.push(("citizenId", citizen_id.clone()));
        }
        if let Some(assigned_to) = &self.assigned_to {
            pairs.push(("assignedTo", assigned_to.clone()));
        }
        if let Some(window) = &self.window {
            if let Some(start) = window.start() {
                pairs.push(("from", start.to_rfc3339_opts(SecondsFormat::Secs, true)));
            }
            if let Some(end) = window.end() {
                pairs.push(("to", end.to_rfc3339_opts(SecondsFormat::Secs, true)));
            }
        }
        pairs
    }
}

#[async_trait]
pub trait IssueDataSource: Send + Sync {
    /// List issues matching the filter
    async fn list_issues(&self, filter: &IssueFilter) -> Result<Vec<Issue>, DataSourceError>;

    /// Precomputed analytics snapshot, if the source keeps one
    async fn get_analytics(&self) -> Result<Option<Analytics>, DataSourceError> {
        Ok(None)
    }

    /// Comments attached to an issue, oldest first
    async fn list_comments(&self, issue_id: &str) -> Result<Vec<Comment>, DataSourceError>;
}

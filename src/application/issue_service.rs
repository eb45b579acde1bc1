// Issue service - Use cases for listing issues and their comments
use crate::application::issue_repository::{IssueDataSource, IssueFilter};
use crate::domain::comment::{visible_comments, Comment};
use crate::domain::issue::Issue;
use crate::domain::user::RoleKind;
use crate::error::MetricsError;
use std::sync::Arc;

#[derive(Clone)]
pub struct IssueService {
    source: Arc<dyn IssueDataSource>,
}

impl IssueService {
    pub fn new(source: Arc<dyn IssueDataSource>) -> Self {
        Self { source }
    }

    /// Issues matching `filter`, oldest first. Invalid records are rejected
    /// rather than passed through.
    pub async fn list_issues(&self, filter: &IssueFilter) -> Result<Vec<Issue>, MetricsError> {
        let mut issues: Vec<Issue> = self
            .source
            .list_issues(filter)
            .await?
            .into_iter()
            .filter(|issue| filter.matches(issue))
            .collect();

        for issue in &issues {
            issue.validate()?;
        }
        issues.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));

        Ok(issues)
    }

    pub async fn comments(
        &self,
        issue_id: &str,
        viewer: RoleKind,
    ) -> Result<Vec<Comment>, MetricsError> {
        let comments = self.source.list_comments(issue_id).await?;
        for comment in &comments {
            comment.validate()?;
        }

        let visible = visible_comments(comments, viewer);
        tracing::debug!(
            "Returning {} comments for issue {} to {:?}",
            visible.len(),
            issue_id,
            viewer
        );
        Ok(visible)
    }
}

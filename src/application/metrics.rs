//! Metrics derivation over an in-memory issue collection.
//!
//! Everything here is pure: the same input always yields the same snapshot,
//! and nothing is cached between calls.

use crate::domain::analytics::{Analytics, CategoryCounts, PriorityCounts, Tally};
use crate::domain::chart::ChartPoint;
use crate::domain::issue::{Issue, IssueStatus};
use crate::domain::window::TimeWindow;
use crate::error::ValidationError;
use std::collections::HashSet;

/// Validate `issues` and aggregate those created inside `window`.
///
/// Every record is validated, including ones the window filters out; a
/// single bad record fails the whole computation. With no resolved issues the
/// average resolution time is 0.
pub fn compute_analytics(
    issues: &[Issue],
    window: Option<&TimeWindow>,
) -> Result<Analytics, ValidationError> {
    validate_issues(issues)?;

    let mut analytics = Analytics::empty();
    let mut by_category = CategoryCounts::default();
    let mut by_priority = PriorityCounts::default();
    let mut resolution_days_sum = 0.0;
    let mut resolution_samples = 0u64;

    for issue in issues
        .iter()
        .filter(|issue| window.is_none_or(|w| w.contains(issue.created_at)))
    {
        analytics.total_issues += 1;
        by_category.increment(issue.category);
        by_priority.increment(issue.priority);

        match issue.status {
            IssueStatus::Pending => analytics.pending_issues += 1,
            IssueStatus::InProgress => {}
            IssueStatus::Resolved => {
                analytics.resolved_issues += 1;
                if let Some(days) = issue.resolution_days() {
                    resolution_days_sum += days;
                    resolution_samples += 1;
                }
            }
        }
    }

    if resolution_samples > 0 {
        analytics.avg_resolution_time = resolution_days_sum / resolution_samples as f64;
    }
    analytics.issues_by_category = by_category;
    analytics.issues_by_priority = by_priority;

    tracing::debug!(
        total = analytics.total_issues,
        resolved = analytics.resolved_issues,
        pending = analytics.pending_issues,
        "computed analytics"
    );

    Ok(analytics)
}

/// Chart series for a tally, ordered by the enum's declaration order.
pub fn group_for_chart<T: Tally>(tally: &T) -> Vec<ChartPoint> {
    tally
        .entries()
        .into_iter()
        .map(|(key, value)| ChartPoint::new(&key.to_string(), value))
        .collect()
}

fn validate_issues(issues: &[Issue]) -> Result<(), ValidationError> {
    let mut seen = HashSet::with_capacity(issues.len());
    for issue in issues {
        issue.validate()?;
        if !seen.insert(issue.id.as_str()) {
            return Err(ValidationError::DuplicateIssueId {
                id: issue.id.clone(),
            });
        }
    }
    Ok(())
}

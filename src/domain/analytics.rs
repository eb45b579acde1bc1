// Analytics snapshot domain model
use super::issue::{IssueCategory, IssuePriority};
use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A fixed-key count per value of an enum domain.
///
/// Every key of the domain is always present, so charts get stable keys even
/// when a value has no issues.
pub trait Tally {
    type Key: Copy + fmt::Display;

    fn count(&self, key: Self::Key) -> u64;
    fn increment(&mut self, key: Self::Key);

    /// Entries in the domain's declaration order.
    fn entries(&self) -> Vec<(Self::Key, u64)>;

    /// Sum of all counts, `None` if it overflows.
    fn total(&self) -> Option<u64> {
        self.entries()
            .iter()
            .try_fold(0u64, |acc, (_, count)| acc.checked_add(*count))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryCounts {
    pub infrastructure: u64,
    pub safety: u64,
    pub environment: u64,
    pub utilities: u64,
    pub other: u64,
}

impl CategoryCounts {
    fn slot_mut(&mut self, key: IssueCategory) -> &mut u64 {
        match key {
            IssueCategory::Infrastructure => &mut self.infrastructure,
            IssueCategory::Safety => &mut self.safety,
            IssueCategory::Environment => &mut self.environment,
            IssueCategory::Utilities => &mut self.utilities,
            IssueCategory::Other => &mut self.other,
        }
    }
}

impl Tally for CategoryCounts {
    type Key = IssueCategory;

    fn count(&self, key: IssueCategory) -> u64 {
        match key {
            IssueCategory::Infrastructure => self.infrastructure,
            IssueCategory::Safety => self.safety,
            IssueCategory::Environment => self.environment,
            IssueCategory::Utilities => self.utilities,
            IssueCategory::Other => self.other,
        }
    }

    fn increment(&mut self, key: IssueCategory) {
        *self.slot_mut(key) += 1;
    }

    fn entries(&self) -> Vec<(IssueCategory, u64)> {
        IssueCategory::ALL
            .iter()
            .map(|&key| (key, self.count(key)))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriorityCounts {
    pub low: u64,
    pub medium: u64,
    pub high: u64,
    pub urgent: u64,
}

impl PriorityCounts {
    fn slot_mut(&mut self, key: IssuePriority) -> &mut u64 {
        match key {
            IssuePriority::Low => &mut self.low,
            IssuePriority::Medium => &mut self.medium,
            IssuePriority::High => &mut self.high,
            IssuePriority::Urgent => &mut self.urgent,
        }
    }
}

impl Tally for PriorityCounts {
    type Key = IssuePriority;

    fn count(&self, key: IssuePriority) -> u64 {
        match key {
            IssuePriority::Low => self.low,
            IssuePriority::Medium => self.medium,
            IssuePriority::High => self.high,
            IssuePriority::Urgent => self.urgent,
        }
    }

    fn increment(&mut self, key: IssuePriority) {
        *self.slot_mut(key) += 1;
    }

    fn entries(&self) -> Vec<(IssuePriority, u64)> {
        IssuePriority::ALL
            .iter()
            .map(|&key| (key, self.count(key)))
            .collect()
    }
}

/// Aggregate figures for the dashboard. Always derived from the issue
/// collection, or taken from a backend snapshot when that is unavailable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    pub total_issues: u64,
    pub resolved_issues: u64,
    pub pending_issues: u64,
    /// Mean days from report to resolution; 0 when nothing is resolved.
    pub avg_resolution_time: f64,
    /// Percentage 0-100. Only backend snapshots carry it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub satisfaction_rate: Option<f64>,
    pub issues_by_category: CategoryCounts,
    pub issues_by_priority: PriorityCounts,
}

impl Analytics {
    pub fn empty() -> Self {
        Self {
            total_issues: 0,
            resolved_issues: 0,
            pending_issues: 0,
            avg_resolution_time: 0.0,
            satisfaction_rate: None,
            issues_by_category: CategoryCounts::default(),
            issues_by_priority: PriorityCounts::default(),
        }
    }

    /// Issues neither pending nor resolved.
    pub fn in_progress_issues(&self) -> u64 {
        self.resolved_issues
            .checked_add(self.pending_issues)
            .map_or(0, |settled| self.total_issues.saturating_sub(settled))
    }

    /// resolved / total as a percentage, 0 for an empty snapshot.
    pub fn resolution_rate(&self) -> f64 {
        if self.total_issues == 0 {
            return 0.0;
        }
        self.resolved_issues as f64 / self.total_issues as f64 * 100.0
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let inconsistent = |reason: String| -> Result<(), ValidationError> {
            Err(ValidationError::InconsistentAnalytics { reason })
        };

        let settled = self.resolved_issues.checked_add(self.pending_issues);
        if settled.is_none_or(|settled| settled > self.total_issues) {
            return inconsistent(format!(
                "resolved ({}) + pending ({}) exceeds total ({})",
                self.resolved_issues, self.pending_issues, self.total_issues
            ));
        }
        if !self.avg_resolution_time.is_finite() || self.avg_resolution_time < 0.0 {
            return inconsistent(format!(
                "avgResolutionTime {} is not a non-negative number of days",
                self.avg_resolution_time
            ));
        }
        if let Some(rate) = self.satisfaction_rate {
            if !(0.0..=100.0).contains(&rate) {
                return inconsistent(format!("satisfactionRate {} is outside 0-100", rate));
            }
        }
        match self.issues_by_category.total() {
            Some(sum) if sum == self.total_issues => {}
            Some(sum) => {
                return inconsistent(format!(
                    "issuesByCategory sums to {} but total is {}",
                    sum, self.total_issues
                ));
            }
            None => return inconsistent("issuesByCategory overflows".to_string()),
        }
        match self.issues_by_priority.total() {
            Some(sum) if sum == self.total_issues => {}
            Some(sum) => {
                return inconsistent(format!(
                    "issuesByPriority sums to {} but total is {}",
                    sum, self.total_issues
                ));
            }
            None => return inconsistent("issuesByPriority overflows".to_string()),
        }
        Ok(())
    }
}

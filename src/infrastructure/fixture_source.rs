// In-memory data source backed by an explicit fixture set
use crate::application::issue_repository::{IssueDataSource, IssueFilter};
use crate::domain::analytics::{Analytics, CategoryCounts, PriorityCounts};
use crate::domain::comment::Comment;
use crate::domain::issue::{Issue, IssueCategory, IssuePriority, IssueStatus, Location};
use crate::domain::user::User;
use crate::error::{DataSourceError, ValidationError};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use std::collections::HashSet;

/// Records served by [`FixtureDataSource`]. Built per use, never shared.
#[derive(Debug, Clone, Default)]
pub struct Fixtures {
    pub users: Vec<User>,
    pub issues: Vec<Issue>,
    pub comments: Vec<Comment>,
    pub analytics: Option<Analytics>,
}

fn date(month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, month, day, 0, 0, 0)
        .single()
        .expect("sample dates are real calendar days")
}

impl Fixtures {
    /// The sample data set the dashboard was designed around.
    pub fn sample() -> Self {
        let users = vec![
            User::citizen("1", "abc.citizen@email.com", "Abc Citizen", date(9, 15))
                .with_phone("+1234567890"),
            User::authority("2", "admin@cityworks.gov", "Prachi", "Public Works", date(9, 10)),
            User::authority("3", "hridip@cityworks.gov", "Hridip", "Public Safety", date(9, 12)),
        ];

        let issues = vec![
            Issue {
                id: "1".to_string(),
                title: "Pothole on Main Street".to_string(),
                description: "Large pothole causing damage to vehicles near the intersection of Main St and Oak Ave.".to_string(),
                category: IssueCategory::Infrastructure,
                priority: IssuePriority::High,
                status: IssueStatus::InProgress,
                location: Location::new("123 Main Street, Downtown").with_coordinates(40.7128, -74.006),
                images: vec!["/street-pothole.png".to_string()],
                citizen_id: "1".to_string(),
                assigned_to: Some("2".to_string()),
                created_at: date(9, 13),
                updated_at: date(9, 14),
                resolved_at: None,
            },
            Issue {
                id: "2".to_string(),
                title: "Broken Streetlight".to_string(),
                description: "Streetlight has been out for over a week, creating safety concerns for pedestrians.".to_string(),
                category: IssueCategory::Safety,
                priority: IssuePriority::Medium,
                status: IssueStatus::Pending,
                location: Location::new("456 Oak Avenue, Residential District"),
                images: Vec::new(),
                citizen_id: "1".to_string(),
                assigned_to: None,
                created_at: date(9, 18),
                updated_at: date(9, 19),
                resolved_at: None,
            },
            Issue {
                id: "3".to_string(),
                title: "Illegal Dumping".to_string(),
                description: "Someone has dumped construction debris in the park area.".to_string(),
                category: IssueCategory::Environment,
                priority: IssuePriority::Medium,
                status: IssueStatus::Resolved,
                location: Location::new("Central Park, East Side"),
                images: vec!["/illegal-dumping-debris.jpg".to_string()],
                citizen_id: "1".to_string(),
                assigned_to: Some("2".to_string()),
                created_at: date(9, 12),
                updated_at: date(9, 16),
                resolved_at: Some(date(9, 18)),
            },
        ];

        let comments = vec![
            Comment {
                id: "1".to_string(),
                issue_id: "1".to_string(),
                user_id: "2".to_string(),
                content: "We have received your report and assigned a crew to assess the damage. Work should begin within 48 hours.".to_string(),
                is_internal: false,
                created_at: date(9, 9),
            },
            Comment {
                id: "2".to_string(),
                issue_id: "1".to_string(),
                user_id: "2".to_string(),
                content: "Crew dispatched. Materials ordered.".to_string(),
                is_internal: true,
                created_at: date(9, 11),
            },
        ];

        let analytics = Analytics {
            total_issues: 247,
            resolved_issues: 198,
            pending_issues: 49,
            avg_resolution_time: 4.2,
            satisfaction_rate: Some(89.0),
            issues_by_category: CategoryCounts {
                infrastructure: 89,
                safety: 67,
                environment: 45,
                utilities: 32,
                other: 14,
            },
            issues_by_priority: PriorityCounts {
                low: 45,
                medium: 123,
                high: 67,
                urgent: 12,
            },
        };

        Self {
            users,
            issues,
            comments,
            analytics: Some(analytics),
        }
    }

    /// Validate every record plus the set-level rules: user ids, emails
    /// (case-insensitive) and issue ids are unique.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut user_ids = HashSet::with_capacity(self.users.len());
        let mut emails = HashSet::with_capacity(self.users.len());
        for user in &self.users {
            user.validate()?;
            if !user_ids.insert(user.id.as_str()) {
                return Err(ValidationError::DuplicateUserId { id: user.id.clone() });
            }
            if !emails.insert(user.email.to_lowercase()) {
                return Err(ValidationError::DuplicateEmail {
                    id: user.id.clone(),
                    email: user.email.clone(),
                });
            }
        }

        let mut issue_ids = HashSet::with_capacity(self.issues.len());
        for issue in &self.issues {
            issue.validate()?;
            if !issue_ids.insert(issue.id.as_str()) {
                return Err(ValidationError::DuplicateIssueId { id: issue.id.clone() });
            }
        }

        for comment in &self.comments {
            comment.validate()?;
        }

        if let Some(analytics) = &self.analytics {
            analytics.validate()?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct FixtureDataSource {
    fixtures: Fixtures,
}

impl FixtureDataSource {
    /// Rejects a fixture set that fails [`Fixtures::validate`].
    pub fn new(fixtures: Fixtures) -> Result<Self, ValidationError> {
        fixtures.validate()?;
        tracing::debug!(
            "Loaded fixtures: {} users, {} issues, {} comments",
            fixtures.users.len(),
            fixtures.issues.len(),
            fixtures.comments.len()
        );
        Ok(Self { fixtures })
    }
}

#[async_trait]
impl IssueDataSource for FixtureDataSource {
    async fn list_issues(&self, filter: &IssueFilter) -> Result<Vec<Issue>, DataSourceError> {
        let issues: Vec<Issue> = self
            .fixtures
            .issues
            .iter()
            .filter(|issue| filter.matches(issue))
            .cloned()
            .collect();
        tracing::debug!("Fixture source returning {} issues", issues.len());
        Ok(issues)
    }

    async fn get_analytics(&self) -> Result<Option<Analytics>, DataSourceError> {
        Ok(self.fixtures.analytics.clone())
    }

    async fn list_comments(&self, issue_id: &str) -> Result<Vec<Comment>, DataSourceError> {
        let mut comments: Vec<Comment> = self
            .fixtures
            .comments
            .iter()
            .filter(|c| c.issue_id == issue_id)
            .cloned()
            .collect();
        comments.sort_by_key(|c| c.created_at);
        Ok(comments)
    }
}

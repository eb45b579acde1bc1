// Issue domain model
use crate::error::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueCategory {
    Infrastructure,
    Safety,
    Environment,
    Utilities,
    Other,
}

impl IssueCategory {
    /// Fixed display order for charts and tallies.
    pub const ALL: [IssueCategory; 5] = [
        IssueCategory::Infrastructure,
        IssueCategory::Safety,
        IssueCategory::Environment,
        IssueCategory::Utilities,
        IssueCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IssueCategory::Infrastructure => "infrastructure",
            IssueCategory::Safety => "safety",
            IssueCategory::Environment => "environment",
            IssueCategory::Utilities => "utilities",
            IssueCategory::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssuePriority {
    Low,
    Medium,
    High,
    Urgent,
}

impl IssuePriority {
    pub const ALL: [IssuePriority; 4] = [
        IssuePriority::Low,
        IssuePriority::Medium,
        IssuePriority::High,
        IssuePriority::Urgent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IssuePriority::Low => "low",
            IssuePriority::Medium => "medium",
            IssuePriority::High => "high",
            IssuePriority::Urgent => "urgent",
        }
    }
}

/// Lifecycle position of an issue: pending -> in-progress -> resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueStatus {
    Pending,
    InProgress,
    Resolved,
}

impl IssueStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueStatus::Pending => "pending",
            IssueStatus::InProgress => "in-progress",
            IssueStatus::Resolved => "resolved",
        }
    }

    /// Only forward moves are allowed; skipping in-progress is fine.
    pub fn can_advance_to(&self, next: IssueStatus) -> bool {
        next > *self
    }
}

impl fmt::Display for IssueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for IssuePriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
}

impl Location {
    pub fn new(address: &str) -> Self {
        Self {
            address: address.to_string(),
            coordinates: None,
        }
    }

    pub fn with_coordinates(mut self, lat: f64, lng: f64) -> Self {
        self.coordinates = Some(Coordinates { lat, lng });
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: IssueCategory,
    pub priority: IssuePriority,
    pub status: IssueStatus,
    pub location: Location,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
    pub citizen_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,
}

impl Issue {
    /// A freshly reported issue: pending, unassigned, updatedAt == createdAt.
    pub fn report(
        id: &str,
        title: &str,
        description: &str,
        category: IssueCategory,
        priority: IssuePriority,
        location: Location,
        citizen_id: &str,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            category,
            priority,
            status: IssueStatus::Pending,
            location,
            images: Vec::new(),
            citizen_id: citizen_id.to_string(),
            assigned_to: None,
            created_at,
            updated_at: created_at,
            resolved_at: None,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let record = || format!("issue {}", self.id);

        if self.id.trim().is_empty() {
            return Err(ValidationError::EmptyField {
                record: "issue".to_string(),
                field: "id",
            });
        }
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyField {
                record: record(),
                field: "title",
            });
        }
        if self.citizen_id.trim().is_empty() {
            return Err(ValidationError::EmptyField {
                record: record(),
                field: "citizenId",
            });
        }
        if self.updated_at < self.created_at {
            return Err(ValidationError::UpdatedBeforeCreated {
                id: self.id.clone(),
                created_at: self.created_at,
                updated_at: self.updated_at,
            });
        }

        match (self.status, self.resolved_at) {
            (IssueStatus::Resolved, None) => {
                return Err(ValidationError::MissingResolvedAt { id: self.id.clone() });
            }
            (IssueStatus::Resolved, Some(resolved_at)) if resolved_at < self.updated_at => {
                return Err(ValidationError::ResolvedBeforeUpdated {
                    id: self.id.clone(),
                    updated_at: self.updated_at,
                    resolved_at,
                });
            }
            (status, Some(_)) if status != IssueStatus::Resolved => {
                return Err(ValidationError::UnexpectedResolvedAt {
                    id: self.id.clone(),
                    status: status.to_string(),
                });
            }
            _ => {}
        }

        if self.status == IssueStatus::Pending && self.assigned_to.is_some() {
            return Err(ValidationError::AssignedWhilePending { id: self.id.clone() });
        }

        if let Some(coordinates) = self.location.coordinates {
            if !coordinates.is_valid() {
                return Err(ValidationError::InvalidCoordinates {
                    id: self.id.clone(),
                    lat: coordinates.lat,
                    lng: coordinates.lng,
                });
            }
        }

        Ok(())
    }

    /// Move the issue forward in its lifecycle at time `at`.
    ///
    /// Resolving stamps both `updated_at` and `resolved_at` with `at`. An
    /// assignee, when given, replaces the current one.
    pub fn advance(
        &mut self,
        next: IssueStatus,
        at: DateTime<Utc>,
        assignee: Option<&str>,
    ) -> Result<(), ValidationError> {
        if !self.status.can_advance_to(next) {
            return Err(ValidationError::InvalidTransition {
                id: self.id.clone(),
                from: self.status.to_string(),
                to: next.to_string(),
            });
        }
        if at < self.updated_at {
            return Err(ValidationError::TransitionInPast {
                id: self.id.clone(),
                updated_at: self.updated_at,
                at,
            });
        }

        let mut next_issue = self.clone();
        next_issue.status = next;
        next_issue.updated_at = at;
        if let Some(assignee) = assignee {
            next_issue.assigned_to = Some(assignee.to_string());
        }
        if next == IssueStatus::Resolved {
            next_issue.resolved_at = Some(at);
        }
        next_issue.validate()?;

        *self = next_issue;
        Ok(())
    }

    pub fn resolution_days(&self) -> Option<f64> {
        self.resolved_at
            .map(|resolved_at| (resolved_at - self.created_at).num_milliseconds() as f64 / MILLIS_PER_DAY)
    }
}

const MILLIS_PER_DAY: f64 = 86_400_000.0;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 9, d, 0, 0, 0).unwrap()
    }

    fn pothole() -> Issue {
        Issue::report(
            "1",
            "Pothole on Main Street",
            "Large pothole near Oak Ave.",
            IssueCategory::Infrastructure,
            IssuePriority::High,
            Location::new("123 Main Street").with_coordinates(40.7128, -74.006),
            "1",
            day(13),
        )
    }

    #[test]
    fn test_wire_format() {
        let mut issue = pothole();
        issue.advance(IssueStatus::InProgress, day(14), Some("2")).unwrap();
        let json = serde_json::to_value(&issue).unwrap();

        assert_eq!(json["status"], "in-progress");
        assert_eq!(json["category"], "infrastructure");
        assert_eq!(json["priority"], "high");
        assert_eq!(json["citizenId"], "1");
        assert_eq!(json["assignedTo"], "2");
        assert_eq!(json["location"]["coordinates"]["lat"], 40.7128);
        assert_eq!(json["updatedAt"], "2025-09-14T00:00:00Z");
        assert!(json.get("resolvedAt").is_none());

        let back: Issue = serde_json::from_value(json).unwrap();
        assert_eq!(back, issue);
    }

    #[test]
    fn test_resolved_without_resolved_at_is_rejected() {
        let mut issue = pothole();
        issue.status = IssueStatus::Resolved;
        assert_eq!(
            issue.validate(),
            Err(ValidationError::MissingResolvedAt { id: "1".to_string() })
        );
    }

    #[test]
    fn test_resolved_at_without_resolved_status_is_rejected() {
        let mut issue = pothole();
        issue.resolved_at = Some(day(20));
        assert!(matches!(
            issue.validate(),
            Err(ValidationError::UnexpectedResolvedAt { .. })
        ));
    }

    #[test]
    fn test_resolved_before_update_is_rejected() {
        let mut issue = pothole();
        issue.status = IssueStatus::Resolved;
        issue.assigned_to = Some("2".to_string());
        issue.updated_at = day(16);
        issue.resolved_at = Some(day(15));
        assert!(matches!(
            issue.validate(),
            Err(ValidationError::ResolvedBeforeUpdated { .. })
        ));
    }

    #[test]
    fn test_timestamp_and_assignment_rules() {
        let mut issue = pothole();
        issue.updated_at = day(12);
        assert!(matches!(
            issue.validate(),
            Err(ValidationError::UpdatedBeforeCreated { .. })
        ));

        let mut issue = pothole();
        issue.assigned_to = Some("2".to_string());
        assert_eq!(
            issue.validate(),
            Err(ValidationError::AssignedWhilePending { id: "1".to_string() })
        );

        let mut issue = pothole();
        issue.location = Location::new("nowhere").with_coordinates(91.0, 0.0);
        assert!(matches!(
            issue.validate(),
            Err(ValidationError::InvalidCoordinates { .. })
        ));
    }

    #[test]
    fn test_advance_forward_only() {
        let mut issue = pothole();
        issue.advance(IssueStatus::InProgress, day(14), Some("2")).unwrap();
        issue.advance(IssueStatus::Resolved, day(18), None).unwrap();

        assert_eq!(issue.status, IssueStatus::Resolved);
        assert_eq!(issue.assigned_to.as_deref(), Some("2"));
        assert_eq!(issue.resolved_at, Some(day(18)));
        assert_eq!(issue.updated_at, day(18));
        assert_eq!(issue.resolution_days(), Some(5.0));

        let err = issue.advance(IssueStatus::Pending, day(19), None).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidTransition { .. }));
    }

    #[test]
    fn test_advance_rejects_time_travel_and_leaves_issue_untouched() {
        let mut issue = pothole();
        let before = issue.clone();
        let err = issue.advance(IssueStatus::Resolved, day(1), None).unwrap_err();

        assert!(matches!(err, ValidationError::TransitionInPast { .. }));
        assert_eq!(issue, before);
    }

    #[test]
    fn test_status_order() {
        assert!(IssueStatus::Pending.can_advance_to(IssueStatus::Resolved));
        assert!(!IssueStatus::InProgress.can_advance_to(IssueStatus::InProgress));
        assert!(!IssueStatus::Resolved.can_advance_to(IssueStatus::InProgress));
    }
}

// Comment domain model
use super::user::RoleKind;
use crate::error::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub issue_id: String,
    pub user_id: String,
    pub content: String,
    #[serde(default)]
    pub is_internal: bool,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    /// Internal notes are for authorities only.
    pub fn is_visible_to(&self, viewer: RoleKind) -> bool {
        !self.is_internal || viewer == RoleKind::Authority
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let fields = [
            ("id", &self.id),
            ("issueId", &self.issue_id),
            ("userId", &self.user_id),
            ("content", &self.content),
        ];
        for (field, value) in fields {
            if value.trim().is_empty() {
                return Err(ValidationError::EmptyField {
                    record: format!("comment {}", self.id),
                    field,
                });
            }
        }
        Ok(())
    }
}

pub fn visible_comments(comments: Vec<Comment>, viewer: RoleKind) -> Vec<Comment> {
    comments
        .into_iter()
        .filter(|c| c.is_visible_to(viewer))
        .collect()
}

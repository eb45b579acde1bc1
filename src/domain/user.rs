// User domain model
use crate::error::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role of a user. Authorities always belong to a department, citizens never do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserRole {
    Citizen,
    Authority { department: String },
}

/// Role without its payload, used where only visibility matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleKind {
    Citizen,
    Authority,
}

impl UserRole {
    pub fn kind(&self) -> RoleKind {
        match self {
            UserRole::Citizen => RoleKind::Citizen,
            UserRole::Authority { .. } => RoleKind::Authority,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "UserRecord", into = "UserRecord")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn citizen(id: &str, email: &str, name: &str, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.to_string(),
            email: email.to_string(),
            name: name.to_string(),
            phone: None,
            role: UserRole::Citizen,
            created_at,
        }
    }

    pub fn authority(
        id: &str,
        email: &str,
        name: &str,
        department: &str,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.to_string(),
            email: email.to_string(),
            name: name.to_string(),
            phone: None,
            role: UserRole::Authority {
                department: department.to_string(),
            },
            created_at,
        }
    }

    pub fn with_phone(mut self, phone: &str) -> Self {
        self.phone = Some(phone.to_string());
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.trim().is_empty() {
            return Err(ValidationError::EmptyField {
                record: "user".to_string(),
                field: "id",
            });
        }
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyField {
                record: format!("user {}", self.id),
                field: "name",
            });
        }
        if !is_plausible_email(&self.email) {
            return Err(ValidationError::InvalidEmail {
                id: self.id.clone(),
                email: self.email.clone(),
            });
        }
        if let UserRole::Authority { department } = &self.role {
            if department.trim().is_empty() {
                return Err(ValidationError::MissingDepartment { id: self.id.clone() });
            }
        }
        Ok(())
    }
}

// Local part, '@', and a dotted-or-not domain; anything stricter belongs to the auth flow.
fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}

/// Wire shape of a user: flat role string plus an optional department.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserRecord {
    id: String,
    email: String,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    phone: Option<String>,
    role: RoleKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    department: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRecord> for User {
    type Error = ValidationError;

    fn try_from(record: UserRecord) -> Result<Self, Self::Error> {
        let role = match (record.role, record.department) {
            (RoleKind::Citizen, None) => UserRole::Citizen,
            (RoleKind::Citizen, Some(_)) => {
                return Err(ValidationError::UnexpectedDepartment { id: record.id });
            }
            (RoleKind::Authority, Some(department)) => UserRole::Authority { department },
            (RoleKind::Authority, None) => {
                return Err(ValidationError::MissingDepartment { id: record.id });
            }
        };

        let user = User {
            id: record.id,
            email: record.email,
            name: record.name,
            phone: record.phone,
            role,
            created_at: record.created_at,
        };
        user.validate()?;
        Ok(user)
    }
}

impl From<User> for UserRecord {
    fn from(user: User) -> Self {
        let role = user.role.kind();
        let department = match user.role {
            UserRole::Citizen => None,
            UserRole::Authority { department } => Some(department),
        };
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            phone: user.phone,
            role,
            department,
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 9, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_authority_json_carries_department() {
        let user = User::authority("2", "admin@cityworks.gov", "Prachi", "Public Works", day(10));
        let json = serde_json::to_value(&user).unwrap();

        assert_eq!(json["role"], "authority");
        assert_eq!(json["department"], "Public Works");
        assert_eq!(json["createdAt"], "2025-09-10T00:00:00Z");
        assert!(json.get("phone").is_none());
    }

    #[test]
    fn test_citizen_from_json() {
        let json = r#"{
            "id": "1",
            "email": "abc.citizen@email.com",
            "name": "Abc Citizen",
            "phone": "+1234567890",
            "role": "citizen",
            "createdAt": "2025-09-15T00:00:00Z"
        }"#;
        let user: User = serde_json::from_str(json).unwrap();

        assert_eq!(user.role, UserRole::Citizen);
        assert_eq!(user.phone.as_deref(), Some("+1234567890"));
        assert_eq!(user.role.kind(), RoleKind::Citizen);
    }

    #[test]
    fn test_authority_without_department_is_rejected() {
        let json = r#"{
            "id": "3",
            "email": "hridip@cityworks.gov",
            "name": "Hridip",
            "role": "authority",
            "createdAt": "2025-09-12T00:00:00Z"
        }"#;
        let err = serde_json::from_str::<User>(json).unwrap_err();
        assert!(err.to_string().contains("must name a department"));
    }

    #[test]
    fn test_citizen_with_department_is_rejected() {
        let json = r#"{
            "id": "1",
            "email": "abc.citizen@email.com",
            "name": "Abc Citizen",
            "role": "citizen",
            "department": "Public Works",
            "createdAt": "2025-09-15T00:00:00Z"
        }"#;
        assert!(serde_json::from_str::<User>(json).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_email_and_blank_department() {
        let user = User::citizen("1", "not-an-email", "Abc", day(1));
        assert!(matches!(
            user.validate(),
            Err(ValidationError::InvalidEmail { .. })
        ));

        let user = User::authority("2", "a@b.gov", "Prachi", "  ", day(1));
        assert_eq!(
            user.validate(),
            Err(ValidationError::MissingDepartment { id: "2".to_string() })
        );
    }
}

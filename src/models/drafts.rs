//! Request payloads for create/update calls, with the checks the forms run
//! before anything is sent.

use serde::Serialize;
use thiserror::Error;

use super::{ApplicationStatus, Location, Tag, UserRole};
use crate::dates;

/// Required fields that were missing or malformed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("missing or invalid fields: {}", .fields.join(", "))]
pub struct ValidationError {
    pub fields: Vec<&'static str>,
}

impl ValidationError {
    fn check(fields: Vec<&'static str>) -> Result<(), Self> {
        if fields.is_empty() {
            Ok(())
        } else {
            Err(Self { fields })
        }
    }
}

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionDraft {
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
    pub location: Location,
    pub tags: Vec<Tag>,
    pub is_dual: bool,
    pub is_active: bool,
}

impl PositionDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut fields = Vec::new();
        if blank(&self.title) {
            fields.push("title");
        }
        if blank(&self.description) {
            fields.push("description");
        }
        if blank(&self.location.city) {
            fields.push("location.city");
        }
        if let Some(deadline) = &self.deadline {
            if dates::parse_datetime(deadline).is_none() {
                fields.push("deadline");
            }
        }
        if self.tags.iter().any(|t| blank(&t.name) || blank(&t.category)) {
            fields.push("tags");
        }
        ValidationError::check(fields)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyDraft {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

impl CompanyDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut fields = Vec::new();
        if blank(&self.name) {
            fields.push("name");
        }
        if self.location.as_ref().is_some_and(|l| blank(&l.city)) {
            fields.push("location.city");
        }
        ValidationError::check(fields)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct NewsDraft {
    pub title: String,
    pub content: String,
}

impl NewsDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut fields = Vec::new();
        if blank(&self.title) {
            fields.push("title");
        }
        if blank(&self.content) {
            fields.push("content");
        }
        ValidationError::check(fields)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDraft {
    pub email: String,
    pub name: String,
    pub role: UserRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_id: Option<String>,
}

impl UserDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut fields = Vec::new();
        let email = self.email.trim();
        if email.is_empty() || !email.contains('@') {
            fields.push("email");
        }
        if blank(&self.name) {
            fields.push("name");
        }
        // HR accounts belong to a company
        if self.role == UserRole::Company && self.company_id.as_deref().map_or(true, blank) {
            fields.push("companyId");
        }
        ValidationError::check(fields)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRequest {
    pub position_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_note: Option<String>,
}

impl ApplicationRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let fields = if blank(&self.position_id) {
            vec!["positionId"]
        } else {
            Vec::new()
        };
        ValidationError::check(fields)
    }
}

/// Company decision on an application
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationRequest {
    pub status: ApplicationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_note: Option<String>,
}

impl EvaluationRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let fields = match self.status {
            ApplicationStatus::Accepted | ApplicationStatus::Rejected => Vec::new(),
            _ => vec!["status"],
        };
        ValidationError::check(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> PositionDraft {
        PositionDraft {
            title: "Junior fejlesztő".into(),
            description: "Rust és Postgres".into(),
            deadline: Some("2030-01-01".into()),
            location: Location {
                city: "Győr".into(),
                ..Location::default()
            },
            tags: vec![Tag {
                name: "Rust".into(),
                category: "language".into(),
            }],
            is_dual: false,
            is_active: true,
        }
    }

    #[test]
    fn complete_position_draft_passes() {
        assert_eq!(draft().validate(), Ok(()));
    }

    #[test]
    fn lists_every_missing_field() {
        let mut d = draft();
        d.title = "  ".into();
        d.location.city.clear();
        d.deadline = Some("soon".into());

        let err = d.validate().unwrap_err();
        assert_eq!(err.fields, vec!["title", "location.city", "deadline"]);
        assert_eq!(
            err.to_string(),
            "missing or invalid fields: title, location.city, deadline"
        );
    }

    #[test]
    fn company_users_need_a_company() {
        let user = UserDraft {
            email: "hr@acme.hu".into(),
            name: "HR".into(),
            role: UserRole::Company,
            password: None,
            company_id: None,
        };
        assert_eq!(user.validate().unwrap_err().fields, vec!["companyId"]);

        let student = UserDraft {
            role: UserRole::Student,
            ..user
        };
        assert!(student.validate().is_ok());
    }

    #[test]
    fn evaluation_must_decide() {
        let pending = EvaluationRequest {
            status: ApplicationStatus::Submitted,
            company_note: None,
        };
        assert!(pending.validate().is_err());

        let accepted = EvaluationRequest {
            status: ApplicationStatus::Accepted,
            company_note: Some("Welcome".into()),
        };
        assert!(accepted.validate().is_ok());
    }

    #[test]
    fn drafts_serialize_camel_case() {
        let value = serde_json::to_value(draft()).unwrap();
        assert_eq!(value["isDual"], false);
        assert_eq!(value["location"]["city"], "Győr");
        assert!(value.get("is_dual").is_none());
    }
}

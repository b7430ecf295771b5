use serde::{Deserialize, Serialize};

mod drafts;

pub use drafts::{
    ApplicationRequest, CompanyDraft, EvaluationRequest, NewsDraft, PositionDraft, UserDraft,
    ValidationError,
};

/// Postal location of a position or company
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Location {
    #[serde(default)]
    pub zip_code: Option<String>,
    pub city: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

/// Labelled attribute used for faceted filtering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Tag {
    pub name: String,
    pub category: String,
}

/// Company fields embedded in every position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CompanySummary {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub logo_url: Option<String>,
}

/// Job or internship listing.
///
/// Timestamps stay as the raw strings the backend sent; see [`crate::dates`]
/// for how they are interpreted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Position {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub deadline: Option<String>,
    pub location: Location,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub is_dual: bool,
    #[serde(default)]
    pub is_active: bool,
    pub company_id: String,
    #[serde(default)]
    pub company: Option<CompanySummary>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Position {
    /// Name of the embedded company, empty when the backend omitted it
    pub fn company_name(&self) -> &str {
        self.company.as_ref().map(|c| c.name.as_str()).unwrap_or("")
    }

    /// Free-text address used for geocoding
    pub fn address(&self) -> &str {
        self.location.address.as_deref().unwrap_or("")
    }
}

/// Lifecycle of an application. Transitions are decided by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    Submitted,
    Accepted,
    Rejected,
    NoResponse,
}

impl ApplicationStatus {
    /// Whether the server would accept a move from `self` to `next`
    pub fn can_transition_to(self, next: ApplicationStatus) -> bool {
        matches!(
            (self, next),
            (
                ApplicationStatus::Submitted,
                ApplicationStatus::Accepted
                    | ApplicationStatus::Rejected
                    | ApplicationStatus::NoResponse
            )
        )
    }

    pub fn is_final(self) -> bool {
        !matches!(self, ApplicationStatus::Submitted)
    }
}

/// A student's submission against a position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Application {
    pub id: String,
    pub position_id: String,
    pub student_id: String,
    pub status: ApplicationStatus,
    #[serde(default)]
    pub student_note: Option<String>,
    #[serde(default)]
    pub company_note: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub position: Option<Position>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Company {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Student,
    Company,
    Admin,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    #[serde(default)]
    pub company_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct News {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Latitude/longitude pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_backend_position() {
        let raw = json!({
            "id": "p1",
            "title": "Backend gyakornok",
            "description": "Rust",
            "deadline": "2024-08-15T10:00:00.000Z",
            "location": {"zipCode": "4032", "city": "Debrecen", "address": "Kassai út 26.", "country": "HU"},
            "tags": [{"name": "Rust", "category": "language"}],
            "isDual": true,
            "isActive": true,
            "companyId": "c1",
            "company": {"id": "c1", "name": "Acme", "logoUrl": null},
            "createdAt": "2024-06-01T00:00:00Z"
        });

        let position: Position = serde_json::from_value(raw).unwrap();
        assert_eq!(position.location.city, "Debrecen");
        assert_eq!(position.company_name(), "Acme");
        assert_eq!(position.address(), "Kassai út 26.");
        assert!(position.is_dual);
        assert_eq!(position.updated_at, None);
    }

    #[test]
    fn rejects_unknown_fields() {
        let raw = json!({
            "id": "p1",
            "title": "Dev",
            "location": {"city": "Szeged"},
            "companyId": "c1",
            "salary": 100
        });
        assert!(serde_json::from_value::<Position>(raw).is_err());
    }

    #[test]
    fn status_wire_names() {
        let status: ApplicationStatus = serde_json::from_str("\"NO_RESPONSE\"").unwrap();
        assert_eq!(status, ApplicationStatus::NoResponse);
        assert_eq!(
            serde_json::to_string(&ApplicationStatus::Submitted).unwrap(),
            "\"SUBMITTED\""
        );
    }

    #[test]
    fn only_submitted_applications_move() {
        use ApplicationStatus::*;
        assert!(Submitted.can_transition_to(Accepted));
        assert!(Submitted.can_transition_to(Rejected));
        assert!(!Accepted.can_transition_to(Rejected));
        assert!(!Rejected.can_transition_to(Submitted));
        assert!(NoResponse.is_final());
    }
}

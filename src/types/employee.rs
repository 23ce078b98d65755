//! Employee Types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Activity;

/// Employee gender as stored by the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Male,
    Female,
}

/// Employee profile registered under a user account.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    /// Only populated by endpoints that include the relation.
    #[serde(default)]
    pub activities: Vec<Activity>,
}

impl Employee {
    /// "First Last".
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Body of `POST admin/employee` and `PATCH admin/employee/:id`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeInput {
    pub first_name: String,
    pub last_name: String,
    pub gender: Gender,
}

impl EmployeeInput {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>, gender: Gender) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            gender,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_employee_without_activities() {
        let json = r#"{"id":1,"firstName":"Ada","lastName":"Lovelace","gender":"FEMALE","userId":9}"#;
        let employee: Employee = serde_json::from_str(json).unwrap();
        assert_eq!(employee.full_name(), "Ada Lovelace");
        assert_eq!(employee.gender, Some(Gender::Female));
        assert!(employee.activities.is_empty());
    }

    #[test]
    fn test_employee_input_body() {
        let body = serde_json::to_value(EmployeeInput::new("Alan", "Turing", Gender::Male)).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"firstName": "Alan", "lastName": "Turing", "gender": "MALE"})
        );
    }
}

//! Resource types owned by the upstream service

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Error returned when an enumerated field holds an unknown value
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {field} '{value}', expected one of: {expected}")]
pub struct ParseEnumError {
    /// Field being parsed
    pub field: &'static str,
    /// Rejected input
    pub value: String,
    /// Accepted values, comma separated
    pub expected: &'static str,
}

/// A user record as stored by the upstream service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct User {
    /// Identifier assigned by the upstream service
    pub id: u64,
    pub name: String,
    pub email: String,
    pub gender: Gender,
    pub status: UserStatus,
}

/// User gender
///
/// Parsing is case-insensitive; the upstream service only accepts the
/// lower-case form, which is what serialization always produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl FromStr for Gender {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            _ => Err(ParseEnumError {
                field: "gender",
                value: s.to_string(),
                expected: "male, female",
            }),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Gender {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Account status of a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Inactive,
}

impl UserStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            UserStatus::Active => "active",
            UserStatus::Inactive => "inactive",
        }
    }
}

impl FromStr for UserStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(UserStatus::Active),
            "inactive" => Ok(UserStatus::Inactive),
            _ => Err(ParseEnumError {
                field: "status",
                value: s.to_string(),
                expected: "active, inactive",
            }),
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for UserStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A post authored by a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Post {
    pub id: u64,
    pub user_id: u64,
    pub title: String,
    pub body: String,
}

/// A todo item owned by a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Todo {
    pub id: u64,
    pub user_id: u64,
    pub title: String,
    pub status: TodoStatus,
    /// Due date, if the upstream record carries one
    #[serde(default)]
    pub due_on: Option<DateTime<Utc>>,
}

/// Completion state of a todo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TodoStatus {
    Pending,
    Completed,
}

impl TodoStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TodoStatus::Pending => "pending",
            TodoStatus::Completed => "completed",
        }
    }
}

impl FromStr for TodoStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(TodoStatus::Pending),
            "completed" => Ok(TodoStatus::Completed),
            _ => Err(ParseEnumError {
                field: "status",
                value: s.to_string(),
                expected: "pending, completed",
            }),
        }
    }
}

impl fmt::Display for TodoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TodoStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gender_parses_any_casing() {
        assert_eq!("Male".parse::<Gender>().unwrap(), Gender::Male);
        assert_eq!("FEMALE".parse::<Gender>().unwrap(), Gender::Female);
        assert_eq!(" male ".parse::<Gender>().unwrap(), Gender::Male);
    }

    #[test]
    fn unknown_status_is_rejected() {
        let err = "banned".parse::<UserStatus>().unwrap_err();
        assert_eq!(err.field, "status");
        assert_eq!(err.value, "banned");
        assert!(err.to_string().contains("active, inactive"));
    }

    #[test]
    fn user_deserializes_mixed_case_and_serializes_lowercase() {
        let user: User = serde_json::from_str(
            r#"{"id":7,"name":"A","email":"a@b.com","gender":"Male","status":"Active"}"#,
        )
        .unwrap();
        assert_eq!(user.gender, Gender::Male);
        assert_eq!(user.status, UserStatus::Active);

        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["gender"], "male");
        assert_eq!(json["status"], "active");
    }

    #[test]
    fn todo_accepts_offset_timestamps_and_missing_due_date() {
        let todo: Todo = serde_json::from_str(
            r#"{"id":1,"user_id":7,"title":"t","status":"pending","due_on":"2024-05-01T00:00:00.000+05:30"}"#,
        )
        .unwrap();
        assert_eq!(todo.status, TodoStatus::Pending);
        assert_eq!(
            todo.due_on.unwrap().to_rfc3339(),
            "2024-04-30T18:30:00+00:00"
        );

        let todo: Todo =
            serde_json::from_str(r#"{"id":2,"user_id":7,"title":"t","status":"Completed"}"#)
                .unwrap();
        assert_eq!(todo.status, TodoStatus::Completed);
        assert!(todo.due_on.is_none());
    }
}

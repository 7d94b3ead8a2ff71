use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Database-assigned user identifier
pub type UserId = i64;

/// Page size used when the caller asks for a non-positive limit
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// A user account as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct User {
    #[schema(example = 1)]
    pub id: UserId,
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
    /// Argon2 PHC string, never part of a response
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Set once the account is soft-deleted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// What the service hands to the repository to persist a new account.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// Body of `POST /users`
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    #[validate(length(min = 2, max = 100, message = "must be between 2 and 100 characters"))]
    #[schema(example = "Ada Lovelace", min_length = 2, max_length = 100)]
    pub name: String,
    #[validate(email(message = "must be a valid email address"))]
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[validate(length(min = 6, message = "must be at least 6 characters"))]
    #[schema(example = "correct-horse", min_length = 6)]
    pub password: String,
}

/// Body of `PUT /users/{id}`. Leaving `password` out, or sending it empty,
/// keeps the current one.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateUser {
    #[validate(length(min = 2, max = 100, message = "must be between 2 and 100 characters"))]
    #[schema(example = "Ada King", min_length = 2, max_length = 100)]
    pub name: String,
    #[validate(email(message = "must be a valid email address"))]
    #[schema(example = "ada.king@example.com")]
    pub email: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(length(min = 6, message = "must be at least 6 characters"))]
    #[schema(min_length = 6)]
    pub password: Option<String>,
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

/// Query string of `GET /users`.
///
/// Values are kept as raw strings: anything that is not an integer counts as
/// 0 and is then normalized by the service.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListUsersQuery {
    /// Page size; non-positive or invalid means 10
    #[param(value_type = Option<i64>, example = 10)]
    pub limit: Option<String>,
    /// Rows to skip; negative or invalid means 0
    #[param(value_type = Option<i64>, example = 0)]
    pub offset: Option<String>,
}

impl ListUsersQuery {
    pub fn limit(&self) -> i64 {
        lenient_int(self.limit.as_deref())
    }

    pub fn offset(&self) -> i64 {
        lenient_int(self.offset.as_deref())
    }
}

fn lenient_int(raw: Option<&str>) -> i64 {
    raw.and_then(|s| s.trim().parse().ok()).unwrap_or(0)
}

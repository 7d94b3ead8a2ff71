use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

use crate::models::UserId;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(UserId),

    #[error("User with email '{0}' not found")]
    EmailNotFound(String),

    #[error("user with this email already exists")]
    DuplicateEmail(String),

    #[error("{0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Persistence(String),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),
}

impl UserError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, UserError::NotFound(_) | UserError::EmailNotFound(_))
    }
}

pub type UserResult<T> = Result<T, UserError>;

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(_) | UserError::EmailNotFound(_) => {
                AppError::NotFound("User not found".to_string())
            }
            UserError::DuplicateEmail(_) => AppError::Conflict(err.to_string()),
            UserError::Validation(msg) => AppError::BadRequest(msg),
            UserError::Persistence(_) | UserError::PasswordHash(_) => {
                AppError::Internal(err.to_string())
            }
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}

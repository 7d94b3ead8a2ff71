//! Reusable OpenAPI responses for the error envelope.

use super::ErrorResponse;
use utoipa::ToResponse;

#[derive(ToResponse)]
#[response(
    description = "Malformed body, invalid path parameter, or failed validation",
    content_type = "application/json",
    example = json!({
        "success": false,
        "message": "Validation failed: email: must be a valid email address",
        "code": "0001",
        "errors": {
            "email": [{"code": "email", "message": "must be a valid email address", "params": {"value": "nope"}}]
        }
    })
)]
pub struct BadRequestResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Resource not found",
    content_type = "application/json",
    example = json!({"success": false, "message": "User not found", "code": "0002"})
)]
pub struct NotFoundResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Conflicts with an existing resource",
    content_type = "application/json",
    example = json!({"success": false, "message": "user with this email already exists", "code": "0002"})
)]
pub struct ConflictResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Internal Server Error",
    content_type = "application/json",
    example = json!({"success": false, "message": "Internal server error", "code": "0003"})
)]
pub struct InternalServerErrorResponse(pub ErrorResponse);

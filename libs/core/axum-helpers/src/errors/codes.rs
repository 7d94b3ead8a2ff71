//! Wire error codes.
//!
//! Clients branch on a deliberately coarse four-digit code rather than on
//! one code per failure:
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! assert_eq!(ErrorCode::General.as_str(), "0001");
//! assert_eq!(ErrorCode::Resource.as_str(), "0002");
//! assert_eq!(ErrorCode::Server.as_str(), "0003");
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum ErrorCode {
    /// Malformed or invalid client input, unknown route
    #[serde(rename = "0001")]
    General,
    /// The addressed resource is missing or conflicts with existing state
    #[serde(rename = "0002")]
    Resource,
    /// Unexpected server-side failure
    #[serde(rename = "0003")]
    Server,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::General => "0001",
            ErrorCode::Resource => "0002",
            ErrorCode::Server => "0003",
        }
    }

    pub fn default_message(&self) -> &'static str {
        match self {
            ErrorCode::General => "General error",
            ErrorCode::Resource => "Resource unavailable",
            ErrorCode::Server => "Internal server error",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_code_string() {
        assert_eq!(serde_json::to_string(&ErrorCode::Resource).unwrap(), "\"0002\"");
        let parsed: ErrorCode = serde_json::from_str("\"0003\"").unwrap();
        assert_eq!(parsed, ErrorCode::Server);
    }

    #[test]
    fn test_display_matches_as_str() {
        assert_eq!(ErrorCode::General.to_string(), "0001");
        assert_eq!(ErrorCode::General.default_message(), "General error");
    }
}

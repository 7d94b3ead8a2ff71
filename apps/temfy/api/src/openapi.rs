use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Registers the `ApiKeyAuth` scheme referenced by the user endpoints.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "ApiKeyAuth",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("Authorization"))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        axum_helpers::server::health::health_handler,
        crate::api::health::ready_handler,
    ),
    components(schemas(axum_helpers::ErrorResponse, axum_helpers::MessageResponse)),
    info(
        title = "Temfy API",
        version = "1.0.0",
        description = "User account management"
    ),
    nest(
        (path = "/api/v1/users", api = domain_users::ApiDoc)
    ),
    modifiers(&SecurityAddon),
    tags((name = "health", description = "Liveness and readiness probes"))
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_user_routes() {
        let doc = ApiDoc::openapi();

        assert!(doc.paths.paths.contains_key("/api/v1/users"));
        assert!(doc.paths.paths.contains_key("/api/v1/users/{id}"));
        assert!(doc.paths.paths.contains_key("/health"));
        assert!(doc.paths.paths.contains_key("/ready"));
    }

    #[test]
    fn test_openapi_declares_api_key_scheme() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");

        assert!(components.security_schemes.contains_key("ApiKeyAuth"));
        assert!(components.schemas.contains_key("ErrorResponse"));
    }
}

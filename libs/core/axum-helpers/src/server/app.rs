use super::shutdown::ShutdownCoordinator;
use crate::errors::{AppError, handlers::not_found};
use axum::{
    Json, Router,
    http::{HeaderValue, Method, header},
    response::{IntoResponse, Response},
    routing::get,
};
use core_config::server::ServerConfig;
use std::any::Any;
use std::io;
use tower_http::catch_panic::CatchPanicLayer;
use tower::Layer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::normalize_path::NormalizePathLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

/// Every domain router is nested under this prefix.
pub const API_PREFIX: &str = "/api/v1";

/// Assemble the public router around already-stateful domain routes.
///
/// Sets up:
/// - `apis` nested under [`API_PREFIX`]
/// - Scalar reference at `/docs`, raw document at `/api-docs/openapi.json`
/// - JSON 404 fallback
/// - trailing slashes trimmed before routing, so `/api/v1/users/` reaches `/api/v1/users`
/// - panic recovery, request tracing, CORS from `server_config`
///
/// Health and readiness routes are merged by the caller afterwards.
///
/// # Errors
/// Returns `InvalidInput` when `cors_allowed_origin` is neither `*` nor a
/// list of valid header values.
pub fn create_router<T>(apis: Router, server_config: &ServerConfig) -> io::Result<Router>
where
    T: OpenApi + 'static,
{
    let cors = cors_layer(&server_config.cors_allowed_origin)?;

    let router = Router::new()
        .merge(Scalar::with_url("/docs", T::openapi()))
        .route("/api-docs/openapi.json", get(|| async { Json(T::openapi()) }))
        .nest(API_PREFIX, apis)
        .fallback(not_found)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors);

    // Router::layer runs after route matching, so the rewrite has to wrap the whole router
    let normalized = NormalizePathLayer::trim_trailing_slash().layer(router);

    Ok(Router::new().fallback_service(normalized))
}

fn cors_layer(allowed: &str) -> io::Result<CorsLayer> {
    let origin = if allowed.trim() == "*" {
        AllowOrigin::any()
    } else {
        let origins = allowed
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(HeaderValue::from_str)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("Invalid CORS_ALLOWED_ORIGIN value: {e}"),
                )
            })?;

        if origins.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "CORS_ALLOWED_ORIGIN cannot be empty",
            ));
        }
        AllowOrigin::list(origins)
    };

    info!(origins = allowed, "CORS configured");

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::ORIGIN, header::CONTENT_TYPE, header::ACCEPT]))
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    AppError::Internal(format!("handler panicked: {detail}")).into_response()
}

/// Serve `router` until SIGINT/SIGTERM, then run `cleanup`.
///
/// In-flight requests drain through axum's graceful shutdown. `cleanup`
/// (closing pools, dropping connections) is bounded by
/// `server_config.shutdown_timeout`.
pub async fn create_production_app<F>(
    router: Router,
    server_config: &ServerConfig,
    cleanup: F,
) -> io::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let coordinator = ShutdownCoordinator::new();
    let signal_watcher = coordinator.clone();
    let mut cleanup_trigger = coordinator.subscribe();
    let shutdown_timeout = server_config.shutdown_timeout;

    let listener = tokio::net::TcpListener::bind(server_config.address()).await?;
    info!("Server starting on {}", listener.local_addr()?);

    let cleanup_handle = tokio::spawn(async move {
        let _ = cleanup_trigger.recv().await;

        info!("Starting cleanup tasks (timeout: {:?})", shutdown_timeout);
        match tokio::time::timeout(shutdown_timeout, cleanup).await {
            Ok(()) => info!("Cleanup completed"),
            Err(_) => tracing::warn!(
                "Cleanup exceeded timeout of {:?}, forcing shutdown",
                shutdown_timeout
            ),
        }
    });

    let serve_result = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(async move { signal_watcher.wait_for_signal().await })
        .await
        .inspect_err(|e| tracing::error!("Server encountered an error: {:?}", e));

    // The server may also stop on its own error; make sure cleanup still runs.
    coordinator.shutdown();
    cleanup_handle.await.ok();

    serve_result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{ErrorCode, ErrorResponse};
    use axum::{body::Body, http::Request, http::StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    #[derive(OpenApi)]
    #[openapi(info(title = "test"))]
    struct TestDoc;

    fn config(origin: &str) -> ServerConfig {
        ServerConfig {
            cors_allowed_origin: origin.to_string(),
            ..ServerConfig::default()
        }
    }

    async fn boom() -> &'static str {
        panic!("kaboom")
    }

    fn api() -> Router {
        Router::new()
            .route("/ping", get(|| async { "pong" }))
            .route("/boom", get(boom))
    }

    async fn get_path(router: Router, path: &str) -> (StatusCode, Vec<u8>) {
        let response = router
            .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        (status, response.into_body().collect().await.unwrap().to_bytes().to_vec())
    }

    #[tokio::test]
    async fn test_routes_nested_under_prefix() {
        let router = create_router::<TestDoc>(api(), &config("*")).unwrap();
        let (status, body) = get_path(router, "/api/v1/ping").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"pong");
    }

    #[tokio::test]
    async fn test_trailing_slash_reaches_route() {
        let router = create_router::<TestDoc>(api(), &config("*")).unwrap();
        let (status, body) = get_path(router, "/api/v1/ping/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"pong");
    }

    #[tokio::test]
    async fn test_merged_routes_still_match() {
        let router = create_router::<TestDoc>(api(), &config("*"))
            .unwrap()
            .merge(Router::new().route("/health", get(|| async { "ok" })));

        let (status, body) = get_path(router.clone(), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"ok");

        let (status, _) = get_path(router, "/api/v1/ping/").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_route_is_json_404() {
        let router = create_router::<TestDoc>(api(), &config("*")).unwrap();
        let (status, body) = get_path(router, "/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.code, ErrorCode::General);
        assert!(!error.success);
    }

    #[tokio::test]
    async fn test_panic_becomes_500_envelope() {
        let router = create_router::<TestDoc>(api(), &config("*")).unwrap();
        let (status, body) = get_path(router, "/api/v1/boom").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.code, ErrorCode::Server);
    }

    #[tokio::test]
    async fn test_openapi_document_served() {
        let router = create_router::<TestDoc>(api(), &config("*")).unwrap();
        let (status, body) = get_path(router, "/api-docs/openapi.json").await;
        assert_eq!(status, StatusCode::OK);
        let doc: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(doc["info"]["title"], "test");
    }

    #[tokio::test]
    async fn test_cors_allows_listed_origin() {
        let router =
            create_router::<TestDoc>(api(), &config("http://a.test, http://b.test")).unwrap();
        let response = router
            .oneshot(
                Request::builder()
                    .uri("/api/v1/ping")
                    .header("origin", "http://b.test")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "http://b.test"
        );
    }

    #[test]
    fn test_blank_cors_origin_rejected() {
        let err = create_router::<TestDoc>(api(), &config(" , ")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}

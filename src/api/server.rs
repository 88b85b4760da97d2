//! HTTP server implementation for Storefront
//!
//! This module sets up the Axum web server with all routes, middleware,
//! and graceful shutdown handling.

use axum::{
    body::Body,
    extract::MatchedPath,
    http::{HeaderName, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use anyhow::anyhow;
use std::any::Any;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{MakeRequestId, RequestId, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer},
    LatencyUnit,
};
use tower_sessions::{Expiry, SessionManagerLayer};
use uuid::Uuid;

use crate::{
    api::{
        handlers,
        health::{build_info, health_check, ready_check},
        AppState,
    },
    config::Config,
    error::{Result, GENERIC_ERROR_MESSAGE},
};

/// Request ID generator
#[derive(Clone, Default)]
struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        Some(RequestId::new(id.parse().ok()?))
    }
}

/// Turn a handler panic into the generic 500 page
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response<Body> {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    tracing::error!(panic = %detail, "Handler panicked");

    (StatusCode::INTERNAL_SERVER_ERROR, GENERIC_ERROR_MESSAGE).into_response()
}

/// Create the main application router
pub fn create_router(config: Arc<Config>, state: AppState) -> Router {
    let session_layer = SessionManagerLayer::new(state.sessions.clone())
        .with_name(config.session.cookie_name.clone())
        .with_secure(config.session.secure_cookie)
        .with_expiry(Expiry::OnInactivity(config.session.max_age()))
        .with_signed(config.session.signing_key());

    // Storefront pages carry the visitor session. A known path with the
    // wrong method answers like an unknown path.
    let page_routes = Router::new()
        .route("/", get(handlers::home).fallback(handlers::not_found))
        .route("/products", get(handlers::list_products).fallback(handlers::not_found))
        .route("/products/:id", get(handlers::product_details).fallback(handlers::not_found))
        .route(
            "/products/:id/addToCart",
            post(handlers::add_to_cart).fallback(handlers::not_found),
        )
        .route(
            "/products/:id/purchase",
            post(handlers::purchase).fallback(handlers::not_found),
        )
        .layer(session_layer);

    let health_routes = Router::new()
        .route("/healthz", get(health_check).fallback(handlers::not_found))
        .route("/readyz", get(ready_check).fallback(handlers::not_found))
        .route("/build", get(build_info).fallback(handlers::not_found));

    let app = Router::new()
        .merge(page_routes)
        .merge(health_routes)
        .fallback(handlers::not_found)
        .with_state(state);

    // Apply middleware
    app.layer(CatchPanicLayer::custom(handle_panic))
        .layer(TimeoutLayer::new(config.server.request_timeout()))
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static("x-request-id"),
            MakeRequestUuid,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    let matched_path =
                        request.extensions().get::<MatchedPath>().map(MatchedPath::as_str);
                    let request_id = request
                        .headers()
                        .get("x-request-id")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("unknown");

                    tracing::info_span!(
                        "http_request",
                        method = ?request.method(),
                        matched_path,
                        request_id,
                        latency = tracing::field::Empty,
                        status = tracing::field::Empty,
                    )
                })
                .on_request(DefaultOnRequest::new().level(tracing::Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(tracing::Level::INFO)
                        .latency_unit(LatencyUnit::Millis),
                ),
        )
}

/// Create and start the HTTP server
///
/// Returns once a shutdown signal has been received and in-flight requests
/// have drained.
pub async fn create_server(config: Arc<Config>, state: AppState) -> Result<()> {
    let sessions = state.sessions.clone();
    let app = create_router(config.clone(), state);
    let addr: SocketAddr = config
        .server
        .address()
        .parse()
        .map_err(|e| crate::error::Error::config(format!("Invalid server address: {}", e)))?;

    tracing::info!(
        address = %addr,
        environment = %config.server.environment,
        "Starting HTTP server"
    );

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| anyhow!("Failed to bind to {}: {}", addr, e))?;

    tracing::info!("Server running on http://localhost:{}", config.server.port);
    tracing::info!("Visit http://localhost:{}/products to see the demo", config.server.port);

    let sweeper = tokio::spawn(sessions.sweep_expired(config.session.sweep_interval()));
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;
    sweeper.abort();

    served.map_err(|e| anyhow!("Server error: {}", e))?;
    Ok(())
}

/// Shutdown signal handler
///
/// Waits for CTRL+C or SIGTERM signals to gracefully shutdown the server.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received CTRL+C, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_config, create_test_state, MockEventSink};
    use tower::ServiceExt;

    async fn get(app: Router, uri: &str) -> Response {
        app.oneshot(
            axum::http::Request::builder()
                .uri(uri)
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let sink = MockEventSink::new();
        let app = create_router(create_test_config(), create_test_state(&sink));

        let response = get(app, "/healthz").await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_build_endpoint() {
        let sink = MockEventSink::new();
        let app = create_router(create_test_config(), create_test_state(&sink));

        let response = get(app, "/build").await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let sink = MockEventSink::new();
        let app = create_router(create_test_config(), create_test_state(&sink));

        let response = get(app, "/nope").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"Page not found");
        assert!(sink.batches().is_empty());
    }

    #[tokio::test]
    async fn test_wrong_method_is_404() {
        let sink = MockEventSink::new();
        let app = create_router(create_test_config(), create_test_state(&sink));

        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .method("POST")
                    .uri("/healthz")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_home_page_publishes_nothing() {
        let sink = MockEventSink::new();
        let app = create_router(create_test_config(), create_test_state(&sink));

        let response = get(app, "/").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(sink.batches().is_empty());
    }

    #[test]
    fn test_handle_panic_returns_generic_500() {
        let response = handle_panic(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

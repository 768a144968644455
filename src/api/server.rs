//! Router assembly and the HTTP server.

use super::config::{ConfigError, ServiceConfig};
use super::middleware::{
    panic_response, request_context, CORRELATION_ID_HEADER, PROCESS_TIME_HEADER,
};
use super::routes::{self, registered_domains};
use super::state::AppState;
use axum::http::{HeaderName, HeaderValue};
use axum::{middleware, Router};
use std::future::Future;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowHeaders, AllowMethods, Any, CorsLayer};

/// Errors that can occur while running the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind to address: {0}")]
    Bind(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("server error: {0}")]
    Server(String),
}

/// Builds the complete application router.
///
/// Domain routes are nested under the configured base path; `/health`
/// and `/metrics` stay at the root. Panics are converted to 500 envelopes
/// inside the request middleware so they still carry a correlation id.
pub fn build_router(state: AppState) -> Router {
    let base = state.config.api_base_path();

    let mut api = Router::new();
    for domain in registered_domains() {
        tracing::debug!(domain = domain.name, base = %base, "Mounting domain routes");
        api = api.merge((domain.router)());
    }

    Router::new()
        .nest(&base, api)
        .merge(routes::operational_routes())
        .fallback(routes::not_found)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(middleware::from_fn_with_state(state.clone(), request_context))
        .layer(cors_layer(&state.config))
        .with_state(state)
}

fn cors_layer(config: &ServiceConfig) -> CorsLayer {
    let exposed = [
        HeaderName::from_static(CORRELATION_ID_HEADER),
        HeaderName::from_static(PROCESS_TIME_HEADER),
    ];
    let origins = config.cors_origins_list();

    if origins.iter().any(|origin| origin == "*") {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
            .expose_headers(exposed);
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
        .expose_headers(exposed)
}

/// HTTP server for the estimation API.
pub struct ApiServer {
    state: AppState,
}

impl ApiServer {
    /// Creates a server over `state`.
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Runs until Ctrl-C.
    pub async fn run(self) -> Result<(), ServerError> {
        self.run_until(shutdown_signal()).await
    }

    /// Binds the configured address and serves until `shutdown` resolves.
    pub async fn run_until<F>(self, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.state.config.bind_addr()?;
        let listener = TcpListener::bind(addr).await?;
        self.serve(listener, shutdown).await
    }

    /// Serves on an already bound listener until `shutdown` resolves.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let local_addr = listener.local_addr()?;
        tracing::info!(
            addr = %local_addr,
            base_path = %self.state.config.api_base_path(),
            environment = %self.state.config.environment,
            "API server listening"
        );

        let app = build_router(self.state);
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| ServerError::Server(e.to_string()))?;

        tracing::info!("API server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C, running until killed");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::routes::test_support::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::routing::get as get_route;

    #[test]
    fn test_registered_domains() {
        let names: Vec<&str> = registered_domains().iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["data", "model"]);
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found_envelope() {
        let response = send(native_app(), get("/api/v1/nowhere")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let header = response
            .headers()
            .get("x-correlation-id")
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        let body = json_body(response).await;
        assert_eq!(body["error_code"], "NOT_FOUND");
        assert_eq!(body["correlation_id"], header.as_str());
    }

    #[tokio::test]
    async fn test_wrong_method_is_enveloped() {
        let response = send(native_app(), get("/api/v1/data/alphabet/raw")).await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "application/json"
        );

        let header = response
            .headers()
            .get("x-correlation-id")
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        let body = json_body(response).await;
        assert_eq!(body["error_code"], "METHOD_NOT_ALLOWED");
        assert_eq!(body["message"], "method not allowed");
        assert_eq!(body["correlation_id"], header.as_str());
    }

    #[tokio::test]
    async fn test_custom_base_path() {
        let config = ServiceConfig {
            api_prefix: "/svc".into(),
            api_version: "v2".into(),
            ..Default::default()
        };
        let app = build_router(AppState::with_native_oracle(config).unwrap());
        let response = send(app.clone(), get("/svc/v2/model/hello")).await;
        assert_eq!(response.status(), StatusCode::OK);
        let response = send(app, get("/api/v1/model/hello")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_panic_becomes_internal_error_with_correlation_id() {
        async fn boom() -> &'static str {
            panic!("kaboom")
        }

        let state = AppState::with_native_oracle(ServiceConfig::default()).unwrap();
        let app: Router = Router::new()
            .route("/boom", get_route(boom))
            .layer(CatchPanicLayer::custom(panic_response))
            .layer(middleware::from_fn_with_state(state.clone(), request_context))
            .with_state(state);

        let response = send(app, get("/boom")).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert_eq!(body["error_code"], "INTERNAL_SERVER_ERROR");
        assert_eq!(body["message"], "an unexpected error occurred");
        assert!(body["correlation_id"].is_string());
    }

    #[tokio::test]
    async fn test_cors_any_origin() {
        let request = Request::builder()
            .uri("/health")
            .header("origin", "http://example.com")
            .body(Body::empty())
            .unwrap();
        let response = send(native_app(), request).await;
        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "*"
        );
    }

    #[tokio::test]
    async fn test_cors_explicit_origins_allow_credentials() {
        let config = ServiceConfig {
            cors_origins: "http://allowed.example".into(),
            ..Default::default()
        };
        let app = build_router(AppState::with_native_oracle(config).unwrap());
        let request = Request::builder()
            .uri("/health")
            .header("origin", "http://allowed.example")
            .body(Body::empty())
            .unwrap();
        let response = send(app, request).await;
        let headers = response.headers();
        assert_eq!(
            headers.get("access-control-allow-origin").unwrap(),
            "http://allowed.example"
        );
        assert_eq!(
            headers.get("access-control-allow-credentials").unwrap(),
            "true"
        );
    }

    #[tokio::test]
    async fn test_server_stops_on_shutdown() {
        let config = ServiceConfig {
            host: "127.0.0.1".into(),
            port: 0,
            ..Default::default()
        };
        let server = ApiServer::new(AppState::with_native_oracle(config).unwrap());
        assert!(server.run_until(async {}).await.is_ok());
    }
}

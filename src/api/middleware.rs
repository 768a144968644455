//! Per-request correlation, timing and access logging.

use super::error::{ApiError, ErrorBody};
use super::state::AppState;
use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::header::{HeaderValue, CONTENT_LENGTH, CONTENT_TYPE};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::any::Any;
use std::fmt;
use std::time::Instant;
use uuid::Uuid;

/// Response header carrying the correlation id.
pub const CORRELATION_ID_HEADER: &str = "x-correlation-id";
/// Response header carrying the processing time in seconds.
pub const PROCESS_TIME_HEADER: &str = "x-process-time";

/// Identifier attached to one request, its logs and its response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrelationId(String);

impl CorrelationId {
    /// Fresh random (v4) id.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// The id as text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CorrelationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Assigns a correlation id, logs the request, stamps the id into error
/// envelopes and adds the correlation and timing headers.
///
/// Error statuses that did not come from [`ApiError`] get a fresh envelope.
pub async fn request_context(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let started = Instant::now();
    let correlation_id = CorrelationId::new();
    let method = request.method().clone();
    let path = request.uri().path().to_owned();

    tracing::info!(
        correlation_id = %correlation_id,
        %method,
        %path,
        "Incoming request"
    );

    let mut response = next.run(request).await;

    let status = response.status();
    if let Some(body) = response.extensions_mut().remove::<ErrorBody>() {
        stamp_error_body(&mut response, body, &correlation_id);
    } else if status.is_client_error() || status.is_server_error() {
        // Rejections raised by the router itself, e.g. 405.
        let body = ApiError::from_status(status).body();
        stamp_error_body(&mut response, body, &correlation_id);
        response
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    }

    let elapsed = started.elapsed().as_secs_f64();
    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(correlation_id.as_str()) {
        headers.insert(CORRELATION_ID_HEADER, value);
    }
    if let Ok(value) = HeaderValue::from_str(&format!("{elapsed:.3}")) {
        headers.insert(PROCESS_TIME_HEADER, value);
    }

    state
        .metrics
        .observe_request(method.as_str(), status.as_u16(), elapsed);
    tracing::info!(
        correlation_id = %correlation_id,
        %method,
        %path,
        status = status.as_u16(),
        duration_s = elapsed,
        "Completed"
    );

    response
}

fn stamp_error_body(response: &mut Response, mut body: ErrorBody, id: &CorrelationId) {
    body.correlation_id = Some(id.to_string());
    match serde_json::to_vec(&body) {
        Ok(bytes) => {
            response.headers_mut().remove(CONTENT_LENGTH);
            *response.body_mut() = Body::from(bytes);
        }
        Err(e) => tracing::warn!(error = %e, "Could not re-encode error body"),
    }
}

/// Converts a handler panic into a 500 envelope.
pub fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    ApiError::internal(format!("handler panicked: {detail}")).into_response()
}

//! API middleware

use axum::{body::Body, http::Request, middleware::Next, response::Response, BoxError};
use chrono::Utc;
use tower::timeout::error::Elapsed;
use tracing::info;

use crate::error::ApiError;

/// Header carrying the request id, set by `SetRequestIdLayer` when absent
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Reads the request id of a request, if any
pub fn request_id(headers: &axum::http::HeaderMap) -> Option<String> {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .filter(|id| !id.trim().is_empty())
        .map(str::to_string)
}

/// Request logging middleware
///
/// Logs one line per request with its outcome and duration
pub async fn request_log_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let request_id = request_id(request.headers()).unwrap_or_else(|| "-".to_string());

    let start = Utc::now();

    let response = next.run(request).await;

    let duration = Utc::now() - start;
    let status = response.status();

    info!(
        method = %method,
        uri = %uri,
        request_id = %request_id,
        status = %status.as_u16(),
        duration_ms = duration.num_milliseconds(),
        "API request"
    );

    response
}

/// Maps errors of the request deadline layer onto API errors
///
/// An elapsed deadline is a 504: whatever the handler was waiting on (a store
/// or the model) did not answer in time.
pub async fn handle_deadline_error(err: BoxError) -> ApiError {
    if err.is::<Elapsed>() {
        ApiError::GatewayTimeout("Request did not complete within its deadline".to_string())
    } else {
        ApiError::Internal(format!("Unhandled middleware error: {}", err))
    }
}

//! API error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use core_kernel::PortError;
use domain_claims::{ErrorKind, SummarizationError};

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        details: Vec<String>,
    },

    #[error("Bad gateway: {0}")]
    BadGateway(String),

    #[error("Gateway timeout: {0}")]
    GatewayTimeout(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error(transparent)]
    Summarization(#[from] SummarizationError),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl ApiError {
    /// HTTP status of the error
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            ApiError::GatewayTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Summarization(e) => summarization_status(e.kind()),
        }
    }
}

fn summarization_status(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::ClaimNotFound => StatusCode::NOT_FOUND,
        ErrorKind::EngineTimeout => StatusCode::GATEWAY_TIMEOUT,
        ErrorKind::DependencyUnavailable
        | ErrorKind::EngineUnavailable
        | ErrorKind::MalformedOutput
        | ErrorKind::IncompleteOutput => StatusCode::BAD_GATEWAY,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let (error_type, message, details) = match self {
            ApiError::NotFound(msg) => ("not_found".to_string(), msg, None),
            ApiError::BadRequest(msg) => ("bad_request".to_string(), msg, None),
            ApiError::Validation { message, details } => {
                let details = (!details.is_empty()).then_some(details);
                ("validation_error".to_string(), message, details)
            }
            ApiError::BadGateway(msg) => ("bad_gateway".to_string(), msg, None),
            ApiError::GatewayTimeout(msg) => ("gateway_timeout".to_string(), msg, None),
            ApiError::ServiceUnavailable(msg) => ("service_unavailable".to_string(), msg, None),
            ApiError::Internal(msg) => ("internal_error".to_string(), msg, None),
            ApiError::Summarization(e) => (e.kind().as_str().to_string(), e.to_string(), None),
        };

        if status.is_server_error() {
            error!(status = status.as_u16(), error = %error_type, message = %message, "Request failed");
        } else {
            warn!(status = status.as_u16(), error = %error_type, message = %message, "Request rejected");
        }

        let body = ErrorResponse {
            error: error_type,
            message,
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<PortError> for ApiError {
    fn from(err: PortError) -> Self {
        match &err {
            PortError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            PortError::Validation { message, field } => ApiError::Validation {
                message: message.clone(),
                details: field.iter().map(|f| format!("{}: {}", f, message)).collect(),
            },
            PortError::Timeout { .. } => ApiError::GatewayTimeout(err.to_string()),
            PortError::Connection { .. }
            | PortError::ServiceUnavailable { .. }
            | PortError::RateLimited { .. } => ApiError::ServiceUnavailable(err.to_string()),
            PortError::Unauthorized { .. } | PortError::Transformation { .. } => {
                ApiError::BadGateway(err.to_string())
            }
            PortError::Internal { .. } => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut details: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(msg) => format!("{}: {}", field, msg),
                    None => format!("{}: {}", field, e.code),
                })
            })
            .collect();
        details.sort();

        ApiError::Validation {
            message: "Request validation failed".to_string(),
            details,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::ClaimId;

    fn c1() -> ClaimId {
        ClaimId::new("C1").unwrap()
    }

    #[test]
    fn test_summarization_status_mapping() {
        let not_found = ApiError::from(SummarizationError::ClaimNotFound { claim_id: c1() });
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let timeout = ApiError::from(SummarizationError::EngineTimeout {
            claim_id: c1(),
            timeout_ms: 60_000,
        });
        assert_eq!(timeout.status(), StatusCode::GATEWAY_TIMEOUT);

        let malformed = ApiError::from(SummarizationError::MalformedOutput {
            claim_id: c1(),
            reason: "not JSON".to_string(),
        });
        assert_eq!(malformed.status(), StatusCode::BAD_GATEWAY);

        let store_down = ApiError::from(SummarizationError::DependencyUnavailable {
            store: domain_claims::StoreKind::NoteStore,
            claim_id: c1(),
            source: PortError::connection("refused"),
        });
        assert_eq!(store_down.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_port_error_mapping() {
        assert_eq!(
            ApiError::from(PortError::not_found("Claim", "C9")).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(PortError::validation_field("Note text must not be empty", "text")).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::from(PortError::connection("refused")).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::from(PortError::internal("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}

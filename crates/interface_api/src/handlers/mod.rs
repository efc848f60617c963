//! Request handlers

pub mod claims;
pub mod health;
pub mod summary;

use axum::http::HeaderMap;

use core_kernel::{ClaimId, OperationMetadata};

use crate::error::ApiError;
use crate::middleware::request_id;

/// Parses a claim id taken from the request path
pub(crate) fn parse_claim_id(raw: String) -> Result<ClaimId, ApiError> {
    ClaimId::new(raw).map_err(|e| ApiError::BadRequest(e.to_string()))
}

/// Port metadata for a request, correlated by its request id
pub(crate) fn operation_metadata(headers: &HeaderMap) -> OperationMetadata {
    let metadata = match request_id(headers) {
        Some(id) => OperationMetadata::with_correlation_id(id),
        None => OperationMetadata::default(),
    };
    OperationMetadata {
        source_system: Some("interface_api".to_string()),
        ..metadata
    }
}

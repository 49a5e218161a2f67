//! Shared-secret gate for reading routes.

use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::warn;

/// Header carrying the shared secret.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Reject requests whose `x-api-key` does not match the configured secret.
///
/// Without a configured secret every request passes.
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Some(expected) = state.api_key.as_deref() {
        let provided = request
            .headers()
            .get(API_KEY_HEADER)
            .and_then(|value| value.to_str().ok());

        if provided != Some(expected) {
            warn!(
                "Rejected {} {}: missing or invalid API key",
                request.method(),
                request.uri().path()
            );
            return Err(ApiError::Unauthorized("Invalid or missing API key".to_string()));
        }
    }

    Ok(next.run(request).await)
}

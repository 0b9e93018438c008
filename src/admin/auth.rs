use axum::{
    body::Body,
    extract::State,
    http::{header, Request},
    middleware::Next,
    response::Response,
};

use crate::error::AppError;
use crate::http::request::RequestIdExt;
use crate::http::server::AppState;

/// Rejects admin requests without `Authorization: Bearer <api_key>`.
pub async fn admin_auth_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    match token {
        Some(token) if !state.admin.api_key.is_empty() && token == state.admin.api_key => {
            Ok(next.run(request).await)
        }
        _ => {
            tracing::warn!(
                request_id = %request.request_id(),
                path = %request.uri().path(),
                "Rejected admin request"
            );
            Err(AppError::Unauthorized)
        }
    }
}

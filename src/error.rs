//! Error mapping at the HTTP edge.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::ai::AiError;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Ai(#[from] AiError),

    #[error("unauthorized")]
    Unauthorized,
}

fn store_status(err: &StoreError) -> StatusCode {
    match err {
        StoreError::NotFound { .. } => StatusCode::NOT_FOUND,
        StoreError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        StoreError::SlugCollisionExhausted { .. } | StoreError::ConstraintViolation(_) => {
            StatusCode::CONFLICT
        }
        StoreError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Store(e) | AppError::Ai(AiError::Store(e)) => store_status(e),
            AppError::Ai(AiError::NotConfigured) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Ai(_) => StatusCode::BAD_GATEWAY,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "Request failed");
            "internal server error".to_string()
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
            self.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let not_found = AppError::from(StoreError::NotFound { entity: "page", id: 1 });
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let exhausted = AppError::from(StoreError::SlugCollisionExhausted {
            base: "a".into(),
            attempts: 100,
        });
        assert_eq!(exhausted.status(), StatusCode::CONFLICT);

        let clash = AppError::from(StoreError::ConstraintViolation("slug".into()));
        assert_eq!(clash.status(), StatusCode::CONFLICT);

        let invalid = AppError::from(StoreError::InvalidInput("city".into()));
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);

        let wrapped = AppError::from(AiError::Store(StoreError::NotFound { entity: "page", id: 2 }));
        assert_eq!(wrapped.status(), StatusCode::NOT_FOUND);

        assert_eq!(
            AppError::from(AiError::Provider("quota".into())).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AppError::from(AiError::NotConfigured).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(AppError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_internal_errors_hide_details() {
        let err = AppError::from(StoreError::Database(sqlx::Error::PoolTimedOut));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

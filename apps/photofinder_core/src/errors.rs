use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use crate::serializers::ApiError;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Every failure a handler can report. The display string of the first six
/// kinds is the public message; store failures carry a separate public
/// message and keep the cause for the log only.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{public}")]
    Persistence {
        public: &'static str,
        #[source]
        source: BoxError,
    },

    #[error("{public}")]
    Retrieval {
        public: &'static str,
        #[source]
        source: BoxError,
    },
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn persistence(public: &'static str, source: impl Into<BoxError>) -> Self {
        Self::Persistence {
            public,
            source: source.into(),
        }
    }

    pub fn retrieval(public: &'static str, source: impl Into<BoxError>) -> Self {
        Self::Retrieval {
            public,
            source: source.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::InvalidCredentials => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Persistence { .. } | AppError::Retrieval { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Persistence { public, source } | AppError::Retrieval { public, source } => {
                error!(error = %source, "{public}");
            }
            _ => {}
        }
        let status = self.status();
        (status, Json(ApiError { error: self.to_string() })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::RepoError;

    async fn body_of(resp: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn store_failures_hide_the_cause() {
        let err = AppError::persistence(
            "Failed to create booking",
            RepoError::Database("FOREIGN KEY constraint failed".into()),
        );
        let resp = err.into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_of(resp).await;
        assert_eq!(body, serde_json::json!({ "error": "Failed to create booking" }));
    }

    #[tokio::test]
    async fn kinds_map_to_statuses() {
        assert_eq!(AppError::validation("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::InvalidCredentials.status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::not_found("x").status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::conflict("x").status(), StatusCode::CONFLICT);
        assert_eq!(AppError::unauthorized("x").status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::forbidden("x").status(), StatusCode::FORBIDDEN);
        assert_eq!(
            AppError::retrieval("Error retrieving bookings", RepoError::NotFound).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );

        let body = body_of(AppError::InvalidCredentials.into_response()).await;
        assert_eq!(body["error"], "Invalid credentials");
    }
}

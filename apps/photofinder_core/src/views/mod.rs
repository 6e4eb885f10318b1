pub mod booking;
pub mod health;
pub mod photo;
pub mod user_auth;
pub mod users;

use axum::extract::rejection::JsonRejection;
use axum::Json;
use tracing::warn;

use crate::errors::AppError;

/// Unwrap a JSON body, turning a malformed one into a 400 with `msg`.
pub(crate) fn json_body<T>(
    body: Result<Json<T>, JsonRejection>,
    msg: &'static str,
) -> Result<T, AppError> {
    match body {
        Ok(Json(v)) => Ok(v),
        Err(rej) => {
            warn!(reason = %rej.body_text(), "rejected request body");
            Err(AppError::validation(msg))
        }
    }
}

/// Numeric path segment.
pub(crate) fn parse_id(raw: &str, msg: &'static str) -> Result<i32, AppError> {
    raw.trim().parse().map_err(|_| AppError::validation(msg))
}

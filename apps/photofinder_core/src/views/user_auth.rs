use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use tracing::{info, warn};

use super::json_body;
use crate::errors::AppError;
use crate::models::user::Role;
use crate::repos::{NewAccount, RepoError};
use crate::serializers::filled;
use crate::serializers::user_auth::{LoginReq, LoginResp, RegisterReq, RegisterResp, UserPublic};
use crate::AppState;

pub(crate) const MIN_PASSWORD_LEN: usize = 6;

// ---------- handlers ----------
pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterReq>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisterResp>), AppError> {
    let req = json_body(body, "Missing required fields")?;

    let (Some(username), Some(email), Some(password), Some(user_type)) = (
        filled(&req.username),
        filled(&req.email),
        req.password.as_deref().filter(|p| !p.is_empty()),
        filled(&req.user_type),
    ) else {
        return Err(AppError::validation("Missing required fields"));
    };

    // role first: nothing is hashed or stored for an unknown role
    let role: Role = user_type.parse().map_err(|e| {
        warn!(error = %e, "registration with unknown role");
        AppError::validation("Invalid user_type on user")
    })?;

    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::validation(
            "Password must be at least 6 characters",
        ));
    }

    let email = email.to_lowercase();
    if state
        .accounts
        .find_by_email(&email)
        .await
        .map_err(|e| AppError::persistence("Registration failed", e))?
        .is_some()
    {
        return Err(AppError::conflict("Account already exists"));
    }

    let hash = state
        .credentials
        .hash_password(password)
        .map_err(|e| AppError::persistence("Registration failed", e))?;

    let created = state
        .accounts
        .create(NewAccount {
            username: username.to_string(),
            email,
            password_hash: hash,
            user_type: role,
        })
        .await
        .map_err(|e| match e {
            // lost a race with a concurrent registration
            RepoError::UniqueViolation(_) => AppError::conflict("Account already exists"),
            other => AppError::persistence("Registration failed", other),
        })?;

    info!(account_id = created.id, role = %created.user_type, "account registered");
    Ok((
        StatusCode::CREATED,
        Json(RegisterResp {
            message: "User registered successfully".into(),
            user: UserPublic::from(&created),
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginReq>, JsonRejection>,
) -> Result<(StatusCode, Json<LoginResp>), AppError> {
    let req = json_body(body, "Invalid credentials")?;
    let (Some(email), Some(password)) = (filled(&req.email), req.password.as_deref()) else {
        return Err(AppError::InvalidCredentials);
    };

    let Some(found) = state
        .accounts
        .find_by_email(&email.to_lowercase())
        .await
        .map_err(|e| AppError::retrieval("Login failed", e))?
    else {
        return Err(AppError::InvalidCredentials);
    };

    if !state
        .credentials
        .verify_password(&found.password_hash, password)
        .map_err(|e| AppError::retrieval("Login failed", e))?
    {
        return Err(AppError::InvalidCredentials);
    }

    let token = state
        .credentials
        .issue_token(found.id, found.user_type)
        .map_err(|e| AppError::retrieval("Login failed", e))?;

    info!(account_id = found.id, "login succeeded");
    Ok((
        StatusCode::OK,
        Json(LoginResp {
            message: "Login successful".into(),
            token,
            user: UserPublic::from(&found),
        }),
    ))
}

pub async fn me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<(StatusCode, Json<UserPublic>), AppError> {
    let claims = state.credentials.auth_from_header(&headers)?;
    let Some(found) = state
        .accounts
        .find_by_id(claims.sub)
        .await
        .map_err(|e| AppError::retrieval("Error fetching user", e))?
    else {
        return Err(AppError::unauthorized("user not found"));
    };
    Ok((StatusCode::OK, Json(UserPublic::from(&found))))
}

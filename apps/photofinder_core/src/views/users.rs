use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use tracing::{info, warn};

use super::user_auth::MIN_PASSWORD_LEN;
use super::{json_body, parse_id};
use crate::errors::AppError;
use crate::models::user::Role;
use crate::repos::{AccountChanges, RepoError};
use crate::serializers::user_auth::{UpdateUserReq, UserPublic, UsersQuery};
use crate::serializers::{filled, MessageResp};
use crate::AppState;

pub async fn list_users(
    State(state): State<AppState>,
    Query(q): Query<UsersQuery>,
) -> Result<(StatusCode, Json<Vec<UserPublic>>), AppError> {
    let role = match q.user_type.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => Some(
            raw.parse::<Role>()
                .map_err(|_| AppError::validation("Invalid user_type on user"))?,
        ),
        None => None,
    };

    let users = state
        .accounts
        .list(role)
        .await
        .map_err(|e| AppError::retrieval("Error fetching users", e))?;
    Ok((StatusCode::OK, Json(users.iter().map(UserPublic::from).collect())))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<UserPublic>), AppError> {
    let id = parse_id(&id, "Invalid user id")?;
    let Some(found) = state
        .accounts
        .find_by_id(id)
        .await
        .map_err(|e| AppError::retrieval("Error fetching user", e))?
    else {
        return Err(AppError::not_found("User not found"));
    };
    Ok((StatusCode::OK, Json(UserPublic::from(&found))))
}

/// With ownership enforcement on, only the account itself may change it.
fn ensure_self(state: &AppState, headers: &HeaderMap, id: i32) -> Result<(), AppError> {
    if !state.policy.enforce_ownership {
        return Ok(());
    }
    let claims = state.credentials.auth_from_header(headers)?;
    if claims.sub != id {
        warn!(target_id = id, account_id = claims.sub, "account change refused");
        return Err(AppError::forbidden("Not authorized for this resource"));
    }
    Ok(())
}

pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Result<Json<UpdateUserReq>, JsonRejection>,
) -> Result<(StatusCode, Json<UserPublic>), AppError> {
    let id = parse_id(&id, "Invalid user id")?;
    ensure_self(&state, &headers, id)?;
    let req = json_body(body, "Invalid request body")?;

    let Some(current) = state
        .accounts
        .find_by_id(id)
        .await
        .map_err(|e| AppError::persistence("Error updating user", e))?
    else {
        return Err(AppError::not_found("User not found"));
    };

    if let Some(raw) = filled(&req.user_type) {
        let role: Role = raw
            .parse()
            .map_err(|_| AppError::validation("Invalid user_type on user"))?;
        if role != current.user_type {
            warn!(account_id = id, "role change refused");
            return Err(AppError::validation("user_type cannot be changed"));
        }
    }

    let email = filled(&req.email).map(str::to_lowercase);
    if let Some(email) = email.as_deref().filter(|e| *e != current.email) {
        let taken = state
            .accounts
            .find_by_email(email)
            .await
            .map_err(|e| AppError::persistence("Error updating user", e))?;
        if taken.is_some() {
            return Err(AppError::conflict("Account already exists"));
        }
    }

    let password_hash = match req.password.as_deref().filter(|p| !p.is_empty()) {
        Some(p) if p.chars().count() < MIN_PASSWORD_LEN => {
            return Err(AppError::validation(
                "Password must be at least 6 characters",
            ));
        }
        Some(p) => Some(
            state
                .credentials
                .hash_password(p)
                .map_err(|e| AppError::persistence("Error updating user", e))?,
        ),
        None => None,
    };

    let updated = state
        .accounts
        .update(
            id,
            AccountChanges {
                username: filled(&req.username).map(str::to_string),
                email,
                password_hash,
            },
        )
        .await
        .map_err(|e| match e {
            RepoError::NotFound => AppError::not_found("User not found"),
            RepoError::UniqueViolation(_) => AppError::conflict("Account already exists"),
            other => AppError::persistence("Error updating user", other),
        })?;

    info!(account_id = id, "account updated");
    Ok((StatusCode::OK, Json(UserPublic::from(&updated))))
}

/// Photos and bookings of the account go with it.
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<(StatusCode, Json<MessageResp>), AppError> {
    let id = parse_id(&id, "Invalid user id")?;
    ensure_self(&state, &headers, id)?;

    state.accounts.delete(id).await.map_err(|e| match e {
        RepoError::NotFound => AppError::not_found("User not found"),
        other => AppError::persistence("Error deleting user", other),
    })?;

    info!(account_id = id, "account deleted");
    Ok((
        StatusCode::OK,
        Json(MessageResp {
            message: "User deleted successfully".into(),
        }),
    ))
}

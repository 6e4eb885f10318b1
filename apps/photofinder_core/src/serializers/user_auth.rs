use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::user::{self, Role};

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct RegisterReq {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    /// "user" | "photographer", any case
    pub user_type: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct LoginReq {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// `PUT /users/{id}`: every field optional, absent or blank ones are kept.
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct UpdateUserReq {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    /// accepted only when it names the current role
    pub user_type: Option<String>,
}

/// Account fields safe to hand out. Never carries the digest.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct UserPublic {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub user_type: Role,
    pub created_at: String,
}

impl From<&user::Model> for UserPublic {
    fn from(m: &user::Model) -> Self {
        Self {
            id: m.id,
            username: m.username.clone(),
            email: m.email.clone(),
            user_type: m.user_type,
            created_at: m.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResp {
    pub message: String,
    pub user: UserPublic,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResp {
    pub message: String,
    /// access token (JWT)
    pub token: String,
    pub user: UserPublic,
}

#[derive(Debug, Deserialize, Default)]
pub struct UsersQuery {
    pub user_type: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: i32,
    pub user_type: Role,
    pub jti: Uuid,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
    pub aud: String,
}

use std::sync::Arc;

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm as ArgonAlgorithm, Argon2, Params, Version,
};
use axum::http::{header, HeaderMap};
use chrono::Utc;
use jsonwebtoken::{errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::rngs::OsRng;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::Role;
use crate::serializers::user_auth::Claims;
use crate::JwtCfg;

const ISSUER: &str = "photofinder";
const AUDIENCE: &str = "photofinder-app";

/// Password digests and signed access tokens.
#[derive(Clone)]
pub struct Credentials {
    enc: Arc<EncodingKey>,
    dec: Arc<DecodingKey>,
    cfg: JwtCfg,
}

impl Credentials {
    pub fn new(secret: &[u8], cfg: JwtCfg) -> Self {
        Self {
            enc: Arc::new(EncodingKey::from_secret(secret)),
            dec: Arc::new(DecodingKey::from_secret(secret)),
            cfg,
        }
    }

    // ---------- password hashing ----------
    pub fn hash_password(&self, password: &str) -> Result<String, anyhow::Error> {
        // Argon2id, fresh salt per call
        let salt = SaltString::generate(&mut OsRng);
        Ok(argon()?.hash_password(password.as_bytes(), &salt)?.to_string())
    }

    pub fn verify_password(&self, phc: &str, password: &str) -> Result<bool, anyhow::Error> {
        let parsed = PasswordHash::new(phc)?;
        Ok(argon()?.verify_password(password.as_bytes(), &parsed).is_ok())
    }

    // ---------- jwt ----------
    pub fn issue_token(&self, account_id: i32, role: Role) -> Result<String, anyhow::Error> {
        let now = Utc::now();
        let claims = Claims {
            sub: account_id,
            user_type: role,
            jti: Uuid::new_v4(),
            iat: now.timestamp(),
            exp: (now + self.cfg.access_ttl).timestamp(),
            iss: ISSUER.into(),
            aud: AUDIENCE.into(),
        };
        Ok(jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &self.enc,
        )?)
    }

    pub fn decode_token(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let mut v = Validation::new(Algorithm::HS256);
        v.validate_exp = true;
        v.leeway = 0;
        v.set_audience(&[AUDIENCE]);
        v.set_issuer(&[ISSUER]);
        jsonwebtoken::decode::<Claims>(token, &self.dec, &v).map(|d| d.claims)
    }

    /// Claims from an `Authorization: Bearer` header.
    pub fn auth_from_header(&self, headers: &HeaderMap) -> Result<Claims, AppError> {
        let Some(h) = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
        else {
            return Err(AppError::unauthorized("missing bearer token"));
        };
        let Some(token) = h.strip_prefix("Bearer ") else {
            return Err(AppError::unauthorized("missing bearer token"));
        };
        self.decode_token(token.trim()).map_err(|e| {
            if matches!(e.kind(), ErrorKind::ExpiredSignature) {
                AppError::unauthorized("expired access token")
            } else {
                AppError::unauthorized("invalid or expired token")
            }
        })
    }
}

fn argon() -> Result<Argon2<'static>, anyhow::Error> {
    let params = Params::new(19456, 2, 1, None)?; // ~19MB mem, 2 iters
    Ok(Argon2::new(ArgonAlgorithm::Argon2id, Version::V0x13, params))
}

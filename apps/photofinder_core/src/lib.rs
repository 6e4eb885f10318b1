pub mod credentials;
pub mod errors;
pub mod images;
pub mod models;
pub mod repos;
pub mod serializers;
pub mod urls;
pub mod views;

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::Duration as ChronoDuration;
use sea_orm::DatabaseConnection;
use thiserror::Error;
use tracing::info;

use crate::credentials::Credentials;
use crate::images::{ImageStore, InlineImageStore};
use crate::repos::{AccountRepository, BookingRepository, HealthProbe, PhotoRepository};

#[derive(Clone, Debug)]
pub struct JwtCfg {
    /// Access token TTL (default 1h). Override with TOKEN_TTL_SECS.
    pub access_ttl: ChronoDuration,
}

impl JwtCfg {
    pub fn from_env() -> Self {
        Self {
            access_ttl: ChronoDuration::seconds(env_or("TOKEN_TTL_SECS", 3600)),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
}

/// Process settings, read once at start.
#[derive(Clone, Debug)]
pub struct AppCfg {
    pub port: u16,
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt: JwtCfg,
    /// Require the owner's token on DELETE routes.
    pub enforce_ownership: bool,
    pub request_timeout: Duration,
    pub body_limit_bytes: usize,
    pub max_image_bytes: usize,
    pub cors_origin: String,
}

impl AppCfg {
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;
        let jwt_secret = std::env::var("JWT_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;
        let enforce_ownership = std::env::var("ENFORCE_OWNERSHIP")
            .map(|v| matches!(v.as_str(), "1" | "true" | "TRUE"))
            .unwrap_or(false);

        Ok(Self {
            port: env_or("PORT", 5004),
            database_url,
            jwt_secret,
            jwt: JwtCfg::from_env(),
            enforce_ownership,
            request_timeout: Duration::from_secs(env_or("REQUEST_TIMEOUT_SECS", 30)),
            body_limit_bytes: env_or("BODY_LIMIT_BYTES", 50 * 1024 * 1024),
            max_image_bytes: env_or("MAX_IMAGE_BYTES", 10 * 1024 * 1024),
            cors_origin: std::env::var("CORS_ORIGIN").unwrap_or_else(|_| "*".into()),
        })
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

#[derive(Clone, Copy, Debug, Default)]
pub struct AccessPolicy {
    pub enforce_ownership: bool,
}

/// Everything a handler needs. Built once in `main`, cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<dyn AccountRepository>,
    pub photos: Arc<dyn PhotoRepository>,
    pub bookings: Arc<dyn BookingRepository>,
    pub probe: Arc<dyn HealthProbe>,
    pub images: Arc<dyn ImageStore>,
    pub credentials: Credentials,
    pub policy: AccessPolicy,
}

impl AppState {
    /// Wire every repository seam to the same store.
    pub fn with_store<S>(store: Arc<S>, credentials: Credentials, images: Arc<dyn ImageStore>) -> Self
    where
        S: AccountRepository + PhotoRepository + BookingRepository + HealthProbe + 'static,
    {
        Self {
            accounts: store.clone(),
            photos: store.clone(),
            bookings: store.clone(),
            probe: store,
            images,
            credentials,
            policy: AccessPolicy::default(),
        }
    }

    pub fn from_cfg<S>(store: Arc<S>, cfg: &AppCfg) -> Self
    where
        S: AccountRepository + PhotoRepository + BookingRepository + HealthProbe + 'static,
    {
        let credentials = Credentials::new(cfg.jwt_secret.as_bytes(), cfg.jwt.clone());
        let images = Arc::new(InlineImageStore::new(cfg.max_image_bytes));
        let mut state = Self::with_store(store, credentials, images);
        state.policy.enforce_ownership = cfg.enforce_ownership;
        state
    }
}

/// Ensure DB schema is up-to-date (calls migration crate).
pub async fn ensure_schema(db: &DatabaseConnection) -> Result<()> {
    use migration::Migrator;
    use sea_orm_migration::migrator::MigratorTrait;
    Migrator::up(db, None).await?;
    info!("database schema is up to date");
    Ok(())
}

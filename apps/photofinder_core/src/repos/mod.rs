//! Persistence seams.
//!
//! Handlers only see these traits; [`SeaStore`] is the production
//! implementation over a pooled sea-orm connection. Every method is a single
//! round-trip, there is no transaction spanning two calls.

mod sea_store;

pub use sea_store::SeaStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::{booking, photo, user};
use crate::models::user::Role;

pub type Account = user::Model;
pub type Photo = photo::Model;
pub type Booking = booking::Model;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("record not found")]
    NotFound,

    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("database error: {0}")]
    Database(String),
}

#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub user_type: Role,
}

/// Partial account update; `None` leaves the column as is. The role is not
/// part of it, it never changes after registration.
#[derive(Debug, Clone, Default)]
pub struct AccountChanges {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewPhoto {
    pub user_id: i32,
    pub image: String,
    pub photo_type: String,
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewBooking {
    pub booking_type: String,
    pub date: DateTime<Utc>,
    pub time: String,
    pub photographer_id: i32,
    pub user_id: i32,
}

#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn create(&self, account: NewAccount) -> Result<Account, RepoError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Account>, RepoError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, RepoError>;

    /// Account with this id *and* role `PHOTOGRAPHER`.
    async fn find_photographer(&self, id: i32) -> Result<Option<Account>, RepoError>;

    async fn list(&self, role: Option<Role>) -> Result<Vec<Account>, RepoError>;

    /// [`RepoError::NotFound`] when no account has this id.
    async fn update(&self, id: i32, changes: AccountChanges) -> Result<Account, RepoError>;

    /// Removes the account with its photos and bookings (FK cascade).
    async fn delete(&self, id: i32) -> Result<(), RepoError>;
}

#[async_trait]
pub trait PhotoRepository: Send + Sync {
    async fn create(&self, photo: NewPhoto) -> Result<Photo, RepoError>;

    async fn find(&self, id: i32) -> Result<Option<Photo>, RepoError>;

    /// Every photo joined with its owner (owner is `None` only for dangling rows).
    async fn list_with_owners(&self) -> Result<Vec<(Photo, Option<Account>)>, RepoError>;

    async fn list_by_owner(&self, user_id: i32) -> Result<Vec<Photo>, RepoError>;

    /// Returns the deleted row, [`RepoError::NotFound`] when nothing matched.
    async fn delete(&self, id: i32) -> Result<Photo, RepoError>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn create(&self, booking: NewBooking) -> Result<Booking, RepoError>;

    async fn find(&self, id: i32) -> Result<Option<Booking>, RepoError>;

    async fn list_for_photographer(&self, photographer_id: i32) -> Result<Vec<Booking>, RepoError>;

    /// [`RepoError::NotFound`] when nothing matched.
    async fn delete(&self, id: i32) -> Result<(), RepoError>;
}

#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn ping(&self) -> Result<(), RepoError>;
}

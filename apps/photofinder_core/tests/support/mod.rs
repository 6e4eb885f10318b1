//! Shared fixtures: an in-memory store standing in for the database and
//! helpers for driving the router.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::{Duration as ChronoDuration, Utc};
use serde_json::Value;
use tower::ServiceExt;

use photofinder_core::credentials::Credentials;
use photofinder_core::images::InlineImageStore;
use photofinder_core::models::user::Role;
use photofinder_core::repos::{
    Account, AccountChanges, AccountRepository, Booking, BookingRepository, HealthProbe,
    NewAccount, NewBooking, NewPhoto, Photo, PhotoRepository, RepoError,
};
use photofinder_core::{urls, AppState, JwtCfg};

/// A 1x1 PNG as a data URI.
pub const PNG_DATA_URI: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

#[derive(Default)]
struct Tables {
    accounts: Vec<Account>,
    photos: Vec<Photo>,
    bookings: Vec<Booking>,
    next_id: i32,
}

impl Tables {
    fn next(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    pub fail_reads: AtomicBool,
    pub fail_writes: AtomicBool,
    pub down: AtomicBool,
    /// `find_by_email` misses, as when a concurrent registration has not
    /// committed yet at lookup time.
    pub stale_email_lookup: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail_reads(&self) {
        self.fail_reads.store(true, Ordering::SeqCst);
    }

    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    pub fn stale_email_lookup(&self) {
        self.stale_email_lookup.store(true, Ordering::SeqCst);
    }

    pub fn account(&self, id: i32) -> Option<Account> {
        self.tables
            .lock()
            .unwrap()
            .accounts
            .iter()
            .find(|a| a.id == id)
            .cloned()
    }

    pub fn booking_count(&self) -> usize {
        self.tables.lock().unwrap().bookings.len()
    }

    pub fn photo_count(&self) -> usize {
        self.tables.lock().unwrap().photos.len()
    }

    pub fn account_count(&self) -> usize {
        self.tables.lock().unwrap().accounts.len()
    }

    pub fn account_by_email(&self, email: &str) -> Option<Account> {
        self.tables
            .lock()
            .unwrap()
            .accounts
            .iter()
            .find(|a| a.email == email)
            .cloned()
    }

    /// Insert an account directly, with a throwaway digest.
    pub fn seed_account(&self, username: &str, role: Role) -> Account {
        let mut t = self.tables.lock().unwrap();
        let now = Utc::now();
        let account = Account {
            id: t.next(),
            username: username.into(),
            email: format!("{username}@example.com"),
            password_hash: "not-a-real-digest".into(),
            user_type: role,
            created_at: now,
            updated_at: now,
        };
        t.accounts.push(account.clone());
        account
    }

    fn read_guard(&self) -> Result<(), RepoError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(RepoError::Database("connection reset by peer".into()));
        }
        Ok(())
    }

    fn write_guard(&self) -> Result<(), RepoError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(RepoError::Database("connection reset by peer".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl AccountRepository for MemoryStore {
    async fn create(&self, a: NewAccount) -> Result<Account, RepoError> {
        self.write_guard()?;
        let mut t = self.tables.lock().unwrap();
        if t.accounts.iter().any(|x| x.email == a.email) {
            return Err(RepoError::UniqueViolation("users.email".into()));
        }
        let now = Utc::now();
        let account = Account {
            id: t.next(),
            username: a.username,
            email: a.email,
            password_hash: a.password_hash,
            user_type: a.user_type,
            created_at: now,
            updated_at: now,
        };
        t.accounts.push(account.clone());
        Ok(account)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Account>, RepoError> {
        self.read_guard()?;
        let t = self.tables.lock().unwrap();
        Ok(t.accounts.iter().find(|a| a.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, RepoError> {
        self.read_guard()?;
        if self.stale_email_lookup.load(Ordering::SeqCst) {
            return Ok(None);
        }
        Ok(self.account_by_email(email))
    }

    async fn find_photographer(&self, id: i32) -> Result<Option<Account>, RepoError> {
        self.read_guard()?;
        let t = self.tables.lock().unwrap();
        Ok(t.accounts
            .iter()
            .find(|a| a.id == id && a.user_type == Role::Photographer)
            .cloned())
    }

    async fn list(&self, role: Option<Role>) -> Result<Vec<Account>, RepoError> {
        self.read_guard()?;
        let t = self.tables.lock().unwrap();
        Ok(t.accounts
            .iter()
            .filter(|a| role.is_none_or(|r| a.user_type == r))
            .cloned()
            .collect())
    }

    async fn update(&self, id: i32, changes: AccountChanges) -> Result<Account, RepoError> {
        self.write_guard()?;
        let mut t = self.tables.lock().unwrap();
        if let Some(email) = &changes.email {
            if t.accounts.iter().any(|a| a.id != id && &a.email == email) {
                return Err(RepoError::UniqueViolation("users.email".into()));
            }
        }
        let account = t
            .accounts
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(RepoError::NotFound)?;
        if let Some(v) = changes.username {
            account.username = v;
        }
        if let Some(v) = changes.email {
            account.email = v;
        }
        if let Some(v) = changes.password_hash {
            account.password_hash = v;
        }
        account.updated_at = Utc::now();
        Ok(account.clone())
    }

    async fn delete(&self, id: i32) -> Result<(), RepoError> {
        self.write_guard()?;
        let mut t = self.tables.lock().unwrap();
        let pos = t.accounts.iter().position(|a| a.id == id).ok_or(RepoError::NotFound)?;
        t.accounts.remove(pos);
        // mirror the FK cascade
        t.photos.retain(|p| p.user_id != id);
        t.bookings.retain(|b| b.photographer_id != id && b.user_id != id);
        Ok(())
    }
}

#[async_trait]
impl PhotoRepository for MemoryStore {
    async fn create(&self, p: NewPhoto) -> Result<Photo, RepoError> {
        self.write_guard()?;
        let mut t = self.tables.lock().unwrap();
        let photo = Photo {
            id: t.next(),
            user_id: p.user_id,
            image: p.image,
            photo_type: p.photo_type,
            title: p.title,
            description: p.description,
            created_at: Utc::now(),
        };
        t.photos.push(photo.clone());
        Ok(photo)
    }

    async fn find(&self, id: i32) -> Result<Option<Photo>, RepoError> {
        self.read_guard()?;
        let t = self.tables.lock().unwrap();
        Ok(t.photos.iter().find(|p| p.id == id).cloned())
    }

    async fn list_with_owners(&self) -> Result<Vec<(Photo, Option<Account>)>, RepoError> {
        self.read_guard()?;
        let t = self.tables.lock().unwrap();
        Ok(t.photos
            .iter()
            .map(|p| {
                let owner = t.accounts.iter().find(|a| a.id == p.user_id).cloned();
                (p.clone(), owner)
            })
            .collect())
    }

    async fn list_by_owner(&self, user_id: i32) -> Result<Vec<Photo>, RepoError> {
        self.read_guard()?;
        let t = self.tables.lock().unwrap();
        Ok(t.photos.iter().filter(|p| p.user_id == user_id).cloned().collect())
    }

    async fn delete(&self, id: i32) -> Result<Photo, RepoError> {
        self.write_guard()?;
        let mut t = self.tables.lock().unwrap();
        let pos = t.photos.iter().position(|p| p.id == id).ok_or(RepoError::NotFound)?;
        Ok(t.photos.remove(pos))
    }
}

#[async_trait]
impl BookingRepository for MemoryStore {
    async fn create(&self, b: NewBooking) -> Result<Booking, RepoError> {
        self.write_guard()?;
        let mut t = self.tables.lock().unwrap();
        let booking = Booking {
            id: t.next(),
            booking_type: b.booking_type,
            date: b.date,
            time: b.time,
            photographer_id: b.photographer_id,
            user_id: b.user_id,
            created_at: Utc::now(),
        };
        t.bookings.push(booking.clone());
        Ok(booking)
    }

    async fn find(&self, id: i32) -> Result<Option<Booking>, RepoError> {
        self.read_guard()?;
        let t = self.tables.lock().unwrap();
        Ok(t.bookings.iter().find(|b| b.id == id).cloned())
    }

    async fn list_for_photographer(&self, photographer_id: i32) -> Result<Vec<Booking>, RepoError> {
        self.read_guard()?;
        let t = self.tables.lock().unwrap();
        Ok(t.bookings
            .iter()
            .filter(|b| b.photographer_id == photographer_id)
            .cloned()
            .collect())
    }

    async fn delete(&self, id: i32) -> Result<(), RepoError> {
        self.write_guard()?;
        let mut t = self.tables.lock().unwrap();
        let pos = t.bookings.iter().position(|b| b.id == id).ok_or(RepoError::NotFound)?;
        t.bookings.remove(pos);
        Ok(())
    }
}

#[async_trait]
impl HealthProbe for MemoryStore {
    async fn ping(&self) -> Result<(), RepoError> {
        if self.down.load(Ordering::SeqCst) {
            return Err(RepoError::Database("connection refused".into()));
        }
        Ok(())
    }
}

pub fn credentials() -> Credentials {
    Credentials::new(
        b"test-secret",
        JwtCfg {
            access_ttl: ChronoDuration::seconds(3600),
        },
    )
}

pub fn state(store: Arc<MemoryStore>) -> AppState {
    AppState::with_store(store, credentials(), Arc::new(InlineImageStore::new(1024 * 1024)))
}

pub fn app(store: Arc<MemoryStore>) -> Router {
    urls::router(state(store))
}

/// Router with delete ownership checks switched on.
pub fn strict_app(store: Arc<MemoryStore>) -> Router {
    let mut s = state(store);
    s.policy.enforce_ownership = true;
    urls::router(s)
}

pub fn token_for(account: &Account) -> String {
    credentials().issue_token(account.id, account.user_type).unwrap()
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    token: Option<&str>,
) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(t) = token {
        req = req.header(header::AUTHORIZATION, format!("Bearer {t}"));
    }
    let req = match body {
        Some(v) => req
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(v.to_string()))
            .unwrap(),
        None => req.body(Body::empty()).unwrap(),
    };

    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None, None).await
}

pub async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(body), None).await
}

pub async fn put(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::PUT, uri, Some(body), None).await
}

pub async fn delete(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::DELETE, uri, None, None).await
}

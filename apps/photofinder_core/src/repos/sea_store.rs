use async_trait::async_trait;
use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, ModelTrait,
    QueryFilter, QueryOrder, Set, SqlErr,
};
use tracing::debug;

use super::{
    Account, AccountChanges, AccountRepository, Booking, BookingRepository, HealthProbe,
    NewAccount, NewBooking, NewPhoto, Photo, PhotoRepository, RepoError,
};
use crate::models::booking::{self, Column as BookingCol, Entity as BookingEntity};
use crate::models::photo::{self, Column as PhotoCol, Entity as PhotoEntity};
use crate::models::user::{self, Column as UserCol, Entity as User, Role};

/// sea-orm backed store. Cheap to clone, the connection is a pool handle.
#[derive(Clone)]
pub struct SeaStore {
    db: DatabaseConnection,
}

impl SeaStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn db_err(e: DbErr) -> RepoError {
    match e {
        DbErr::RecordNotFound(_) => RepoError::NotFound,
        other => match other.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg)) => RepoError::UniqueViolation(msg),
            _ => RepoError::Database(other.to_string()),
        },
    }
}

#[async_trait]
impl AccountRepository for SeaStore {
    async fn create(&self, account: NewAccount) -> Result<Account, RepoError> {
        let now = Utc::now();
        user::ActiveModel {
            id: NotSet,
            username: Set(account.username),
            email: Set(account.email),
            password_hash: Set(account.password_hash),
            user_type: Set(account.user_type),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(db_err)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Account>, RepoError> {
        User::find_by_id(id).one(&self.db).await.map_err(db_err)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, RepoError> {
        User::find()
            .filter(UserCol::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(db_err)
    }

    async fn find_photographer(&self, id: i32) -> Result<Option<Account>, RepoError> {
        User::find_by_id(id)
            .filter(UserCol::UserType.eq(Role::Photographer))
            .one(&self.db)
            .await
            .map_err(db_err)
    }

    async fn list(&self, role: Option<Role>) -> Result<Vec<Account>, RepoError> {
        let mut q = User::find().order_by_asc(UserCol::Id);
        if let Some(r) = role {
            q = q.filter(UserCol::UserType.eq(r));
        }
        q.all(&self.db).await.map_err(db_err)
    }

    async fn update(&self, id: i32, changes: AccountChanges) -> Result<Account, RepoError> {
        let Some(found) = User::find_by_id(id).one(&self.db).await.map_err(db_err)? else {
            return Err(RepoError::NotFound);
        };
        let mut active: user::ActiveModel = found.into();
        if let Some(username) = changes.username {
            active.username = Set(username);
        }
        if let Some(email) = changes.email {
            active.email = Set(email);
        }
        if let Some(hash) = changes.password_hash {
            active.password_hash = Set(hash);
        }
        active.updated_at = Set(Utc::now());
        active.update(&self.db).await.map_err(db_err)
    }

    async fn delete(&self, id: i32) -> Result<(), RepoError> {
        let res = User::delete_by_id(id).exec(&self.db).await.map_err(db_err)?;
        debug!(account_id = id, rows = res.rows_affected, "account delete executed");
        if res.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl PhotoRepository for SeaStore {
    async fn create(&self, photo: NewPhoto) -> Result<Photo, RepoError> {
        photo::ActiveModel {
            id: NotSet,
            user_id: Set(photo.user_id),
            image: Set(photo.image),
            photo_type: Set(photo.photo_type),
            title: Set(photo.title),
            description: Set(photo.description),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await
        .map_err(db_err)
    }

    async fn find(&self, id: i32) -> Result<Option<Photo>, RepoError> {
        PhotoEntity::find_by_id(id).one(&self.db).await.map_err(db_err)
    }

    async fn list_with_owners(&self) -> Result<Vec<(Photo, Option<Account>)>, RepoError> {
        PhotoEntity::find()
            .find_also_related(User)
            .order_by_asc(PhotoCol::Id)
            .all(&self.db)
            .await
            .map_err(db_err)
    }

    async fn list_by_owner(&self, user_id: i32) -> Result<Vec<Photo>, RepoError> {
        PhotoEntity::find()
            .filter(PhotoCol::UserId.eq(user_id))
            .order_by_asc(PhotoCol::Id)
            .all(&self.db)
            .await
            .map_err(db_err)
    }

    async fn delete(&self, id: i32) -> Result<Photo, RepoError> {
        let Some(found) = PhotoEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
        else {
            return Err(RepoError::NotFound);
        };
        let res = found.clone().delete(&self.db).await.map_err(db_err)?;
        if res.rows_affected == 0 {
            // removed between the read and the delete
            return Err(RepoError::NotFound);
        }
        Ok(found)
    }
}

#[async_trait]
impl BookingRepository for SeaStore {
    async fn create(&self, b: NewBooking) -> Result<Booking, RepoError> {
        booking::ActiveModel {
            id: NotSet,
            booking_type: Set(b.booking_type),
            date: Set(b.date),
            time: Set(b.time),
            photographer_id: Set(b.photographer_id),
            user_id: Set(b.user_id),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await
        .map_err(db_err)
    }

    async fn find(&self, id: i32) -> Result<Option<Booking>, RepoError> {
        BookingEntity::find_by_id(id).one(&self.db).await.map_err(db_err)
    }

    async fn list_for_photographer(&self, photographer_id: i32) -> Result<Vec<Booking>, RepoError> {
        BookingEntity::find()
            .filter(BookingCol::PhotographerId.eq(photographer_id))
            .order_by_asc(BookingCol::Id)
            .all(&self.db)
            .await
            .map_err(db_err)
    }

    async fn delete(&self, id: i32) -> Result<(), RepoError> {
        let res = BookingEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        debug!(booking_id = id, rows = res.rows_affected, "booking delete executed");
        if res.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl HealthProbe for SeaStore {
    async fn ping(&self) -> Result<(), RepoError> {
        self.db.ping().await.map_err(db_err)
    }
}

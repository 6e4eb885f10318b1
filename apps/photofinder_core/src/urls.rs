use axum::{
    routing::{get, post},
    Router,
};

use crate::views::{
    booking::{create_booking, delete_booking, list_for_photographer},
    health::health,
    photo::{delete_photo, list_by_owner, list_photos, upload_photo},
    user_auth::{login, me, register},
    users::{delete_user, get_user, list_users, update_user},
};
use crate::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/me", get(me))
        .route("/users", get(list_users))
        .route(
            "/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/photos", get(list_photos))
        .route("/photos/upload", post(upload_photo))
        .route("/photos/user/{id}", get(list_by_owner))
        .route("/photos/{id}", get(list_by_owner).delete(delete_photo))
        .route("/bookings", post(create_booking))
        .route(
            "/bookings/{id}",
            get(list_for_photographer).delete(delete_booking),
        )
        .with_state(state)
}

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use tracing::{info, warn};

use super::{json_body, parse_id};
use crate::errors::AppError;
use crate::models::user::Role;
use crate::repos::{Booking, NewBooking, RepoError};
use crate::serializers::booking::{compose_instant, CreateBookingReq};
use crate::serializers::MessageResp;
use crate::AppState;

const FIELDS_REQUIRED: &str = "All fields are required";

/// Bookings whose `photographer_id` is the path id.
pub async fn list_for_photographer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<Vec<Booking>>), AppError> {
    let photographer_id = parse_id(&id, "Invalid photographer id")?;
    let bookings = state
        .bookings
        .list_for_photographer(photographer_id)
        .await
        .map_err(|e| AppError::retrieval("Error retrieving bookings", e))?;
    Ok((StatusCode::OK, Json(bookings)))
}

pub async fn create_booking(
    State(state): State<AppState>,
    body: Result<Json<CreateBookingReq>, JsonRejection>,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    let req = json_body(body, FIELDS_REQUIRED)?;

    let Some(fields) = req.fields() else {
        warn!("booking rejected: missing fields");
        return Err(AppError::validation(FIELDS_REQUIRED));
    };
    let (Some(photographer_id), Some(user_id)) =
        (fields.photographer_id.to_id(), fields.user_id.to_id())
    else {
        warn!("booking rejected: non-numeric account id");
        return Err(AppError::validation(FIELDS_REQUIRED));
    };

    if state
        .accounts
        .find_photographer(photographer_id)
        .await
        .map_err(|e| AppError::persistence("Failed to create booking", e))?
        .is_none()
    {
        warn!(photographer_id, "booking rejected: no such photographer");
        return Err(AppError::not_found("Photographer not found"));
    }

    let Some(client) = state
        .accounts
        .find_by_id(user_id)
        .await
        .map_err(|e| AppError::persistence("Failed to create booking", e))?
    else {
        warn!(user_id, "booking rejected: no such client");
        return Err(AppError::not_found("User not found"));
    };
    if client.user_type != Role::User {
        warn!(user_id, "booking rejected: client is not a USER account");
        return Err(AppError::forbidden("The specified user is not a client"));
    }

    let Some(date) = compose_instant(fields.date, fields.time) else {
        return Err(AppError::validation("Invalid date or time"));
    };

    let created = state
        .bookings
        .create(NewBooking {
            booking_type: fields.booking_type.to_string(),
            date,
            time: fields.time.to_string(),
            photographer_id,
            user_id,
        })
        .await
        .map_err(|e| AppError::persistence("Failed to create booking", e))?;

    info!(
        booking_id = created.id,
        photographer_id, user_id, "booking created"
    );
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn delete_booking(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<(StatusCode, Json<MessageResp>), AppError> {
    let id = parse_id(&id, "Invalid booking id")?;

    if state.policy.enforce_ownership {
        let claims = state.credentials.auth_from_header(&headers)?;
        let booking = state
            .bookings
            .find(id)
            .await
            .and_then(|found| found.ok_or(RepoError::NotFound))
            .map_err(|e| AppError::persistence("Error deleting booking", e))?;
        if claims.sub != booking.photographer_id && claims.sub != booking.user_id {
            warn!(booking_id = id, account_id = claims.sub, "booking delete refused");
            return Err(AppError::forbidden("Not authorized for this resource"));
        }
    }

    state
        .bookings
        .delete(id)
        .await
        .map_err(|e| AppError::persistence("Error deleting booking", e))?;

    info!(booking_id = id, "booking deleted");
    Ok((
        StatusCode::OK,
        Json(MessageResp {
            message: "Booking deleted successfully".into(),
        }),
    ))
}

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use tracing::{info, warn};

use super::{json_body, parse_id};
use crate::errors::AppError;
use crate::models::user::Role;
use crate::repos::{NewPhoto, RepoError};
use crate::serializers::filled;
use crate::serializers::photo::{
    CreatePhotoReq, GalleryResp, OwnerPhotosResp, PhotoCreatedResp, PhotoDeletedResp,
    PhotoWithOwner,
};
use crate::serializers::user_auth::UserPublic;
use crate::AppState;

const DEFAULT_PHOTO_TYPE: &str = "portrait";

/// The whole gallery, each photo with its photographer.
pub async fn list_photos(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<GalleryResp>), AppError> {
    let rows = state
        .photos
        .list_with_owners()
        .await
        .map_err(|e| AppError::retrieval("Error fetching photos", e))?;

    let images = rows
        .into_iter()
        .map(|(photo, owner)| PhotoWithOwner {
            photo,
            user: owner.as_ref().map(UserPublic::from),
        })
        .collect();
    Ok((StatusCode::OK, Json(GalleryResp { images })))
}

pub async fn list_by_owner(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<OwnerPhotosResp>), AppError> {
    let owner = parse_id(&id, "Invalid photographer id")?;
    let photos = state
        .photos
        .list_by_owner(owner)
        .await
        .map_err(|e| AppError::retrieval("Failed to fetch images.", e))?;
    Ok((
        StatusCode::OK,
        Json(OwnerPhotosResp {
            success: true,
            photos,
        }),
    ))
}

pub async fn upload_photo(
    State(state): State<AppState>,
    body: Result<Json<CreatePhotoReq>, JsonRejection>,
) -> Result<(StatusCode, Json<PhotoCreatedResp>), AppError> {
    let req = json_body(body, "Invalid request body")?;

    let Some(raw_id) = req.photographer_id.as_ref().filter(|i| !i.is_blank()) else {
        return Err(AppError::validation("Photographer ID is required"));
    };
    let photographer_id = raw_id
        .to_id()
        .ok_or_else(|| AppError::validation("Invalid photographer id"))?;
    let Some(image) = filled(&req.image) else {
        return Err(AppError::validation("Image is required"));
    };

    let Some(photographer) = state
        .accounts
        .find_by_id(photographer_id)
        .await
        .map_err(|e| AppError::persistence("Failed to create photo", e))?
    else {
        warn!(photographer_id, "photo rejected: no such account");
        return Err(AppError::not_found("Photographer not found"));
    };
    if photographer.user_type != Role::Photographer {
        warn!(photographer_id, "photo rejected: account is not a photographer");
        return Err(AppError::forbidden("The specified user is not a photographer"));
    }

    let locator = state.images.store(image).map_err(|e| {
        warn!(error = %e, photographer_id, "photo rejected: bad image payload");
        AppError::validation("Invalid image payload")
    })?;

    let photo = state
        .photos
        .create(NewPhoto {
            user_id: photographer.id,
            image: locator,
            photo_type: filled(&req.photo_type)
                .unwrap_or(DEFAULT_PHOTO_TYPE)
                .to_string(),
            title: filled(&req.title).map(str::to_string),
            description: filled(&req.description).map(str::to_string),
        })
        .await
        .map_err(|e| AppError::persistence("Failed to create photo", e))?;

    info!(photo_id = photo.id, photographer_id, "photo uploaded");
    Ok((
        StatusCode::CREATED,
        Json(PhotoCreatedResp {
            success: true,
            photo: PhotoWithOwner {
                photo,
                user: Some(UserPublic::from(&photographer)),
            },
        }),
    ))
}

pub async fn delete_photo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<(StatusCode, Json<PhotoDeletedResp>), AppError> {
    let id = parse_id(&id, "Invalid photo id")?;

    if state.policy.enforce_ownership {
        let claims = state.credentials.auth_from_header(&headers)?;
        let Some(photo) = state
            .photos
            .find(id)
            .await
            .map_err(|e| AppError::persistence("Failed to delete photo", e))?
        else {
            return Err(AppError::not_found("Photo not found"));
        };
        if photo.user_id != claims.sub {
            warn!(photo_id = id, account_id = claims.sub, "photo delete refused");
            return Err(AppError::forbidden("Not authorized for this resource"));
        }
    }

    let removed = state.photos.delete(id).await.map_err(|e| match e {
        RepoError::NotFound => AppError::not_found("Photo not found"),
        other => AppError::persistence("Failed to delete photo", other),
    })?;

    info!(photo_id = id, "photo deleted");
    Ok((
        StatusCode::OK,
        Json(PhotoDeletedResp {
            success: true,
            result: removed,
        }),
    ))
}

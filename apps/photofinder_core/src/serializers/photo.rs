use serde::{Deserialize, Serialize};

use super::user_auth::UserPublic;
use super::IdInput;
use crate::models::photo;

#[derive(Debug, Deserialize, Default)]
pub struct CreatePhotoReq {
    pub photographer_id: Option<IdInput>,
    pub image: Option<String>,
    pub photo_type: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
}

/// A photo with its owner's public fields under `user`.
#[derive(Debug, Serialize)]
pub struct PhotoWithOwner {
    #[serde(flatten)]
    pub photo: photo::Model,
    pub user: Option<UserPublic>,
}

#[derive(Debug, Serialize)]
pub struct PhotoCreatedResp {
    pub success: bool,
    pub photo: PhotoWithOwner,
}

#[derive(Debug, Serialize)]
pub struct GalleryResp {
    pub images: Vec<PhotoWithOwner>,
}

#[derive(Debug, Serialize)]
pub struct OwnerPhotosResp {
    pub success: bool,
    pub photos: Vec<photo::Model>,
}

#[derive(Debug, Serialize)]
pub struct PhotoDeletedResp {
    pub success: bool,
    pub result: photo::Model,
}

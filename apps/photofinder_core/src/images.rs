//! Image payload intake. Photos keep whatever locator the store hands back;
//! the inline store keeps the payload itself once it has checked it.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use thiserror::Error;
use url::Url;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ImageError {
    #[error("image payload is empty")]
    Empty,

    #[error("unsupported image url scheme '{0}'")]
    Scheme(String),

    #[error("image payload is not valid base64")]
    Encoding,

    #[error("data uri is not an image ({0})")]
    MediaType(String),

    #[error("image is {size} bytes, limit is {limit}")]
    TooLarge { size: usize, limit: usize },
}

pub trait ImageStore: Send + Sync {
    /// Accept a payload and return the locator to persist.
    fn store(&self, payload: &str) -> Result<String, ImageError>;
}

/// Stores images inline (data URI or raw base64) or by remote URL.
#[derive(Debug, Clone)]
pub struct InlineImageStore {
    max_bytes: usize,
}

impl InlineImageStore {
    pub fn new(max_bytes: usize) -> Self {
        Self { max_bytes }
    }

    fn check_base64(&self, data: &str) -> Result<(), ImageError> {
        // decoded length is at most 3/4 of the encoded one
        let estimate = data.len() / 4 * 3;
        if estimate > self.max_bytes.saturating_add(3) {
            return Err(ImageError::TooLarge {
                size: estimate,
                limit: self.max_bytes,
            });
        }
        let bytes = STANDARD.decode(data.trim()).map_err(|_| ImageError::Encoding)?;
        if bytes.is_empty() {
            return Err(ImageError::Empty);
        }
        if bytes.len() > self.max_bytes {
            return Err(ImageError::TooLarge {
                size: bytes.len(),
                limit: self.max_bytes,
            });
        }
        Ok(())
    }
}

impl ImageStore for InlineImageStore {
    fn store(&self, payload: &str) -> Result<String, ImageError> {
        let payload = payload.trim();
        if payload.is_empty() {
            return Err(ImageError::Empty);
        }

        if let Some(rest) = payload.strip_prefix("data:") {
            let Some((meta, data)) = rest.split_once(',') else {
                return Err(ImageError::Encoding);
            };
            let Some(mime) = meta.strip_suffix(";base64") else {
                return Err(ImageError::Encoding);
            };
            if !mime.starts_with("image/") {
                return Err(ImageError::MediaType(mime.to_string()));
            }
            self.check_base64(data)?;
            return Ok(payload.to_string());
        }

        if let Ok(url) = Url::parse(payload) {
            return match url.scheme() {
                "http" | "https" => Ok(url.to_string()),
                other => Err(ImageError::Scheme(other.to_string())),
            };
        }

        self.check_base64(payload)?;
        Ok(payload.to_string())
    }
}

//! Profile image domain
//!
//! An upload only becomes an [`AcceptedImage`] after its type has been
//! checked, so services can take one without re-validating the transport
//! details. Where the bytes end up is the business of an [`ImageStore`].

use std::path::Path;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

use crate::domain::user::UserEmail;
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

pub const INVALID_IMAGE_FORMAT: &str =
    "Invalid file format. Only JPEG, PNG, and GIF are allowed.";

/// Image formats accepted for profile pictures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Jpeg,
    Png,
    Gif,
}

impl ImageKind {
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/jpeg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            "image/gif" => Some(Self::Gif),
            _ => None,
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
        }
    }
}

/// Why an upload was refused before reaching the image service
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ImageRejection {
    #[error("Invalid file format. Only JPEG, PNG, and GIF are allowed.")]
    UnsupportedType(String),
}

impl From<ImageRejection> for DomainError {
    fn from(err: ImageRejection) -> Self {
        DomainError::validation(err.to_string())
    }
}

/// An uploaded file whose type has been validated
#[derive(Debug, Clone)]
pub struct AcceptedImage {
    kind: ImageKind,
    original_name: String,
    bytes: Bytes,
}

impl AcceptedImage {
    /// Accept an upload if its declared (or guessed) type is an allowed image
    ///
    /// The declared content type wins; the original file name is only used
    /// when the client sent none.
    pub fn accept(
        original_name: impl Into<String>,
        content_type: Option<&str>,
        bytes: Bytes,
    ) -> Result<Self, ImageRejection> {
        let original_name = original_name.into();
        let mime = match content_type {
            Some(declared) => declared.to_string(),
            None => mime_guess::from_path(&original_name)
                .first_raw()
                .unwrap_or("application/octet-stream")
                .to_string(),
        };

        let kind = ImageKind::from_mime(&mime).ok_or(ImageRejection::UnsupportedType(mime))?;

        Ok(Self {
            kind,
            original_name,
            bytes,
        })
    }

    pub fn kind(&self) -> ImageKind {
        self.kind
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Extension of the original file name including the dot, or empty
    pub fn extension(&self) -> String {
        Path::new(&self.original_name)
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default()
    }
}

/// Destination for profile image bytes
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Persist the image for a user and return the stored file name
    async fn save(&self, owner: &UserEmail, image: &AcceptedImage) -> Result<String, DomainError>;

    /// Public path under which a stored file name is served
    fn public_path(&self, file_name: &str) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_kind_from_mime() {
        assert_eq!(ImageKind::from_mime("image/jpeg"), Some(ImageKind::Jpeg));
        assert_eq!(ImageKind::from_mime("IMAGE/PNG"), Some(ImageKind::Png));
        assert_eq!(ImageKind::from_mime("image/gif"), Some(ImageKind::Gif));
        assert_eq!(ImageKind::from_mime("image/webp"), None);
        assert_eq!(ImageKind::from_mime("text/plain"), None);
    }

    #[test]
    fn test_accept_declared_type() {
        let image =
            AcceptedImage::accept("me.png", Some("image/png"), Bytes::from_static(b"png")).unwrap();

        assert_eq!(image.kind(), ImageKind::Png);
        assert_eq!(image.extension(), ".png");
        assert_eq!(image.size(), 3);
    }

    #[test]
    fn test_declared_type_wins_over_name() {
        let result = AcceptedImage::accept("me.png", Some("application/pdf"), Bytes::new());

        assert_eq!(
            result.unwrap_err(),
            ImageRejection::UnsupportedType("application/pdf".to_string())
        );
    }

    #[test]
    fn test_guess_type_from_name() {
        let image = AcceptedImage::accept("photo.jpg", None, Bytes::new()).unwrap();
        assert_eq!(image.kind(), ImageKind::Jpeg);

        assert!(AcceptedImage::accept("notes.txt", None, Bytes::new()).is_err());
        assert!(AcceptedImage::accept("no_extension", None, Bytes::new()).is_err());
    }

    #[test]
    fn test_rejection_message() {
        let err = AcceptedImage::accept("a.txt", Some("text/plain"), Bytes::new()).unwrap_err();
        assert_eq!(err.to_string(), INVALID_IMAGE_FORMAT);

        let domain: DomainError = err.into();
        assert!(matches!(domain, DomainError::Validation { .. }));
    }

    #[test]
    fn test_extension() {
        let accept = |name: &str| AcceptedImage::accept(name, Some("image/png"), Bytes::new()).unwrap();

        assert_eq!(accept("me.png").extension(), ".png");
        assert_eq!(accept("archive.tar.gif").extension(), ".gif");
        assert_eq!(accept("noext").extension(), "");
        assert_eq!(accept(".hidden").extension(), "");
    }
}

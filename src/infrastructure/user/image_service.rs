//! Profile image association

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::domain::image::{AcceptedImage, ImageStore, INVALID_IMAGE_FORMAT};
use crate::domain::user::{
    UserEmail, UserRepository, UserValidationError, IMAGE_ALREADY_EXISTS, USER_NOT_FOUND,
};
use crate::domain::DomainError;

use super::service::supplied;

/// Message returned for any unexpected failure while associating an image
pub const IMAGE_UPLOAD_FAILED: &str = "Internal server error.";

/// Links an uploaded image to a user, at most once per user
pub struct ImageService<R: UserRepository> {
    repository: Arc<R>,
    store: Arc<dyn ImageStore>,
}

impl<R: UserRepository> std::fmt::Debug for ImageService<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageService")
            .field("repository", &self.repository)
            .finish_non_exhaustive()
    }
}

impl<R: UserRepository> ImageService<R> {
    pub fn new(repository: Arc<R>, store: Arc<dyn ImageStore>) -> Self {
        Self { repository, store }
    }

    /// Store the image and record its public path on the user
    ///
    /// The bytes are only written once the user is known to exist and to have
    /// no image yet, so a rejected upload never replaces the stored file.
    /// Returns the public path of the image.
    pub async fn associate_image(
        &self,
        email: Option<&str>,
        image: Option<AcceptedImage>,
    ) -> Result<String, DomainError> {
        let email = supplied(email)
            .map(UserEmail::new)
            .ok_or(UserValidationError::MissingEmail)?;

        debug!(email = %email, "Associating image");

        let mut user = self
            .repository
            .find_by_email(&email)
            .await
            .map_err(mask_failure)?
            .ok_or_else(|| DomainError::not_found(USER_NOT_FOUND))?;

        let image = image.ok_or_else(|| DomainError::validation(INVALID_IMAGE_FORMAT))?;

        if user.has_image() {
            warn!(email = %email, "User already has an image");
            return Err(DomainError::conflict(IMAGE_ALREADY_EXISTS));
        }

        let file_name = self.store.save(&email, &image).await.map_err(mask_failure)?;
        let public_path = self.store.public_path(&file_name);

        user.attach_image(public_path.clone())?;
        self.repository
            .update_existing(&user)
            .await
            .map_err(mask_failure)?;

        info!(email = %email, path = %public_path, size = image.size(), "Image associated");
        Ok(public_path)
    }
}

fn mask_failure(err: DomainError) -> DomainError {
    error!(error = %err, "Image association failed");
    DomainError::internal(IMAGE_UPLOAD_FAILED)
}

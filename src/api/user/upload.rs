//! Multipart transport for profile image uploads
//!
//! The form carries a text field `email` and one file field `image`. Parsing
//! turns the file into an [`AcceptedImage`] or rejects the request before the
//! image service runs.

use axum::{
    extract::{
        multipart::{Field, MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::image::AcceptedImage;

pub const IMAGE_UPLOADED: &str = "Image uploaded successfully.";
pub const EMAIL_FIELD: &str = "email";
pub const IMAGE_FIELD: &str = "image";

/// Body of a successful upload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadImageResponse {
    pub message: String,
    pub file_path: String,
}

/// Fields collected from the upload form
#[derive(Debug, Default)]
pub struct UploadForm {
    pub email: Option<String>,
    pub image: Option<AcceptedImage>,
}

/// POST /uploadImage
pub async fn upload_image(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<UploadImageResponse>), ApiError> {
    let mut multipart = multipart.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "Rejected non-multipart upload");
        ApiError::new(rejection.status(), rejection.body_text())
    })?;

    let form = read_upload_form(&mut multipart).await?;
    debug!(email = ?form.email, has_file = form.image.is_some(), "Uploading image");

    let file_path = state
        .image_service
        .associate_image(form.email.as_deref(), form.image)
        .await
        .map_err(ApiError::from)?;

    Ok((
        StatusCode::CREATED,
        Json(UploadImageResponse {
            message: IMAGE_UPLOADED.to_string(),
            file_path,
        }),
    ))
}

/// Read the whole form, validating the image as soon as it arrives
pub async fn read_upload_form(multipart: &mut Multipart) -> Result<UploadForm, ApiError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();

        if field.file_name().is_some() {
            if name != IMAGE_FIELD || form.image.is_some() {
                warn!(field = %name, "Unexpected file field in upload");
                return Err(ApiError::bad_request("Unexpected field"));
            }
            form.image = Some(read_image(field).await?);
        } else if name == EMAIL_FIELD {
            form.email = Some(field.text().await.map_err(multipart_error)?);
        }
    }

    Ok(form)
}

async fn read_image(field: Field<'_>) -> Result<AcceptedImage, ApiError> {
    let file_name = field.file_name().unwrap_or_default().to_string();
    let content_type = field.content_type().map(str::to_string);
    let bytes = field.bytes().await.map_err(multipart_error)?;

    AcceptedImage::accept(file_name, content_type.as_deref(), bytes).map_err(|rejection| {
        warn!(content_type = ?content_type, "Rejected upload with unsupported type");
        ApiError::from(crate::domain::DomainError::from(rejection))
    })
}

/// Transport failures, including an oversized body, are client errors
fn multipart_error(err: MultipartError) -> ApiError {
    warn!(error = %err.body_text(), "Malformed multipart body");

    ApiError::bad_request(err.body_text())
}

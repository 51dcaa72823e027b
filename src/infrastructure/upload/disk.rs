//! Local directory image store

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::image::{AcceptedImage, ImageStore};
use crate::domain::user::UserEmail;
use crate::domain::DomainError;

/// Writes images into a directory served under a public prefix
///
/// Files are named `<email><extension>`; a later write for the same email and
/// extension replaces the file.
#[derive(Debug, Clone)]
pub struct DiskImageStore {
    directory: PathBuf,
    public_prefix: String,
}

impl DiskImageStore {
    pub fn new(directory: impl Into<PathBuf>, public_prefix: impl Into<String>) -> Self {
        let public_prefix = public_prefix.into().trim_end_matches('/').to_string();

        Self {
            directory: directory.into(),
            public_prefix,
        }
    }
}

/// File name an image is stored under
///
/// Path separators in the email are replaced so the file always lands
/// directly inside the upload directory.
pub fn stored_file_name(owner: &UserEmail, image: &AcceptedImage) -> String {
    let stem: String = owner
        .as_str()
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            other => other,
        })
        .collect();

    format!("{}{}", stem, image.extension())
}

#[async_trait]
impl ImageStore for DiskImageStore {
    async fn save(&self, owner: &UserEmail, image: &AcceptedImage) -> Result<String, DomainError> {
        tokio::fs::create_dir_all(&self.directory).await.map_err(|e| {
            DomainError::storage(format!(
                "Failed to create upload directory '{}': {}",
                self.directory.display(),
                e
            ))
        })?;

        let file_name = stored_file_name(owner, image);
        let path = self.directory.join(&file_name);

        tokio::fs::write(&path, image.bytes())
            .await
            .map_err(|e| DomainError::storage(format!("Failed to write '{}': {}", path.display(), e)))?;

        debug!(
            path = %path.display(),
            content_type = image.kind().mime(),
            bytes = image.size(),
            "Image written"
        );
        Ok(file_name)
    }

    fn public_path(&self, file_name: &str) -> String {
        format!("{}/{}", self.public_prefix, file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("user-images-{}", uuid::Uuid::new_v4()))
    }

    fn gif(name: &str) -> AcceptedImage {
        AcceptedImage::accept(name, Some("image/gif"), Bytes::from_static(b"GIF89a")).unwrap()
    }

    #[test]
    fn test_stored_file_name() {
        let owner = UserEmail::new("jane@example.com");

        assert_eq!(stored_file_name(&owner, &gif("cat.gif")), "jane@example.com.gif");
        assert_eq!(stored_file_name(&owner, &gif("noext")), "jane@example.com");
    }

    #[test]
    fn test_stored_file_name_strips_separators() {
        let owner = UserEmail::new("../../etc/x@example.com");

        let name = stored_file_name(&owner, &gif("a.gif"));
        assert!(!name.contains('/'));
        assert_eq!(name, ".._.._etc_x@example.com.gif");
    }

    #[test]
    fn test_public_path() {
        let store = DiskImageStore::new("images", "/images/");

        assert_eq!(store.public_path("a@b.co.png"), "/images/a@b.co.png");
    }

    #[tokio::test]
    async fn test_save_writes_file() {
        let dir = temp_dir();
        let store = DiskImageStore::new(&dir, "/images");

        let name = store
            .save(&UserEmail::new("jane@example.com"), &gif("cat.gif"))
            .await
            .unwrap();

        assert_eq!(name, "jane@example.com.gif");
        let written = tokio::fs::read(dir.join(&name)).await.unwrap();
        assert_eq!(written, b"GIF89a");

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }
}
